//! CLI smoke entry point.
//!
//! # Responsibility
//! - Open the backend selected by `TODOS_*` environment variables.
//! - Print a deterministic summary so backend wiring can be checked by hand.

use log::error;
use std::process::ExitCode;
use todos_core::{StoreBackend, StoreConfig, TodoService, TodoSession};

const DEMO_USERNAME: &str = "demo";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=cli_run module=cli status=error error={message}");
            eprintln!("todos_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    todos_core::init_from_config(&config).map_err(|err| err.to_string())?;

    println!("todos_core ping={}", todos_core::ping());
    println!("todos_core version={}", todos_core::core_version());

    let backend = StoreBackend::open(&config).map_err(|err| err.to_string())?;
    println!("backend={}", backend.kind().as_str());

    let mut session = TodoSession::new(DEMO_USERNAME);
    let service = TodoService::new(backend.persistence(&mut session));
    for summary in service.overview().map_err(|err| err.to_string())? {
        println!(
            "[{}] {} ({}/{})",
            if summary.is_done { "x" } else { " " },
            summary.title,
            summary.done_count,
            summary.todo_count
        );
    }
    Ok(())
}
