//! Core persistence for per-user todo lists.
//! One contract, two interchangeable backends: SQLite and per-session memory.

pub mod auth;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sort;

pub use auth::{BcryptVerifier, PasswordVerifier};
pub use config::{BackendKind, ConfigError, StoreConfig};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::id::IdGenerator;
pub use model::todo::{parse_entity_id, Todo, TodoId, TodoList, TodoListId};
pub use model::user::UserCredentials;
pub use repo::backend::StoreBackend;
pub use repo::contract::{PersistError, PersistResult, TodoPersistence};
pub use repo::session_repo::{SessionTodoPersistence, TodoSession};
pub use repo::sqlite_repo::SqliteTodoPersistence;
pub use service::todo_service::{
    normalize_title, TitleError, TodoListSummary, TodoListView, TodoService, TodoServiceError,
    TITLE_MAX_CHARS,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
