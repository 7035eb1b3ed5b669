//! Store configuration and backend selection input.
//!
//! # Responsibility
//! - Describe which backend to open and where logs go.
//! - Load that description from JSON or from environment variables.
//!
//! # Invariants
//! - Backend choice is made once from configuration, never from caller data.
//! - `users` hashes are opaque bcrypt strings; they are never logged.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_BACKEND: &str = "TODOS_BACKEND";
pub const ENV_DB_PATH: &str = "TODOS_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TODOS_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TODOS_LOG_DIR";
/// JSON object mapping username to bcrypt hash, read into `StoreConfig::users`.
pub const ENV_USERS_FILE: &str = "TODOS_USERS_FILE";

/// Which persistence backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Durable SQLite store.
    Sqlite,
    /// Per-session in-memory store.
    #[default]
    Session,
}

impl BackendKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Session => "session",
        }
    }

    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "relational" => Ok(Self::Sqlite),
            "session" | "memory" => Ok(Self::Session),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

/// Startup configuration for the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// SQLite file. `None` opens a private in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    /// Credentials for the session backend, username to bcrypt hash.
    pub users: BTreeMap<String, String>,
}

#[derive(Debug)]
pub enum ConfigError {
    UnknownBackend(String),
    Json(serde_json::Error),
    UsersFile { path: PathBuf, message: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => {
                write!(f, "unknown backend `{value}`; expected sqlite|session")
            }
            Self::Json(err) => write!(f, "invalid store config: {err}"),
            Self::UsersFile { path, message } => {
                write!(f, "failed to load users file `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::UnknownBackend(_) | Self::UsersFile { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl StoreConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads `TODOS_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset. Credentials are loaded from the
    /// file named by `TODOS_USERS_FILE` when it is set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let backend = match read(ENV_BACKEND) {
            Some(value) => BackendKind::parse(&value)?,
            None => BackendKind::default(),
        };

        Ok(Self {
            backend,
            db_path: read(ENV_DB_PATH).map(PathBuf::from),
            log_level: read(ENV_LOG_LEVEL),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
            users: match read(ENV_USERS_FILE) {
                Some(path) => load_users_file(Path::new(&path))?,
                None => BTreeMap::new(),
            },
        })
    }
}

fn load_users_file(path: &Path) -> Result<BTreeMap<String, String>, ConfigError> {
    let users_error = |message: String| ConfigError::UsersFile {
        path: path.to_path_buf(),
        message,
    };
    let raw = std::fs::read_to_string(path).map_err(|err| users_error(err.to_string()))?;
    serde_json::from_str(&raw).map_err(|err| users_error(err.to_string()))
}
