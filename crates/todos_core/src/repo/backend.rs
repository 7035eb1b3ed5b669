//! Startup-time backend selection.
//!
//! # Responsibility
//! - Open the configured backend once per process.
//! - Hand out a contract object per session/request.
//!
//! # Invariants
//! - The active backend never changes after `StoreBackend::open`.

use crate::auth::BcryptVerifier;
use crate::config::{BackendKind, StoreConfig};
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::user::UserCredentials;
use crate::repo::contract::TodoPersistence;
use crate::repo::session_repo::{SessionTodoPersistence, TodoSession};
use crate::repo::sqlite_repo::SqliteTodoPersistence;
use log::info;
use rusqlite::Connection;

/// The one backend a process serves from.
pub enum StoreBackend {
    Sqlite(Connection),
    Session(UserCredentials),
}

impl StoreBackend {
    /// Opens the backend named by `config`.
    ///
    /// # Errors
    /// - Returns a DB error when the SQLite file cannot be opened or migrated.
    pub fn open(config: &StoreConfig) -> DbResult<Self> {
        let backend = match config.backend {
            BackendKind::Sqlite => {
                let conn = match config.db_path.as_ref() {
                    Some(path) => open_db(path)?,
                    None => open_db_in_memory()?,
                };
                Self::Sqlite(conn)
            }
            BackendKind::Session => Self::Session(
                config
                    .users
                    .iter()
                    .map(|(username, hash)| (username.as_str(), hash.as_str()))
                    .collect(),
            ),
        };

        info!(
            "event=backend_open module=repo status=ok backend={}",
            backend.kind().as_str()
        );
        Ok(backend)
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Sqlite(_) => BackendKind::Sqlite,
            Self::Session(_) => BackendKind::Session,
        }
    }

    /// Returns the contract bound to `session`'s user.
    ///
    /// The session backend keeps its data inside `session`; the SQLite
    /// backend only reads the username from it.
    pub fn persistence<'a>(
        &'a self,
        session: &'a mut TodoSession,
    ) -> Box<dyn TodoPersistence + 'a> {
        match self {
            Self::Sqlite(conn) => Box::new(SqliteTodoPersistence::new(
                conn,
                session.username(),
                BcryptVerifier,
            )),
            Self::Session(credentials) => Box::new(SessionTodoPersistence::new(
                session,
                credentials,
                BcryptVerifier,
            )),
        }
    }
}
