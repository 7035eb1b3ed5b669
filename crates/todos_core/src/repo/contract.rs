//! Persistence contract shared by every todo backend.
//!
//! # Responsibility
//! - Define the one operation set callers use regardless of backend.
//! - Define the error taxonomy for storage failures.
//!
//! # Invariants
//! - Every operation is scoped to the acting user's entities.
//! - "Not found" is `Ok(false)` / `Ok(None)`, never `Err`.
//! - A duplicate title on creation is `Ok(false)`, never `Err`.
//! - Read results are owned values detached from backend state.
//! - Ordering of `sorted_*` results follows `crate::sort`.

use crate::db::DbError;
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use crate::sort;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PersistResult<T> = Result<T, PersistError>;

/// Storage-level failure. Propagated to callers unmodified, without retry.
#[derive(Debug)]
pub enum PersistError {
    Db(DbError),
    /// Persisted row cannot be converted to a valid model value.
    InvalidData(String),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for PersistError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Per-user todo persistence.
///
/// Implementations are bound to one acting username at construction.
pub trait TodoPersistence {
    /// Creates an empty list. `false` if the user already owns `title`.
    fn create_todo_list(&mut self, title: &str) -> PersistResult<bool>;

    /// Deletes a list and all of its todos. `false` if not found.
    fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> PersistResult<bool>;

    /// Renames a list. `false` if not found or if another of the user's
    /// lists already has `title`.
    ///
    /// Renaming a list to its current title succeeds.
    fn set_todo_list_title(&mut self, todo_list_id: TodoListId, title: &str)
        -> PersistResult<bool>;

    /// Exact, case-sensitive title match among the user's lists.
    fn exists_todo_list_title(&self, title: &str) -> PersistResult<bool>;

    /// Loads one list with all of its todos.
    fn load_todo_list(&self, todo_list_id: TodoListId) -> PersistResult<Option<TodoList>>;

    /// All of the user's lists, undone before done, titles ascending.
    fn sorted_todo_lists(&self) -> PersistResult<Vec<TodoList>>;

    /// Appends a not-done todo with a fresh id. `false` if the list is missing.
    fn create_todo(&mut self, todo_list_id: TodoListId, title: &str) -> PersistResult<bool>;

    fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> PersistResult<bool>;

    /// Flips the done flag. `false` if the list or todo is missing.
    fn toggle_done_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId)
        -> PersistResult<bool>;

    /// Marks every undone todo done. `true` for an existing list even when
    /// nothing changed.
    fn complete_all_todos(&mut self, todo_list_id: TodoListId) -> PersistResult<bool>;

    fn load_todo(&self, todo_list_id: TodoListId, todo_id: TodoId)
        -> PersistResult<Option<Todo>>;

    /// The list's todos, not-done before done, titles ascending.
    fn sorted_todos(&self, todo_list: &TodoList) -> PersistResult<Vec<Todo>>;

    fn has_undone_todos(&self, todo_list: &TodoList) -> bool {
        sort::has_undone_todos(todo_list)
    }

    fn is_done_todo_list(&self, todo_list: &TodoList) -> bool {
        sort::is_done_todo_list(todo_list)
    }

    /// Checks a plaintext password against the stored hash for `username`.
    ///
    /// Unknown users and mismatched passwords are both `Ok(false)`.
    fn authenticate(&self, username: &str, password: &str) -> PersistResult<bool>;
}

impl<P: TodoPersistence + ?Sized> TodoPersistence for Box<P> {
    fn create_todo_list(&mut self, title: &str) -> PersistResult<bool> {
        (**self).create_todo_list(title)
    }

    fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> PersistResult<bool> {
        (**self).delete_todo_list(todo_list_id)
    }

    fn set_todo_list_title(
        &mut self,
        todo_list_id: TodoListId,
        title: &str,
    ) -> PersistResult<bool> {
        (**self).set_todo_list_title(todo_list_id, title)
    }

    fn exists_todo_list_title(&self, title: &str) -> PersistResult<bool> {
        (**self).exists_todo_list_title(title)
    }

    fn load_todo_list(&self, todo_list_id: TodoListId) -> PersistResult<Option<TodoList>> {
        (**self).load_todo_list(todo_list_id)
    }

    fn sorted_todo_lists(&self) -> PersistResult<Vec<TodoList>> {
        (**self).sorted_todo_lists()
    }

    fn create_todo(&mut self, todo_list_id: TodoListId, title: &str) -> PersistResult<bool> {
        (**self).create_todo(todo_list_id, title)
    }

    fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> PersistResult<bool> {
        (**self).delete_todo(todo_list_id, todo_id)
    }

    fn toggle_done_todo(
        &mut self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> PersistResult<bool> {
        (**self).toggle_done_todo(todo_list_id, todo_id)
    }

    fn complete_all_todos(&mut self, todo_list_id: TodoListId) -> PersistResult<bool> {
        (**self).complete_all_todos(todo_list_id)
    }

    fn load_todo(
        &self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> PersistResult<Option<Todo>> {
        (**self).load_todo(todo_list_id, todo_id)
    }

    fn sorted_todos(&self, todo_list: &TodoList) -> PersistResult<Vec<Todo>> {
        (**self).sorted_todos(todo_list)
    }

    fn has_undone_todos(&self, todo_list: &TodoList) -> bool {
        (**self).has_undone_todos(todo_list)
    }

    fn is_done_todo_list(&self, todo_list: &TodoList) -> bool {
        (**self).is_done_todo_list(todo_list)
    }

    fn authenticate(&self, username: &str, password: &str) -> PersistResult<bool> {
        (**self).authenticate(username, password)
    }
}
