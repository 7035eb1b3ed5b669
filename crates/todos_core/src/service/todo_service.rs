//! Todo use-case service.
//!
//! # Responsibility
//! - Validate titles before they reach any backend.
//! - Turn contract flags into typed outcomes for request handlers.
//! - Assemble read models for the lists overview and a single list page.
//!
//! # Invariants
//! - The service never bypasses the persistence contract.
//! - The service is backend-agnostic.
//! - Titles are trimmed and between 1 and `TITLE_MAX_CHARS` characters.

use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use crate::repo::contract::{PersistError, TodoPersistence};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;

/// Title validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleError {
    Blank,
    TooLong { max_chars: usize, actual_chars: usize },
}

impl Display for TitleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blank => write!(f, "title must not be blank"),
            Self::TooLong {
                max_chars,
                actual_chars,
            } => write!(
                f,
                "title must be at most {max_chars} characters, got {actual_chars}"
            ),
        }
    }
}

impl Error for TitleError {}

/// Errors from todo use-cases.
#[derive(Debug)]
pub enum TodoServiceError {
    InvalidTitle(TitleError),
    /// The user already owns a list with this title.
    DuplicateTitle(String),
    TodoListNotFound(TodoListId),
    TodoNotFound {
        todo_list_id: TodoListId,
        todo_id: TodoId,
    },
    Persist(PersistError),
}

impl Display for TodoServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(err) => write!(f, "{err}"),
            Self::DuplicateTitle(_) => write!(f, "list title must be unique"),
            Self::TodoListNotFound(id) => write!(f, "todo list not found: {id}"),
            Self::TodoNotFound {
                todo_list_id,
                todo_id,
            } => write!(f, "todo not found: {todo_id} in list {todo_list_id}"),
            Self::Persist(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TodoServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidTitle(err) => Some(err),
            Self::Persist(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TitleError> for TodoServiceError {
    fn from(value: TitleError) -> Self {
        Self::InvalidTitle(value)
    }
}

impl From<PersistError> for TodoServiceError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

pub type ServiceResult<T> = Result<T, TodoServiceError>;

/// One row of the lists overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListSummary {
    pub id: TodoListId,
    pub title: String,
    pub is_done: bool,
    pub todo_count: usize,
    pub done_count: usize,
}

/// A single list with its todos in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoListView {
    pub todo_list: TodoList,
    pub todos: Vec<Todo>,
    pub is_done: bool,
    pub has_undone_todos: bool,
}

/// Trims `raw` and checks it against title rules.
pub fn normalize_title(raw: &str) -> Result<String, TitleError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TitleError::Blank);
    }
    let actual_chars = trimmed.chars().count();
    if actual_chars > TITLE_MAX_CHARS {
        return Err(TitleError::TooLong {
            max_chars: TITLE_MAX_CHARS,
            actual_chars,
        });
    }
    Ok(trimmed.to_string())
}

/// Todo service facade over any persistence backend.
pub struct TodoService<P: TodoPersistence> {
    store: P,
}

impl<P: TodoPersistence> TodoService<P> {
    pub fn new(store: P) -> Self {
        Self { store }
    }

    /// Returns the underlying backend.
    pub fn into_inner(self) -> P {
        self.store
    }

    /// Lists overview in display order.
    pub fn overview(&self) -> ServiceResult<Vec<TodoListSummary>> {
        let lists = self.store.sorted_todo_lists()?;
        Ok(lists
            .into_iter()
            .map(|list| TodoListSummary {
                is_done: self.store.is_done_todo_list(&list),
                todo_count: list.todos.len(),
                done_count: list.todos.iter().filter(|todo| todo.done).count(),
                id: list.id,
                title: list.title,
            })
            .collect())
    }

    /// One list with sorted todos.
    pub fn todo_list_view(&self, todo_list_id: TodoListId) -> ServiceResult<TodoListView> {
        let todo_list = self
            .store
            .load_todo_list(todo_list_id)?
            .ok_or(TodoServiceError::TodoListNotFound(todo_list_id))?;
        let todos = self.store.sorted_todos(&todo_list)?;
        Ok(TodoListView {
            is_done: self.store.is_done_todo_list(&todo_list),
            has_undone_todos: self.store.has_undone_todos(&todo_list),
            todo_list,
            todos,
        })
    }

    pub fn create_todo_list(&mut self, title: &str) -> ServiceResult<()> {
        let title = normalize_title(title)?;
        if !self.store.create_todo_list(&title)? {
            return Err(TodoServiceError::DuplicateTitle(title));
        }
        Ok(())
    }

    /// Renames a list, rejecting titles owned by another of the user's lists.
    ///
    /// Renaming a list to its current title succeeds.
    pub fn rename_todo_list(&mut self, todo_list_id: TodoListId, title: &str) -> ServiceResult<()> {
        let title = normalize_title(title)?;
        let current = self
            .store
            .load_todo_list(todo_list_id)?
            .ok_or(TodoServiceError::TodoListNotFound(todo_list_id))?;
        if current.title == title {
            return Ok(());
        }
        if self.store.exists_todo_list_title(&title)? {
            return Err(TodoServiceError::DuplicateTitle(title));
        }
        if !self.store.set_todo_list_title(todo_list_id, &title)? {
            return Err(TodoServiceError::TodoListNotFound(todo_list_id));
        }
        Ok(())
    }

    pub fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> ServiceResult<()> {
        if !self.store.delete_todo_list(todo_list_id)? {
            return Err(TodoServiceError::TodoListNotFound(todo_list_id));
        }
        Ok(())
    }

    pub fn add_todo(&mut self, todo_list_id: TodoListId, title: &str) -> ServiceResult<()> {
        let title = normalize_title(title)?;
        if !self.store.create_todo(todo_list_id, &title)? {
            return Err(TodoServiceError::TodoListNotFound(todo_list_id));
        }
        Ok(())
    }

    /// Flips a todo and returns its new done state.
    pub fn toggle_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> ServiceResult<bool> {
        if !self.store.toggle_done_todo(todo_list_id, todo_id)? {
            return Err(TodoServiceError::TodoNotFound {
                todo_list_id,
                todo_id,
            });
        }
        let todo = self
            .store
            .load_todo(todo_list_id, todo_id)?
            .ok_or(TodoServiceError::TodoNotFound {
                todo_list_id,
                todo_id,
            })?;
        Ok(todo.done)
    }

    pub fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> ServiceResult<()> {
        if !self.store.delete_todo(todo_list_id, todo_id)? {
            return Err(TodoServiceError::TodoNotFound {
                todo_list_id,
                todo_id,
            });
        }
        Ok(())
    }

    pub fn complete_all(&mut self, todo_list_id: TodoListId) -> ServiceResult<()> {
        if !self.store.complete_all_todos(todo_list_id)? {
            return Err(TodoServiceError::TodoListNotFound(todo_list_id));
        }
        Ok(())
    }

    /// Checks credentials. Unknown users and wrong passwords look the same.
    pub fn sign_in(&self, username: &str, password: &str) -> ServiceResult<bool> {
        Ok(self.store.authenticate(username, password)?)
    }
}
