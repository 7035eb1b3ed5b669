//! Todo list and todo records.
//!
//! # Responsibility
//! - Define the canonical records returned by every persistence backend.
//! - Provide coercion from raw identifier text to numeric ids.
//!
//! # Invariants
//! - `Todo::todo_list_id` never changes after creation.
//! - `TodoList::todos` storage order carries no meaning; display order is
//!   computed by `crate::sort`.

use serde::{Deserialize, Serialize};

/// Identifier of a todo list, unique within its owner's scope.
pub type TodoListId = i64;

/// Identifier of a todo, unique within its parent list.
pub type TodoId = i64;

/// A single owned task item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub title: String,
    pub done: bool,
    /// Owning username.
    pub username: String,
    /// Parent list. Fixed at creation.
    pub todo_list_id: TodoListId,
}

impl Todo {
    /// Creates a not-done todo.
    pub fn new(
        id: TodoId,
        todo_list_id: TodoListId,
        title: impl Into<String>,
        username: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            done: false,
            username: username.into(),
            todo_list_id,
        }
    }

    /// Flips the done flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}

/// A named, owned collection of todos.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub id: TodoListId,
    pub title: String,
    /// Owning username.
    pub username: String,
    pub todos: Vec<Todo>,
}

impl TodoList {
    /// Creates an empty list.
    pub fn new(id: TodoListId, title: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            username: username.into(),
            todos: Vec::new(),
        }
    }

    pub fn find_todo(&self, todo_id: TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == todo_id)
    }

    pub fn find_todo_mut(&mut self, todo_id: TodoId) -> Option<&mut Todo> {
        self.todos.iter_mut().find(|todo| todo.id == todo_id)
    }
}

/// Coerces raw identifier text (for example a path segment) to an id.
///
/// Returns `None` for anything that is not a base-10 integer after trimming,
/// which callers treat the same as "not found".
pub fn parse_entity_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}
