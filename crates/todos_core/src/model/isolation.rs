//! Copy-on-read isolation for values leaving a backend.
//!
//! Backends that hold entity graphs in process must never hand out
//! references into that state. Every read result passes through here, so the
//! caller owns an independent graph it may mutate freely.

use crate::model::todo::{Todo, TodoList};

/// Returns a deep copy of a todo list, todos included.
pub fn isolated_list(list: &TodoList) -> TodoList {
    list.clone()
}

/// Returns a deep copy of a todo.
pub fn isolated_todo(todo: &Todo) -> Todo {
    todo.clone()
}

/// Returns deep copies of every list in `lists`, preserving order.
pub fn isolated_lists<'a>(lists: impl IntoIterator<Item = &'a TodoList>) -> Vec<TodoList> {
    lists.into_iter().map(isolated_list).collect()
}

/// Returns deep copies of every todo in `todos`, preserving order.
pub fn isolated_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Vec<Todo> {
    todos.into_iter().map(isolated_todo).collect()
}
