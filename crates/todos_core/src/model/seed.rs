//! Default dataset for freshly observed sessions.
//!
//! # Invariants
//! - All identifiers come from the caller's generator, so seeded ids never
//!   collide with ids created later in the same session.
//! - Seeded entities are owned by the given username.

use crate::model::id::IdGenerator;
use crate::model::todo::{Todo, TodoList};

/// `(list title, [(todo title, done)])`
const SEED_LISTS: &[(&str, &[(&str, bool)])] = &[
    (
        "Work Todos",
        &[
            ("Get coffee", false),
            ("Chat with co-workers", false),
            ("Duck out of meeting", false),
        ],
    ),
    (
        "Home Todos",
        &[
            ("Feed the cats", true),
            ("Go to bed", true),
            ("Buy milk", false),
            ("Water the plants", false),
        ],
    ),
    ("Additional Todos", &[("Watch the news", true)]),
    ("social todos", &[]),
];

/// Builds the default lists for `username`.
pub fn seed_todo_lists(username: &str, ids: &mut IdGenerator) -> Vec<TodoList> {
    SEED_LISTS
        .iter()
        .map(|(title, todos)| {
            let mut list = TodoList::new(ids.next_id(), *title, username);
            for (todo_title, done) in todos.iter() {
                let mut todo = Todo::new(ids.next_id(), list.id, *todo_title, username);
                todo.done = *done;
                list.todos.push(todo);
            }
            list
        })
        .collect()
}
