//! Completion classification and display ordering.
//!
//! # Responsibility
//! - Classify lists and todos as done/undone.
//! - Produce the single display order every backend must return.
//!
//! # Invariants
//! - An empty list is undone, never done.
//! - Undone entries always precede done entries.
//! - Within a partition, titles ascend case-insensitively; equal keys keep
//!   their input order.

use crate::model::todo::{Todo, TodoList};

/// Returns `true` iff `list` has at least one todo and every todo is done.
pub fn is_done_todo_list(list: &TodoList) -> bool {
    !list.todos.is_empty() && list.todos.iter().all(|todo| todo.done)
}

/// Returns `true` iff at least one todo in `list` is not done.
pub fn has_undone_todos(list: &TodoList) -> bool {
    list.todos.iter().any(|todo| !todo.done)
}

/// Orders lists: undone lists by title, then done lists by title.
pub fn sort_todo_lists(lists: Vec<TodoList>) -> Vec<TodoList> {
    let (mut undone, mut done): (Vec<_>, Vec<_>) =
        lists.into_iter().partition(|list| !is_done_todo_list(list));
    sort_by_title(&mut undone, |list| list.title.as_str());
    sort_by_title(&mut done, |list| list.title.as_str());
    undone.extend(done);
    undone
}

/// Orders todos: not-done todos by title, then done todos by title.
pub fn sort_todos(todos: Vec<Todo>) -> Vec<Todo> {
    let (mut undone, mut done): (Vec<_>, Vec<_>) = todos.into_iter().partition(|todo| !todo.done);
    sort_by_title(&mut undone, |todo| todo.title.as_str());
    sort_by_title(&mut done, |todo| todo.title.as_str());
    undone.extend(done);
    undone
}

fn sort_by_title<T>(items: &mut [T], title: impl Fn(&T) -> &str) {
    items.sort_by_cached_key(|item| title(item).to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::{has_undone_todos, is_done_todo_list, sort_todo_lists, sort_todos};
    use crate::model::todo::{Todo, TodoList};

    fn todo(id: i64, title: &str, done: bool) -> Todo {
        let mut todo = Todo::new(id, 1, title, "alice");
        todo.done = done;
        todo
    }

    fn list(id: i64, title: &str, todos: &[bool]) -> TodoList {
        let mut list = TodoList::new(id, title, "alice");
        for (index, done) in todos.iter().enumerate() {
            list.todos
                .push(todo(id * 100 + index as i64, "item", *done));
        }
        list
    }

    #[test]
    fn empty_list_is_undone() {
        let empty = list(1, "Empty", &[]);
        assert!(!is_done_todo_list(&empty));
        assert!(!has_undone_todos(&empty));
    }

    #[test]
    fn done_requires_every_todo_done() {
        assert!(is_done_todo_list(&list(1, "All", &[true, true])));
        assert!(!is_done_todo_list(&list(2, "Mixed", &[true, false])));
        assert!(has_undone_todos(&list(2, "Mixed", &[true, false])));
    }

    #[test]
    fn lists_sort_undone_first_case_insensitively() {
        let lists = vec![
            list(1, "A", &[true]),
            list(2, "C", &[false]),
            list(3, "b", &[false, true]),
        ];
        let titles: Vec<_> = sort_todo_lists(lists)
            .into_iter()
            .map(|list| list.title)
            .collect();
        assert_eq!(titles, vec!["b", "C", "A"]);
    }

    #[test]
    fn todos_sort_undone_first_case_insensitively() {
        let todos = vec![
            todo(1, "zebra", true),
            todo(2, "Apple", true),
            todo(3, "mango", false),
            todo(4, "Banana", false),
        ];
        let titles: Vec<_> = sort_todos(todos).into_iter().map(|todo| todo.title).collect();
        assert_eq!(titles, vec!["Banana", "mango", "Apple", "zebra"]);
    }

    #[test]
    fn equal_titles_keep_input_order() {
        let todos = vec![todo(9, "same", false), todo(3, "SAME", false)];
        let ids: Vec<_> = sort_todos(todos).into_iter().map(|todo| todo.id).collect();
        assert_eq!(ids, vec![9, 3]);
    }
}
