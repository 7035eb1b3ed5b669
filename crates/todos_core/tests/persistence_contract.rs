use todos_core::db::open_db_in_memory;
use todos_core::{
    BcryptVerifier, SessionTodoPersistence, SqliteTodoPersistence, TodoListId, TodoPersistence,
    TodoSession, UserCredentials,
};

fn with_sqlite(check: fn(&mut dyn TodoPersistence)) {
    let conn = open_db_in_memory().unwrap();
    let mut store = SqliteTodoPersistence::new(&conn, "alice", BcryptVerifier);
    check(&mut store);
}

fn with_session(check: fn(&mut dyn TodoPersistence)) {
    let credentials = UserCredentials::new();
    let mut session = TodoSession::new("alice");
    let mut store = SessionTodoPersistence::new(&mut session, &credentials, BcryptVerifier);
    clear_all(&mut store);
    check(&mut store);
}

/// Removes seeded lists so both backends start from the same empty state.
fn clear_all(store: &mut dyn TodoPersistence) {
    for list in store.sorted_todo_lists().unwrap() {
        assert!(store.delete_todo_list(list.id).unwrap());
    }
    assert!(store.sorted_todo_lists().unwrap().is_empty());
}

fn list_id(store: &dyn TodoPersistence, title: &str) -> TodoListId {
    store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .find(|list| list.title == title)
        .unwrap_or_else(|| panic!("list {title} should exist"))
        .id
}

fn todo_id(store: &dyn TodoPersistence, todo_list_id: TodoListId, title: &str) -> i64 {
    store
        .load_todo_list(todo_list_id)
        .unwrap()
        .unwrap()
        .todos
        .into_iter()
        .find(|todo| todo.title == title)
        .unwrap_or_else(|| panic!("todo {title} should exist"))
        .id
}

/// Creates a list holding `todos` as `(title, done)` pairs.
fn seed_list(store: &mut dyn TodoPersistence, title: &str, todos: &[(&str, bool)]) -> TodoListId {
    assert!(store.create_todo_list(title).unwrap());
    let id = list_id(store, title);
    for (todo_title, done) in todos {
        assert!(store.create_todo(id, todo_title).unwrap());
        if *done {
            let created = todo_id(store, id, todo_title);
            assert!(store.toggle_done_todo(id, created).unwrap());
        }
    }
    id
}

fn create_then_exists_and_duplicate_is_rejected(store: &mut dyn TodoPersistence) {
    assert!(store.create_todo_list("Groceries").unwrap());
    assert!(store.exists_todo_list_title("Groceries").unwrap());

    assert!(!store.create_todo_list("Groceries").unwrap());
    let matching = store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .filter(|list| list.title == "Groceries")
        .count();
    assert_eq!(matching, 1);
}

fn exists_title_is_case_sensitive(store: &mut dyn TodoPersistence) {
    assert!(store.create_todo_list("Groceries").unwrap());
    assert!(!store.exists_todo_list_title("groceries").unwrap());
    assert!(store.create_todo_list("groceries").unwrap());
}

fn new_list_is_empty_and_owned(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Errands", &[]);
    let list = store.load_todo_list(id).unwrap().unwrap();
    assert_eq!(list.title, "Errands");
    assert_eq!(list.username, "alice");
    assert!(list.todos.is_empty());
    assert!(!store.is_done_todo_list(&list));
    assert!(!store.has_undone_todos(&list));
}

fn delete_list_then_load_is_not_found(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Errands", &[("post office", false)]);
    let todo = todo_id(store, id, "post office");

    assert!(store.delete_todo_list(id).unwrap());
    assert!(store.load_todo_list(id).unwrap().is_none());
    assert!(store.load_todo(id, todo).unwrap().is_none());
    assert!(!store.delete_todo_list(id).unwrap());
}

fn rename_updates_title(store: &mut dyn TodoPersistence) {
    let first = seed_list(store, "First", &[]);
    seed_list(store, "Second", &[]);

    assert!(store.set_todo_list_title(first, "Renamed").unwrap());
    assert_eq!(store.load_todo_list(first).unwrap().unwrap().title, "Renamed");
    assert!(!store.exists_todo_list_title("First").unwrap());

    assert!(store.set_todo_list_title(first, "Renamed").unwrap());
    assert!(!store.set_todo_list_title(first + 10_000, "Nope").unwrap());
}

fn rename_onto_owned_title_is_rejected(store: &mut dyn TodoPersistence) {
    let first = seed_list(store, "First", &[]);
    let second = seed_list(store, "Second", &[]);

    assert!(!store.set_todo_list_title(first, "Second").unwrap());
    assert_eq!(store.load_todo_list(first).unwrap().unwrap().title, "First");
    assert_eq!(store.load_todo_list(second).unwrap().unwrap().title, "Second");
    let matching = store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .filter(|list| list.title == "Second")
        .count();
    assert_eq!(matching, 1);

    assert!(store.set_todo_list_title(first, "second").unwrap());
}

fn create_todo_requires_existing_list(store: &mut dyn TodoPersistence) {
    assert!(!store.create_todo(424_242, "orphan").unwrap());

    let id = seed_list(store, "Errands", &[]);
    assert!(store.create_todo(id, "bank").unwrap());
    let list = store.load_todo_list(id).unwrap().unwrap();
    assert_eq!(list.todos.len(), 1);
    assert_eq!(list.todos[0].title, "bank");
    assert!(!list.todos[0].done);
    assert_eq!(list.todos[0].todo_list_id, id);
    assert_eq!(list.todos[0].username, "alice");
}

fn new_todos_get_distinct_ids(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Errands", &[("a", false), ("b", false)]);
    let list = store.load_todo_list(id).unwrap().unwrap();
    assert_ne!(list.todos[0].id, list.todos[1].id);
}

fn toggle_twice_restores_done_flag(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Errands", &[("bank", false)]);
    let todo = todo_id(store, id, "bank");

    assert!(store.toggle_done_todo(id, todo).unwrap());
    assert!(store.load_todo(id, todo).unwrap().unwrap().done);
    assert!(store.toggle_done_todo(id, todo).unwrap());
    assert!(!store.load_todo(id, todo).unwrap().unwrap().done);

    assert!(!store.toggle_done_todo(id, todo + 10_000).unwrap());
    assert!(!store.toggle_done_todo(id + 10_000, todo).unwrap());
}

fn complete_all_marks_undone_and_is_repeatable(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Errands", &[("a", false), ("b", true)]);

    assert!(store.complete_all_todos(id).unwrap());
    let list = store.load_todo_list(id).unwrap().unwrap();
    assert!(list.todos.iter().all(|todo| todo.done));
    assert!(store.is_done_todo_list(&list));

    assert!(store.complete_all_todos(id).unwrap());
    let again = store.load_todo_list(id).unwrap().unwrap();
    assert_eq!(again.todos.len(), 2);
    assert!(again.todos.iter().all(|todo| todo.done));
}

fn complete_all_on_empty_or_missing_list(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Empty", &[]);
    assert!(store.complete_all_todos(id).unwrap());
    assert!(!store.complete_all_todos(id + 10_000).unwrap());
}

fn delete_todo_reports_missing_entities(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Errands", &[("bank", false), ("gym", false)]);
    let bank = todo_id(store, id, "bank");

    assert!(!store.delete_todo(id + 10_000, bank).unwrap());
    assert!(store.delete_todo(id, bank).unwrap());
    assert!(!store.delete_todo(id, bank).unwrap());

    let list = store.load_todo_list(id).unwrap().unwrap();
    assert_eq!(list.todos.len(), 1);
    assert_eq!(list.todos[0].title, "gym");
}

fn load_todo_missing_is_not_found(store: &mut dyn TodoPersistence) {
    let id = seed_list(store, "Errands", &[("bank", false)]);
    let bank = todo_id(store, id, "bank");

    assert!(store.load_todo(id, bank + 10_000).unwrap().is_none());
    assert!(store.load_todo(id + 10_000, bank).unwrap().is_none());
    assert_eq!(store.load_todo(id, bank).unwrap().unwrap().title, "bank");
}

fn sorted_lists_put_undone_first_case_insensitively(store: &mut dyn TodoPersistence) {
    seed_list(store, "A", &[("done one", true)]);
    seed_list(store, "C", &[("open", false)]);
    seed_list(store, "b", &[("open", false), ("closed", true)]);

    let titles: Vec<String> = store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .map(|list| list.title)
        .collect();
    assert_eq!(titles, vec!["b", "C", "A"]);
}

fn sorted_lists_treat_empty_lists_as_undone(store: &mut dyn TodoPersistence) {
    seed_list(store, "alpha", &[("x", true)]);
    seed_list(store, "Zulu", &[]);

    let titles: Vec<String> = store
        .sorted_todo_lists()
        .unwrap()
        .into_iter()
        .map(|list| list.title)
        .collect();
    assert_eq!(titles, vec!["Zulu", "alpha"]);
}

fn sorted_lists_carry_their_todos(store: &mut dyn TodoPersistence) {
    seed_list(store, "Work", &[("a", false), ("b", false)]);
    seed_list(store, "Home", &[("c", true)]);

    let lists = store.sorted_todo_lists().unwrap();
    let counts: Vec<(String, usize)> = lists
        .into_iter()
        .map(|list| (list.title, list.todos.len()))
        .collect();
    assert_eq!(
        counts,
        vec![("Work".to_string(), 2), ("Home".to_string(), 1)]
    );
}

fn sorted_todos_put_undone_first_case_insensitively(store: &mut dyn TodoPersistence) {
    let id = seed_list(
        store,
        "Errands",
        &[
            ("zebra", true),
            ("Apple", true),
            ("mango", false),
            ("Banana", false),
        ],
    );
    let list = store.load_todo_list(id).unwrap().unwrap();

    let titles: Vec<String> = store
        .sorted_todos(&list)
        .unwrap()
        .into_iter()
        .map(|todo| todo.title)
        .collect();
    assert_eq!(titles, vec!["Banana", "mango", "Apple", "zebra"]);
}

fn classification_follows_todo_states(store: &mut dyn TodoPersistence) {
    let mixed = seed_list(store, "Mixed", &[("a", true), ("b", false)]);
    let done = seed_list(store, "Done", &[("a", true)]);

    let mixed = store.load_todo_list(mixed).unwrap().unwrap();
    let done = store.load_todo_list(done).unwrap().unwrap();
    assert!(store.has_undone_todos(&mixed));
    assert!(!store.is_done_todo_list(&mixed));
    assert!(!store.has_undone_todos(&done));
    assert!(store.is_done_todo_list(&done));
}

fn unknown_user_does_not_authenticate(store: &mut dyn TodoPersistence) {
    assert!(!store.authenticate("nobody", "secret").unwrap());
}

macro_rules! contract_tests {
    ($($name:ident),* $(,)?) => {
        mod sqlite_backend {
            $(
                #[test]
                fn $name() {
                    super::with_sqlite(super::$name);
                }
            )*
        }

        mod session_backend {
            $(
                #[test]
                fn $name() {
                    super::with_session(super::$name);
                }
            )*
        }
    };
}

contract_tests!(
    create_then_exists_and_duplicate_is_rejected,
    exists_title_is_case_sensitive,
    new_list_is_empty_and_owned,
    delete_list_then_load_is_not_found,
    rename_updates_title,
    rename_onto_owned_title_is_rejected,
    create_todo_requires_existing_list,
    new_todos_get_distinct_ids,
    toggle_twice_restores_done_flag,
    complete_all_marks_undone_and_is_repeatable,
    complete_all_on_empty_or_missing_list,
    delete_todo_reports_missing_entities,
    load_todo_missing_is_not_found,
    sorted_lists_put_undone_first_case_insensitively,
    sorted_lists_treat_empty_lists_as_undone,
    sorted_lists_carry_their_todos,
    sorted_todos_put_undone_first_case_insensitively,
    classification_follows_todo_states,
    unknown_user_does_not_authenticate,
);
