//! Session-scoped in-memory todo persistence.
//!
//! # Responsibility
//! - Hold one session's todo lists in process and implement the contract
//!   over them with linear scans.
//! - Seed a session with default lists the first time it is observed empty.
//!
//! # Invariants
//! - Every value returned from a read is an isolated deep copy.
//! - Writes mutate the session's lists in place and return only a flag.
//! - New identifiers come from the session's own generator.
//! - No operation returns `Err`.

use crate::auth::PasswordVerifier;
use crate::model::id::IdGenerator;
use crate::model::isolation::{isolated_list, isolated_lists, isolated_todo, isolated_todos};
use crate::model::seed::seed_todo_lists;
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use crate::model::user::UserCredentials;
use crate::repo::contract::{PersistResult, TodoPersistence};
use crate::sort;
use log::{debug, info};

/// Per-session state owned by the session store.
///
/// The session outlives any `SessionTodoPersistence` built over it; data
/// survives between requests for as long as the session does.
#[derive(Debug, Clone)]
pub struct TodoSession {
    username: String,
    todo_lists: Option<Vec<TodoList>>,
    ids: IdGenerator,
}

impl TodoSession {
    /// Starts an unseeded session for `username`.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            todo_lists: None,
            ids: IdGenerator::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns `true` once the session has been observed by a backend.
    pub fn is_seeded(&self) -> bool {
        self.todo_lists.is_some()
    }
}

/// Ephemeral backend over one `TodoSession`.
pub struct SessionTodoPersistence<'s, V> {
    session: &'s mut TodoSession,
    credentials: &'s UserCredentials,
    verifier: V,
}

impl<'s, V: PasswordVerifier> SessionTodoPersistence<'s, V> {
    /// Binds to `session`, seeding it with default lists when it holds none.
    pub fn new(
        session: &'s mut TodoSession,
        credentials: &'s UserCredentials,
        verifier: V,
    ) -> Self {
        if session.todo_lists.is_none() {
            let seeded = seed_todo_lists(&session.username, &mut session.ids);
            info!(
                "event=session_seed module=repo backend=session status=ok lists={}",
                seeded.len()
            );
            session.todo_lists = Some(seeded);
        }

        Self {
            session,
            credentials,
            verifier,
        }
    }

    fn lists(&self) -> impl Iterator<Item = &TodoList> {
        let username = self.session.username.as_str();
        self.session
            .todo_lists
            .iter()
            .flatten()
            .filter(move |list| list.username == username)
    }

    fn find_todo_list(&self, todo_list_id: TodoListId) -> Option<&TodoList> {
        self.lists().find(|list| list.id == todo_list_id)
    }

    fn find_todo_list_mut(&mut self, todo_list_id: TodoListId) -> Option<&mut TodoList> {
        let username = self.session.username.as_str();
        self.session
            .todo_lists
            .iter_mut()
            .flatten()
            .find(|list| list.id == todo_list_id && list.username == username)
    }

    fn find_todo_mut(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> Option<&mut Todo> {
        self.find_todo_list_mut(todo_list_id)?.find_todo_mut(todo_id)
    }
}

impl<V: PasswordVerifier> TodoPersistence for SessionTodoPersistence<'_, V> {
    fn create_todo_list(&mut self, title: &str) -> PersistResult<bool> {
        if self.exists_todo_list_title(title)? {
            info!("event=todo_list_create module=repo backend=session status=duplicate_title");
            return Ok(false);
        }

        let session = &mut *self.session;
        let list = TodoList::new(session.ids.next_id(), title, session.username.as_str());
        debug!(
            "event=todo_list_create module=repo backend=session status=ok todo_list_id={}",
            list.id
        );
        session.todo_lists.get_or_insert_with(Vec::new).push(list);
        Ok(true)
    }

    fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> PersistResult<bool> {
        let username = self.session.username.as_str();
        let Some(lists) = self.session.todo_lists.as_mut() else {
            return Ok(false);
        };
        let Some(index) = lists
            .iter()
            .position(|list| list.id == todo_list_id && list.username == username)
        else {
            return Ok(false);
        };

        lists.remove(index);
        Ok(true)
    }

    fn set_todo_list_title(
        &mut self,
        todo_list_id: TodoListId,
        title: &str,
    ) -> PersistResult<bool> {
        if self
            .lists()
            .any(|list| list.id != todo_list_id && list.title == title)
        {
            info!(
                "event=todo_list_rename module=repo backend=session todo_list_id={} status=duplicate_title",
                todo_list_id
            );
            return Ok(false);
        }
        let Some(list) = self.find_todo_list_mut(todo_list_id) else {
            return Ok(false);
        };
        list.title = title.to_string();
        Ok(true)
    }

    fn exists_todo_list_title(&self, title: &str) -> PersistResult<bool> {
        Ok(self.lists().any(|list| list.title == title))
    }

    fn load_todo_list(&self, todo_list_id: TodoListId) -> PersistResult<Option<TodoList>> {
        Ok(self.find_todo_list(todo_list_id).map(isolated_list))
    }

    fn sorted_todo_lists(&self) -> PersistResult<Vec<TodoList>> {
        Ok(sort::sort_todo_lists(isolated_lists(self.lists())))
    }

    fn create_todo(&mut self, todo_list_id: TodoListId, title: &str) -> PersistResult<bool> {
        let session = &mut *self.session;
        let username = session.username.as_str();
        let Some(list) = session
            .todo_lists
            .iter_mut()
            .flatten()
            .find(|list| list.id == todo_list_id && list.username == username)
        else {
            return Ok(false);
        };

        let todo = Todo::new(session.ids.next_id(), list.id, title, username);
        list.todos.push(todo);
        Ok(true)
    }

    fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> PersistResult<bool> {
        let Some(list) = self.find_todo_list_mut(todo_list_id) else {
            return Ok(false);
        };
        let Some(index) = list.todos.iter().position(|todo| todo.id == todo_id) else {
            return Ok(false);
        };

        list.todos.remove(index);
        Ok(true)
    }

    fn toggle_done_todo(
        &mut self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> PersistResult<bool> {
        let Some(todo) = self.find_todo_mut(todo_list_id, todo_id) else {
            return Ok(false);
        };
        todo.toggle();
        Ok(true)
    }

    fn complete_all_todos(&mut self, todo_list_id: TodoListId) -> PersistResult<bool> {
        let Some(list) = self.find_todo_list_mut(todo_list_id) else {
            return Ok(false);
        };
        list.todos
            .iter_mut()
            .filter(|todo| !todo.done)
            .for_each(|todo| todo.done = true);
        Ok(true)
    }

    fn load_todo(
        &self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> PersistResult<Option<Todo>> {
        Ok(self
            .find_todo_list(todo_list_id)
            .and_then(|list| list.find_todo(todo_id))
            .map(isolated_todo))
    }

    fn sorted_todos(&self, todo_list: &TodoList) -> PersistResult<Vec<Todo>> {
        let username = self.session.username.as_str();
        let owned = todo_list.todos.iter().filter(|todo| todo.username == username);
        Ok(sort::sort_todos(isolated_todos(owned)))
    }

    fn authenticate(&self, username: &str, password: &str) -> PersistResult<bool> {
        let Some(stored_hash) = self.credentials.hash_for(username) else {
            info!("event=authenticate module=repo backend=session status=rejected");
            return Ok(false);
        };

        let accepted = self.verifier.verify(password, stored_hash);
        info!(
            "event=authenticate module=repo backend=session status={}",
            if accepted { "ok" } else { "rejected" }
        );
        Ok(accepted)
    }
}
