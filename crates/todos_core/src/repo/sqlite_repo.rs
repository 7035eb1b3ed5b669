//! SQLite-backed todo persistence.
//!
//! # Responsibility
//! - Translate each contract operation into parameterized statements over
//!   `todolists`, `todos` and `users`.
//! - Convert the `UNIQUE (username, title)` violation into a `false` result.
//!
//! # Invariants
//! - Every statement that touches todo data filters by `username`.
//! - Not-found is a zero-row mutation or empty result set.
//! - List+todos reads are two independent statements, not one transaction;
//!   a writer between them can pair a list with a stale todo set.

use crate::auth::PasswordVerifier;
use crate::model::todo::{Todo, TodoId, TodoList, TodoListId};
use crate::repo::contract::{PersistError, PersistResult, TodoPersistence};
use crate::sort;
use log::{debug, info};
use rusqlite::{ffi, params, Connection, OptionalExtension, Row};
use std::collections::HashMap;

const TODO_SELECT_SQL: &str = "SELECT
    id,
    title,
    done,
    todolist_id,
    username
FROM todos";

const TODO_LIST_SELECT_SQL: &str = "SELECT
    id,
    title,
    username
FROM todolists";

/// Relational backend bound to one acting user.
pub struct SqliteTodoPersistence<'conn, V> {
    conn: &'conn Connection,
    username: String,
    verifier: V,
}

impl<'conn, V: PasswordVerifier> SqliteTodoPersistence<'conn, V> {
    /// Binds a migrated connection to `username`.
    pub fn new(conn: &'conn Connection, username: impl Into<String>, verifier: V) -> Self {
        Self {
            conn,
            username: username.into(),
            verifier,
        }
    }

    fn load_todos_for_list(&self, todo_list_id: TodoListId) -> PersistResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE todolist_id = ?1 AND username = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![todo_list_id, self.username])?;
        let mut todos = Vec::new();
        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }
        Ok(todos)
    }

    fn todo_list_exists(&self, todo_list_id: TodoListId) -> PersistResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM todolists
                WHERE id = ?1 AND username = ?2
            );",
            params![todo_list_id, self.username],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl<V: PasswordVerifier> TodoPersistence for SqliteTodoPersistence<'_, V> {
    fn create_todo_list(&mut self, title: &str) -> PersistResult<bool> {
        match self.conn.execute(
            "INSERT INTO todolists (title, username) VALUES (?1, ?2);",
            params![title, self.username],
        ) {
            Ok(changed) => {
                debug!(
                    "event=todo_list_create module=repo backend=sqlite status=ok rows={}",
                    changed
                );
                Ok(changed > 0)
            }
            Err(err) if is_unique_constraint_violation(&err) => {
                info!("event=todo_list_create module=repo backend=sqlite status=duplicate_title");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn delete_todo_list(&mut self, todo_list_id: TodoListId) -> PersistResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM todolists WHERE id = ?1 AND username = ?2;",
            params![todo_list_id, self.username],
        )?;
        debug!(
            "event=todo_list_delete module=repo backend=sqlite todo_list_id={} rows={}",
            todo_list_id, changed
        );
        Ok(changed > 0)
    }

    fn set_todo_list_title(
        &mut self,
        todo_list_id: TodoListId,
        title: &str,
    ) -> PersistResult<bool> {
        match self.conn.execute(
            "UPDATE todolists
             SET title = ?1
             WHERE id = ?2 AND username = ?3;",
            params![title, todo_list_id, self.username],
        ) {
            Ok(changed) => Ok(changed > 0),
            Err(err) if is_unique_constraint_violation(&err) => {
                info!(
                    "event=todo_list_rename module=repo backend=sqlite todo_list_id={} status=duplicate_title",
                    todo_list_id
                );
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn exists_todo_list_title(&self, title: &str) -> PersistResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM todolists
                WHERE title = ?1 AND username = ?2
            );",
            params![title, self.username],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn load_todo_list(&self, todo_list_id: TodoListId) -> PersistResult<Option<TodoList>> {
        let list = self
            .conn
            .query_row(
                &format!("{TODO_LIST_SELECT_SQL} WHERE id = ?1 AND username = ?2;"),
                params![todo_list_id, self.username],
                parse_todo_list_row,
            )
            .optional()?;

        let Some(mut list) = list else {
            return Ok(None);
        };
        list.todos = self.load_todos_for_list(todo_list_id)?;
        Ok(Some(list))
    }

    fn sorted_todo_lists(&self) -> PersistResult<Vec<TodoList>> {
        let mut list_stmt = self.conn.prepare(&format!(
            "{TODO_LIST_SELECT_SQL} WHERE username = ?1 ORDER BY id ASC;"
        ))?;
        let lists = list_stmt
            .query_map([self.username.as_str()], parse_todo_list_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut todo_stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} WHERE username = ?1 ORDER BY id ASC;"
        ))?;
        let mut rows = todo_stmt.query([self.username.as_str()])?;
        let mut todos_by_list: HashMap<TodoListId, Vec<Todo>> = HashMap::new();
        while let Some(row) = rows.next()? {
            let todo = parse_todo_row(row)?;
            todos_by_list.entry(todo.todo_list_id).or_default().push(todo);
        }

        let lists = lists
            .into_iter()
            .map(|mut list| {
                list.todos = todos_by_list.remove(&list.id).unwrap_or_default();
                list
            })
            .collect();
        Ok(sort::sort_todo_lists(lists))
    }

    fn create_todo(&mut self, todo_list_id: TodoListId, title: &str) -> PersistResult<bool> {
        // Selecting from the owner's list row turns a missing or foreign list
        // into zero inserted rows instead of a foreign key error.
        let changed = self.conn.execute(
            "INSERT INTO todos (title, todolist_id, username)
             SELECT ?1, id, username
             FROM todolists
             WHERE id = ?2 AND username = ?3;",
            params![title, todo_list_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn delete_todo(&mut self, todo_list_id: TodoListId, todo_id: TodoId) -> PersistResult<bool> {
        let changed = self.conn.execute(
            "DELETE FROM todos
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;",
            params![todo_list_id, todo_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn toggle_done_todo(
        &mut self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> PersistResult<bool> {
        let changed = self.conn.execute(
            "UPDATE todos
             SET done = NOT done
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;",
            params![todo_list_id, todo_id, self.username],
        )?;
        Ok(changed > 0)
    }

    fn complete_all_todos(&mut self, todo_list_id: TodoListId) -> PersistResult<bool> {
        if !self.todo_list_exists(todo_list_id)? {
            return Ok(false);
        }

        let changed = self.conn.execute(
            "UPDATE todos
             SET done = 1
             WHERE todolist_id = ?1 AND done = 0 AND username = ?2;",
            params![todo_list_id, self.username],
        )?;
        debug!(
            "event=todos_complete_all module=repo backend=sqlite todo_list_id={} rows={}",
            todo_list_id, changed
        );
        Ok(true)
    }

    fn load_todo(
        &self,
        todo_list_id: TodoListId,
        todo_id: TodoId,
    ) -> PersistResult<Option<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL}
             WHERE todolist_id = ?1 AND id = ?2 AND username = ?3;"
        ))?;
        let mut rows = stmt.query(params![todo_list_id, todo_id, self.username])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_todo_row(row)?));
        }
        Ok(None)
    }

    fn sorted_todos(&self, todo_list: &TodoList) -> PersistResult<Vec<Todo>> {
        let todos = self.load_todos_for_list(todo_list.id)?;
        Ok(sort::sort_todos(todos))
    }

    fn authenticate(&self, username: &str, password: &str) -> PersistResult<bool> {
        let stored_hash: Option<String> = self
            .conn
            .query_row(
                "SELECT password FROM users WHERE username = ?1;",
                [username],
                |row| row.get(0),
            )
            .optional()?;

        let Some(stored_hash) = stored_hash else {
            info!("event=authenticate module=repo backend=sqlite status=rejected");
            return Ok(false);
        };

        let accepted = self.verifier.verify(password, &stored_hash);
        info!(
            "event=authenticate module=repo backend=sqlite status={}",
            if accepted { "ok" } else { "rejected" }
        );
        Ok(accepted)
    }
}

/// Returns `true` when `err` is SQLite's `UNIQUE` constraint failure.
pub fn is_unique_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_todo_list_row(row: &Row<'_>) -> rusqlite::Result<TodoList> {
    Ok(TodoList {
        id: row.get("id")?,
        title: row.get("title")?,
        username: row.get("username")?,
        todos: Vec::new(),
    })
}

fn parse_todo_row(row: &Row<'_>) -> PersistResult<Todo> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(PersistError::InvalidData(format!(
                "invalid done value `{other}` in todos.done"
            )));
        }
    };

    Ok(Todo {
        id: row.get("id")?,
        title: row.get("title")?,
        done,
        username: row.get("username")?,
        todo_list_id: row.get("todolist_id")?,
    })
}
