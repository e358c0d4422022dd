use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::{debug, error};
use rusqlite::functions::FunctionFlags;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::storage::{StoreError, StoreResult, TodoStore};
use crate::types::Todo;

/// Fixed-width so that text order matches time order.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

const TODO_COLUMNS: &str = "id, title, COALESCE(is_done, 0), created_at";

type TodoRow = (i64, String, bool, String);

/// SQLite backend holding a single connection for the lifetime of the store.
#[derive(Debug, Clone)]
pub struct SqliteTodoStore {
    connection: Arc<Mutex<Option<Connection>>>,
}

impl SqliteTodoStore {
    pub fn open(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let db_path = db_path.as_ref();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let connection = Connection::open(db_path)?;
        connection.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            "#,
        )?;
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> StoreResult<Self> {
        register_casefold(&connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(Some(connection))),
        })
    }

    async fn with_connection<T, F>(&self, func: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> StoreResult<T> + Send + 'static,
    {
        let connection = Arc::clone(&self.connection);
        tokio::task::spawn_blocking(move || {
            let guard = connection
                .lock()
                .map_err(|_| StoreError::Task("sqlite connection lock poisoned".to_string()))?;
            let connection = guard.as_ref().ok_or(StoreError::Closed)?;
            func(connection)
        })
        .await
        .map_err(|error| StoreError::Task(error.to_string()))?
    }
}

#[async_trait]
impl TodoStore for SqliteTodoStore {
    async fn init(&self) -> StoreResult<()> {
        self.with_connection(|connection| {
            connection.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS todo (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    title VARCHAR(200) NOT NULL,
                    is_done BOOLEAN DEFAULT 0,
                    created_at DATETIME NOT NULL
                );

                CREATE INDEX IF NOT EXISTS idx_todo_created_at ON todo(created_at);
                "#,
            )?;
            Ok(())
        })
        .await
    }

    async fn list(&self, search: Option<&str>) -> StoreResult<Vec<Todo>> {
        let search = search.map(str::to_string);

        self.with_connection(move |connection| {
            let mut sql = format!("SELECT {TODO_COLUMNS} FROM todo");
            if search.is_some() {
                sql.push_str(" WHERE instr(casefold(title), casefold(?1)) > 0");
            }
            sql.push_str(" ORDER BY created_at DESC, id DESC");

            let mut statement = connection.prepare(&sql)?;
            let rows = match &search {
                Some(term) => statement
                    .query_map(params![term], todo_row)?
                    .collect::<Result<Vec<_>, _>>()?,
                None => statement
                    .query_map([], todo_row)?
                    .collect::<Result<Vec<_>, _>>()?,
            };

            rows.into_iter().map(into_todo).collect()
        })
        .await
    }

    async fn create(&self, title: &str, created_at: DateTime<Utc>) -> StoreResult<Todo> {
        let title = title.to_string();
        let created_at = format_timestamp(created_at);

        self.with_connection(move |connection| {
            let row = connection.query_row(
                &format!(
                    "INSERT INTO todo (title, is_done, created_at) VALUES (?1, 0, ?2) RETURNING {TODO_COLUMNS}"
                ),
                params![title, created_at],
                todo_row,
            )?;
            into_todo(row)
        })
        .await
    }

    async fn toggle(&self, id: i64) -> StoreResult<Option<Todo>> {
        self.with_connection(move |connection| {
            let row = connection
                .query_row(
                    &format!(
                        "UPDATE todo SET is_done = NOT COALESCE(is_done, 0) WHERE id = ?1 RETURNING {TODO_COLUMNS}"
                    ),
                    params![id],
                    todo_row,
                )
                .optional()?;
            row.map(into_todo).transpose()
        })
        .await
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        self.with_connection(move |connection| {
            let removed = connection.execute("DELETE FROM todo WHERE id = ?1", params![id])?;
            Ok(removed > 0)
        })
        .await
    }

    async fn close(&self) {
        let connection = Arc::clone(&self.connection);
        let closed = tokio::task::spawn_blocking(move || {
            let mut guard = match connection.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if let Some(connection) = guard.take() {
                if let Err((_, error)) = connection.close() {
                    error!("Failed to close sqlite connection: {}", error);
                }
            }
        })
        .await;

        if let Err(error) = closed {
            error!("Sqlite close task failed: {}", error);
        } else {
            debug!("Sqlite todo store closed");
        }
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

/// Unicode-aware lower-casing; SQLite's own `lower()` only folds ASCII.
fn register_casefold(connection: &Connection) -> StoreResult<()> {
    connection.create_scalar_function(
        "casefold",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value = ctx.get::<Option<String>>(0)?;
            Ok(value.map(|text| text.to_lowercase()))
        },
    )?;
    Ok(())
}

fn todo_row(row: &Row<'_>) -> rusqlite::Result<TodoRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn into_todo((id, title, is_done, created_at): TodoRow) -> StoreResult<Todo> {
    Ok(Todo {
        id,
        title,
        is_done,
        created_at: parse_timestamp(&created_at)?,
    })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

fn parse_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    Ok(NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)?.and_utc())
}
