use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use log::debug;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::storage::{StoreResult, TodoStore};
use crate::types::Todo;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

const TODO_COLUMNS: &str = "id, title, COALESCE(is_done, FALSE) AS is_done, created_at";

/// PostgreSQL backend over a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    pub async fn connect(url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl TodoStore for PostgresTodoStore {
    async fn init(&self) -> StoreResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todo (
                id SERIAL PRIMARY KEY,
                title VARCHAR(200) NOT NULL,
                is_done BOOLEAN DEFAULT FALSE,
                created_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_todo_created_at ON todo(created_at)")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list(&self, search: Option<&str>) -> StoreResult<Vec<Todo>> {
        let rows = match search {
            Some(term) => {
                sqlx::query(&format!(
                    "SELECT {TODO_COLUMNS} FROM todo WHERE strpos(lower(title), lower($1)) > 0 ORDER BY created_at DESC, id DESC"
                ))
                .bind(term)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {TODO_COLUMNS} FROM todo ORDER BY created_at DESC, id DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(todo_from_row).collect()
    }

    async fn create(&self, title: &str, created_at: DateTime<Utc>) -> StoreResult<Todo> {
        let row = sqlx::query(&format!(
            "INSERT INTO todo (title, is_done, created_at) VALUES ($1, FALSE, $2) RETURNING {TODO_COLUMNS}"
        ))
        .bind(title)
        .bind(created_at.naive_utc())
        .fetch_one(&self.pool)
        .await?;

        todo_from_row(&row)
    }

    async fn toggle(&self, id: i64) -> StoreResult<Option<Todo>> {
        let row = sqlx::query(&format!(
            "UPDATE todo SET is_done = NOT COALESCE(is_done, FALSE) WHERE id = $1 RETURNING {TODO_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(todo_from_row).transpose()
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM todo WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn close(&self) {
        self.pool.close().await;
        debug!("Postgres todo store closed");
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

fn todo_from_row(row: &PgRow) -> StoreResult<Todo> {
    let id: i32 = row.try_get("id")?;
    let created_at: NaiveDateTime = row.try_get("created_at")?;

    Ok(Todo {
        id: i64::from(id),
        title: row.try_get("title")?,
        is_done: row.try_get("is_done")?,
        created_at: created_at.and_utc(),
    })
}
