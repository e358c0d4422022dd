use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use thiserror::Error;

use crate::postgres::PostgresTodoStore;
use crate::sqlite::SqliteTodoStore;
use crate::types::Todo;
use crate::url::DatabaseTarget;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("postgres error: {0}")]
    Postgres(#[from] sqlx::Error),

    #[error("time parse error: {0}")]
    Chrono(#[from] chrono::ParseError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage task join error: {0}")]
    Task(String),

    #[error("todo store is closed")]
    Closed,

    #[error("unsupported database url: {0}")]
    UnsupportedUrl(String),
}

/// Persistence for todo items.
///
/// Every method is a single statement against the backing database, so each
/// mutation either commits completely or not at all.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Creates the `todo` table when it does not exist yet.
    async fn init(&self) -> StoreResult<()>;

    /// Newest first. `search` filters to titles containing it, ignoring case.
    async fn list(&self, search: Option<&str>) -> StoreResult<Vec<Todo>>;

    async fn create(&self, title: &str, created_at: DateTime<Utc>) -> StoreResult<Todo>;

    /// Flips `is_done`. `None` when no todo has this id.
    async fn toggle(&self, id: i64) -> StoreResult<Option<Todo>>;

    /// `false` when no todo has this id.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn close(&self);

    fn backend_name(&self) -> &'static str;
}

/// Opens the backend selected by `target` and makes sure the schema exists.
pub async fn open_store(target: &DatabaseTarget) -> StoreResult<Arc<dyn TodoStore>> {
    let store: Arc<dyn TodoStore> = match target {
        DatabaseTarget::SqliteMemory => Arc::new(SqliteTodoStore::open_in_memory()?),
        DatabaseTarget::SqliteFile(path) => Arc::new(SqliteTodoStore::open(path)?),
        DatabaseTarget::Postgres(url) => Arc::new(PostgresTodoStore::connect(url).await?),
    };

    store.init().await?;
    info!("Todo store ready ({})", store.backend_name());
    Ok(store)
}
