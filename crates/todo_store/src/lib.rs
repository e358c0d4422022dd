pub mod postgres;
pub mod sqlite;
pub mod storage;
pub mod types;
pub mod url;

pub use postgres::PostgresTodoStore;
pub use sqlite::SqliteTodoStore;
pub use storage::{open_store, StoreError, StoreResult, TodoStore};
pub use types::{normalize_search, normalize_title, Todo, MAX_TITLE_CHARS};
pub use url::{normalize_database_url, redact_url, DatabaseTarget, DEFAULT_DATABASE_URL};
