use std::sync::Arc;

use chrono::Utc;
use log::{debug, info};
use todo_store::{normalize_search, normalize_title, Todo, TodoStore, MAX_TITLE_CHARS};

use crate::error::{AppError, Result};

/// Validates requests and performs exactly one store operation for each.
#[derive(Clone)]
pub struct TodoManager {
    store: Arc<dyn TodoStore>,
}

impl TodoManager {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Newest first, filtered by `query` when it is not blank.
    pub async fn list(&self, query: &str) -> Result<Vec<Todo>> {
        let todos = self.store.list(normalize_search(query)).await?;
        Ok(todos)
    }

    /// `Ok(None)` when the title is blank; nothing is stored in that case.
    pub async fn add(&self, raw_title: &str) -> Result<Option<Todo>> {
        let Some(title) = normalize_title(raw_title) else {
            debug!("Ignoring todo with blank title");
            return Ok(None);
        };
        if title.len() < raw_title.trim().len() {
            debug!("Truncating todo title to {} characters", MAX_TITLE_CHARS);
        }

        let todo = self.store.create(&title, Utc::now()).await?;
        info!("Created todo {}", todo.id);
        Ok(Some(todo))
    }

    pub async fn toggle(&self, id: i64) -> Result<Todo> {
        let todo = self.store.toggle(id).await?.ok_or(AppError::NotFound(id))?;
        debug!("Todo {} is_done={}", todo.id, todo.is_done);
        Ok(todo)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound(id));
        }
        info!("Deleted todo {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_store::SqliteTodoStore;

    async fn manager() -> TodoManager {
        let store = SqliteTodoStore::open_in_memory().expect("open store");
        store.init().await.expect("init store");
        TodoManager::new(Arc::new(store))
    }

    #[tokio::test]
    async fn add_stores_trimmed_title_as_not_done() {
        let manager = manager().await;

        let todo = manager.add("  Buy Milk  ").await.unwrap().expect("created");
        assert_eq!(todo.title, "Buy Milk");
        assert!(!todo.is_done);

        let todos = manager.list("").await.unwrap();
        assert_eq!(todos, vec![todo]);
    }

    #[tokio::test]
    async fn blank_titles_are_skipped() {
        let manager = manager().await;

        assert!(manager.add(" \t ").await.unwrap().is_none());
        assert!(manager.list("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn long_titles_are_stored_capped() {
        let manager = manager().await;
        let raw = format!("  {}  ", "x".repeat(MAX_TITLE_CHARS + 50));

        let todo = manager.add(&raw).await.unwrap().expect("created");
        assert_eq!(todo.title, "x".repeat(MAX_TITLE_CHARS));
        assert_eq!(manager.list("").await.unwrap()[0].title.chars().count(), MAX_TITLE_CHARS);
    }

    #[tokio::test]
    async fn toggle_twice_restores_original_state() {
        let manager = manager().await;
        let todo = manager.add("Water plants").await.unwrap().expect("created");

        assert!(manager.toggle(todo.id).await.unwrap().is_done);
        assert!(!manager.toggle(todo.id).await.unwrap().is_done);
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let manager = manager().await;
        let kept = manager.add("Keep me").await.unwrap().expect("created");

        assert!(matches!(manager.toggle(999).await, Err(AppError::NotFound(999))));
        assert!(matches!(manager.delete(999).await, Err(AppError::NotFound(999))));

        let todos = manager.list("").await.unwrap();
        assert_eq!(todos, vec![kept]);
    }

    #[tokio::test]
    async fn search_query_is_trimmed() {
        let manager = manager().await;
        manager.add("Buy Milk").await.unwrap();
        manager.add("Clean House").await.unwrap();

        let found = manager.list("  MILK ").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Buy Milk");
    }
}
