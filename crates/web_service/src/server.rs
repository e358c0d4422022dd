use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context as _;
use log::{error, info};
use todo_store::{normalize_database_url, open_store, DatabaseTarget, TodoStore};

use crate::config::ServerConfig;
use crate::controllers::{system_controller, todo_controller};
use crate::services::TodoManager;
use crate::views::PageRenderer;

pub struct AppState {
    pub todos: TodoManager,
    pub renderer: PageRenderer,
}

impl AppState {
    pub fn new(store: Arc<dyn TodoStore>) -> anyhow::Result<Self> {
        let renderer = PageRenderer::new().context("Failed to load page templates")?;
        Ok(Self {
            todos: TodoManager::new(store),
            renderer,
        })
    }
}

pub fn app_config(cfg: &mut web::ServiceConfig) {
    cfg.configure(todo_controller::config)
        .configure(system_controller::config);
}

/// Opens the store named by `database_url` after normalizing it.
pub async fn open_configured_store(database_url: &str) -> anyhow::Result<Arc<dyn TodoStore>> {
    let normalized = normalize_database_url(database_url);
    let target = DatabaseTarget::parse(&normalized)?;
    info!("Using database: {}", target);

    let store = open_store(&target)
        .await
        .with_context(|| format!("Failed to open database ({target})"))?;
    Ok(store)
}

/// Runs the server until it is stopped, then closes the store.
pub async fn run(config: ServerConfig) -> anyhow::Result<()> {
    info!("Starting web service...");

    let store = open_configured_store(&config.database_url).await?;
    let app_state = web::Data::new(AppState::new(Arc::clone(&store))?);

    let bind_address = config.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(Logger::default())
            .configure(app_config)
    })
    .workers(config.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind server to {bind_address}"))?
    .run();

    info!("Starting web service on http://{bind_address}");

    let result = server.await;
    store.close().await;

    if let Err(e) = result {
        error!("Web server error: {}", e);
        return Err(e).context("Web server error");
    }

    info!("Web service stopped");
    Ok(())
}
