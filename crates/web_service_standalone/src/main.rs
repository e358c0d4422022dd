use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use web_service::ServerConfig;

/// Personal todo list served over HTTP.
///
/// Flags override the matching environment variables (`DATABASE_URL`,
/// `APP_HOST`, `APP_PORT`, `APP_WORKERS`), which may also come from a `.env` file.
#[derive(Parser, Debug)]
#[command(name = "todo-web", version)]
struct Args {
    /// Database connection string, e.g. `sqlite:///todolist.db` or `postgres://user:pw@host/db`
    #[arg(long)]
    database_url: Option<String>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Port to bind
    #[arg(short, long)]
    port: Option<u16>,

    /// HTTP worker threads
    #[arg(long)]
    workers: Option<usize>,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(database_url) = self.database_url {
            config.database_url = database_url;
        }
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(workers) = self.workers.filter(|workers| *workers > 0) {
            config.workers = workers;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .with_file(false),
        )
        .init();

    let config = args.apply(ServerConfig::from_env());
    tracing::info!(
        "Starting todo web service on {} with {} workers",
        config.bind_address(),
        config.workers
    );

    if let Err(e) = web_service::run(config).await {
        tracing::error!("Failed to run web service: {:#}", e);
        std::process::exit(1);
    }
}
