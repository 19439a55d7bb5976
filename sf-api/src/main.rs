//! ServiceFlow server binary
//!
//! Usage:
//!   serviceflow --listen 0.0.0.0:4000 --database serviceflow.db

use clap::Parser;
use sf_api::{ApiConfig, AppState};
use sf_db::Database;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "serviceflow")]
#[command(about = "ServiceFlow sales-operations API server")]
#[command(version)]
struct Cli {
    /// Listen address
    #[arg(long, env = "SERVICEFLOW_LISTEN", default_value = "0.0.0.0:4000")]
    listen: String,

    /// SQLite database path; ":memory:" runs ephemeral
    #[arg(long, env = "SERVICEFLOW_DB", default_value = "serviceflow.db")]
    database: String,

    /// Disable CORS
    #[arg(long)]
    no_cors: bool,

    /// Disable the Prometheus endpoint
    #[arg(long)]
    no_metrics: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let db = if cli.database == ":memory:" {
        Database::open_in_memory()?
    } else {
        Database::open(&cli.database)?
    };
    db.init_schema().await?;

    let config = ApiConfig {
        listen_addr: cli.listen,
        enable_cors: !cli.no_cors,
        ..Default::default()
    };

    let mut state = AppState::new(config, db);
    if !cli.no_metrics {
        state = state.with_metrics();
    }

    sf_api::start_server(state).await?;
    Ok(())
}
