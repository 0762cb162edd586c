//! Snippetbox - HTTP server for short-lived text snippets.

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use snippetbox_web::{AppState, Config, router};

/// Snippetbox - create and share short-lived text snippets.
#[derive(Parser, Debug)]
#[command(name = "snippetbox")]
#[command(about = "HTTP server for short-lived text snippets", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,

    /// HTTP network address (overrides SNIPPETBOX_ADDR).
    #[arg(long)]
    addr: Option<String>,

    /// SQLite database path (overrides SNIPPETBOX_DSN).
    #[arg(long)]
    dsn: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Load .env file if it exists
    if std::path::Path::new(&args.dotenv).exists() {
        dotenvy::from_path(&args.dotenv)?;
        eprintln!("Loaded environment from {}", args.dotenv);
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration, letting flags win over the environment
    let mut config = Config::from_env()?;
    if let Some(addr) = args.addr {
        config.bind_addr = addr;
    }
    if let Some(dsn) = args.dsn {
        config.dsn = dsn;
    }
    let bind_addr = config.bind_addr.clone();

    // Open the database and build the template cache; either failing is fatal
    let state = AppState::from_config(config)?;

    let app = router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting server");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
