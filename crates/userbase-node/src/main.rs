//! Userbase Node - HTTP user registry with password login.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use userbase_auth::{TokenIssuer, UserService};
use userbase_node::{
    api::{create_router, AppState},
    config::{load_dotenv, Config},
    observability::{init_logging, LogFormat},
};

/// Userbase Node - user registry with bearer token login
#[derive(Parser, Debug)]
#[command(name = "userbase-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "userbase.yaml")]
    config: PathBuf,

    /// Path to an env file read before the environment is consulted
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Listen port (overrides PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_file_loaded = load_dotenv(&args.env_file)
        .with_context(|| format!("reading {}", args.env_file.display()))?;

    let mut config = Config::load(&args.config)
        .with_context(|| format!("loading configuration from {}", args.config.display()))?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    let log_format = if args.json_logs {
        LogFormat::Json
    } else {
        config.log_format()
    };

    init_logging(&config.log_level, log_format);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Userbase node");
    if env_file_loaded {
        tracing::info!(path = %args.env_file.display(), "Loaded env file");
    }

    let addr = config.listen_addr()?;
    tracing::info!(
        addr = %addr,
        request_timeout_secs = config.request_timeout_secs,
        "Node configuration"
    );

    let store = userbase_storage::connect(&config.mongo_uri).context("opening user store")?;
    let issuer = TokenIssuer::new(&config.jwt_secret, config.token_ttl_secs)
        .context("configuring token issuer")?;
    tracing::info!(token_ttl_secs = issuer.ttl_secs(), "Token issuer ready");

    let state = AppState {
        users: Arc::new(UserService::new(store, issuer)),
    };
    let app = create_router(state, config.request_timeout());

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;

    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
