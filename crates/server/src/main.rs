use anyhow::Context as _;
use clap::{Parser, ValueEnum};
use plainroute_server::{NoteStore, load_config, router};
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "plainroute-server", version, about = "In-memory notes service")]
struct Cli {
    /// YAML config file (connect options and route mapping overrides).
    #[arg(long, env = "PLAINROUTE_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "PLAINROUTE_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Tracing filter directive, e.g. `info` or `plainroute_connect=debug,info`.
    #[arg(long, env = "PLAINROUTE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[arg(long, env = "PLAINROUTE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_format)?;

    let config = load_config(cli.config.as_deref())?;
    if !config.routes.is_empty() {
        tracing::info!(
            routes = ?config.routes.keys().collect::<Vec<_>>(),
            "applying route mapping overrides"
        );
    }
    let app = router(NoteStore::default(), &config);

    let listener = TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("bind {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve")?;

    tracing::info!("stopped");
    Ok(())
}

fn init_tracing(level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?;
    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = signal::ctrl_c().await {
        tracing::warn!(%error, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
