//! familypulse-survey - Household survey data-entry service
//!
//! Serves the survey form on http://127.0.0.1:5740 by default. Smart Fill and
//! health summaries need a generative-text API key in `FAMILYPULSE_API_KEY`,
//! `API_KEY`, or the `[gemini]` section of the config file; without one the
//! service still starts and those features report "not configured".

use anyhow::{Context, Result};
use clap::Parser;
use familypulse_common::config::{load_or_default, resolve_api_key, resolve_config_path};
use familypulse_common::events::EventBus;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use familypulse_survey::services::GeminiClient;
use familypulse_survey::{build_router, AppState};

#[derive(Debug, Parser)]
#[command(name = "familypulse-survey", version, about = "Household survey data-entry service")]
struct Args {
    /// Path to familypulse.toml
    #[arg(long, env = "FAMILYPULSE_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// tracing filter directive, e.g. "debug" (overrides config and RUST_LOG)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = resolve_config_path(args.config.as_deref());
    let config = load_or_default(config_path.as_deref());

    let log_level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    let filter = if args.log_level.is_none() && std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting FamilyPulse Survey (familypulse-survey) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    if let Some(path) = &config_path {
        info!("Config path: {}", path.display());
    }

    let client = GeminiClient::new(&config.gemini, resolve_api_key(&config))
        .context("Failed to create generative-text client")?;
    let configured = client.is_configured();
    if configured {
        info!(model = client.model(), "Text service client ready");
    } else {
        warn!(
            "No API key configured; Smart Fill and health summaries are unavailable. \
             Set FAMILYPULSE_API_KEY or [gemini] api_key in the config file."
        );
    }

    let event_bus = EventBus::new(100);
    let state = AppState::new(Arc::new(client), configured, event_bus);
    let app = build_router(state);

    let host = args.host.unwrap_or(config.server.host);
    let port = args.port.unwrap_or(config.server.port);
    let addr = format!("{}:{}", host, port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("familypulse-survey listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
