#![forbid(unsafe_code)]

//! `zoneline-agent` — channel agent binary.
//!
//! Joins the relay, blends into the configured telemetry topic, and
//! answers controller commands until interrupted.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

use zoneline::agent::AgentRuntime;
use zoneline::bus;
use zoneline::config::GlobalConfig;
use zoneline::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "zoneline-agent", about = "Zoneline channel agent", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the relay address from the config.
    #[arg(long)]
    broker: Option<String>,

    /// Override the topic from the config.
    #[arg(long)]
    topic: Option<String>,

    /// Self-chosen identity; generated from the configured prefix when
    /// omitted.
    #[arg(long)]
    identity: Option<String>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;
    info!("zoneline-agent bootstrap");

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = match &args.config {
        Some(path) => GlobalConfig::load(path)?,
        None => GlobalConfig::default(),
    };
    if let Some(broker) = args.broker {
        config.bus.broker_addr = broker;
    }
    if let Some(topic) = args.topic {
        config.bus.topic = topic;
    }
    config.validate()?;

    let identity = args
        .identity
        .unwrap_or_else(|| generated_identity(&config.agent.identity_prefix));
    info!(
        identity = %identity,
        broker = %config.bus.broker_addr,
        topic = %config.bus.topic,
        "configuration loaded"
    );

    // ── Join the bus ────────────────────────────────────
    let handle = bus::tcp::connect(&config.bus.broker_addr).await?;
    info!("relay connection established");

    // ── React to commands until interrupted ─────────────
    let agent = AgentRuntime::new(
        identity,
        config.bus.topic.clone(),
        Duration::from_secs(config.agent.exec_timeout_seconds),
        handle,
    );
    let worker = agent.spawn();

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupted; shutting down"),
        _ = worker => info!("bus connection ended"),
    }

    Ok(())
}

/// Generate a plausible device-style identity from the configured prefix.
fn generated_identity(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &suffix[..8])
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
