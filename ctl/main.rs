#![forbid(unsafe_code)]

//! `zoneline-ctl` — controller companion for the zoneline channel.
//!
//! Broadcasts one command on the shared topic, waits out the response
//! window, and renders (or saves) whatever the agents sent back. The flow
//! is strictly issue → wait → report; there is no way to cut a window
//! short or overlap two commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use zoneline::aggregator::AgentReply;
use zoneline::bus;
use zoneline::config::GlobalConfig;
use zoneline::controller::{save_artifact, Controller};
use zoneline::protocol::action::Action;
use zoneline::{AppError, Result};

#[derive(Debug, Parser)]
#[command(
    name = "zoneline-ctl",
    about = "Controller CLI for the zoneline channel",
    version,
    long_about = None
)]
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

    /// Seconds to wait for agent responses (overrides the config).
    #[arg(long)]
    wait: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask every listening agent for a presence beacon.
    ListPeers,

    /// List login sessions on each agent host.
    ListSessions,

    /// List a directory on each agent host.
    ListDirectory {
        /// Directory to list.
        path: String,
    },

    /// Report the user each agent runs as.
    Whoami,

    /// Fetch a file from each agent host and save it locally.
    FetchFile {
        /// File to fetch.
        path: String,

        /// Directory artifacts are saved into (overrides the config).
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Execute a binary on each agent host.
    RunBinary {
        /// Binary to execute.
        path: String,
    },
}

impl Command {
    fn action(&self) -> Action {
        match self {
            Self::ListPeers => Action::ListPeers,
            Self::ListSessions => Action::ListSessions,
            Self::ListDirectory { .. } => Action::ListDirectory,
            Self::Whoami => Action::Whoami,
            Self::FetchFile { .. } => Action::FetchFile,
            Self::RunBinary { .. } => Action::RunBinary,
        }
    }

    fn path(&self) -> Option<&str> {
        match self {
            Self::ListDirectory { path }
            | Self::FetchFile { path, .. }
            | Self::RunBinary { path } => Some(path),
            Self::ListPeers | Self::ListSessions | Self::Whoami => None,
        }
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing()?;

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

    let wait = Duration::from_secs(args.wait.unwrap_or(config.controller.wait_seconds));

    // ── Join the bus and start collecting ───────────────
    let handle = bus::tcp::connect(&config.bus.broker_addr).await?;
    let controller = Controller::new(config.bus.topic.clone(), handle);
    let _listener = controller.spawn_listener();

    // ── Issue the command and wait out the window ───────
    controller.issue(args.command.action(), args.command.path()).await?;
    println!("Waiting {}s for agent responses...", wait.as_secs());
    let replies = controller.collect(wait).await;

    println!("Agent responses ({}):", replies.len());
    match &args.command {
        Command::FetchFile { output_dir, .. } => {
            let dir = output_dir
                .clone()
                .unwrap_or_else(|| config.controller.artifact_dir.clone());
            for reply in &replies {
                report_saved(&dir, reply);
            }
        }
        _ => {
            for reply in &replies {
                println!("\t- {}: {}", label(reply), reply.message.as_deref().unwrap_or(""));
            }
        }
    }

    Ok(())
}

/// Save one fetched artifact and print where it landed.
fn report_saved(dir: &std::path::Path, reply: &AgentReply) {
    match &reply.message {
        Some(payload) => match save_artifact(dir, reply.identity.as_deref(), payload) {
            Ok(target) => println!("\t- {} saved to {}", label(reply), target.display()),
            Err(err) => println!("\t- {} failed to save: {err}", label(reply)),
        },
        None => println!("\t- {} sent an empty reply", label(reply)),
    }
}

fn label(reply: &AgentReply) -> &str {
    reply.identity.as_deref().unwrap_or("<unnamed>")
}

fn init_tracing() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?;
    Ok(())
}
