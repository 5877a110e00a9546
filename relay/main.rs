#![forbid(unsafe_code)]

//! `zoneline-relay` — minimal fan-out broker for the zoneline bus.
//!
//! Accepts TCP clients and forwards every line any client sends to every
//! connected client, the sender included. The relay never inspects frame
//! contents: it is a dumb pipe the covert traffic shares with whatever
//! else publishes on it.

use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Fan-out buffer; clients that fall further behind than this miss frames.
const FANOUT_BUFFER: usize = 1024;

#[derive(Debug, Parser)]
#[command(
    name = "zoneline-relay",
    about = "Fan-out relay for the zoneline bus",
    version,
    long_about = None
)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:7878")]
    bind: String,
}

fn main() -> std::io::Result<()> {
    let args = Cli::parse();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(env_filter).try_init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(args))
}

async fn run(args: Cli) -> std::io::Result<()> {
    let listener = TcpListener::bind(&args.bind).await?;
    info!(bind = %args.bind, "relay listening");

    let (fanout, _) = broadcast::channel::<String>(FANOUT_BUFFER);
    let ct = CancellationToken::new();

    let accept_ct = ct.clone();
    let accept_fanout = fanout.clone();
    let accept = tokio::spawn(async move {
        loop {
            tokio::select! {
                () = accept_ct.cancelled() => break,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => {
                        info!(%peer, "client connected");
                        tokio::spawn(handle_client(stream, accept_fanout.clone()));
                    }
                    Err(err) => warn!(%err, "accept failed"),
                },
            }
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("interrupted; relay shutting down");
    ct.cancel();
    let _ = accept.await;

    Ok(())
}

/// Serve one client: inbound lines go to the fan-out channel, fan-out
/// traffic goes back down the socket.
async fn handle_client(stream: TcpStream, fanout: broadcast::Sender<String>) {
    let peer = stream
        .peer_addr()
        .map_or_else(|_| "<unknown>".to_owned(), |addr| addr.to_string());
    let (read_half, mut write_half) = stream.into_split();
    let mut rx = fanout.subscribe();
    let mut lines = BufReader::new(read_half).lines();

    loop {
        tokio::select! {
            inbound = lines.next_line() => match inbound {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    // Send only fails with zero subscribers; we are one.
                    let _ = fanout.send(line);
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(peer = %peer, %err, "client read failed");
                    break;
                }
            },
            outbound = rx.recv() => match outbound {
                Ok(mut line) => {
                    line.push('\n');
                    if write_half.write_all(line.as_bytes()).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(peer = %peer, skipped, "client fell behind; frames dropped");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }

    info!(peer = %peer, "client disconnected");
}
