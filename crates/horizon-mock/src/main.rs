//! horizon-mock - Simulated HorizonOps backend
//!
//! Usage:
//!   horizon-mock [OPTIONS]
//!
//! Options:
//!   --port <port>   Port to listen on (env HORIZON_MOCK_PORT, default 8000)
//!   --seed <n>      Seed the data generator for reproducible output

use std::net::SocketAddr;

use anyhow::Context;
use horizon_mock::{create_router, MockState};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_PORT: u16 = 8000;

/// Parsed command-line arguments
struct Args {
    port: u16,
    seed: Option<u64>,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut result = Args {
        port: match std::env::var("HORIZON_MOCK_PORT") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("Invalid HORIZON_MOCK_PORT: {}", value))?,
            Err(_) => DEFAULT_PORT,
        },
        seed: None,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                let value = args.get(i + 1).context("Missing argument for --port")?;
                result.port = value
                    .parse()
                    .with_context(|| format!("Invalid port: {}", value))?;
                i += 2;
            }
            "--seed" => {
                let value = args.get(i + 1).context("Missing argument for --seed")?;
                result.seed = Some(
                    value
                        .parse()
                        .with_context(|| format!("Invalid seed: {}", value))?,
                );
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                tracing::warn!("Unknown argument: {}", other);
                i += 1;
            }
        }
    }

    Ok(result)
}

fn print_help() {
    eprintln!(
        r#"horizon-mock - Simulated HorizonOps backend

Usage: horizon-mock [OPTIONS]

Options:
  -p, --port <port>  Port to listen on (env HORIZON_MOCK_PORT, default 8000)
      --seed <n>     Seed the data generator for reproducible output
  -h, --help         Print this help message
"#
    );
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(%e, "Failed to listen for Ctrl+C");
    }
    tracing::info!("Shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "horizon_mock=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;

    let state = match args.seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded data generator");
            MockState::seeded(seed)
        }
        None => MockState::new(),
    };
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Starting horizon-mock on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
