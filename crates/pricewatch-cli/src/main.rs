mod http;
mod wiring;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use pricewatch_core::config::PriceWatchConfig;
use pricewatch_core::domain::ProductCode;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Parser)]
#[command(name = "pricewatch", version, about = "Vendor price poller with Telegram alerts")]
struct Cli {
    /// TOML config file (default: ./pricewatch.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Default log filter; RUST_LOG overrides it.
    #[arg(long, global = true, default_value = "info")]
    log: String,

    /// Log notifications instead of sending them.
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one cycle and exit (non-zero on failure).
    Run {
        /// Comma separated codes; defaults to the configured list.
        #[arg(long)]
        codes: Option<String>,
    },

    /// Serve the HTTP trigger.
    Serve {
        /// Overrides server.listen, e.g. 0.0.0.0:5001
        #[arg(long)]
        listen: Option<String>,
    },

    /// Fetch and print normalized records without touching the snapshot.
    Fetch {
        #[arg(long)]
        codes: Option<String>,
    },

    /// Run a cycle every N seconds until interrupted.
    Watch {
        #[arg(long, default_value_t = 300)]
        interval_secs: u64,

        #[arg(long)]
        codes: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log));
    fmt().with_target(false).with_env_filter(filter).init();

    let mut config = PriceWatchConfig::load_with_dotenv(cli.config.as_deref())?;
    if let Command::Serve {
        listen: Some(listen),
    } = &cli.command
    {
        config.server.listen = listen.clone();
    }
    config.validate()?;

    let watch = wiring::build_watch(&config, cli.dry_run)?;

    match cli.command {
        Command::Run { codes } => {
            let codes = resolve_codes(codes.as_deref(), &config)?;
            let report = watch.run_cycle(&codes).await?;
            println!("{}", serde_json::to_string_pretty(&report.summary())?);
        }
        Command::Fetch { codes } => {
            let codes = resolve_codes(codes.as_deref(), &config)?;
            let records = watch.fetch_only(&codes).await;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Watch {
            interval_secs,
            codes,
        } => {
            let codes = resolve_codes(codes.as_deref(), &config)?;
            let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
            info!(interval_secs, codes = codes.len(), "watching prices");
            let shutdown = shutdown_signal();
            tokio::pin!(shutdown);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match watch.run_cycle(&codes).await {
                            Ok(report) => info!(
                                changed = report.changes.changed.len(),
                                baseline = report.baseline,
                                "cycle ok"
                            ),
                            Err(e) => error!(stage = %e.stage(), error = %e, "cycle failed, continuing"),
                        }
                    }
                    _ = &mut shutdown => break,
                }
            }
        }
        Command::Serve { .. } => {
            let addr = config.listen_addr()?;
            let app = http::router(http::AppState::new(watch));

            info!("listening on http://{}", addr);
            let listener = tokio::net::TcpListener::bind(addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    Ok(())
}

fn resolve_codes(
    flag: Option<&str>,
    config: &PriceWatchConfig,
) -> anyhow::Result<Vec<ProductCode>> {
    let codes = match flag {
        Some(raw) => ProductCode::parse_list(raw),
        None => config.product_codes(),
    };
    anyhow::ensure!(!codes.is_empty(), "No codes provided");
    Ok(codes)
}

async fn shutdown_signal() {
    wait_for_shutdown(signal::ctrl_c()).await;
}

/// Resolves when `ctrl_c` fires. Never resolves if the listener failed.
async fn wait_for_shutdown<F>(ctrl_c: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match ctrl_c.await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => {
            error!(error = %e, "cannot listen for ctrl-c, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
