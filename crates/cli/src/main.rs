//! `business-case-entry` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve` — start the entry page.
//!
//! Database settings come from `HOST`, `PORT`, `DATABASE`, `USER`,
//! `PASSWORD`, and `DRIVER`; see `db::config`.

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use api::AppState;
use db::ConnectionConfig;

#[derive(Parser)]
#[command(
    name = "business-case-entry",
    about = "Collect business cases through a web form and store them in the database",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the business case entry page.
    Serve {
        #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:8501")]
        bind: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind } => {
            let config = ConnectionConfig::from_env()
                .context("database connection configuration is incomplete")?;
            info!(
                host = %config.host,
                port = config.port,
                database = %config.database,
                driver = %config.driver,
                "Database configured"
            );

            let state = AppState::new(cases::for_driver(config.driver), config);
            api::serve(&bind, state).await?;
        }
    }

    Ok(())
}
