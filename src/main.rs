use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use skills_manager::config::{self, Config};
use skills_manager::db::{self, Store};
use skills_manager::matching::MatchingEngine;
use skills_manager::{api, ui};

#[derive(Parser)]
#[command(name = "skills_manager", version, about = "Skills inventory and project staffing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        /// Overrides PORT
        #[arg(long)]
        port: Option<u16>,
        /// Keep data in process memory instead of PostgreSQL
        #[arg(long)]
        memory: bool,
        /// Apply migrations before serving
        #[arg(long)]
        migrate: bool,
    },
    /// Open the terminal console
    Console {
        #[arg(long)]
        memory: bool,
    },
    /// Apply database migrations and exit
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = config::init()?;

    match cli.command {
        Command::Serve {
            port,
            memory,
            migrate,
        } => {
            init_logging();
            if let Some(port) = port {
                config.port = port;
            }
            let store = open_store(&config, memory, migrate).await?;
            api::serve(store, &config).await
        }
        Command::Console { memory } => {
            let store = open_store(&config, memory, false).await?;
            let engine = MatchingEngine::new(store.clone()).with_timeout(config.query_timeout());
            ui::run(store, engine).await?;
            println!("Thanks for using Skills Manager!");
            Ok(())
        }
        Command::Migrate => {
            init_logging();
            db::init(&config, true).await?;
            info!("migrations applied");
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}

async fn open_store(config: &Config, memory: bool, migrate: bool) -> Result<Store> {
    if memory {
        info!("using in-memory store");
        return Ok(db::in_memory());
    }

    Ok(db::init(config, migrate).await?)
}
