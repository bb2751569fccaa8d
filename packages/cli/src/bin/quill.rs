use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quill_config::{parse_port, Config};
use tracing::info;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - a small blog engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on (overrides QUILL_PORT)
        #[arg(long, value_parser = parse_port_arg)]
        port: Option<u16>,
        /// SQLite database file (overrides QUILL_DATABASE_PATH)
        #[arg(long)]
        database: Option<PathBuf>,
    },
    /// Create or upgrade the database schema, then exit
    Migrate {
        /// SQLite database file (overrides QUILL_DATABASE_PATH)
        #[arg(long)]
        database: Option<PathBuf>,
    },
}

fn parse_port_arg(raw: &str) -> Result<u16, String> {
    parse_port(raw).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    quill_cli::init_tracing();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;

    match cli.command {
        Commands::Serve { port, database } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(database) = database {
                config.database_path = database;
            }
            quill_cli::run_server(config).await
        }
        Commands::Migrate { database } => {
            if let Some(database) = database {
                config.database_path = database;
            }
            let pool = quill_cli::open_database(&config).await?;
            pool.close().await;
            info!("Migrations applied");
            Ok(())
        }
    }
}
