mod cli;
mod commands;
mod config;

use std::sync::Arc;

use clap::Parser;
use station_db::Database;
use station_gen::{GeminiClient, GenerativeService, Generator};
use station_world::Repository;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::commands::Session;
use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "station=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Config, with command-line overrides
    let mut config = Config::from_env()?;
    if let Some(db_path) = cli.db_path {
        config.db_path = db_path;
    }
    if let Some(model) = cli.model {
        config.model = model;
    }
    if let Some(export_dir) = cli.export_dir {
        config.export_dir = export_dir;
    }

    let db = Database::open(&config.db_path)?;
    let repo = Repository::load(db);

    let service: Option<Arc<dyn GenerativeService>> = match &config.api_key {
        Some(key) => {
            info!("AI generation enabled with {}", config.model);
            let client: Arc<dyn GenerativeService> =
                Arc::new(GeminiClient::new(key.as_str(), config.model)?);
            Some(client)
        }
        None => {
            debug!("No Gemini API key set; AI generation is unavailable");
            None
        }
    };

    let mut session = Session {
        repo,
        generator: Generator::new(service),
        model: config.model,
        export_dir: config.export_dir,
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    session.run(cli.command, &mut out).await
}
