//! recap - Meeting transcript summarization
//!
//! Entry point for the recap CLI and HTTP server.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use recap::cli::{Cli, Commands};
use recap::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    if let Commands::Completions { shell } = cli.command {
        recap::cli::commands::completions(shell, &mut std::io::stdout());
        return Ok(());
    }

    // Load configuration only for runtime commands.
    let settings = Settings::load()?;

    // Initialize logging
    let default_level = if cli.verbose {
        "debug"
    } else {
        settings.general.log_level.as_str()
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match cli.command {
        Commands::Serve { host, port } => {
            recap::cli::commands::serve(settings, host, port).await?;
        }
        Commands::Summarize { file } => {
            recap::cli::commands::summarize_file(&settings, &file).await?;
        }
        Commands::Split { file, limit, json } => {
            recap::cli::commands::split_file(&settings, &file, limit, json)?;
        }
        Commands::Config(config_cmd) => {
            recap::cli::commands::config_command(&settings, config_cmd)?;
        }
        Commands::Completions { .. } => unreachable!(),
    }

    Ok(())
}
