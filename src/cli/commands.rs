//! CLI command implementations

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use serde::Serialize;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::cli::args::{Cli, ConfigCommand};
use crate::config::Settings;
use crate::llm::{build_provider, build_token_counter};
use crate::service::{split_transcript, TranscriptService};
use crate::transcript::TokenCounter;

/// Run the HTTP server
pub async fn serve(mut settings: Settings, host: Option<String>, port: Option<u16>) -> Result<()> {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }
    settings.validate()?;

    crate::server::run(&settings).await
}

/// Summarize a transcript file and print the result
pub async fn summarize_file(settings: &Settings, file: &Path) -> Result<()> {
    let content = read_transcript(file)?;

    let provider = build_provider(settings)?;
    let counter = build_token_counter(settings)?;
    let service = TranscriptService::new(
        Arc::from(provider),
        counter,
        settings.summarizer.max_token_limit,
    );

    let summary = service.summarize(content).await?;

    println!("{}", summary.text);
    eprintln!(
        "({} chunks, {:.1}s)",
        summary.chunk_count, summary.elapsed_secs
    );

    Ok(())
}

#[derive(Serialize)]
struct ChunkReport<'a> {
    index: usize,
    tokens: usize,
    text: &'a str,
}

/// Print the chunk sequence for a transcript file
pub fn split_file(settings: &Settings, file: &Path, limit: Option<usize>, json: bool) -> Result<()> {
    let limit = limit.unwrap_or(settings.summarizer.max_token_limit);
    if limit == 0 {
        anyhow::bail!("Token limit must be greater than zero");
    }

    let content = read_transcript(file)?;
    let counter = build_token_counter(settings)?;
    let chunks = split_transcript(&content, counter.as_ref(), limit)?;

    let reports = chunks
        .iter()
        .enumerate()
        .map(|(index, text)| -> Result<ChunkReport<'_>> {
            Ok(ChunkReport {
                index: index + 1,
                tokens: counter.count_tokens(text)?,
                text,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    println!("{} chunks (limit {} tokens)", reports.len(), limit);
    for report in &reports {
        println!();
        println!("== Chunk {} ({} tokens) ==", report.index, report.tokens);
        print!("{}", report.text);
    }

    Ok(())
}

/// Configuration commands
pub fn config_command(settings: &Settings, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(settings)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Settings::config_path()?;
            println!("{}", path.display());
        }
        ConfigCommand::Init { force } => {
            let path = Settings::config_path()?;
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Settings::write_default(&path)?;
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Write the completion script for `shell`.
pub fn completions(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, out);
}

fn read_transcript(file: &Path) -> Result<String> {
    std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read transcript: {}", file.display()))
}
