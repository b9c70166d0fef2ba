//! commitscope: animated commit tree frames from git history
//!
//! This binary reads a repository's history (or saved logs), lays the commit
//! tree out and prints render frames as JSON on stdout.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use commitscope::commands::{self, WatchOptions};
use commitscope::config::{Command, Config};
use commitscope::source::{FileLogSource, LogSource, RepoLogSource};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Logs go to stderr; stdout carries the JSON frames
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(config.log_level().into())
                .from_env_lossy(),
        )
        .init();

    config.validate().context("Invalid configuration")?;
    debug!(?config, "Starting commitscope");

    let mut stdout = std::io::stdout().lock();
    match config.command.clone() {
        None => {
            let source = open_repo(&config)?;
            commands::run_render(&config, &source, &mut stdout)?;
        }
        Some(Command::Render { log }) => match log {
            Some(path) => {
                commands::run_render(&config, &FileLogSource::new(path), &mut stdout)?;
            }
            None => {
                let source = open_repo(&config)?;
                commands::run_render(&config, &source, &mut stdout)?;
            }
        },
        Some(Command::Diff { old, new }) => {
            commands::run_diff(
                &config,
                &FileLogSource::new(old),
                &FileLogSource::new(new),
                &mut stdout,
            )?;
        }
        Some(Command::Watch {
            interval_ms,
            max_polls,
        }) => {
            let source: Arc<dyn LogSource> = Arc::new(open_repo(&config)?);
            let options = WatchOptions {
                interval: Duration::from_millis(interval_ms),
                max_polls,
            };
            let stats = commands::run_watch(&config, source, options, &mut stdout).await?;
            info!(frames = stats.frames, "Done");
        }
    }

    Ok(())
}

fn open_repo(config: &Config) -> Result<RepoLogSource> {
    let path = config.repo_path();
    RepoLogSource::open(&path)
        .with_context(|| format!("Failed to open repository at {}", path.display()))
}
