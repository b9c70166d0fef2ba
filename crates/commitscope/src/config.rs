//! Configuration for the commitscope CLI
//!
//! This module provides configuration types for the command line, including
//! the repository to watch, layout spacing, render style and logging options.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commitscope_graph::ControllerConfig;
use commitscope_graph::layout::{DEFAULT_X_SPACING, DEFAULT_Y_SPACING, Spacing};
use commitscope_graph::render::{DEFAULT_LABEL_PITCH, RenderStyle};

/// Default delay between repository polls in watch mode
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Commitscope - animated commit tree frames from git history
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "commitscope")]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Subcommand to run (defaults to a single render)
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Path inside the git repository to read history from
    ///
    /// The repository is discovered by walking up from this path.
    /// Defaults to the current working directory.
    #[arg(short, long, env = "COMMITSCOPE_REPO")]
    pub repo: Option<PathBuf>,

    /// Horizontal distance between commits on one level [default: 200]
    #[arg(long, env = "COMMITSCOPE_X_SPACING")]
    pub x_spacing: Option<f64>,

    /// Vertical distance between levels [default: 150]
    #[arg(long, env = "COMMITSCOPE_Y_SPACING")]
    pub y_spacing: Option<f64>,

    /// Vertical distance between branch labels on one commit [default: 25]
    #[arg(long)]
    pub label_pitch: Option<f64>,

    /// Enable verbose logging (debug level)
    ///
    /// Logs are written to stderr so stdout stays machine-readable JSON.
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Quiet mode - suppress info-level logs
    ///
    /// Only errors and warnings will be logged.
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,

    /// Pretty-print JSON output
    ///
    /// Ignored by `watch`, which always prints one frame per line.
    #[arg(long, default_value = "false")]
    pub pretty: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetch the log once and print the render frame
    Render {
        /// Read the log from a file instead of the repository (`-` for stdin)
        #[arg(long)]
        log: Option<PathBuf>,
    },

    /// Print the frame that animates from one saved log to another
    ///
    /// Example:
    ///   git log --all --format=format:'%h (%an) (%ar) (%s) %d [%p]' > new.log
    ///   commitscope diff old.log new.log
    Diff {
        /// Earlier log file
        old: PathBuf,
        /// Later log file
        new: PathBuf,
    },

    /// Poll the repository and print a frame each time the history changes
    Watch {
        /// Delay between polls in milliseconds
        #[arg(long, default_value_t = DEFAULT_INTERVAL_MS)]
        interval_ms: u64,

        /// Stop after this many polls
        #[arg(long)]
        max_polls: Option<u64>,
    },
}

impl Config {
    /// Get the repository path, using current directory as default
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        self.repo
            .clone()
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Layout spacing with defaults applied
    #[must_use]
    pub fn spacing(&self) -> Spacing {
        Spacing::new(
            self.x_spacing.unwrap_or(DEFAULT_X_SPACING),
            self.y_spacing.unwrap_or(DEFAULT_Y_SPACING),
        )
    }

    /// Render style with defaults applied
    #[must_use]
    pub fn style(&self) -> RenderStyle {
        RenderStyle {
            label_pitch: self.label_pitch.unwrap_or(DEFAULT_LABEL_PITCH),
            ..RenderStyle::default()
        }
    }

    /// Settings for a graph controller
    #[must_use]
    pub fn controller_config(&self) -> ControllerConfig {
        ControllerConfig {
            spacing: self.spacing(),
            style: self.style(),
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A spacing or label pitch is not a positive finite number
    /// - The repository path is specified but doesn't exist
    /// - The watch interval is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spacing = self.spacing();
        let style = self.style();
        for (name, value) in [
            ("x-spacing", spacing.x),
            ("y-spacing", spacing.y),
            ("label-pitch", style.label_pitch),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidSpacing { name, value });
            }
        }

        if let Some(ref repo) = self.repo {
            if !repo.exists() {
                return Err(ConfigError::RepositoryNotFound(repo.clone()));
            }
        }

        if let Some(Command::Watch { interval_ms: 0, .. }) = self.command {
            return Err(ConfigError::InvalidInterval);
        }

        Ok(())
    }

    /// Get the log level based on verbose/quiet flags
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        if self.verbose {
            tracing::Level::DEBUG
        } else if self.quiet {
            tracing::Level::WARN
        } else {
            tracing::Level::INFO
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A spacing value is zero, negative or not finite
    #[error("Invalid {name}: {value} (must be a positive number)")]
    InvalidSpacing {
        /// Flag name
        name: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Repository path not found
    #[error("Repository path not found: {0}")]
    RepositoryNotFound(PathBuf),

    /// Watch interval of zero
    #[error("Watch interval must be greater than zero")]
    InvalidInterval,
}
