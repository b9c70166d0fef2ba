// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Command runners
//!
//! Each runner drives a [`GraphController`] from one or more log sources
//! and writes JSON to the given writer. `watch` is the only async entry
//! point; fetches run on the blocking pool.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use commitscope_graph::{GraphController, RenderError, RenderOutcome};
use serde::Serialize;
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::source::{LogSource, SourceError};

/// Errors that abort a command
#[derive(Debug, Error)]
pub enum CommandError {
    /// Fetching a log failed
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The snapshot could not be rendered
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing output failed
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),

    /// A blocking fetch task panicked or was cancelled
    #[error("Fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Options for the watch loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Delay between polls
    pub interval: Duration,
    /// Stop after this many polls (None = until interrupted)
    pub max_polls: Option<u64>,
}

/// Counters from a finished watch loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatchStats {
    /// Polls performed
    pub polls: u64,
    /// Frames written
    pub frames: u64,
    /// Polls whose fetch or render failed
    pub failures: u64,
}

/// Write one JSON document followed by a newline
///
/// # Errors
///
/// Returns `CommandError` if serialization or the write fails.
pub fn write_json<W: Write, T: Serialize>(
    out: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), CommandError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Fetch once and print the frame of the log against itself
///
/// # Errors
///
/// Returns `CommandError` if the fetch fails or the log has no root commit.
pub fn run_render<W: Write>(
    config: &Config,
    source: &dyn LogSource,
    out: &mut W,
) -> Result<RenderOutcome, CommandError> {
    let mut controller = GraphController::new(config.controller_config());
    controller.ingest(source.fetch()?);
    let outcome = controller.render()?;
    info!(
        commits = outcome.frame.nodes.len(),
        skipped = outcome.skipped.len(),
        "Rendered log"
    );
    write_json(out, &outcome, config.pretty)?;
    Ok(outcome)
}

/// Print the frame that animates from `old` to `new`
///
/// # Errors
///
/// Returns `CommandError` if either fetch fails or `new` has no root commit.
pub fn run_diff<W: Write>(
    config: &Config,
    old: &dyn LogSource,
    new: &dyn LogSource,
    out: &mut W,
) -> Result<RenderOutcome, CommandError> {
    let mut controller = GraphController::new(config.controller_config());
    controller.ingest(old.fetch()?);
    if !controller.ingest(new.fetch()?) {
        info!("Logs differ only in relative times");
    }
    let outcome = controller.render()?;
    info!(changed = outcome.delta.changed_count(), "Diffed logs");
    write_json(out, &outcome, config.pretty)?;
    Ok(outcome)
}

/// Poll `source` and print a frame line each time the history changes
///
/// Fetch and render failures are logged and the loop carries on with the
/// next poll. The loop ends after `max_polls` polls or on Ctrl-C.
///
/// # Errors
///
/// Returns `CommandError` if writing output fails or a fetch task panics.
pub async fn run_watch<W: Write>(
    config: &Config,
    source: Arc<dyn LogSource>,
    options: WatchOptions,
    out: &mut W,
) -> Result<WatchStats, CommandError> {
    run_watch_until(config, source, options, out, tokio::signal::ctrl_c()).await
}

/// Like [`run_watch`], but stops once `shutdown` resolves
///
/// `shutdown` is polled for the whole loop, so a signal that arrives while
/// a fetch or render is in flight ends the loop before the next poll.
///
/// # Errors
///
/// Returns `CommandError` if writing output fails or a fetch task panics.
pub async fn run_watch_until<W, F>(
    config: &Config,
    source: Arc<dyn LogSource>,
    options: WatchOptions,
    out: &mut W,
    shutdown: F,
) -> Result<WatchStats, CommandError>
where
    W: Write,
    F: Future,
{
    let mut controller = GraphController::new(config.controller_config());
    let mut interval = tokio::time::interval(options.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut stats = WatchStats::default();
    tokio::pin!(shutdown);

    info!(interval_ms = options.interval.as_millis() as u64, "Watching repository");

    loop {
        if options.max_polls.is_some_and(|max| stats.polls >= max) {
            break;
        }

        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("Interrupted, stopping watch");
                break;
            }
            _ = interval.tick() => {}
        }
        stats.polls += 1;

        let fetcher = Arc::clone(&source);
        let raw = match tokio::task::spawn_blocking(move || fetcher.fetch()).await? {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Failed to fetch log, retrying on next poll");
                stats.failures += 1;
                continue;
            }
        };

        if !controller.ingest(raw) {
            debug!(poll = stats.polls, "History unchanged");
            continue;
        }

        match controller.render() {
            Ok(outcome) => {
                write_json(out, &outcome.frame, false)?;
                stats.frames += 1;
            }
            Err(e) => {
                warn!(error = %e, "Render failed, keeping last frame");
                stats.failures += 1;
            }
        }
    }

    info!(
        polls = stats.polls,
        frames = stats.frames,
        failures = stats.failures,
        "Watch finished"
    );
    Ok(stats)
}
