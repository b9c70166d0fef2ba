// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Graph controller
//!
//! Owns the snapshot history and drives parse, layout, diff and frame
//! planning for each render request. One controller per repository view.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::diff::{SnapshotDelta, diff_snapshots};
use crate::error::{ParseError, RenderError};
use crate::graph::CommitGraph;
use crate::history::{HistoryBuffer, Snapshot};
use crate::layout::Spacing;
use crate::render::{RenderFrame, RenderStyle};

/// Layout and render settings for a controller
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControllerConfig {
    /// Spacing between commits
    pub spacing: Spacing,
    /// Visual constants for frames
    pub style: RenderStyle,
}

/// Result of a successful render pass
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderOutcome {
    /// Transitions to draw
    pub frame: RenderFrame,
    /// The underlying delta between the previous and current snapshots
    pub delta: SnapshotDelta,
    /// Lines of the current snapshot that did not parse
    pub skipped: Vec<ParseError>,
    /// Commits in the current snapshot not reachable from its root
    pub unreachable: Vec<String>,
}

/// Stateful driver from raw logs to render frames
#[derive(Debug, Default)]
pub struct GraphController {
    config: ControllerConfig,
    history: HistoryBuffer,
    last_frame: Option<RenderFrame>,
    // Laid-out graph behind `last_frame`
    last_graph: Option<CommitGraph>,
}

impl GraphController {
    /// Create a controller with an empty history
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            history: HistoryBuffer::new(),
            last_frame: None,
            last_graph: None,
        }
    }

    /// Offer a freshly fetched log
    ///
    /// Returns `true` if it was stored as a new snapshot and a render is due.
    pub fn ingest(&mut self, raw: impl Into<String>) -> bool {
        let added = self.history.add(raw);
        if added {
            info!(snapshots = self.history.len(), "New log snapshot");
        }
        added
    }

    /// Render the transition from the previous snapshot to the current one
    ///
    /// On the first render both sides are the same snapshot, so every
    /// commit is an update that does not move. If the previous snapshot has
    /// no root, the current graph is diffed against the graph of the last
    /// successful render, so commits that vanished in between still exit.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::EmptyHistory`] before anything was ingested,
    /// and [`RenderError::Graph`] if the current snapshot has no root. The
    /// last good frame is kept in both cases.
    pub fn render(&mut self) -> Result<RenderOutcome, RenderError> {
        let (previous, current) = self
            .history
            .latest_pair()
            .ok_or(RenderError::EmptyHistory)?;

        let parsed = current.parse();
        for error in &parsed.errors {
            warn!(line_number = error.line_number, line = %error.line, "Skipping unmatched log line");
        }

        let mut new_graph = CommitGraph::build(parsed.records).inspect_err(|e| {
            warn!(error = %e, "Current snapshot has no root, keeping last frame");
        })?;
        let report = new_graph.layout(&self.config.spacing);

        let rebuilt = if std::ptr::eq(previous, current) {
            None
        } else {
            self.previous_graph(previous)
        };
        let old_graph = rebuilt
            .as_ref()
            .or(self.last_graph.as_ref())
            .unwrap_or(&new_graph);

        let delta = diff_snapshots(old_graph, &new_graph);
        let frame = RenderFrame::plan(&delta, old_graph, &new_graph, &self.config.style);

        debug!(
            nodes = frame.nodes.len(),
            links = frame.links.len(),
            branch_heads = frame.branch_heads.len(),
            changed = delta.changed_count(),
            "Planned render frame"
        );

        self.last_frame = Some(frame.clone());
        self.last_graph = Some(new_graph);
        Ok(RenderOutcome {
            frame,
            delta,
            skipped: parsed.errors,
            unreachable: report.unreachable,
        })
    }

    fn previous_graph(&self, snapshot: &Snapshot) -> Option<CommitGraph> {
        match CommitGraph::build(snapshot.parse().records) {
            Ok(mut graph) => {
                graph.layout(&self.config.spacing);
                Some(graph)
            }
            Err(e) => {
                debug!(error = %e, "Previous snapshot has no root, diffing against last rendered graph");
                None
            }
        }
    }

    /// The most recent successfully planned frame
    #[must_use]
    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.last_frame.as_ref()
    }

    /// Stored snapshots
    #[must_use]
    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    /// Settings in use
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}
