// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Error types for commitscope-graph

use serde::Serialize;
use thiserror::Error;

/// A log line that does not match the commit line grammar
///
/// Parse errors are recoverable: the offending line is skipped and the
/// remaining lines are still parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("Unmatched log line {line_number}: {line}")]
pub struct ParseError {
    /// 1-based line number within the raw log text
    pub line_number: usize,
    /// The raw text of the line that failed to match
    pub line: String,
}

/// Errors that can occur while assembling a commit graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// No record in the snapshot has an empty parent list
    #[error("No root commit found: every commit lists at least one parent")]
    NoRoot,
}

/// Errors that abort a render pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The current snapshot could not be turned into a graph
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Nothing has been ingested yet
    #[error("No snapshot has been ingested")]
    EmptyHistory,
}
