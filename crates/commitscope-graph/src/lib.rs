// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! commitscope-graph: commit log to animated tree
//!
//! This library crate parses one-line-per-commit logs into a commit tree,
//! lays the tree out deterministically, diffs successive snapshots and plans
//! the transitions a drawing layer needs to animate between them.

#![warn(missing_docs)]

//! # Example
//!
//! ```
//! use commitscope_graph::prelude::*;
//!
//! let mut controller = GraphController::new(ControllerConfig::default());
//! controller.ingest(
//!     "1489311 (dev) (7 seconds ago) (Add feature file)  (feature) [6e5656a]\n\
//!      6e5656a (dev) (7 seconds ago) (Initial commit)  (HEAD -> main) []",
//! );
//!
//! let outcome = controller.render().expect("render");
//! assert_eq!(outcome.frame.nodes.len(), 2);
//! assert!(outcome.delta.is_static());
//! ```

pub mod commit;
pub mod controller;
pub mod diff;
pub mod error;
pub mod graph;
pub mod history;
pub mod layout;
pub mod parser;
pub mod render;

pub use commit::CommitRecord;
pub use controller::{ControllerConfig, GraphController, RenderOutcome};
pub use diff::{DeltaKind, SnapshotDelta, diff_snapshots};
pub use error::{GraphError, ParseError, RenderError};
pub use graph::{BranchHead, CommitGraph, Link};
pub use history::{HistoryBuffer, Snapshot};
pub use layout::{LayoutReport, Position, Spacing, layout};
pub use parser::{ParsedLog, parse_line, parse_log};
pub use render::{RenderFrame, RenderStyle};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::commit::CommitRecord;
    pub use crate::controller::{ControllerConfig, GraphController, RenderOutcome};
    pub use crate::diff::{DeltaKind, SnapshotDelta, diff_snapshots};
    pub use crate::error::{GraphError, ParseError, RenderError};
    pub use crate::graph::CommitGraph;
    pub use crate::history::HistoryBuffer;
    pub use crate::layout::{Position, Spacing};
    pub use crate::parser::parse_log;
    pub use crate::render::{RenderFrame, RenderStyle};
}
