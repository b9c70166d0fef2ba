// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Render frame preparation
//!
//! Turns a [`SnapshotDelta`] into the values a drawing layer needs for one
//! animated pass: transition endpoints and durations, SVG link paths, and
//! branch-head arrow and label geometry. Nothing here draws.

use serde::{Deserialize, Serialize};

use crate::diff::{BranchHeadDelta, DeltaKind, LinkDelta, NodeDelta, SnapshotDelta};
use crate::graph::{CommitGraph, label_offset};
use crate::layout::Position;

/// Default radius of a commit circle
pub const DEFAULT_NODE_RADIUS: f64 = 40.0;

/// Default transition length in milliseconds
pub const DEFAULT_TRANSITION_MS: u64 = 1000;

/// Default vertical distance between labels on one commit
pub const DEFAULT_LABEL_PITCH: f64 = 25.0;

/// Gap between the commit circle and the arrow tip
const ARROW_GAP: f64 = 10.0;

/// Gap between the arrow tail and the label text
const LABEL_GAP: f64 = 15.0;

/// Lift of the label baseline above the arrow tail
const LABEL_LIFT: f64 = 5.0;

/// Visual constants for a render pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    /// Commit circle radius
    pub node_radius: f64,
    /// Length of an animated transition
    pub transition_ms: u64,
    /// Vertical distance between labels on one commit
    pub label_pitch: f64,
    /// Horizontal extent of a branch arrow
    pub arrow_width: f64,
    /// Vertical extent of a branch arrow
    pub arrow_height: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            node_radius: DEFAULT_NODE_RADIUS,
            transition_ms: DEFAULT_TRANSITION_MS,
            label_pitch: DEFAULT_LABEL_PITCH,
            arrow_width: 30.0,
            arrow_height: 15.0,
        }
    }
}

/// Animation of one commit node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTransition {
    /// Commit id
    pub id: String,
    /// Author name label
    pub author: String,
    /// Relative time label
    pub time: String,
    /// Commit subject
    pub message: String,
    /// Enter, update or exit
    pub kind: DeltaKind,
    /// Start position
    pub from: Position,
    /// End position
    pub to: Position,
    /// Transition length
    pub duration_ms: u64,
}

/// Animation of one edge, as SVG path data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTransition {
    /// `"<parent>-<child>"`
    pub key: String,
    /// Enter, update or exit
    pub kind: DeltaKind,
    /// Path at the start of the transition
    pub from_path: String,
    /// Path at the end of the transition
    pub to_path: String,
    /// Transition length
    pub duration_ms: u64,
}

/// A line segment relative to the commit centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Tail x
    pub x1: f64,
    /// Tail y
    pub y1: f64,
    /// Head x
    pub x2: f64,
    /// Head y
    pub y2: f64,
}

/// Animation of one branch-head label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchHeadTransition {
    /// Ref name
    pub branch_name: String,
    /// Commit the label hangs off
    pub commit_id: String,
    /// Enter, update or exit
    pub kind: DeltaKind,
    /// Start position of the label group
    pub from: Position,
    /// End position of the label group
    pub to: Position,
    /// Whether the label changed commit position
    pub moved: bool,
    /// Zero for labels that did not move
    pub duration_ms: u64,
    /// Arrow pointing at the commit, relative to the group
    pub arrow: Segment,
    /// Label text anchor, relative to the group
    pub label: Position,
}

/// Everything the drawing layer needs for one pass
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    /// Commit nodes
    pub nodes: Vec<NodeTransition>,
    /// Edges
    pub links: Vec<LinkTransition>,
    /// Branch-head labels
    pub branch_heads: Vec<BranchHeadTransition>,
}

impl RenderFrame {
    /// Plan the transitions for a delta between `old` and `new`
    ///
    /// Node labels come from `new`, or from `old` for exiting commits.
    #[must_use]
    pub fn plan(
        delta: &SnapshotDelta,
        old: &CommitGraph,
        new: &CommitGraph,
        style: &RenderStyle,
    ) -> Self {
        Self {
            nodes: delta
                .nodes
                .iter()
                .map(|n| node_transition(n, old, new, style))
                .collect(),
            links: delta
                .links
                .iter()
                .map(|l| link_transition(l, style))
                .collect(),
            branch_heads: delta
                .branch_heads
                .iter()
                .map(|b| branch_head_transition(b, style))
                .collect(),
        }
    }

    /// Check whether the frame has nothing to draw
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.links.is_empty() && self.branch_heads.is_empty()
    }
}

fn node_transition(
    delta: &NodeDelta,
    old: &CommitGraph,
    new: &CommitGraph,
    style: &RenderStyle,
) -> NodeTransition {
    let (author, time, message) = new
        .get(&delta.id)
        .or_else(|| old.get(&delta.id))
        .map(|r| (r.author.clone(), r.time.clone(), r.message.clone()))
        .unwrap_or_default();

    NodeTransition {
        id: delta.id.clone(),
        author,
        time,
        message,
        kind: delta.kind(),
        from: delta.old,
        to: delta.new,
        duration_ms: style.transition_ms,
    }
}

fn link_transition(delta: &LinkDelta, style: &RenderStyle) -> LinkTransition {
    LinkTransition {
        key: delta.key.clone(),
        kind: delta.kind(),
        from_path: link_path(delta.old_source, delta.old_target),
        to_path: link_path(delta.new_source, delta.new_target),
        duration_ms: style.transition_ms,
    }
}

fn branch_head_transition(delta: &BranchHeadDelta, style: &RenderStyle) -> BranchHeadTransition {
    let duration_ms = match delta.kind() {
        DeltaKind::Update if !delta.moved => 0,
        DeltaKind::Enter => 0,
        _ => style.transition_ms,
    };
    let (arrow, label) = branch_arrow(delta.index, delta.total, style);

    BranchHeadTransition {
        branch_name: delta.branch_name.clone(),
        commit_id: delta.commit_id.clone(),
        kind: delta.kind(),
        from: delta.old,
        to: delta.new,
        moved: delta.moved,
        duration_ms,
        arrow,
        label,
    }
}

/// Cubic Bézier from parent to child, bending through the vertical midpoint
#[must_use]
pub fn link_path(source: Position, target: Position) -> String {
    let mid_y = (source.y + target.y) / 2.0;
    format!(
        "M{},{} C{},{} {},{} {},{}",
        source.x, source.y, source.x, mid_y, target.x, mid_y, target.x, target.y
    )
}

/// Arrow and label anchor for label `index` of `total` on one commit
#[must_use]
pub fn branch_arrow(index: usize, total: usize, style: &RenderStyle) -> (Segment, Position) {
    let offset = label_offset(index, total, style.label_pitch);
    let arrow = Segment {
        x1: style.node_radius + style.arrow_width + ARROW_GAP,
        y1: offset - style.arrow_height,
        x2: style.node_radius + ARROW_GAP,
        y2: offset,
    };
    let label = Position::new(
        style.node_radius + style.arrow_width + LABEL_GAP,
        offset - style.arrow_height - LABEL_LIFT,
    );
    (arrow, label)
}
