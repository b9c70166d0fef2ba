// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Deterministic commit layout
//!
//! Commits are placed level by level: `y` is the breadth-first depth from
//! the root times the vertical spacing, `x` is the commit's index within its
//! level times the horizontal spacing.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::graph::CommitGraph;

/// Default horizontal distance between commits on one level
pub const DEFAULT_X_SPACING: f64 = 200.0;

/// Default vertical distance between levels
pub const DEFAULT_Y_SPACING: f64 = 150.0;

/// A point on the layout plane
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f64,
    /// Vertical coordinate
    pub y: f64,
}

impl Position {
    /// The origin, used when there is nothing better to start from
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a position
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Spacing between laid-out commits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spacing {
    /// Horizontal distance between siblings on one level
    pub x: f64,
    /// Vertical distance between levels
    pub y: f64,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            x: DEFAULT_X_SPACING,
            y: DEFAULT_Y_SPACING,
        }
    }
}

impl Spacing {
    /// Create a spacing
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Outcome of a layout pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutReport {
    /// Number of commits that received a position
    pub placed: usize,
    /// Number of depth levels
    pub levels: usize,
    /// Ids of commits not reachable from the root, in input order
    pub unreachable: Vec<String>,
}

/// Assign a position to every commit reachable from the root
///
/// Any previous layout is discarded first, so laying out the same graph
/// twice with the same spacing yields identical coordinates. Commits not
/// reachable from the root get no position and are listed in the report.
pub fn layout(graph: &mut CommitGraph, spacing: &Spacing) -> LayoutReport {
    graph.clear_positions();

    let walk = graph.breadth_first();
    let mut level_counts: Vec<usize> = Vec::new();

    for &(node, depth) in &walk {
        if level_counts.len() <= depth {
            level_counts.resize(depth + 1, 0);
        }
        let index = level_counts[depth];
        level_counts[depth] += 1;

        let position = Position::new(index as f64 * spacing.x, depth as f64 * spacing.y);
        graph.place(node, position);
    }

    let unreachable: Vec<String> = graph.unplaced().map(|r| r.id.clone()).collect();
    if !unreachable.is_empty() {
        warn!(
            count = unreachable.len(),
            ids = ?unreachable,
            "Commits unreachable from root are excluded from the layout"
        );
    }

    debug!(
        root = %graph.record_at(walk[0].0).id,
        placed = walk.len(),
        levels = level_counts.len(),
        "Laid out commit graph"
    );

    LayoutReport {
        placed: walk.len(),
        levels: level_counts.len(),
        unreachable,
    }
}

impl CommitGraph {
    /// Lay this graph out in place, see [`layout`]
    pub fn layout(&mut self, spacing: &Spacing) -> LayoutReport {
        layout(self, spacing)
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::commit::CommitRecord;
    use proptest::prelude::*;

    fn history_strategy() -> impl Strategy<Value = Vec<CommitRecord>> {
        (1usize..40).prop_flat_map(|n| {
            proptest::collection::vec((any::<prop::sample::Index>(), any::<bool>()), n).prop_map(
                move |picks| {
                    (0..n)
                        .rev()
                        .map(|i| {
                            let mut parent_ids = Vec::new();
                            if i > 0 {
                                parent_ids.push(format!("{:07x}", picks[i].0.index(i) + 1));
                                // occasional merge with the previous commit
                                if picks[i].1 && i > 1 {
                                    parent_ids.push(format!("{:07x}", i));
                                }
                            }
                            CommitRecord {
                                id: format!("{:07x}", i + 1),
                                message: format!("commit {i}"),
                                author: "a".to_string(),
                                time: "now".to_string(),
                                branches: Vec::new(),
                                parent_ids,
                            }
                        })
                        .collect()
                },
            )
        })
    }

    proptest! {
        /// Property: two layouts of identical graphs are bit-identical
        #[test]
        fn prop_layout_deterministic(records in history_strategy(), x in 1.0f64..500.0, y in 1.0f64..500.0) {
            let spacing = Spacing::new(x, y);
            let mut a = CommitGraph::build(records.clone()).expect("builds");
            let mut b = CommitGraph::build(records).expect("builds");
            a.layout(&spacing);
            b.layout(&spacing);
            let pa: Vec<(String, u64, u64)> = a.placed().map(|(r, p)| (r.id.clone(), p.x.to_bits(), p.y.to_bits())).collect();
            let pb: Vec<(String, u64, u64)> = b.placed().map(|(r, p)| (r.id.clone(), p.x.to_bits(), p.y.to_bits())).collect();
            prop_assert_eq!(pa, pb);
        }

        /// Property: no two placed commits share a position
        #[test]
        fn prop_positions_unique(records in history_strategy()) {
            let mut graph = CommitGraph::build(records).expect("builds");
            graph.layout(&Spacing::default());
            let mut seen: Vec<(u64, u64)> = Vec::new();
            for (_, p) in graph.placed() {
                let key = (p.x.to_bits(), p.y.to_bits());
                prop_assert!(!seen.contains(&key));
                seen.push(key);
            }
        }
    }
}
