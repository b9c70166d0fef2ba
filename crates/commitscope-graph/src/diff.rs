// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Snapshot diffing
//!
//! Compares two laid-out graphs and reports, for every node, link and
//! branch head, where it was and where it is now. Entities that only exist
//! in the newer graph get a sensible starting point (a new commit grows out
//! of its parent) so the transition can be animated.
//!
//! Output order is fixed: entities of the new graph in layout order,
//! followed by exits in the old graph's layout order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::{BranchHead, CommitGraph, Link};
use crate::layout::Position;

/// How an entity changes between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaKind {
    /// Only in the new snapshot
    Enter,
    /// In both snapshots
    Update,
    /// Only in the old snapshot
    Exit,
}

impl DeltaKind {
    fn from_presence(existed_before: bool, exists_after: bool) -> Self {
        match (existed_before, exists_after) {
            (true, true) => Self::Update,
            (false, _) => Self::Enter,
            (true, false) => Self::Exit,
        }
    }
}

/// Change of one commit node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDelta {
    /// Commit id
    pub id: String,
    /// Starting position of the transition
    pub old: Position,
    /// Final position of the transition
    pub new: Position,
    /// Whether the commit was placed in the old snapshot
    pub existed_before: bool,
    /// Whether the commit is placed in the new snapshot
    pub exists_after: bool,
}

impl NodeDelta {
    /// Enter, update or exit
    #[must_use]
    pub fn kind(&self) -> DeltaKind {
        DeltaKind::from_presence(self.existed_before, self.exists_after)
    }

    /// A retained node whose position changed
    #[must_use]
    pub fn moved(&self) -> bool {
        self.existed_before && self.exists_after && self.old != self.new
    }
}

/// Change of one parent-to-child edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDelta {
    /// `"<parent>-<child>"`
    pub key: String,
    /// Parent commit id
    pub parent_id: String,
    /// Child commit id
    pub child_id: String,
    /// Parent end at the start of the transition
    pub old_source: Position,
    /// Child end at the start of the transition
    pub old_target: Position,
    /// Parent end at the end of the transition
    pub new_source: Position,
    /// Child end at the end of the transition
    pub new_target: Position,
    /// Whether the edge existed in the old snapshot
    pub existed_before: bool,
    /// Whether the edge exists in the new snapshot
    pub exists_after: bool,
}

impl LinkDelta {
    /// Enter, update or exit
    #[must_use]
    pub fn kind(&self) -> DeltaKind {
        DeltaKind::from_presence(self.existed_before, self.exists_after)
    }

    /// A retained edge with either end moved
    #[must_use]
    pub fn moved(&self) -> bool {
        self.existed_before
            && self.exists_after
            && (self.old_source != self.new_source || self.old_target != self.new_target)
    }
}

/// Change of one branch-head label, keyed by branch name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchHeadDelta {
    /// Ref name
    pub branch_name: String,
    /// Commit the ref points at (old commit for exits)
    pub commit_id: String,
    /// Index among the commit's ref names
    pub index: usize,
    /// Number of ref names on the commit
    pub total: usize,
    /// Starting position of the transition
    pub old: Position,
    /// Final position of the transition
    pub new: Position,
    /// Retained and at a different position; unmoved labels are not animated
    pub moved: bool,
    /// Whether the name was present in the old snapshot
    pub existed_before: bool,
    /// Whether the name is present in the new snapshot
    pub exists_after: bool,
}

impl BranchHeadDelta {
    /// Enter, update or exit
    #[must_use]
    pub fn kind(&self) -> DeltaKind {
        DeltaKind::from_presence(self.existed_before, self.exists_after)
    }
}

/// Everything that changed between two snapshots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SnapshotDelta {
    /// Node changes
    pub nodes: Vec<NodeDelta>,
    /// Edge changes
    pub links: Vec<LinkDelta>,
    /// Branch-head changes
    pub branch_heads: Vec<BranchHeadDelta>,
}

impl SnapshotDelta {
    /// True when nothing entered, exited or moved
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.nodes
            .iter()
            .all(|n| n.kind() == DeltaKind::Update && !n.moved())
            && self
                .links
                .iter()
                .all(|l| l.kind() == DeltaKind::Update && !l.moved())
            && self
                .branch_heads
                .iter()
                .all(|b| b.kind() == DeltaKind::Update && !b.moved)
    }

    /// Number of entities that are animated (entered, exited or moved)
    #[must_use]
    pub fn changed_count(&self) -> usize {
        let nodes = self
            .nodes
            .iter()
            .filter(|n| n.kind() != DeltaKind::Update || n.moved())
            .count();
        let links = self
            .links
            .iter()
            .filter(|l| l.kind() != DeltaKind::Update || l.moved())
            .count();
        let heads = self
            .branch_heads
            .iter()
            .filter(|b| b.kind() != DeltaKind::Update || b.moved)
            .count();
        nodes + links + heads
    }
}

/// Diff two laid-out graphs
///
/// Only placed commits take part; a graph that was never laid out
/// contributes nothing. The same pair of graphs always yields the same
/// delta, in the same order.
#[must_use]
pub fn diff_snapshots(old: &CommitGraph, new: &CommitGraph) -> SnapshotDelta {
    let nodes = diff_nodes(old, new);

    let starts: HashMap<&str, Position> = nodes
        .iter()
        .filter(|n| n.exists_after)
        .map(|n| (n.id.as_str(), n.old))
        .collect();
    let links = diff_links(old, new, &starts);

    let branch_heads = diff_branch_heads(&old.branch_heads(), &new.branch_heads());

    SnapshotDelta {
        nodes,
        links,
        branch_heads,
    }
}

fn diff_nodes(old: &CommitGraph, new: &CommitGraph) -> Vec<NodeDelta> {
    let fallback = old.root_position().unwrap_or(Position::ORIGIN);
    let mut deltas = Vec::new();

    for (record, position) in new.placed() {
        let (start, existed_before) = match old.position(&record.id) {
            Some(previous) => (previous, true),
            None => {
                let from_parent = record
                    .parent_ids
                    .iter()
                    .find_map(|parent| new.position(parent));
                (from_parent.unwrap_or(fallback), false)
            }
        };
        deltas.push(NodeDelta {
            id: record.id.clone(),
            old: start,
            new: position,
            existed_before,
            exists_after: true,
        });
    }

    for (record, position) in old.placed() {
        if new.position(&record.id).is_none() {
            deltas.push(NodeDelta {
                id: record.id.clone(),
                old: position,
                new: position,
                existed_before: true,
                exists_after: false,
            });
        }
    }

    deltas
}

fn diff_links(
    old: &CommitGraph,
    new: &CommitGraph,
    starts: &HashMap<&str, Position>,
) -> Vec<LinkDelta> {
    let old_links = old.links();
    let new_links = new.links();
    let old_by_key: HashMap<String, &Link> = old_links.iter().map(|l| (l.key(), l)).collect();
    let new_keys: HashSet<String> = new_links.iter().map(Link::key).collect();

    let mut deltas = Vec::with_capacity(new_links.len());

    for link in &new_links {
        let key = link.key();
        let (old_source, old_target, existed_before) = match old_by_key.get(&key) {
            Some(previous) => (previous.source, previous.target, true),
            None => (
                starts
                    .get(link.parent_id.as_str())
                    .copied()
                    .unwrap_or(link.source),
                starts
                    .get(link.child_id.as_str())
                    .copied()
                    .unwrap_or(link.target),
                false,
            ),
        };
        deltas.push(LinkDelta {
            key,
            parent_id: link.parent_id.clone(),
            child_id: link.child_id.clone(),
            old_source,
            old_target,
            new_source: link.source,
            new_target: link.target,
            existed_before,
            exists_after: true,
        });
    }

    for link in &old_links {
        let key = link.key();
        if !new_keys.contains(&key) {
            deltas.push(LinkDelta {
                key,
                parent_id: link.parent_id.clone(),
                child_id: link.child_id.clone(),
                old_source: link.source,
                old_target: link.target,
                new_source: link.source,
                new_target: link.target,
                existed_before: true,
                exists_after: false,
            });
        }
    }

    deltas
}

/// First head per branch name, in layout order
fn unique_heads(heads: &[BranchHead]) -> Vec<&BranchHead> {
    let mut seen: HashSet<&str> = HashSet::new();
    heads
        .iter()
        .filter(|h| seen.insert(h.branch_name.as_str()))
        .collect()
}

fn diff_branch_heads(old: &[BranchHead], new: &[BranchHead]) -> Vec<BranchHeadDelta> {
    let old_heads = unique_heads(old);
    let new_heads = unique_heads(new);
    let old_by_name: HashMap<&str, &BranchHead> = old_heads
        .iter()
        .map(|h| (h.branch_name.as_str(), *h))
        .collect();
    let new_names: HashSet<&str> = new_heads.iter().map(|h| h.branch_name.as_str()).collect();

    let mut deltas = Vec::with_capacity(new_heads.len());

    for head in &new_heads {
        let position = head.position();
        let (start, existed_before) = match old_by_name.get(head.branch_name.as_str()) {
            Some(previous) => (previous.position(), true),
            None => (position, false),
        };
        deltas.push(BranchHeadDelta {
            branch_name: head.branch_name.clone(),
            commit_id: head.commit_id.clone(),
            index: head.index,
            total: head.total,
            old: start,
            new: position,
            moved: existed_before && start != position,
            existed_before,
            exists_after: true,
        });
    }

    for head in &old_heads {
        if !new_names.contains(head.branch_name.as_str()) {
            let position = head.position();
            deltas.push(BranchHeadDelta {
                branch_name: head.branch_name.clone(),
                commit_id: head.commit_id.clone(),
                index: head.index,
                total: head.total,
                old: position,
                new: position,
                moved: false,
                existed_before: true,
                exists_after: false,
            });
        }
    }

    deltas
}
