// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Commit graph assembly
//!
//! A [`CommitGraph`] owns every record of one snapshot, the forward
//! `children` relation rebuilt from `parent_ids`, and the coordinates
//! written by [`layout`](crate::layout::layout).

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::commit::CommitRecord;
use crate::error::GraphError;
use crate::layout::Position;

/// A record plus the graph-owned data derived from it
#[derive(Debug, Clone)]
struct CommitNode {
    record: CommitRecord,
    children: Vec<usize>,
    position: Option<Position>,
}

/// A parent-to-child edge between two placed commits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Parent commit id
    pub parent_id: String,
    /// Child commit id
    pub child_id: String,
    /// Parent position
    pub source: Position,
    /// Child position
    pub target: Position,
}

impl Link {
    /// Stable identity of an edge across snapshots
    #[must_use]
    pub fn key_for(parent_id: &str, child_id: &str) -> String {
        format!("{parent_id}-{child_id}")
    }

    /// Stable identity of this edge
    #[must_use]
    pub fn key(&self) -> String {
        Self::key_for(&self.parent_id, &self.child_id)
    }
}

/// One ref name attached to a placed commit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchHead {
    /// Ref name (`HEAD`, `main`, `origin/main`, ...)
    pub branch_name: String,
    /// Commit the ref points at
    pub commit_id: String,
    /// Commit x coordinate
    pub x: f64,
    /// Commit y coordinate
    pub y: f64,
    /// Position of this name among the commit's ref names
    pub index: usize,
    /// Number of ref names on the commit
    pub total: usize,
}

impl BranchHead {
    /// The commit position this label hangs off
    #[must_use]
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Vertical label offset relative to the commit for a label pitch
    #[must_use]
    pub fn label_offset(&self, pitch: f64) -> f64 {
        label_offset(self.index, self.total, pitch)
    }
}

/// Vertical offset of label `index` out of `total`, fanned around the commit
///
/// `floor((total - 1) / 2) * pitch - index * pitch`
#[must_use]
pub fn label_offset(index: usize, total: usize, pitch: f64) -> f64 {
    let first = total.saturating_sub(1) / 2;
    first as f64 * pitch - index as f64 * pitch
}

/// The rooted commit graph of one snapshot
#[derive(Debug, Clone)]
pub struct CommitGraph {
    nodes: Vec<CommitNode>,
    index: HashMap<String, usize>,
    root: usize,
    /// Visit order of the last layout pass; empty until laid out
    order: Vec<usize>,
}

impl CommitGraph {
    /// Build a graph from the records of one parser pass
    ///
    /// Parent ids that do not resolve within `records` are ignored. When
    /// several records have no parents, the first one in input order is the
    /// root. A repeated commit id keeps its first record.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoRoot`] if no record has an empty parent list.
    pub fn build(records: Vec<CommitRecord>) -> Result<Self, GraphError> {
        let mut nodes: Vec<CommitNode> = Vec::with_capacity(records.len());
        let mut index: HashMap<String, usize> = HashMap::with_capacity(records.len());

        for record in records {
            if index.contains_key(&record.id) {
                warn!(id = %record.id, "Duplicate commit id in snapshot, keeping first");
                continue;
            }
            index.insert(record.id.clone(), nodes.len());
            nodes.push(CommitNode {
                record,
                children: Vec::new(),
                position: None,
            });
        }

        for child in 0..nodes.len() {
            let mut seen: Vec<usize> = Vec::new();
            for parent_id in &nodes[child].record.parent_ids {
                if let Some(&parent) = index.get(parent_id) {
                    if !seen.contains(&parent) {
                        seen.push(parent);
                    }
                }
            }
            for parent in seen {
                nodes[parent].children.push(child);
            }
        }

        let root = nodes
            .iter()
            .position(|n| n.record.is_root())
            .ok_or(GraphError::NoRoot)?;

        let roots = nodes.iter().filter(|n| n.record.is_root()).count();
        if roots > 1 {
            warn!(
                roots,
                root = %nodes[root].record.id,
                "Multiple root commits in snapshot, using the first"
            );
        }

        Ok(Self {
            nodes,
            index,
            root,
            order: Vec::new(),
        })
    }

    /// The root commit
    #[must_use]
    pub fn root(&self) -> &CommitRecord {
        &self.nodes[self.root].record
    }

    /// Number of commits in the snapshot (reachable or not)
    #[must_use]
    pub fn commit_count(&self) -> usize {
        self.nodes.len()
    }

    /// Look up a commit by id
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&CommitRecord> {
        self.index.get(id).map(|&i| &self.nodes[i].record)
    }

    /// Check whether a commit id is part of the snapshot
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All records in input order
    pub fn records(&self) -> impl Iterator<Item = &CommitRecord> {
        self.nodes.iter().map(|n| &n.record)
    }

    /// Children of a commit, in the order they were attached
    pub fn children(&self, id: &str) -> impl Iterator<Item = &CommitRecord> {
        self.index
            .get(id)
            .map(|&i| self.nodes[i].children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(|&c| &self.nodes[c].record)
    }

    /// Records reachable from the root, breadth-first
    #[must_use]
    pub fn reachable(&self) -> Vec<&CommitRecord> {
        self.breadth_first()
            .into_iter()
            .map(|(i, _)| &self.nodes[i].record)
            .collect()
    }

    /// Breadth-first walk from the root as `(node, depth)` pairs
    ///
    /// Children are expanded in attachment order and every node is
    /// reported once, at its first visit.
    pub(crate) fn breadth_first(&self) -> Vec<(usize, usize)> {
        let mut visited = vec![false; self.nodes.len()];
        let mut queue = VecDeque::from([(self.root, 0usize)]);
        let mut walk = Vec::with_capacity(self.nodes.len());
        visited[self.root] = true;

        while let Some((node, depth)) = queue.pop_front() {
            walk.push((node, depth));
            for &child in &self.nodes[node].children {
                if !visited[child] {
                    visited[child] = true;
                    queue.push_back((child, depth + 1));
                }
            }
        }
        walk
    }

    pub(crate) fn clear_positions(&mut self) {
        for node in &mut self.nodes {
            node.position = None;
        }
        self.order.clear();
    }

    pub(crate) fn place(&mut self, node: usize, position: Position) {
        self.nodes[node].position = Some(position);
        self.order.push(node);
    }

    pub(crate) fn record_at(&self, node: usize) -> &CommitRecord {
        &self.nodes[node].record
    }

    /// Check whether a layout pass has run
    #[must_use]
    pub fn is_laid_out(&self) -> bool {
        !self.order.is_empty()
    }

    /// Position of a commit, if it has been placed
    #[must_use]
    pub fn position(&self, id: &str) -> Option<Position> {
        self.index.get(id).and_then(|&i| self.nodes[i].position)
    }

    /// Position of the root, if it has been placed
    #[must_use]
    pub fn root_position(&self) -> Option<Position> {
        self.nodes[self.root].position
    }

    /// Placed commits with their positions, in layout order
    pub fn placed(&self) -> impl Iterator<Item = (&CommitRecord, Position)> {
        self.order.iter().filter_map(|&i| {
            let node = &self.nodes[i];
            node.position.map(|p| (&node.record, p))
        })
    }

    /// Records that received no position in the last layout pass
    pub fn unplaced(&self) -> impl Iterator<Item = &CommitRecord> {
        self.nodes
            .iter()
            .filter(|n| n.position.is_none())
            .map(|n| &n.record)
    }

    /// Edges between placed commits, parents in layout order
    #[must_use]
    pub fn links(&self) -> Vec<Link> {
        let mut links = Vec::new();
        for &parent in &self.order {
            let Some(source) = self.nodes[parent].position else {
                continue;
            };
            for &child in &self.nodes[parent].children {
                if let Some(target) = self.nodes[child].position {
                    links.push(Link {
                        parent_id: self.nodes[parent].record.id.clone(),
                        child_id: self.nodes[child].record.id.clone(),
                        source,
                        target,
                    });
                }
            }
        }
        links
    }

    /// One branch head per (placed commit, ref name), in layout order
    #[must_use]
    pub fn branch_heads(&self) -> Vec<BranchHead> {
        let mut heads = Vec::new();
        for (record, position) in self.placed() {
            let total = record.branches.len();
            for (index, name) in record.branches.iter().enumerate() {
                heads.push(BranchHead {
                    branch_name: name.clone(),
                    commit_id: record.id.clone(),
                    x: position.x,
                    y: position.y,
                    index,
                    total,
                });
            }
        }
        heads
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_log;
    use similar_asserts::assert_eq;

    fn record(id: &str, parents: &[&str]) -> CommitRecord {
        CommitRecord {
            id: id.to_string(),
            message: format!("commit {id}"),
            author: "Test Author".to_string(),
            time: "1 hour ago".to_string(),
            branches: Vec::new(),
            parent_ids: parents.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn ids<'a>(records: impl IntoIterator<Item = &'a CommitRecord>) -> Vec<&'a str> {
        records.into_iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_build_links_children_to_parents() {
        let graph = CommitGraph::build(vec![
            record("1489311", &["6e5656a"]),
            record("6e5656a", &[]),
        ])
        .expect("Should build");

        assert_eq!(graph.root().id, "6e5656a");
        assert_eq!(ids(graph.children("6e5656a")), vec!["1489311"]);
        assert_eq!(graph.commit_count(), 2);
    }

    #[test]
    fn test_children_in_input_order() {
        let graph = CommitGraph::build(vec![
            record("ccccccc", &["aaaaaaa"]),
            record("bbbbbbb", &["aaaaaaa"]),
            record("aaaaaaa", &[]),
        ])
        .expect("Should build");
        assert_eq!(ids(graph.children("aaaaaaa")), vec!["ccccccc", "bbbbbbb"]);
    }

    #[test]
    fn test_merge_commit_is_child_of_both_parents() {
        let graph = CommitGraph::build(vec![
            record("ddddddd", &["bbbbbbb", "ccccccc"]),
            record("ccccccc", &["aaaaaaa"]),
            record("bbbbbbb", &["aaaaaaa"]),
            record("aaaaaaa", &[]),
        ])
        .expect("Should build");
        assert_eq!(ids(graph.children("bbbbbbb")), vec!["ddddddd"]);
        assert_eq!(ids(graph.children("ccccccc")), vec!["ddddddd"]);
        assert_eq!(graph.reachable().len(), 4);
    }

    #[test]
    fn test_dangling_parent_is_ignored() {
        let graph = CommitGraph::build(vec![
            record("bbbbbbb", &["aaaaaaa", "fffffff"]),
            record("aaaaaaa", &[]),
        ])
        .expect("Dangling parents are not errors");
        assert_eq!(ids(graph.children("aaaaaaa")), vec!["bbbbbbb"]);
        assert!(!graph.contains("fffffff"));
    }

    #[test]
    fn test_only_dangling_parents_leaves_node_unreachable() {
        let graph = CommitGraph::build(vec![
            record("bbbbbbb", &["fffffff"]),
            record("aaaaaaa", &[]),
        ])
        .expect("Should build");
        assert_eq!(ids(graph.reachable()), vec!["aaaaaaa"]);
    }

    #[test]
    fn test_no_root_is_an_error() {
        let result = CommitGraph::build(vec![
            record("bbbbbbb", &["aaaaaaa"]),
            record("aaaaaaa", &["bbbbbbb"]),
        ]);
        assert!(matches!(result, Err(GraphError::NoRoot)));
    }

    #[test]
    fn test_empty_records_have_no_root() {
        assert!(matches!(
            CommitGraph::build(Vec::new()),
            Err(GraphError::NoRoot)
        ));
    }

    #[test]
    fn test_multiple_roots_pick_first() {
        let graph = CommitGraph::build(vec![
            record("bbbbbbb", &[]),
            record("aaaaaaa", &[]),
        ])
        .expect("Should build");
        assert_eq!(graph.root().id, "bbbbbbb");
    }

    #[test]
    fn test_duplicate_id_keeps_first() {
        let mut second = record("aaaaaaa", &[]);
        second.message = "duplicate".to_string();
        let graph = CommitGraph::build(vec![record("aaaaaaa", &[]), second])
            .expect("Should build");
        assert_eq!(graph.commit_count(), 1);
        assert_eq!(graph.root().message, "commit aaaaaaa");
    }

    #[test]
    fn test_repeated_parent_attaches_once() {
        let graph = CommitGraph::build(vec![
            record("bbbbbbb", &["aaaaaaa", "aaaaaaa"]),
            record("aaaaaaa", &[]),
        ])
        .expect("Should build");
        assert_eq!(graph.children("aaaaaaa").count(), 1);
    }

    #[test]
    fn test_cycle_away_from_root_terminates() {
        let graph = CommitGraph::build(vec![
            record("ccccccc", &["bbbbbbb", "aaaaaaa"]),
            record("bbbbbbb", &["ccccccc"]),
            record("aaaaaaa", &[]),
        ])
        .expect("Should build");
        assert_eq!(ids(graph.reachable()), vec!["aaaaaaa", "ccccccc", "bbbbbbb"]);
    }

    #[test]
    fn test_unlaid_graph_has_no_positions() {
        let graph = CommitGraph::build(vec![record("aaaaaaa", &[])]).expect("Should build");
        assert!(!graph.is_laid_out());
        assert_eq!(graph.position("aaaaaaa"), None);
        assert!(graph.links().is_empty());
        assert!(graph.branch_heads().is_empty());
        assert_eq!(graph.unplaced().count(), 1);
    }

    #[test]
    fn test_label_offset_fans_symmetrically() {
        assert_eq!(label_offset(0, 1, 25.0), 0.0);
        assert_eq!(label_offset(0, 2, 25.0), 0.0);
        assert_eq!(label_offset(1, 2, 25.0), -25.0);
        assert_eq!(label_offset(0, 3, 25.0), 25.0);
        assert_eq!(label_offset(1, 3, 25.0), 0.0);
        assert_eq!(label_offset(2, 3, 25.0), -25.0);
        assert_eq!(label_offset(0, 4, 25.0), 25.0);
        assert_eq!(label_offset(3, 4, 25.0), -50.0);
    }

    #[test]
    fn test_link_key() {
        assert_eq!(Link::key_for("6e5656a", "1489311"), "6e5656a-1489311");
    }

    #[test]
    fn test_build_from_parsed_log() {
        let parsed = parse_log(
            "c10ff55 (wei) (23 minutes ago) (Merge branch 'branch-a')  (HEAD -> main, new_branch) [55a2428 b83fe92]
b83fe92 (wei) (25 minutes ago) (Merge branch 'branch-a-1' into branch-a)  (branch-a) [97e5ab2 9091626]
97e5ab2 (wei) (26 minutes ago) (feat: add txta)  [de5383e]
9091626 (wei) (27 minutes ago) (feat: add txta-1)  (branch-a-1) [de5383e]
55a2428 (wei) (43 minutes ago) (Merge branch 'branch-b')  [25998ce 397f1ce]
25998ce (wei) (45 minutes ago) (update: txt2:)  [e8499cf]
e8499cf (wei) (2 hours ago) (feat: delete txt)  [e43037a]
397f1ce (wei) (2 hours ago) (feat: completed a new feature)  (branch-b) [517ae00]
e43037a (wei) (2 hours ago) (feat: add txt3)  [2c29e88]
517ae00 (wei) (2 hours ago) (feat: do some change)  [2c29e88]
de5383e (wei) (2 hours ago) (feat: add some texts)  [2c29e88]
2c29e88 (wei) (2 hours ago) (feat: add txt2)  [9cf44f3]
9cf44f3 (wei) (2 hours ago) (feat: complete feature a)  (branch-1) [0f1d08b]
0f1d08b (wei) (2 hours ago) (init commit)  []",
        );
        assert!(parsed.is_clean());

        let graph = CommitGraph::build(parsed.records).expect("Should build");
        assert_eq!(graph.root().id, "0f1d08b");
        assert_eq!(graph.reachable().len(), 14);
        assert_eq!(
            ids(graph.children("2c29e88")),
            vec!["e43037a", "517ae00", "de5383e"]
        );
    }
}
