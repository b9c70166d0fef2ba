//! Commit record types

use serde::{Deserialize, Serialize};

/// Shortest abbreviated hash git will print for `%h`
pub const MIN_HASH_LEN: usize = 4;

/// Length of a full SHA-1 object id
pub const MAX_HASH_LEN: usize = 40;

/// One commit parsed from a single log line
///
/// Children and coordinates are not part of the record: both are derived
/// and owned by [`CommitGraph`](crate::graph::CommitGraph).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Abbreviated commit hash, unique within one snapshot
    pub id: String,
    /// Commit subject
    pub message: String,
    /// Author name
    pub author: String,
    /// Relative time as printed by git ("7 seconds ago"), display only
    pub time: String,
    /// Ref names pointing at this commit, in log order
    pub branches: Vec<String>,
    /// Parent hashes, in log order
    pub parent_ids: Vec<String>,
}

impl CommitRecord {
    /// Validate that a string is an abbreviated or full lowercase hex hash
    #[must_use]
    pub fn is_valid_hash(hash: &str) -> bool {
        (MIN_HASH_LEN..=MAX_HASH_LEN).contains(&hash.len())
            && hash.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    /// Check if this is a merge commit (has multiple parents)
    #[must_use]
    pub fn is_merge(&self) -> bool {
        self.parent_ids.len() > 1
    }

    /// Check if this is a root commit (has no parents)
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_ids.is_empty()
    }

    /// Compare two records on every field except the relative time
    ///
    /// Relative-time strings change on every poll, so two fetches of an
    /// unchanged repository differ only there.
    #[must_use]
    pub fn same_ignoring_time(&self, other: &Self) -> bool {
        self.id == other.id
            && self.author == other.author
            && self.message == other.message
            && self.branches == other.branches
            && self.parent_ids == other.parent_ids
    }
}
