// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Snapshot history
//!
//! Keeps every distinct raw log that has been fetched, in arrival order.
//! A fetch that differs from the latest snapshot only in its relative-time
//! strings is not a new snapshot.

use tracing::debug;

use crate::parser::{ParsedLog, parse_line, parse_log};

/// One captured log text, immutable once stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    text: String,
}

impl Snapshot {
    /// Wrap a raw log text
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw log text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Parse the snapshot into commit records
    #[must_use]
    pub fn parse(&self) -> ParsedLog {
        parse_log(&self.text)
    }

    /// Compare two snapshots on everything but relative times
    ///
    /// Non-blank lines are compared pairwise. Lines that parse are compared
    /// field by field without `time`; lines that do not parse on both sides
    /// must match exactly; a line that parses on only one side differs.
    #[must_use]
    pub fn same_ignoring_time(&self, other: &Self) -> bool {
        let ours: Vec<&str> = non_blank_lines(&self.text).collect();
        let theirs: Vec<&str> = non_blank_lines(&other.text).collect();
        if ours.len() != theirs.len() {
            return false;
        }

        ours.iter()
            .zip(&theirs)
            .all(|(a, b)| match (parse_line(a), parse_line(b)) {
                (Ok(a), Ok(b)) => a.same_ignoring_time(&b),
                (Err(_), Err(_)) => a.trim() == b.trim(),
                _ => false,
            })
    }
}

impl AsRef<str> for Snapshot {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|l| !l.trim().is_empty())
}

/// Append-only list of distinct snapshots
#[derive(Debug, Clone, Default)]
pub struct HistoryBuffer {
    snapshots: Vec<Snapshot>,
}

impl HistoryBuffer {
    /// Create an empty buffer
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a raw log unless it only differs from the latest in its times
    ///
    /// Returns `true` if the snapshot was appended.
    pub fn add(&mut self, raw: impl Into<String>) -> bool {
        let snapshot = Snapshot::new(raw);
        if let Some(latest) = self.snapshots.last() {
            if latest.same_ignoring_time(&snapshot) {
                debug!(
                    snapshots = self.snapshots.len(),
                    "Log unchanged apart from relative times, skipping"
                );
                return false;
            }
        }
        self.snapshots.push(snapshot);
        debug!(snapshots = self.snapshots.len(), "Stored new log snapshot");
        true
    }

    /// The most recent snapshot
    #[must_use]
    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.last()
    }

    /// The previous and current snapshots
    ///
    /// With a single snapshot both elements are that snapshot, so the first
    /// render diffs the graph against itself.
    #[must_use]
    pub fn latest_pair(&self) -> Option<(&Snapshot, &Snapshot)> {
        match self.snapshots.as_slice() {
            [] => None,
            [only] => Some((only, only)),
            [.., previous, current] => Some((previous, current)),
        }
    }

    /// Number of stored snapshots
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Check whether nothing has been stored yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Stored snapshots, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn log_with_times(times: &[String]) -> String {
        times
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let parents = if i + 1 == times.len() {
                    String::new()
                } else {
                    format!("{:07x}", i + 2)
                };
                format!("{:07x} (dev) ({t}) (commit {i})  [{parents}]", i + 1)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    proptest! {
        /// Property: two logs differing only in relative times deduplicate
        #[test]
        fn prop_time_only_changes_deduplicate(
            pairs in proptest::collection::vec(
                ("[1-9][0-9]? (seconds|minutes|hours) ago", "[1-9][0-9]? (days|weeks) ago"),
                1..10,
            )
        ) {
            let (before, after): (Vec<String>, Vec<String>) = pairs.into_iter().unzip();
            let mut history = HistoryBuffer::new();
            prop_assert!(history.add(log_with_times(&before)));
            prop_assert!(!history.add(log_with_times(&after)));
            prop_assert_eq!(history.len(), 1);
        }
    }
}
