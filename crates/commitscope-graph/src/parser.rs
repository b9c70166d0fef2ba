// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Commit log line parsing
//!
//! Parses the output of
//! `git log --all --format=format:'%h (%an) (%ar) (%s) %d [%p]'`,
//! one commit per line:
//!
//! ```text
//! 1489311 (jimmyhealer) (7 seconds ago) (Add feature file)  (feature) [6e5656a]
//! 6e5656a (jimmyhealer) (7 seconds ago) (Initial commit)  []
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::commit::{CommitRecord, MAX_HASH_LEN, MIN_HASH_LEN};
use crate::error::ParseError;

/// Separator git uses inside a decoration for a symbolic ref
const SYMREF_ARROW: &str = "->";

fn line_regex() -> &'static Regex {
    // The message is matched lazily so subjects containing parentheses
    // still leave the optional ref group and the parent list to the tail.
    static LOG_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(&format!(
            r"^(?P<id>[0-9a-f]{{{MIN_HASH_LEN},{MAX_HASH_LEN}}}) \((?P<author>[^)]+)\) \((?P<time>[^)]+)\) \((?P<message>.*?)\) +(?:\((?P<refs>[^()]*)\) +)?\[(?P<parents>[^\]]*)\]$",
        ))
        .expect("log line regex is valid")
    });
    &LOG_LINE_REGEX
}

/// Result of parsing a whole log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedLog {
    /// Records for every line that matched, in input order
    pub records: Vec<CommitRecord>,
    /// Lines that did not match, in input order
    pub errors: Vec<ParseError>,
}

impl ParsedLog {
    /// Check whether every non-blank line parsed
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a single log line
///
/// Surrounding whitespace (including a trailing `\r`) is ignored.
///
/// # Errors
///
/// Returns a [`ParseError`] with `line_number` 1 if the line does not match
/// the commit line grammar. [`parse_log`] fills in real line numbers.
pub fn parse_line(line: &str) -> Result<CommitRecord, ParseError> {
    let trimmed = line.trim();
    let caps = line_regex().captures(trimmed).ok_or_else(|| ParseError {
        line_number: 1,
        line: line.to_string(),
    })?;

    let field = |name: &str| caps.name(name).map_or("", |m| m.as_str());

    Ok(CommitRecord {
        id: field("id").to_string(),
        author: field("author").to_string(),
        time: field("time").to_string(),
        message: field("message").to_string(),
        branches: split_refs(field("refs")),
        parent_ids: field("parents")
            .split_whitespace()
            .map(str::to_string)
            .collect(),
    })
}

/// Parse a complete log, skipping blank lines
///
/// A line that fails to parse is reported in [`ParsedLog::errors`] and does
/// not stop the remaining lines from being parsed.
#[must_use]
pub fn parse_log(text: &str) -> ParsedLog {
    let mut parsed = ParsedLog::default();

    for (idx, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) => parsed.records.push(record),
            Err(mut err) => {
                err.line_number = idx + 1;
                parsed.errors.push(err);
            }
        }
    }

    debug!(
        records = parsed.records.len(),
        skipped = parsed.errors.len(),
        "Parsed commit log"
    );
    parsed
}

/// Split a decoration list into individual ref names
///
/// `"HEAD -> main, feature"` becomes `["HEAD", "main", "feature"]`.
/// Duplicates are dropped, first occurrence wins.
#[must_use]
pub fn split_refs(raw: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for entry in raw.split(',') {
        for name in entry.split(SYMREF_ARROW).map(str::trim) {
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use similar_asserts::assert_eq;

    const FEATURE_LINE: &str =
        "1489311 (jimmyhealer) (7 seconds ago) (Add feature file)  (feature) [6e5656a]";
    const ROOT_LINE: &str = "6e5656a (jimmyhealer) (7 seconds ago) (Initial commit)  []";

    #[test]
    fn test_parse_line_with_refs_and_parent() {
        let record = parse_line(FEATURE_LINE).expect("Should parse");
        assert_eq!(record.id, "1489311");
        assert_eq!(record.author, "jimmyhealer");
        assert_eq!(record.time, "7 seconds ago");
        assert_eq!(record.message, "Add feature file");
        assert_eq!(record.branches, vec!["feature"]);
        assert_eq!(record.parent_ids, vec!["6e5656a"]);
    }

    #[test]
    fn test_parse_root_line() {
        let record = parse_line(ROOT_LINE).expect("Should parse");
        assert_eq!(record.id, "6e5656a");
        assert!(record.branches.is_empty());
        assert!(record.parent_ids.is_empty());
        assert!(record.is_root());
    }

    #[test]
    fn test_parse_symbolic_ref_expands_to_both_names() {
        let line = "1489311 (jimmyhealer) (18 seconds ago) (Add feature file)  (HEAD -> main, feature) [6e5656a]";
        let record = parse_line(line).expect("Should parse");
        assert_eq!(record.branches, vec!["HEAD", "main", "feature"]);
    }

    #[test]
    fn test_parse_merge_parents_keep_order() {
        let line = "c10ff55 (wei) (23 minutes ago) (Merge branch 'branch-a')  (HEAD -> main, new_branch) [55a2428 b83fe92]";
        let record = parse_line(line).expect("Should parse");
        assert_eq!(record.parent_ids, vec!["55a2428", "b83fe92"]);
        assert!(record.is_merge());
        assert_eq!(record.message, "Merge branch 'branch-a'");
    }

    #[test]
    fn test_parse_message_with_parentheses() {
        let line = "2c29e88 (wei) (2 hours ago) (feat(core): add txt2 (draft))  (branch-1) [9cf44f3]";
        let record = parse_line(line).expect("Should parse");
        assert_eq!(record.message, "feat(core): add txt2 (draft)");
        assert_eq!(record.branches, vec!["branch-1"]);
        assert_eq!(record.parent_ids, vec!["9cf44f3"]);
    }

    #[test]
    fn test_parse_single_space_separators() {
        let line = "1489311 (a) (1 day ago) (msg) (feature) [6e5656a]";
        let record = parse_line(line).expect("Should parse");
        assert_eq!(record.branches, vec!["feature"]);
        assert_eq!(record.parent_ids, vec!["6e5656a"]);
    }

    #[test]
    fn test_parse_tag_decoration() {
        let line = "1489311 (a) (1 day ago) (Release)  (tag: v1.0, origin/main) [6e5656a]";
        let record = parse_line(line).expect("Should parse");
        assert_eq!(record.branches, vec!["tag: v1.0", "origin/main"]);
    }

    #[test]
    fn test_parse_trailing_carriage_return() {
        let record = parse_line(&format!("{ROOT_LINE}\r")).expect("Should parse");
        assert_eq!(record.id, "6e5656a");
    }

    #[test]
    fn test_parse_missing_closing_bracket() {
        let line = "1489311 (jimmyhealer) (7 seconds ago) (Add feature file)  (feature) [6e5656a";
        let err = parse_line(line).expect_err("Should not parse");
        assert_eq!(err.line, line);
    }

    #[test]
    fn test_parse_rejects_non_hex_hash() {
        assert!(parse_line("zzzzzzz (a) (now) (msg)  []").is_err());
    }

    #[test]
    fn test_parse_hash_length_matches_hash_rules() {
        for len in [MIN_HASH_LEN - 1, MIN_HASH_LEN, 12, MAX_HASH_LEN, MAX_HASH_LEN + 1] {
            let hash = "a".repeat(len);
            let parsed = parse_line(&format!("{hash} (a) (now) (msg)  []"));
            assert_eq!(
                parsed.is_ok(),
                CommitRecord::is_valid_hash(&hash),
                "hash length {len}"
            );
        }
    }

    #[test]
    fn test_parse_rejects_missing_message_group() {
        assert!(parse_line("6e5656a (a) (now)  []").is_err());
    }

    #[test]
    fn test_parse_log_continues_past_bad_line() {
        let mut lines: Vec<String> = (0..9)
            .map(|i| format!("{:07x} (a) ({i} hours ago) (commit {i})  [{:07x}]", i + 1, i))
            .collect();
        lines.insert(4, "0000010 (a) (now) (broken)  [0000001".to_string());
        let text = lines.join("\n");

        let parsed = parse_log(&text);
        assert_eq!(parsed.records.len(), 9);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].line_number, 5);
        assert!(!parsed.is_clean());
    }

    #[test]
    fn test_parse_log_skips_blank_lines() {
        let text = format!("\n{FEATURE_LINE}\n\n{ROOT_LINE}\n");
        let parsed = parse_log(&text);
        assert!(parsed.is_clean());
        let ids: Vec<&str> = parsed.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1489311", "6e5656a"]);
    }

    #[test]
    fn test_parse_empty_log() {
        let parsed = parse_log("");
        assert!(parsed.records.is_empty());
        assert!(parsed.is_clean());
    }

    #[test]
    fn test_split_refs() {
        assert_eq!(split_refs(""), Vec::<String>::new());
        assert_eq!(split_refs("feature"), vec!["feature"]);
        assert_eq!(split_refs("HEAD -> main"), vec!["HEAD", "main"]);
        assert_eq!(
            split_refs(" HEAD -> main ,  feature,main "),
            vec!["HEAD", "main", "feature"]
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn ref_name() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9_/-]{0,12}"
    }

    proptest! {
        /// Property: every field of a well-formed line is recovered, order preserved
        #[test]
        fn prop_parse_recovers_fields(
            id in "[0-9a-f]{7}",
            author in "[A-Za-z][A-Za-z ]{0,20}[A-Za-z]",
            time in "[1-9][0-9]? (seconds|minutes|hours|days) ago",
            message in "[A-Za-z0-9 :'_-]{0,40}",
            branches in proptest::collection::vec(ref_name(), 0..4),
            parents in proptest::collection::vec("[0-9a-f]{7}", 0..3),
        ) {
            let mut unique_branches: Vec<String> = Vec::new();
            for b in branches {
                if !unique_branches.contains(&b) {
                    unique_branches.push(b);
                }
            }
            let refs = if unique_branches.is_empty() {
                String::new()
            } else {
                format!(" ({})", unique_branches.join(", "))
            };
            let line = format!(
                "{id} ({author}) ({time}) ({message}) {refs} [{}]",
                parents.join(" ")
            );

            let record = parse_line(&line).expect("well-formed line parses");
            prop_assert_eq!(record.id, id);
            prop_assert_eq!(record.author, author);
            prop_assert_eq!(record.time, time);
            prop_assert_eq!(record.message, message);
            prop_assert_eq!(record.branches, unique_branches);
            prop_assert_eq!(record.parent_ids, parents);
        }

        /// Property: a symbolic ref always yields both names in order
        #[test]
        fn prop_symref_yields_both_names(a in ref_name(), b in ref_name()) {
            prop_assume!(a != b);
            let names = split_refs(&format!("{a} -> {b}"));
            prop_assert_eq!(names, vec![a, b]);
        }

        /// Property: parse_log never panics and accounts for every non-blank line
        #[test]
        fn prop_parse_log_accounts_for_lines(text in ".{0,200}") {
            let parsed = parse_log(&text);
            let non_blank = text.lines().filter(|l| !l.trim().is_empty()).count();
            prop_assert_eq!(parsed.records.len() + parsed.errors.len(), non_blank);
        }
    }
}
