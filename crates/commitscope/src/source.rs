// Copyright (c) 2026 - present commitscope contributors
// SPDX-License-Identifier: MIT

//! Log sources
//!
//! A source produces one raw log text per fetch, one commit per line in the
//! format `<hash> (<author>) (<relative time>) (<subject>)  (<refs>) [<parents>]`.
//! The repository source renders that format directly from the object
//! database, so no `git` executable is needed.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::{Commit, Oid, Repository, Sort};
use thiserror::Error;
use tracing::debug;

/// Errors while fetching a log
#[derive(Debug, Error)]
pub enum SourceError {
    /// Git operation failed
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    /// No repository at or above the given path
    #[error("Repository not found: {path}")]
    RepositoryNotFound {
        /// The path that was searched from
        path: String,
    },

    /// Reading a log file or stdin failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can produce a raw commit log
pub trait LogSource: Send + Sync {
    /// Fetch the current log text
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the underlying repository or file cannot be read.
    fn fetch(&self) -> Result<String, SourceError>;
}

/// Reads history straight from a git repository
///
/// Every commit reachable from any ref or from `HEAD` is listed, newest
/// first. The repository is reopened on each fetch so new refs are seen.
#[derive(Debug, Clone)]
pub struct RepoLogSource {
    path: PathBuf,
}

impl RepoLogSource {
    /// Discover the repository containing `path`
    ///
    /// # Errors
    ///
    /// Returns `SourceError::RepositoryNotFound` if no repository is found.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let repo = discover(path)?;
        let root = repo
            .workdir()
            .unwrap_or_else(|| repo.path())
            .to_path_buf();
        debug!(path = %root.display(), "Opened repository");
        Ok(Self { path: root })
    }

    /// The repository's working directory (or git dir when bare)
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Render the log as of `now`
    ///
    /// # Errors
    ///
    /// Returns `SourceError` if the repository cannot be walked.
    pub fn fetch_at(&self, now: DateTime<Utc>) -> Result<String, SourceError> {
        let repo = discover(&self.path)?;
        let decorations = decorations(&repo)?;

        let mut revwalk = repo.revwalk()?;
        revwalk.set_sorting(Sort::TIME | Sort::TOPOLOGICAL)?;
        revwalk.push_glob("*")?;
        if let Ok(head) = repo.head() {
            if let Some(oid) = head.target() {
                revwalk.push(oid)?;
            }
        }

        let mut lines = Vec::new();
        for oid in revwalk {
            let commit = repo.find_commit(oid?)?;
            lines.push(format_line(&commit, decorations.get(&commit.id()), now)?);
        }

        debug!(commits = lines.len(), "Rendered repository log");
        Ok(lines.join("\n"))
    }
}

impl LogSource for RepoLogSource {
    fn fetch(&self) -> Result<String, SourceError> {
        self.fetch_at(Utc::now())
    }
}

fn discover(path: &Path) -> Result<Repository, SourceError> {
    Repository::discover(path).map_err(|_| SourceError::RepositoryNotFound {
        path: path.display().to_string(),
    })
}

/// Reads a log that was saved to a file, or stdin for `-`
#[derive(Debug, Clone)]
pub struct FileLogSource {
    path: PathBuf,
}

impl FileLogSource {
    /// Create a source for `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

impl LogSource for FileLogSource {
    fn fetch(&self) -> Result<String, SourceError> {
        if self.is_stdin() {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            return Ok(text);
        }
        Ok(std::fs::read_to_string(&self.path)?)
    }
}

/// Ref names grouped the way `git log --decorate` lists them
#[derive(Debug, Default)]
struct Decoration {
    head: Option<String>,
    local: Vec<String>,
    remote: Vec<String>,
    tags: Vec<String>,
}

impl Decoration {
    fn render(&self) -> String {
        let names: Vec<String> = self
            .head
            .iter()
            .cloned()
            .chain(self.local.iter().cloned())
            .chain(self.remote.iter().cloned())
            .chain(self.tags.iter().map(|t| format!("tag: {t}")))
            .collect();
        names.join(", ")
    }
}

fn decorations(repo: &Repository) -> Result<HashMap<Oid, Decoration>, SourceError> {
    let mut map: HashMap<Oid, Decoration> = HashMap::new();

    // Branch that HEAD points at, listed as `HEAD -> name` instead of twice
    let mut head_branch: Option<String> = None;
    if let Ok(head) = repo.head() {
        if let Ok(commit) = head.peel_to_commit() {
            let label = if repo.head_detached()? {
                "HEAD".to_string()
            } else {
                let name = head.shorthand().unwrap_or("HEAD").to_string();
                let label = format!("HEAD -> {name}");
                head_branch = head.name().map(str::to_string);
                label
            };
            map.entry(commit.id()).or_default().head = Some(label);
        }
    }

    for reference in repo.references()? {
        let reference = reference?;
        let (Some(name), Some(short)) = (reference.name(), reference.shorthand()) else {
            continue;
        };
        if head_branch.as_deref() == Some(name) {
            continue;
        }
        let Ok(commit) = reference.peel_to_commit() else {
            continue;
        };
        let entry = map.entry(commit.id()).or_default();
        if reference.is_branch() {
            entry.local.push(short.to_string());
        } else if reference.is_remote() {
            entry.remote.push(short.to_string());
        } else if reference.is_tag() {
            entry.tags.push(short.to_string());
        }
    }

    for decoration in map.values_mut() {
        decoration.local.sort();
        decoration.remote.sort();
        decoration.tags.sort();
    }
    Ok(map)
}

fn short_id(commit: &Commit<'_>) -> Result<String, SourceError> {
    let buf = commit.as_object().short_id()?;
    Ok(buf
        .as_str()
        .map_or_else(|| commit.id().to_string(), str::to_string))
}

fn format_line(
    commit: &Commit<'_>,
    decoration: Option<&Decoration>,
    now: DateTime<Utc>,
) -> Result<String, SourceError> {
    let author = commit.author();
    let when = DateTime::from_timestamp(commit.time().seconds(), 0).unwrap_or(now);
    let refs = decoration
        .map(Decoration::render)
        .filter(|r| !r.is_empty())
        .map(|r| format!(" ({r})"))
        .unwrap_or_default();
    let parents = commit
        .parents()
        .map(|p| short_id(&p))
        .collect::<Result<Vec<_>, _>>()?
        .join(" ");

    Ok(format!(
        "{} ({}) ({}) ({}) {} [{}]",
        short_id(commit)?,
        author.name().unwrap_or("Unknown"),
        relative_time(when, now),
        commit.summary().unwrap_or(""),
        refs,
        parents
    ))
}

fn plural(n: i64, unit: &str) -> String {
    if n == 1 {
        format!("{n} {unit}")
    } else {
        format!("{n} {unit}s")
    }
}

/// Describe `then` relative to `now` the way `git log --date=relative` does
///
/// Rounding follows git: seconds up to 90, minutes up to 90, hours up to 36,
/// days up to 14, weeks up to 70 days, months up to a year, then years
/// with an optional month remainder below five years.
#[must_use]
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 0 {
        return "in the future".to_string();
    }
    if seconds < 90 {
        return format!("{} ago", plural(seconds, "second"));
    }

    let minutes = (seconds + 30) / 60;
    if minutes < 90 {
        return format!("{} ago", plural(minutes, "minute"));
    }

    let hours = (minutes + 30) / 60;
    if hours < 36 {
        return format!("{} ago", plural(hours, "hour"));
    }

    let days = (hours + 12) / 24;
    if days < 14 {
        return format!("{} ago", plural(days, "day"));
    }
    if days < 70 {
        return format!("{} ago", plural((days + 3) / 7, "week"));
    }
    if days < 365 {
        return format!("{} ago", plural((days + 15) / 30, "month"));
    }

    if days < 1825 {
        let total_months = (days * 12 * 2 + 365) / (365 * 2);
        let years = total_months / 12;
        let months = total_months % 12;
        return if months > 0 {
            format!("{}, {} ago", plural(years, "year"), plural(months, "month"))
        } else {
            format!("{} ago", plural(years, "year"))
        };
    }

    format!("{} ago", plural((days + 183) / 365, "year"))
}
