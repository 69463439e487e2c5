//! On-disk state: article records, the used-topic history, and the activity log.
//!
//! ```text
//! articles/2025-03-05_islay-entdecken.json   # one pretty-printed ArticleRecord each
//! used_topics.json                          # [{ "title": ..., "date": ... }, ...]
//! magazin.log                               # [2025-03-05 09:12:44] GENERATED | Islay entdecken
//! ```
//!
//! Article files are named `{date}_{slug}.json`, so reverse file-name order
//! is newest first. That order is what the site builder shows.

use crate::generator::FALLBACK_SLUG;
use crate::types::{ArticleRecord, UsedTopicRecord};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

// ============================================================================
// Articles
// ============================================================================

#[derive(Debug, Clone)]
pub struct ArticleStore {
    dir: PathBuf,
}

impl ArticleStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File name a record is stored under.
    pub fn file_name(record: &ArticleRecord) -> String {
        let slug = record.slug().unwrap_or(FALLBACK_SLUG);
        format!("{}_{}.json", record.date, slug)
    }

    /// Write `record` as pretty JSON, creating the directory if needed.
    pub fn save(&self, record: &ArticleRecord) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(Self::file_name(record));
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// All readable records, newest file name first.
    ///
    /// A missing directory is an empty store. Files that fail to parse are
    /// skipped with a warning.
    pub fn load_all(&self) -> Result<Vec<ArticleRecord>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.dir).min_depth(1).max_depth(1) {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "json") {
                paths.push(path.to_path_buf());
            }
        }
        paths.sort_by(|a, b| b.file_name().cmp(&a.file_name()));

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            match read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping {}: {e}", path.display()),
            }
        }
        Ok(records)
    }
}

fn read_record(path: &Path) -> Result<ArticleRecord, StoreError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

// ============================================================================
// Used topics
// ============================================================================

/// Persisted history of consumed topics.
#[derive(Debug, Clone)]
pub struct UsedTopicsLog {
    path: PathBuf,
}

impl UsedTopicsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The history in insertion order. A missing file is an empty history.
    pub fn load(&self) -> Result<Vec<UsedTopicRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Append one entry and rewrite the file.
    pub fn record(&self, title: &str, timestamp: &str) -> Result<(), StoreError> {
        let mut history = self.load()?;
        history.push(UsedTopicRecord {
            title: title.to_string(),
            date: timestamp.to_string(),
        });
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&history)?)?;
        Ok(())
    }
}

// ============================================================================
// Activity log
// ============================================================================

/// Append-only `magazin.log`.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append `[timestamp] ACTION | details`. Empty details drop the separator.
    pub fn append(&self, timestamp: &str, action: &str, details: &str) -> Result<(), StoreError> {
        let mut line = format!("[{timestamp}] {action}");
        if !details.is_empty() {
            line.push_str(" | ");
            line.push_str(details);
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Lines mentioning `ERROR`. A missing log counts zero.
    pub fn error_count(&self) -> Result<usize, StoreError> {
        if !self.path.exists() {
            return Ok(0);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(content.lines().filter(|l| l.contains("ERROR")).count())
    }
}
