//! Persistence Log
//!
//! Append-only record of questionnaire results, stored as one pretty-printed
//! JSON array in a single file.
//!
//! # Semantics
//!
//! - `append` reads the whole log, pushes one entry and rewrites the file.
//! - `read_all` never fails: a missing, unreadable or corrupt file is an
//!   empty history.
//! - Entries of a kind this build does not know are kept verbatim on
//!   rewrite and surfaced as [`HistoryRecord::Unknown`].
//!
//! A single writer is assumed; there is no locking.
//!
//! # File Format
//!
//! ```json
//! [
//!   {"ts": "2026-10-18T09:12:44.123456", "type": "WHO5", "raw": 15, "percent": 60, "answers": [3, 3, 3, 3, 3]},
//!   {"ts": "2026-10-18T09:15:02Z", "type": "Mood", "answers": {"Happiness": 3, "Calmness": 4, "Energy": 2, "Freshness": 5, "Enjoyment": 1}}
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::questionnaire::{MoodRatings, Who5Score};

/// File name of the log inside the data directory
pub const HISTORY_FILE_NAME: &str = "mood_history.json";

/// Number of entries shown by history views
pub const DEFAULT_RECENT_LIMIT: usize = 50;

/// Errors that can occur when writing the log
#[derive(Debug, Error)]
pub enum HistoryError {
    /// Filesystem failure
    #[error("Failed to write history file at {path}: {source}")]
    Io {
        /// The path being written
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Entry could not be encoded
    #[error("Failed to encode history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The kind-specific part of an entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HistoryRecord {
    /// WHO-5 submission
    #[serde(rename = "WHO5")]
    Who5 {
        /// Raw score 0–25
        raw: u8,
        /// Percent 0–100
        percent: u8,
        /// The five answers
        answers: [u8; 5],
    },
    /// Mood tracker submission
    Mood {
        /// The five ratings
        answers: MoodRatings,
    },
    /// Entry written by something else; kept as-is
    ///
    /// Never encoded on its own: [`HistoryEntry`] writes `body` back instead.
    #[serde(skip)]
    Unknown {
        /// Value of the `type` field, if any
        kind: String,
        /// The full original entry
        body: serde_json::Value,
    },
}

/// One immutable log entry
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoryEntry {
    /// ISO-8601 timestamp
    pub ts: String,
    /// Kind and payload
    #[serde(flatten)]
    pub record: HistoryRecord,
}

impl Serialize for HistoryEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Known<'a> {
            ts: &'a str,
            #[serde(flatten)]
            record: &'a HistoryRecord,
        }

        match &self.record {
            HistoryRecord::Unknown { body, .. } => body.serialize(serializer),
            record => Known {
                ts: &self.ts,
                record,
            }
            .serialize(serializer),
        }
    }
}

impl HistoryEntry {
    /// WHO-5 entry stamped now
    #[must_use]
    pub fn who5(score: &Who5Score) -> Self {
        let ts = chrono::Utc::now()
            .naive_utc()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string();
        Self::who5_at(ts, score)
    }

    /// WHO-5 entry with an explicit timestamp
    pub fn who5_at(ts: impl Into<String>, score: &Who5Score) -> Self {
        Self {
            ts: ts.into(),
            record: HistoryRecord::Who5 {
                raw: score.raw,
                percent: score.percent,
                answers: score.answers,
            },
        }
    }

    /// Mood entry stamped now
    #[must_use]
    pub fn mood(ratings: MoodRatings) -> Self {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
        Self::mood_at(ts, ratings)
    }

    /// Mood entry with an explicit timestamp
    pub fn mood_at(ts: impl Into<String>, ratings: MoodRatings) -> Self {
        Self {
            ts: ts.into(),
            record: HistoryRecord::Mood { answers: ratings },
        }
    }

    /// Decode a raw JSON entry, falling back to [`HistoryRecord::Unknown`]
    #[must_use]
    pub fn from_value(value: &serde_json::Value) -> Self {
        if let Ok(entry) = Self::deserialize(value) {
            return entry;
        }

        let field = |name: &str| {
            value
                .get(name)
                .and_then(serde_json::Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self {
            ts: field("ts"),
            record: HistoryRecord::Unknown {
                kind: field("type"),
                body: value.clone(),
            },
        }
    }

    /// Kind label
    #[must_use]
    pub fn kind(&self) -> &str {
        match &self.record {
            HistoryRecord::Who5 { .. } => "WHO5",
            HistoryRecord::Mood { .. } => "Mood",
            HistoryRecord::Unknown { kind, .. } => kind,
        }
    }

    /// One-line rendering for history listings
    #[must_use]
    pub fn summary(&self) -> String {
        match &self.record {
            HistoryRecord::Who5 { percent, .. } => {
                format!("WHO-5 @ {}: score {} /100", self.ts, percent)
            }
            HistoryRecord::Mood { answers } => {
                format!("Mood @ {}: {}", self.ts, answers.summary())
            }
            HistoryRecord::Unknown { kind, body } => format!("{} @ {}: {}", kind, self.ts, body),
        }
    }
}

/// File-backed append-only log
#[derive(Clone, Debug)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    /// Log stored at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location: `$XDG_DATA_HOME/wellness-companion/mood_history.json`,
    /// or the working directory when no data directory is known
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .map(|p| p.join("wellness-companion").join(HISTORY_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(HISTORY_FILE_NAME))
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the raw JSON entries, empty on any failure
    async fn read_values(&self) -> Vec<serde_json::Value> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No history file yet");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Unreadable history file");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<serde_json::Value>>(&content) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Corrupt history file, treating as empty"
                );
                Vec::new()
            }
        }
    }

    /// Every entry in append order
    pub async fn read_all(&self) -> Vec<HistoryEntry> {
        self.read_values()
            .await
            .iter()
            .map(HistoryEntry::from_value)
            .collect()
    }

    /// The newest `limit` entries, newest first
    pub async fn recent(&self, limit: usize) -> Vec<HistoryEntry> {
        let all = self.read_all().await;
        let start = all.len().saturating_sub(limit);
        all[start..].iter().rev().cloned().collect()
    }

    /// Append one entry and rewrite the file
    ///
    /// Returns the number of entries in the log afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be encoded or the file cannot be
    /// written. The previous file content is left in place on failure.
    pub async fn append(&self, entry: &HistoryEntry) -> Result<usize, HistoryError> {
        let mut values = self.read_values().await;
        values.push(serde_json::to_value(entry)?);
        let content = serde_json::to_string_pretty(&values)?;

        let io_err = |source| HistoryError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await.map_err(io_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(io_err)?;

        tracing::debug!(
            path = %self.path.display(),
            kind = entry.kind(),
            total = values.len(),
            "Appended history entry"
        );

        Ok(values.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::questionnaire::score_who5;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn temp_log() -> (TempDir, HistoryLog) {
        let dir = TempDir::new().unwrap();
        let log = HistoryLog::new(dir.path().join("history.json"));
        (dir, log)
    }

    #[test]
    fn test_who5_entry_json_shape() {
        let score = score_who5([3, 3, 3, 3, 3]).unwrap();
        let entry = HistoryEntry::who5_at("2026-10-18T09:00:00.000000", &score);
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"ts":"2026-10-18T09:00:00.000000","type":"WHO5","raw":15,"percent":60,"answers":[3,3,3,3,3]}"#
        );
    }

    #[test]
    fn test_mood_entry_json_shape() {
        let entry = HistoryEntry::mood_at(
            "2026-10-18T09:00:00Z",
            MoodRatings::from_array([3, 4, 2, 5, 1]),
        );
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(
            json,
            r#"{"ts":"2026-10-18T09:00:00Z","type":"Mood","answers":{"Happiness":3,"Calmness":4,"Energy":2,"Freshness":5,"Enjoyment":1}}"#
        );
    }

    #[test]
    fn test_timestamps_are_iso8601() {
        let score = score_who5([1, 1, 1, 1, 1]).unwrap();
        let who5 = HistoryEntry::who5(&score);
        assert!(chrono::NaiveDateTime::parse_from_str(&who5.ts, "%Y-%m-%dT%H:%M:%S%.f").is_ok());

        let mood = HistoryEntry::mood(MoodRatings::default());
        assert!(mood.ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&mood.ts).is_ok());
    }

    #[test]
    fn test_unknown_entry_is_preserved() {
        let value = serde_json::json!({"ts": "t", "type": "Journal", "text": "hi"});
        let entry = HistoryEntry::from_value(&value);
        assert_eq!(entry.kind(), "Journal");
        assert_eq!(entry.ts, "t");
        assert!(entry.summary().starts_with("Journal @ t: "));
    }

    #[test]
    fn test_unknown_entry_encodes_as_original_body() {
        let value = serde_json::json!({"ts": "t", "type": "Journal", "text": "hi", "tags": [1, 2]});
        let entry = HistoryEntry::from_value(&value);
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let (_dir, log) = temp_log();
        assert!(log.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_empty() {
        let (_dir, log) = temp_log();
        tokio::fs::write(log.path(), "{not json").await.unwrap();
        assert!(log.read_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_append_then_read_in_order() {
        let (_dir, log) = temp_log();
        for i in 0..4u8 {
            let score = score_who5([i, 0, 0, 0, 0]).unwrap();
            let total = log
                .append(&HistoryEntry::who5_at(format!("t{i}"), &score))
                .await
                .unwrap();
            assert_eq!(total, usize::from(i) + 1);
        }

        let all = log.read_all().await;
        let stamps: Vec<_> = all.iter().map(|e| e.ts.as_str()).collect();
        assert_eq!(stamps, vec!["t0", "t1", "t2", "t3"]);
    }

    #[tokio::test]
    async fn test_append_creates_parent_dirs_and_pretty_prints() {
        let dir = TempDir::new().unwrap();
        let log = HistoryLog::new(dir.path().join("nested").join("deeper").join("h.json"));
        log.append(&HistoryEntry::mood_at("t", MoodRatings::default()))
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(content.starts_with("[\n  {"));
        assert!(!log.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_append_keeps_unknown_entries() {
        let (_dir, log) = temp_log();
        tokio::fs::write(log.path(), r#"[{"ts": "old", "type": "Journal", "text": "kept"}]"#)
            .await
            .unwrap();

        log.append(&HistoryEntry::mood_at("new", MoodRatings::default()))
            .await
            .unwrap();

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        assert!(content.contains("\"kept\""));
        assert_eq!(log.read_all().await.len(), 2);
    }

    #[tokio::test]
    async fn test_recent_is_newest_first_and_bounded() {
        let (_dir, log) = temp_log();
        for i in 0..5 {
            log.append(&HistoryEntry::mood_at(format!("t{i}"), MoodRatings::default()))
                .await
                .unwrap();
        }

        let recent = log.recent(3).await;
        let stamps: Vec<_> = recent.iter().map(|e| e.ts.as_str()).collect();
        assert_eq!(stamps, vec!["t4", "t3", "t2"]);
        assert_eq!(log.recent(50).await.len(), 5);
    }
}
