//! Filesystem artifact store.
//!
//! Owns no in-memory state: it builds paths from the [`Layout`] and performs
//! durable reads and writes. Exports use `<purpose>_<YYYY-MM-DD>.<ext>` names,
//! so a second run on the same day overwrites the first.
//!
//! Raw text artifacts are named `<prefix><YYYYMMDDTHHMMSS>.txt`. Every field is
//! fixed-width and zero-padded, which makes lexicographic order equal to
//! chronological order; `find_latest_raw_text` relies on that.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::Layout;
use crate::domain::RawText;
use crate::error::{PipelineError, Result};

/// Date-stamped artifact name: `<purpose>_<YYYY-MM-DD>.<ext>`.
pub fn dated_name(purpose: &str, date: NaiveDate, ext: &str) -> String {
    format!("{}_{}.{}", purpose, date.format("%Y-%m-%d"), ext)
}

/// Raw text artifact name for `timestamp`.
pub fn raw_text_name(prefix: &str, timestamp: NaiveDateTime) -> String {
    format!("{}{}.txt", prefix, timestamp.format("%Y%m%dT%H%M%S"))
}

/// Path construction and durable I/O over a fixed directory layout.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    layout: Layout,
    raw_text_prefix: String,
}

impl ArtifactStore {
    pub fn new(layout: Layout, raw_text_prefix: impl Into<String>) -> Self {
        Self {
            layout,
            raw_text_prefix: raw_text_prefix.into(),
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Create every managed directory. Succeeds if they already exist.
    pub fn ensure_layout(&self) -> Result<()> {
        for dir in self.layout.managed_dirs() {
            fs::create_dir_all(dir).map_err(|e| PipelineError::storage(dir, e))?;
        }
        Ok(())
    }

    /// Load the lexicographically last raw text artifact.
    pub fn find_latest_raw_text(&self) -> Result<RawText> {
        let dir = &self.layout.raw_text;
        let not_found = || PipelineError::NotFound {
            dir: dir.clone(),
            prefix: self.raw_text_prefix.clone(),
        };

        let entries = match fs::read_dir(dir) {
            Ok(rd) => rd,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
            Err(e) => return Err(PipelineError::storage(dir, e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| PipelineError::storage(dir, e))?;
            let is_file = entry
                .file_type()
                .map_err(|e| PipelineError::storage(entry.path(), e))?
                .is_file();
            if !is_file {
                continue;
            }
            // Non-UTF-8 names can never match the prefix.
            if let Ok(name) = entry.file_name().into_string() {
                if name.starts_with(&self.raw_text_prefix) {
                    names.push(name);
                }
            }
        }

        names.sort();
        let latest = names.pop().ok_or_else(not_found)?;
        let path = dir.join(&latest);
        let content = fs::read_to_string(&path).map_err(|e| PipelineError::storage(&path, e))?;

        Ok(RawText::new(latest, content))
    }

    /// Write `content` to `dir/name`, replacing any existing file.
    ///
    /// The handle is dropped on every exit path. A failed write leaves whatever
    /// reached the disk; nothing is rolled back or retried.
    pub fn write_artifact(&self, dir: &Path, name: &str, content: &[u8]) -> Result<PathBuf> {
        let path = dir.join(name);
        let file = File::create(&path).map_err(|e| PipelineError::storage(&path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(content)
            .and_then(|()| writer.flush())
            .map_err(|e| PipelineError::storage(&path, e))?;
        Ok(path)
    }

    /// Serialize `value` as 2-space indented JSON into `dir/name`.
    pub fn write_json<T: Serialize + ?Sized>(
        &self,
        dir: &Path,
        name: &str,
        value: &T,
    ) -> Result<PathBuf> {
        let json = serde_json::to_vec_pretty(value)?;
        self.write_artifact(dir, name, &json)
    }

    /// Read a JSON artifact back.
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let bytes = fs::read(path).map_err(|e| PipelineError::storage(path, e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Store text as a new raw text artifact stamped with `timestamp`.
    pub fn ingest_raw_text(&self, content: &str, timestamp: NaiveDateTime) -> Result<PathBuf> {
        let dir = &self.layout.raw_text;
        fs::create_dir_all(dir).map_err(|e| PipelineError::storage(dir, e))?;
        let name = raw_text_name(&self.raw_text_prefix, timestamp);
        self.write_artifact(dir, &name, content.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, ArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(Layout::new(dir.path()), "RAW_TEXT_");
        (dir, store)
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::from_hms_opt(h, min, s).unwrap())
    }

    #[test]
    fn test_ensure_layout_is_idempotent() {
        let (dir, store) = make_store();
        store.ensure_layout().unwrap();
        store.ensure_layout().unwrap();
        for d in store.layout().managed_dirs() {
            assert!(d.is_dir(), "{} missing", d.display());
        }
        assert!(!dir.path().join("inputs").exists());
    }

    #[test]
    fn test_ensure_layout_fails_when_base_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("not-a-dir");
        fs::write(&base, b"x").unwrap();
        let store = ArtifactStore::new(Layout::new(&base), "RAW_TEXT_");
        assert!(matches!(
            store.ensure_layout(),
            Err(PipelineError::Storage { .. })
        ));
    }

    #[test]
    fn test_dated_name_format() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(
            dated_name("banking_test_cases", date, "json"),
            "banking_test_cases_2026-01-05.json"
        );
    }

    #[test]
    fn test_raw_text_names_sort_chronologically() {
        let stamps = [
            at(2025, 12, 31, 23, 59, 59),
            at(2026, 1, 1, 0, 0, 0),
            at(2026, 1, 1, 9, 5, 3),
            at(2026, 1, 1, 10, 0, 0),
            at(2026, 2, 9, 8, 0, 0),
            at(2026, 10, 1, 0, 0, 0),
        ];
        let names: Vec<String> = stamps.iter().map(|t| raw_text_name("RAW_TEXT_", *t)).collect();
        for pair in names.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_find_latest_picks_last_by_sort() {
        let (_dir, store) = make_store();
        store.ensure_layout().unwrap();
        store
            .ingest_raw_text("older", at(2026, 2, 9, 8, 0, 0))
            .unwrap();
        store
            .ingest_raw_text("newest", at(2026, 10, 1, 0, 0, 0))
            .unwrap();
        store
            .ingest_raw_text("middle", at(2026, 3, 1, 0, 0, 0))
            .unwrap();

        let raw = store.find_latest_raw_text().unwrap();
        assert_eq!(raw.content, "newest");
        assert_eq!(raw.source, "RAW_TEXT_20261001T000000.txt");
    }

    #[test]
    fn test_find_latest_ignores_non_matching_entries() {
        let (_dir, store) = make_store();
        store.ensure_layout().unwrap();
        let raw_dir = store.layout().raw_text.clone();
        fs::write(raw_dir.join("RAW_TEXT_001.txt"), "real").unwrap();
        fs::write(raw_dir.join("notes.txt"), "ignored").unwrap();
        fs::create_dir(raw_dir.join("RAW_TEXT_999")).unwrap();

        let raw = store.find_latest_raw_text().unwrap();
        assert_eq!(raw.source, "RAW_TEXT_001.txt");
    }

    #[test]
    fn test_find_latest_empty_dir_is_not_found() {
        let (_dir, store) = make_store();
        store.ensure_layout().unwrap();
        assert!(matches!(
            store.find_latest_raw_text(),
            Err(PipelineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_find_latest_missing_dir_is_not_found() {
        let (_dir, store) = make_store();
        assert!(matches!(
            store.find_latest_raw_text(),
            Err(PipelineError::NotFound { .. })
        ));
    }

    #[test]
    fn test_non_utf8_raw_text_is_storage_error() {
        let (_dir, store) = make_store();
        store.ensure_layout().unwrap();
        fs::write(store.layout().raw_text.join("RAW_TEXT_1.txt"), [0xff, 0xfe, 0x00]).unwrap();
        assert!(matches!(
            store.find_latest_raw_text(),
            Err(PipelineError::Storage { .. })
        ));
    }

    #[test]
    fn test_write_artifact_overwrites() {
        let (_dir, store) = make_store();
        store.ensure_layout().unwrap();
        let dir = store.layout().requirements.clone();
        store.write_artifact(&dir, "a.json", b"first, longer content").unwrap();
        let path = store.write_artifact(&dir, "a.json", b"second").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn test_write_artifact_into_missing_dir_is_storage_error() {
        let (dir, store) = make_store();
        let missing = dir.path().join("nope");
        assert!(matches!(
            store.write_artifact(&missing, "a.json", b"{}"),
            Err(PipelineError::Storage { .. })
        ));
    }

    #[test]
    fn test_write_json_uses_two_space_indent() {
        let (_dir, store) = make_store();
        store.ensure_layout().unwrap();
        let dir = store.layout().requirements.clone();
        let path = store
            .write_json(&dir, "n.json", &serde_json::json!([{"id": "REQ-001"}]))
            .unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  {\n    \"id\": \"REQ-001\""));

        let back: serde_json::Value = store.read_json(&path).unwrap();
        assert_eq!(back[0]["id"], "REQ-001");
    }
}
