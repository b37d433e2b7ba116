//! Append-only audit trail, one plain-text file per calendar day.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::info;

use crate::error::{PipelineError, Result};
use crate::store::dated_name;

/// Appends milestone lines to `<dir>/<name>_<YYYY-MM-DD>.log`.
///
/// Writers are not coordinated; two processes logging on the same day may
/// interleave lines.
#[derive(Debug, Clone)]
pub struct AuditLogger {
    dir: PathBuf,
    name: String,
    pinned_date: Option<NaiveDate>,
}

impl AuditLogger {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            pinned_date: None,
        }
    }

    /// Always write to the partition for `date`.
    pub fn pinned(mut self, date: Option<NaiveDate>) -> Self {
        self.pinned_date = date;
        self
    }

    fn current_date(&self) -> NaiveDate {
        self.pinned_date.unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub fn log_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(dated_name(&self.name, date, "log"))
    }

    /// Append `message` as one line to today's log, creating it if absent.
    pub fn record(&self, message: &str) -> Result<()> {
        let path = self.log_path(self.current_date());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| PipelineError::storage(&path, e))?;
        file.write_all(format!("{message}\n").as_bytes())
            .map_err(|e| PipelineError::storage(&path, e))?;

        info!(event = "audit.record", message = %message);
        Ok(())
    }

    /// Lines recorded for `date`, oldest first. Missing file means no entries.
    pub fn entries(&self, date: NaiveDate) -> Result<Vec<String>> {
        let path = self.log_path(date);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(text.lines().map(str::to_string).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(PipelineError::storage(&path, e)),
        }
    }
}
