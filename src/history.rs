//! Append-only CSV log of attempts.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{Result, SplitError};
use crate::reconcile::ReconcileOutcome;
use crate::run::RunState;
use crate::time_format;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AttemptRecord {
    pub recorded_at: DateTime<Local>,
    pub category: String,
    pub segments_completed: usize,
    pub segment_count: usize,
    /// `mm:ss.cc`, blank when the run was abandoned.
    pub final_split: String,
    pub personal_best_saved: bool,
    pub golds_saved: bool,
}

impl AttemptRecord {
    /// Slots past the cursor still hold the baseline's times, so only the
    /// segments this attempt reached are counted.
    pub fn from_run(category: &str, run: &RunState, outcome: &ReconcileOutcome) -> Self {
        let reached = &run.segments()[..run.current_index().min(run.len())];
        let final_split = run
            .is_complete()
            .then(|| run.final_split())
            .flatten()
            .map(time_format::format)
            .unwrap_or_default();
        Self {
            recorded_at: Local::now(),
            category: category.to_string(),
            segments_completed: reached.iter().filter(|s| s.split_time.is_some()).count(),
            segment_count: run.len(),
            final_split,
            personal_best_saved: outcome.personal_best_saved,
            golds_saved: outcome.golds_saved,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AttemptLog {
    path: PathBuf,
}

impl AttemptLog {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::history_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, record: &AttemptRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SplitError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // If the log doesn't exist yet, it needs a header
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|source| SplitError::Write {
                path: self.path.clone(),
                source,
            })?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush().map_err(|source| SplitError::Write {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<csv::StringRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
        Ok(records)
    }
}
