use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::scoring::SessionReport;

/// One line of the history file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryRecord {
    pub date: String,
    pub size: String,
    pub seed: u64,
    pub time_limit_secs: u64,
    pub outcome: String,
    pub elapsed_secs: f64,
    pub wpm: f64,
    pub correct_chars: usize,
}

impl HistoryRecord {
    pub fn new(config: &Config, seed: u64, report: &SessionReport) -> Self {
        Self {
            date: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            size: config.size().to_string(),
            seed,
            time_limit_secs: config.time_limit_secs,
            outcome: report.outcome.to_string(),
            elapsed_secs: (report.elapsed_secs * 100.0).round() / 100.0,
            wpm: (report.wpm * 100.0).round() / 100.0,
            correct_chars: report.correct_chars,
        }
    }
}

/// Append-only CSV log of finished sessions.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    path: PathBuf,
}

impl HistoryLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &HistoryRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(csv::Error::from)?;
        }

        // A fresh file gets a header row
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(csv::Error::from)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    pub fn read_all(&self) -> Result<Vec<HistoryRecord>> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        reader
            .deserialize()
            .map(|row| row.map_err(Error::from))
            .collect()
    }
}
