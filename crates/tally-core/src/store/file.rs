//! JSON-file backend for [`StateStore`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::{StateStore, StoreError, StoreResult};
use crate::history::History;
use crate::model::Baseline;
use crate::report::{Rejection, Summary};
use crate::trend::Trends;

pub const BASELINE_FILE: &str = "baseline.json";
pub const HISTORY_FILE: &str = "history.json";
pub const TRENDS_FILE: &str = "trends.json";
pub const SUMMARY_FILE: &str = "summary.json";
pub const REJECTION_FILE: &str = "rejection.json";

/// Stores each artifact as a pretty-printed JSON file under one directory.
///
/// Writes go to a temporary file in the same directory and are renamed into
/// place, so readers see either the previous or the new content.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        file: &str,
        artifact: &'static str,
    ) -> StoreResult<Option<T>> {
        let path = self.path_of(file);
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                artifact,
                message: format!("{}: {}", path.display(), e),
            })
    }

    fn write_json<T: Serialize>(
        &self,
        file: &str,
        artifact: &'static str,
        value: &T,
    ) -> StoreResult<()> {
        let path = self.path_of(file);
        let io_err = |source: std::io::Error| StoreError::Io {
            path: path.clone(),
            source,
        };

        let mut json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Serialize {
            artifact,
            message: e.to_string(),
        })?;
        json.push('\n');

        std::fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        tmp.write_all(json.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;

        tracing::debug!(path = %path.display(), artifact, "wrote state");
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn load_baseline(&self) -> StoreResult<Option<Baseline>> {
        self.read_json(BASELINE_FILE, "baseline")
    }

    fn store_baseline(&self, baseline: &Baseline) -> StoreResult<()> {
        self.write_json(BASELINE_FILE, "baseline", baseline)
    }

    fn load_history(&self) -> StoreResult<History> {
        Ok(self.read_json(HISTORY_FILE, "history")?.unwrap_or_default())
    }

    fn store_history(&self, history: &History) -> StoreResult<()> {
        self.write_json(HISTORY_FILE, "history", history)
    }

    fn store_trends(&self, trends: &Trends) -> StoreResult<()> {
        self.write_json(TRENDS_FILE, "trends", trends)
    }

    fn load_summary(&self) -> StoreResult<Option<Summary>> {
        self.read_json(SUMMARY_FILE, "summary")
    }

    fn store_summary(&self, summary: &Summary) -> StoreResult<()> {
        self.write_json(SUMMARY_FILE, "summary", summary)
    }

    fn load_rejection(&self) -> StoreResult<Option<Rejection>> {
        self.read_json(REJECTION_FILE, "rejection")
    }

    fn store_rejection(&self, rejection: &Rejection) -> StoreResult<()> {
        self.write_json(REJECTION_FILE, "rejection", rejection)
    }
}
