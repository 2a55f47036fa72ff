//! In-memory backend for [`StateStore`], used by tests.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use super::{StateStore, StoreError, StoreResult};
use crate::history::History;
use crate::model::Baseline;
use crate::report::{Rejection, Summary};
use crate::trend::Trends;

#[derive(Debug, Default)]
struct MemoryState {
    baseline: Option<Baseline>,
    history: Option<History>,
    trends: Option<Trends>,
    summary: Option<Summary>,
    rejection: Option<Rejection>,
    corrupt: BTreeSet<&'static str>,
    fail_writes: bool,
    writes: Vec<&'static str>,
}

#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<MemoryState>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a store from previously persisted state.
    pub fn with_state(baseline: Option<Baseline>, history: History) -> Self {
        let store = Self::new();
        {
            let mut s = store.lock();
            s.baseline = baseline;
            s.history = Some(history);
        }
        store
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked mid-write.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Makes subsequent loads of `artifact` ("baseline" or "history") fail as corrupt.
    pub fn mark_corrupt(&self, artifact: &'static str) {
        self.lock().corrupt.insert(artifact);
    }

    /// Makes every subsequent write fail with an I/O error.
    pub fn fail_writes(&self) {
        self.lock().fail_writes = true;
    }

    /// Artifacts written so far, in write order.
    pub fn writes(&self) -> Vec<&'static str> {
        self.lock().writes.clone()
    }

    pub fn baseline(&self) -> Option<Baseline> {
        self.lock().baseline.clone()
    }

    pub fn history(&self) -> History {
        self.lock().history.clone().unwrap_or_default()
    }

    pub fn trends(&self) -> Option<Trends> {
        self.lock().trends
    }

    fn check_corrupt(&self, artifact: &'static str) -> StoreResult<()> {
        if self.lock().corrupt.contains(artifact) {
            return Err(StoreError::Corrupt {
                artifact,
                message: "marked corrupt".to_string(),
            });
        }
        Ok(())
    }

    fn write<F>(&self, artifact: &'static str, apply: F) -> StoreResult<()>
    where
        F: FnOnce(&mut MemoryState),
    {
        let mut s = self.lock();
        if s.fail_writes {
            return Err(StoreError::Io {
                path: PathBuf::from(format!("memory://{artifact}")),
                source: std::io::Error::other("write disabled"),
            });
        }
        apply(&mut *s);
        s.corrupt.remove(artifact);
        s.writes.push(artifact);
        Ok(())
    }
}

impl StateStore for MemoryStateStore {
    fn load_baseline(&self) -> StoreResult<Option<Baseline>> {
        self.check_corrupt("baseline")?;
        Ok(self.lock().baseline.clone())
    }

    fn store_baseline(&self, baseline: &Baseline) -> StoreResult<()> {
        self.write("baseline", |s| s.baseline = Some(baseline.clone()))
    }

    fn load_history(&self) -> StoreResult<History> {
        self.check_corrupt("history")?;
        Ok(self.history())
    }

    fn store_history(&self, history: &History) -> StoreResult<()> {
        self.write("history", |s| s.history = Some(history.clone()))
    }

    fn store_trends(&self, trends: &Trends) -> StoreResult<()> {
        self.write("trends", |s| s.trends = Some(*trends))
    }

    fn load_summary(&self) -> StoreResult<Option<Summary>> {
        Ok(self.lock().summary.clone())
    }

    fn store_summary(&self, summary: &Summary) -> StoreResult<()> {
        self.write("summary", |s| s.summary = Some(summary.clone()))
    }

    fn load_rejection(&self) -> StoreResult<Option<Rejection>> {
        Ok(self.lock().rejection.clone())
    }

    fn store_rejection(&self, rejection: &Rejection) -> StoreResult<()> {
        self.write("rejection", |s| s.rejection = Some(rejection.clone()))
    }
}
