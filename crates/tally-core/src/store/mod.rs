//! Persistence boundary for baseline state.
//!
//! The updater never touches the file system directly; it goes through a
//! [`StateStore`], so the whole read-modify-write cycle can run against
//! [`MemoryStateStore`] in tests.
//!
//! # Layout of the file backend
//!
//! ```text
//! <state_dir>/baseline.json    # last accepted baseline
//! <state_dir>/history.json     # bounded history, oldest first
//! <state_dir>/trends.json      # derived, rewritten on every accepted run
//! <state_dir>/summary.json     # last accepted run
//! <state_dir>/rejection.json   # last rejected run
//! ```

pub mod error;
pub mod file;
pub mod memory;

pub use error::{StoreError, StoreResult};
pub use file::FileStateStore;
pub use memory::MemoryStateStore;

use crate::history::History;
use crate::model::Baseline;
use crate::report::{Rejection, Summary};
use crate::trend::Trends;

/// Load/store primitives for the persisted state.
///
/// Loads distinguish "absent" (`Ok(None)` / empty history) from "present but
/// unreadable" ([`StoreError::Corrupt`]); the caller decides how to recover.
pub trait StateStore {
    fn load_baseline(&self) -> StoreResult<Option<Baseline>>;

    fn store_baseline(&self, baseline: &Baseline) -> StoreResult<()>;

    /// Missing history is an empty history.
    fn load_history(&self) -> StoreResult<History>;

    fn store_history(&self, history: &History) -> StoreResult<()>;

    fn store_trends(&self, trends: &Trends) -> StoreResult<()>;

    fn load_summary(&self) -> StoreResult<Option<Summary>>;

    fn store_summary(&self, summary: &Summary) -> StoreResult<()>;

    fn load_rejection(&self) -> StoreResult<Option<Rejection>>;

    fn store_rejection(&self, rejection: &Rejection) -> StoreResult<()>;
}
