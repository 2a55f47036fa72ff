pub mod config;
pub mod delta;
pub mod errors;
pub mod gate;
pub mod history;
pub mod model;
pub mod report;
pub mod snapshot;
pub mod store;
pub mod trend;
pub mod updater;

// Convenience re-exports
pub use config::{BaselineSettings, GateConfig, TallyConfig};
pub use delta::{Delta, MetricDelta};
pub use errors::{ConfigError, SnapshotError, UpdateError};
pub use gate::GateDecision;
pub use history::{History, HistoryEntry};
pub use model::{Baseline, BaselineMetadata, CoverageBreakdown, Metric, MetricValues, MetricsSnapshot};
pub use report::{Rejection, Summary, SummaryAction};
pub use snapshot::{FileSnapshotSource, SnapshotSource, SyntheticSnapshotSource};
pub use store::{FileStateStore, MemoryStateStore, StateStore, StoreError, StoreResult};
pub use trend::{Direction, Trend, TrendResult, Trends};
pub use updater::{ExecutionContext, SkipReason, UpdateOutcome, Updater};
