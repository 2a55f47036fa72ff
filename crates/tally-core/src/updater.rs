//! Baseline updater: wires gate, delta, history and trend analysis together.
//!
//! ```text
//! NotMainBranch ──────────────> Skipped
//! NotQualifyingEvent ─────────> Skipped
//! NoResultsAvailable ─────────> Err(MissingInput)
//! Evaluating ─┬─ rejected ────> Rejected   (rejection.json only)
//!             └─ accepted ────> Accepted   (baseline, history, trends, summary)
//! ```
//!
//! Every run is a full read-modify-write of the store. No locking is done
//! here: at most one updater per branch is expected to run at a time.

use chrono::{DateTime, Utc};

use crate::config::{BaselineSettings, GateConfig, TallyConfig};
use crate::delta;
use crate::errors::UpdateError;
use crate::gate::GateDecision;
use crate::history::{History, HistoryEntry};
use crate::model::{Baseline, BaselineMetadata, MetricsSnapshot};
use crate::report::console::{format_decision, format_trends};
use crate::report::summary::{Rejection, Summary, SummaryAction, SCHEMA_VERSION};
use crate::snapshot::SnapshotSource;
use crate::store::{StateStore, StoreError};
use crate::trend;

const UNKNOWN: &str = "unknown";

/// CI context of the invocation. Read-only input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub branch: String,
    pub event: String,
    pub commit: Option<String>,
    pub actor: Option<String>,
    pub repository: Option<String>,
    pub run_id: Option<String>,
}

impl ExecutionContext {
    pub fn new(branch: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            event: event.into(),
            ..Default::default()
        }
    }

    pub fn metadata(&self) -> BaselineMetadata {
        BaselineMetadata {
            creator: self.actor.clone(),
            repository: self.repository.clone(),
            workflow_run_id: self.run_id.clone(),
        }
    }

    /// Fills `unknown` provenance on the snapshot from the CI context.
    fn fill_provenance(&self, mut snapshot: MetricsSnapshot) -> MetricsSnapshot {
        if snapshot.commit == UNKNOWN {
            if let Some(commit) = &self.commit {
                snapshot.commit = commit.clone();
            }
        }
        if snapshot.branch == UNKNOWN && !self.branch.is_empty() {
            snapshot.branch = self
                .branch
                .strip_prefix("refs/heads/")
                .unwrap_or(&self.branch)
                .to_string();
        }
        snapshot
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotMainBranch { branch: String },
    NotQualifyingEvent { event: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NotMainBranch { branch } => {
                write!(f, "branch '{}' is not a main-line branch", branch)
            }
            SkipReason::NotQualifyingEvent { event } => {
                write!(f, "event '{}' does not update the baseline", event)
            }
        }
    }
}

/// Terminal state of a run. Only `Accepted` changes the baseline.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Skipped(SkipReason),
    Rejected(Rejection),
    Accepted(Summary),
}

pub struct Updater<'a> {
    store: &'a dyn StateStore,
    gate: &'a GateConfig,
    settings: &'a BaselineSettings,
    dry_run: bool,
    now: Option<DateTime<Utc>>,
}

impl<'a> Updater<'a> {
    pub fn new(store: &'a dyn StateStore, config: &'a TallyConfig) -> Self {
        Self {
            store,
            gate: &config.gate,
            settings: &config.baseline,
            dry_run: false,
            now: None,
        }
    }

    /// Computes everything but writes nothing.
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Pins the acceptance time instead of reading the clock.
    pub fn with_clock(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.now.unwrap_or_else(Utc::now)
    }

    /// Runs the full state machine for one CI invocation.
    pub fn run(
        &self,
        ctx: &ExecutionContext,
        source: &dyn SnapshotSource,
    ) -> Result<UpdateOutcome, UpdateError> {
        if !self.settings.is_main_branch(&ctx.branch) {
            let reason = SkipReason::NotMainBranch {
                branch: ctx.branch.clone(),
            };
            tracing::info!("Skipping baseline update: {}", reason);
            return Ok(UpdateOutcome::Skipped(reason));
        }
        if !self.settings.is_qualifying_event(&ctx.event) {
            let reason = SkipReason::NotQualifyingEvent {
                event: ctx.event.clone(),
            };
            tracing::info!("Skipping baseline update: {}", reason);
            return Ok(UpdateOutcome::Skipped(reason));
        }

        let snapshot = source.load()?;
        self.apply(ctx, snapshot)
    }

    /// Evaluates an already loaded snapshot, skipping the branch/event guards.
    pub fn apply(
        &self,
        ctx: &ExecutionContext,
        snapshot: MetricsSnapshot,
    ) -> Result<UpdateOutcome, UpdateError> {
        let snapshot = ctx.fill_provenance(snapshot);
        tracing::info!(
            "Evaluating metrics for {} on {}",
            snapshot.commit,
            snapshot.branch
        );

        let decision = self.gate.evaluate(&snapshot.values());
        tracing::info!("{}", format_decision(&decision));

        if !decision.acceptable {
            return self.reject(&snapshot, &decision);
        }
        self.accept(ctx, &snapshot, &decision)
    }

    fn reject(
        &self,
        snapshot: &MetricsSnapshot,
        decision: &GateDecision,
    ) -> Result<UpdateOutcome, UpdateError> {
        let rejection = Rejection::new(snapshot, decision, self.now());
        if !self.dry_run {
            self.store
                .store_rejection(&rejection)
                .map_err(|source| UpdateError::Persistence {
                    artifact: "rejection",
                    source,
                })?;
        }
        tracing::info!("Baseline left unchanged");
        Ok(UpdateOutcome::Rejected(rejection))
    }

    fn accept(
        &self,
        ctx: &ExecutionContext,
        snapshot: &MetricsSnapshot,
        decision: &GateDecision,
    ) -> Result<UpdateOutcome, UpdateError> {
        let now = self.now();
        let previous = self.load_baseline()?;
        let values = snapshot.values();

        let delta = delta::compute(&values, previous.as_ref());
        let action = if previous.is_some() {
            SummaryAction::Updated
        } else {
            SummaryAction::Created
        };
        let baseline = Baseline::accept(snapshot, previous.as_ref(), ctx.metadata(), now);

        let mut history = self.load_history()?;
        let evicted =
            history.push_bounded(HistoryEntry::from(snapshot), self.settings.history_limit);
        if evicted > 0 {
            tracing::debug!(evicted, "evicted oldest history entries");
        }

        let trends = trend::analyze_history(
            &history,
            self.settings.trend_window,
            self.settings.stable_slope,
        );
        tracing::info!("{}", format_trends(&trends));

        let summary = Summary {
            schema_version: SCHEMA_VERSION,
            action,
            timestamp: now,
            commit: snapshot.commit.clone(),
            branch: snapshot.branch.clone(),
            score: decision.score,
            metrics: values,
            delta,
            trends,
            history_size: history.len(),
            metadata: baseline.metadata.clone(),
        };

        if !self.dry_run {
            self.persist(&baseline, &history, &summary)?;
        }
        tracing::info!(
            "Baseline {} ({} history entries)",
            action.as_str(),
            history.len()
        );
        Ok(UpdateOutcome::Accepted(summary))
    }

    fn persist(
        &self,
        baseline: &Baseline,
        history: &History,
        summary: &Summary,
    ) -> Result<(), UpdateError> {
        self.store
            .store_baseline(baseline)
            .map_err(failed("baseline"))?;
        self.store.store_history(history).map_err(failed("history"))?;
        self.store
            .store_trends(&summary.trends)
            .map_err(failed("trends"))?;
        self.store.store_summary(summary).map_err(failed("summary"))?;
        Ok(())
    }

    fn load_baseline(&self) -> Result<Option<Baseline>, UpdateError> {
        match self.store.load_baseline() {
            Ok(baseline) => Ok(baseline),
            Err(e) if e.is_corrupt() => {
                tracing::warn!("Ignoring unreadable baseline, starting fresh: {}", e);
                Ok(None)
            }
            Err(source) => Err(UpdateError::Load {
                artifact: "baseline",
                source,
            }),
        }
    }

    fn load_history(&self) -> Result<History, UpdateError> {
        match self.store.load_history() {
            Ok(history) => Ok(history),
            Err(e) if e.is_corrupt() => {
                tracing::warn!("Ignoring unreadable history, starting empty: {}", e);
                Ok(History::new())
            }
            Err(source) => Err(UpdateError::Load {
                artifact: "history",
                source,
            }),
        }
    }
}

fn failed(artifact: &'static str) -> impl FnOnce(StoreError) -> UpdateError {
    move |source| UpdateError::Persistence { artifact, source }
}
