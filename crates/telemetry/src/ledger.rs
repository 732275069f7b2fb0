//! Thread-safe version ledger: counts builds and improvements, keeps the
//! architecture history, and serves status reports.

use crate::model::*;
use brx_config::LedgerConfig;
use chrono::{DateTime, Utc};
use std::sync::RwLock;

const MOTTO: &str = "✨ Eternal Evolution, No Limits ✨";

/// The ledger contract the runtime depends on.
pub trait Ledger: Send + Sync {
    /// Record one improvement event and return the resulting version label.
    fn record(&self, event: ImprovementEvent) -> VersionLabel;

    fn status(&self) -> LedgerStatus;

    /// Append a capacity expansion to the history.
    fn expand_architecture(&self, expansion: ArchitectureExpansion) -> ExpansionSnapshot;
}

/// Internal counters, guarded by a single lock so that one writer at a time
/// updates build, improvement count and history together.
#[derive(Debug)]
struct LedgerState {
    internal_build: u64,
    improvements: u64,
    history: Vec<HistoryEntry>,
}

/// In-process ledger backed by an `RwLock`.
pub struct InMemoryLedger {
    symbolic_version: String,
    significance_cutoff: f64,
    created_at: DateTime<Utc>,
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::from_config(&LedgerConfig::default())
    }

    pub fn from_config(config: &LedgerConfig) -> Self {
        Self::created_at(config, Utc::now())
    }

    /// Create a ledger with a fixed creation time.
    pub fn created_at(config: &LedgerConfig, created_at: DateTime<Utc>) -> Self {
        Self {
            symbolic_version: config.symbolic_version.clone(),
            significance_cutoff: config.significance_cutoff,
            created_at,
            state: RwLock::new(LedgerState {
                internal_build: 1,
                improvements: 0,
                history: Vec::new(),
            }),
        }
    }

    pub fn symbolic_version(&self) -> &str {
        &self.symbolic_version
    }

    /// Status as observed at `now`.
    pub fn status_at(&self, now: DateTime<Utc>) -> LedgerStatus {
        let state = self.state.read().unwrap();
        let hours = (now - self.created_at).num_milliseconds().max(0) as f64 / 3_600_000.0;
        let per_hour = if hours > 0.0 {
            state.improvements as f64 / hours
        } else {
            0.0
        };

        LedgerStatus {
            symbolic_version: self.symbolic_version.clone(),
            internal_build: state.internal_build,
            improvements: state.improvements,
            hours_since_creation: hours,
            improvements_per_hour: per_hour,
            evolution_events: state.history.len(),
            motto: MOTTO.into(),
        }
    }

    /// A copy of the architecture history, oldest first.
    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.read().unwrap().history.clone()
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger for InMemoryLedger {
    fn record(&self, event: ImprovementEvent) -> VersionLabel {
        let mut state = self.state.write().unwrap();
        state.improvements += 1;
        state.internal_build += 1;
        let build = state.internal_build;

        if event.significance > self.significance_cutoff {
            tracing::debug!(build, significance = event.significance, "Significant improvement recorded");
            state.history.push(HistoryEntry::Improvement {
                build,
                event,
                timestamp: Utc::now(),
            });
        }

        VersionLabel(format!("{} (Build {})", self.symbolic_version, build))
    }

    fn status(&self) -> LedgerStatus {
        self.status_at(Utc::now())
    }

    fn expand_architecture(&self, expansion: ArchitectureExpansion) -> ExpansionSnapshot {
        let mut state = self.state.write().unwrap();
        let snapshot = ExpansionSnapshot {
            previous_build: state.internal_build,
            new_tools_added: expansion.new_tools,
            new_thinking_layers: expansion.new_layers,
            memory_expansion: expansion.memory_growth,
            timestamp: Utc::now(),
        };
        state.history.push(HistoryEntry::Expansion(snapshot.clone()));
        tracing::info!(
            build = snapshot.previous_build,
            new_tools = snapshot.new_tools_added,
            new_layers = snapshot.new_thinking_layers,
            "Architecture expanded"
        );
        snapshot
    }
}
