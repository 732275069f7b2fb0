//! Data model for ledger events, history entries and status snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Events ────────────────────────────────────────────────────────────────

/// One completed unit of work worth recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImprovementEvent {
    /// Event kind (e.g. "user_interaction").
    pub kind: String,
    /// Magnitude in [0, 1]; for pipeline runs, the final quality score.
    pub significance: f64,
    pub description: String,
}

impl ImprovementEvent {
    pub fn new(kind: impl Into<String>, significance: f64, description: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            significance,
            description: description.into(),
        }
    }
}

/// Label returned by the ledger for each recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLabel(pub String);

impl std::fmt::Display for VersionLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request to grow the system's capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureExpansion {
    #[serde(default)]
    pub new_tools: u32,
    #[serde(default)]
    pub new_layers: u32,
    #[serde(default)]
    pub memory_growth: u64,
}

/// What an expansion looked like when it was applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpansionSnapshot {
    pub previous_build: u64,
    pub new_tools_added: u32,
    pub new_thinking_layers: u32,
    pub memory_expansion: u64,
    pub timestamp: DateTime<Utc>,
}

// ── History ───────────────────────────────────────────────────────────────

/// One entry in the architecture history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// A significant improvement event.
    Improvement {
        build: u64,
        event: ImprovementEvent,
        timestamp: DateTime<Utc>,
    },
    /// An explicit capacity expansion.
    Expansion(ExpansionSnapshot),
}

// ── Status ────────────────────────────────────────────────────────────────

/// Point-in-time view of the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerStatus {
    pub symbolic_version: String,
    pub internal_build: u64,
    pub improvements: u64,
    pub hours_since_creation: f64,
    /// 0 when no measurable time has elapsed.
    pub improvements_per_hour: f64,
    pub evolution_events: usize,
    pub motto: String,
}
