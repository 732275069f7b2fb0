//! Version ledger for BRX.
//!
//! Every completed pipeline run is recorded as an improvement event. The
//! ledger hands back a version label, keeps monotonically increasing build
//! and improvement counters, and reports uptime and improvement rate.
//!
//! The ledger is process-wide shared state. It is constructed once at
//! startup and handed to the runtime as `Arc<dyn Ledger>` so tests can
//! substitute a fake.

pub mod ledger;
pub mod model;

pub use ledger::{InMemoryLedger, Ledger};
pub use model::{
    ArchitectureExpansion, ExpansionSnapshot, HistoryEntry, ImprovementEvent, LedgerStatus,
    VersionLabel,
};
