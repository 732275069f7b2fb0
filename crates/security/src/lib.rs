//! Security module for BRX: submission screening and audit logging.
//!
//! Provides:
//! - **Submission intake**: screens community tool code against a denylist
//!   of textual patterns before admission
//! - **Audit logging**: structured security event logging

pub mod audit;
pub mod intake;

pub use audit::{AuditEntry, AuditEvent, AuditLogger, AuditOutcome, AuditSink, TracingSink};
pub use intake::{
    CommunityStats, IntegratedTool, SafetyAnalysis, SubmissionIntake, SubmissionOutcome,
    ToolMetadata,
};
