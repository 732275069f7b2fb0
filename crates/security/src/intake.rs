//! Submission intake: screens community tool code before admission.
//!
//! Screening is a plain substring scan against a denylist. Submitted code
//! is never executed. Approved submissions are recorded as integrated
//! tools; rejected ones stay in the pending queue with the matched patterns.

use crate::audit::{AuditEvent, AuditLogger, AuditOutcome};
use brx_config::IntakeConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

const APPROVED_MESSAGE: &str = "Tool integrated successfully";
const RIGHTS_NOTICE: &str = "Copyright transferred to BRX ∞";

/// Name and description supplied with a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolMetadata {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl ToolMetadata {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// A submission waiting in the queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingSubmission {
    pub tool_id: String,
    pub user_id: String,
    pub tool_code: String,
    pub metadata: ToolMetadata,
    pub submitted_at: DateTime<Utc>,
}

/// A submission that passed screening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedTool {
    pub name: String,
    pub creator: String,
    pub description: String,
    pub integrated_at: DateTime<Utc>,
    pub usage_count: u64,
}

/// Result of scanning submitted code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyAnalysis {
    pub safe: bool,
    pub issues: Vec<String>,
    /// Code length in thousands of bytes.
    pub complexity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Approved {
        tool_id: String,
        message: String,
        rights_notice: String,
    },
    Rejected {
        tool_id: String,
        issues: Vec<String>,
    },
}

impl SubmissionOutcome {
    pub fn tool_id(&self) -> &str {
        match self {
            Self::Approved { tool_id, .. } | Self::Rejected { tool_id, .. } => tool_id,
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved { .. })
    }
}

/// Summary of community contributions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommunityStats {
    pub integrated_tools: BTreeMap<String, IntegratedTool>,
    pub pending_approval: usize,
    pub total_tools: usize,
}

#[derive(Debug, Default)]
struct IntakeState {
    queue: Vec<PendingSubmission>,
    integrated: BTreeMap<String, IntegratedTool>,
}

/// Screens and tracks community tool submissions.
pub struct SubmissionIntake {
    denylist: Vec<String>,
    state: Mutex<IntakeState>,
    sequence: AtomicU64,
    audit: Arc<AuditLogger>,
}

impl SubmissionIntake {
    pub fn new(config: &IntakeConfig, audit: Arc<AuditLogger>) -> Self {
        Self {
            denylist: config.denylist.clone(),
            state: Mutex::new(IntakeState::default()),
            sequence: AtomicU64::new(0),
            audit,
        }
    }

    pub fn denylist(&self) -> &[String] {
        &self.denylist
    }

    /// Screen a submission. Rejection is a normal outcome, not an error.
    pub fn submit(&self, user_id: &str, tool_code: &str, metadata: ToolMetadata) -> SubmissionOutcome {
        let now = Utc::now();
        let tool_id = self.generate_tool_id(user_id, &metadata.name, now);

        let submission = PendingSubmission {
            tool_id: tool_id.clone(),
            user_id: user_id.to_string(),
            tool_code: tool_code.to_string(),
            metadata: metadata.clone(),
            submitted_at: now,
        };

        let analysis = self.analyze(tool_code);
        let mut state = self.state.lock().unwrap();
        state.queue.push(submission);

        if analysis.safe {
            state.queue.retain(|s| s.tool_id != tool_id);
            state.integrated.insert(
                tool_id.clone(),
                IntegratedTool {
                    name: metadata.name.clone(),
                    creator: user_id.to_string(),
                    description: metadata.description.clone(),
                    integrated_at: now,
                    usage_count: 0,
                },
            );
            drop(state);

            self.audit.log(
                AuditEvent::ToolSubmission { tool_id: tool_id.clone() },
                user_id,
                &metadata.name,
                AuditOutcome::Success,
                None,
            );

            SubmissionOutcome::Approved {
                tool_id,
                message: APPROVED_MESSAGE.into(),
                rights_notice: RIGHTS_NOTICE.into(),
            }
        } else {
            drop(state);

            self.audit.log(
                AuditEvent::ToolSubmission { tool_id: tool_id.clone() },
                user_id,
                &metadata.name,
                AuditOutcome::Denied,
                Some(analysis.issues.join("; ")),
            );

            SubmissionOutcome::Rejected {
                tool_id,
                issues: analysis.issues,
            }
        }
    }

    /// Scan code for every denylisted pattern.
    pub fn analyze(&self, tool_code: &str) -> SafetyAnalysis {
        let issues: Vec<String> = self
            .denylist
            .iter()
            .filter(|pattern| tool_code.contains(pattern.as_str()))
            .map(|pattern| format!("Dangerous pattern detected: {pattern}"))
            .collect();

        SafetyAnalysis {
            safe: issues.is_empty(),
            issues,
            complexity: tool_code.len() as f64 / 1000.0,
        }
    }

    pub fn community_tools(&self) -> CommunityStats {
        let state = self.state.lock().unwrap();
        CommunityStats {
            integrated_tools: state.integrated.clone(),
            pending_approval: state.queue.len(),
            total_tools: state.integrated.len(),
        }
    }

    /// Submissions still awaiting approval, oldest first.
    pub fn pending(&self) -> Vec<PendingSubmission> {
        self.state.lock().unwrap().queue.clone()
    }

    /// 8 hex chars of SHA-256 over submitter, tool name, time and a sequence
    /// number.
    fn generate_tool_id(&self, user_id: &str, tool_name: &str, at: DateTime<Utc>) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let nanos = at.timestamp_nanos_opt().unwrap_or_default();
        let digest = Sha256::digest(format!("{user_id}_{tool_name}_{nanos}_{seq}").as_bytes());
        hex::encode(digest)[..8].to_string()
    }
}
