//! Tool invocation for the convergence loop.
//!
//! An invoker runs a whole tool plan once and folds the per-tool outputs into
//! a single [`ExecutionResult`]. Tool failures never abort the run; they are
//! kept as [`ToolOutcome::Failed`] entries so the caller always gets a
//! structured result.

use brx_core::tool::{ToolOutput, ToolRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

const SIMULATED_BASE_CONFIDENCE: f64 = 0.8;
const SIMULATED_CONFIDENCE_STEP: f64 = 0.05;

/// What happened to one tool in one attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ToolOutcome {
    Completed(ToolOutput),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRunEntry {
    pub tool: String,
    #[serde(flatten)]
    pub outcome: ToolOutcome,
}

impl ToolRunEntry {
    pub fn confidence(&self) -> f64 {
        match &self.outcome {
            ToolOutcome::Completed(output) => output.confidence,
            ToolOutcome::Failed { .. } => 0.0,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Failed { .. })
    }
}

/// One execution of a tool plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub tools_executed: Vec<String>,
    /// Zero-based attempt offset within the convergence loop.
    pub attempt: u32,
    pub result: String,
    /// Base confidence in [0, 1], before any iteration boost.
    pub confidence: f64,
    /// Per-tool entries, empty for simulated runs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<ToolRunEntry>,
}

impl ExecutionResult {
    pub fn failures(&self) -> impl Iterator<Item = &ToolRunEntry> {
        self.entries.iter().filter(|e| e.is_failure())
    }
}

/// Runs a tool plan against the request text.
pub trait ToolInvoker: Send + Sync {
    fn invoke(&self, tools: &[String], text: &str, attempt: u32) -> ExecutionResult;
}

/// Executes each tool through the shared registry.
pub struct RegistryInvoker {
    registry: Arc<ToolRegistry>,
}

impl RegistryInvoker {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }
}

impl ToolInvoker for RegistryInvoker {
    fn invoke(&self, tools: &[String], text: &str, attempt: u32) -> ExecutionResult {
        let entries: Vec<ToolRunEntry> = tools
            .iter()
            .map(|name| {
                let outcome = match self.registry.execute(name, text) {
                    Ok(output) => {
                        debug!(tool = %name, confidence = output.confidence, "Tool completed");
                        ToolOutcome::Completed(output)
                    }
                    Err(e) => {
                        warn!(tool = %name, error = %e, "Tool execution failed");
                        ToolOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                };
                ToolRunEntry {
                    tool: name.clone(),
                    outcome,
                }
            })
            .collect();

        let confidence = if entries.is_empty() {
            0.0
        } else {
            entries.iter().map(ToolRunEntry::confidence).sum::<f64>() / entries.len() as f64
        };

        let result = entries
            .iter()
            .filter_map(|e| match &e.outcome {
                ToolOutcome::Completed(output) => Some(output.result.as_str()),
                ToolOutcome::Failed { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        ExecutionResult {
            tools_executed: tools.to_vec(),
            attempt,
            result,
            confidence,
            entries,
        }
    }
}

/// Stand-in that never touches a registry. Confidence rises with the attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedInvoker;

impl ToolInvoker for SimulatedInvoker {
    fn invoke(&self, tools: &[String], text: &str, attempt: u32) -> ExecutionResult {
        ExecutionResult {
            tools_executed: tools.to_vec(),
            attempt,
            result: format!("Simulated result for: {text}"),
            confidence: SIMULATED_BASE_CONFIDENCE + SIMULATED_CONFIDENCE_STEP * f64::from(attempt),
            entries: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tools: &[&str]) -> Vec<String> {
        tools.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn simulated_confidence_grows_with_attempt() {
        let inv = SimulatedInvoker;
        let tools = names(&["text_generation"]);
        assert!((inv.invoke(&tools, "oi", 0).confidence - 0.8).abs() < 1e-12);
        assert!((inv.invoke(&tools, "oi", 2).confidence - 0.9).abs() < 1e-12);
        assert_eq!(inv.invoke(&tools, "oi", 0).result, "Simulated result for: oi");
    }

    #[test]
    fn registry_invoker_runs_in_plan_order() {
        let inv = RegistryInvoker::new(Arc::new(brx_tools::default_registry()));
        let tools = names(&["image_generation", "text_generation"]);
        let result = inv.invoke(&tools, "um gato", 1);

        assert_eq!(result.attempt, 1);
        assert_eq!(result.tools_executed, tools);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].tool, "image_generation");
        assert_eq!(
            result.result,
            "Image generated: um gato\nText generated: um gato"
        );
        assert!((result.confidence - 0.7).abs() < 1e-12);
    }

    #[test]
    fn missing_tool_is_recorded_not_fatal() {
        let inv = RegistryInvoker::new(Arc::new(brx_tools::default_registry()));
        let tools = names(&["text_generation", "teleporter"]);
        let result = inv.invoke(&tools, "x", 0);

        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].tool, "teleporter");
        match &failures[0].outcome {
            ToolOutcome::Failed { error } => assert!(error.contains("teleporter")),
            other => panic!("expected failure, got {other:?}"),
        }
        // mean of 0.7 and 0.0
        assert!((result.confidence - 0.35).abs() < 1e-12);
        assert_eq!(result.result, "Text generated: x");
    }

    #[test]
    fn usage_counters_advance_per_invocation() {
        let registry = Arc::new(brx_tools::default_registry());
        let inv = RegistryInvoker::new(Arc::clone(&registry));
        let tools = names(&["code_generation"]);
        inv.invoke(&tools, "a", 0);
        inv.invoke(&tools, "a", 1);
        assert_eq!(registry.usage_count("code_generation"), Some(2));
    }

    #[test]
    fn failed_entry_serializes_with_status() {
        let entry = ToolRunEntry {
            tool: "nope".into(),
            outcome: ToolOutcome::Failed {
                error: "Tool not found: nope".into(),
            },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["tool"], "nope");
        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "Tool not found: nope");
    }
}
