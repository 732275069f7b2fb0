//! Runtime facade: wires the pipeline to the shared registry, ledger and
//! submission intake, and serves requests, status and tool submissions.

use crate::invoker::{RegistryInvoker, SimulatedInvoker, ToolInvoker, ToolOutcome, ToolRunEntry};
use crate::pipeline::{ThinkingPipeline, ThinkingResult};
use crate::quality::QualityPolicy;
use crate::trace::StageTrace;
use brx_config::AppConfig;
use brx_core::event::{DomainEvent, EventBus};
use brx_core::request::Request;
use brx_core::tool::{ToolOrigin, ToolRegistry};
use brx_security::{
    AuditEvent, AuditLogger, AuditOutcome, CommunityStats, SubmissionIntake, SubmissionOutcome,
    ToolMetadata, TracingSink,
};
use brx_telemetry::{ArchitectureExpansion, ImprovementEvent, InMemoryLedger, Ledger, LedgerStatus};
use brx_tools::CommunityTool;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

const INTERACTION_KIND: &str = "user_interaction";
const DESCRIPTION_PREFIX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub final_quality: f64,
    pub iterations: usize,
    pub threshold_met: bool,
    pub processing_time_secs: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub version: String,
    pub version_label: String,
    pub build: u64,
    pub improvements: u64,
}

/// The answer to one processed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestReport {
    pub request_id: Uuid,
    pub user_input: String,
    pub user_id: String,
    pub tool_results: Vec<ToolRunEntry>,
    pub thinking_process: StageTrace,
    pub quality_metrics: QualityMetrics,
    pub system_info: SystemInfo,
    pub community_stats: CommunityStats,
}

impl RequestReport {
    /// Result text of the first tool that completed.
    pub fn primary_result(&self) -> Option<&str> {
        self.tool_results.iter().find_map(|e| match &e.outcome {
            ToolOutcome::Completed(output) => Some(output.result.as_str()),
            ToolOutcome::Failed { .. } => None,
        })
    }

    pub fn tools_used(&self) -> Vec<&str> {
        self.tool_results.iter().map(|e| e.tool.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub ledger: LedgerStatus,
    pub community_stats: CommunityStats,
    pub total_base_tools: usize,
    pub registered_community_tools: usize,
    pub active_sessions: usize,
}

pub struct Runtime {
    pipeline: ThinkingPipeline,
    invoker: Box<dyn ToolInvoker>,
    registry: Arc<ToolRegistry>,
    ledger: Arc<dyn Ledger>,
    intake: SubmissionIntake,
    audit: Arc<AuditLogger>,
    event_bus: Arc<EventBus>,
    /// Distinct user ids served; grows until `end_session` removes one.
    sessions: Mutex<HashSet<String>>,
}

impl Runtime {
    /// Build a runtime with fresh shared state from `config`.
    pub fn from_config(config: &AppConfig) -> brx_core::Result<Self> {
        let policy = QualityPolicy::new(
            config.pipeline.quality_threshold,
            config.pipeline.max_iterations,
        )?;
        let mut pipeline = ThinkingPipeline::new(policy);
        if config.pipeline.deadline_ms > 0 {
            pipeline = pipeline.with_deadline(Duration::from_millis(config.pipeline.deadline_ms));
        }

        let registry = Arc::new(ToolRegistry::with_skill_levels(
            config.tools.base_skill_level,
            config.tools.advanced_skill_cutoff,
        ));
        brx_tools::register_builtins(&registry);

        let invoker: Box<dyn ToolInvoker> = match config.pipeline.invoker.as_str() {
            "registry" => Box::new(RegistryInvoker::new(Arc::clone(&registry))),
            "simulated" => Box::new(SimulatedInvoker),
            other => {
                return Err(brx_core::Error::Config {
                    message: format!("unknown invoker '{other}'"),
                });
            }
        };

        let audit = Arc::new(AuditLogger::with_sinks(vec![Box::new(TracingSink)]));
        let intake = SubmissionIntake::new(&config.intake, Arc::clone(&audit));

        info!(
            tools = registry.len(),
            invoker = %config.pipeline.invoker,
            threshold = config.pipeline.quality_threshold,
            "Runtime initialized"
        );

        Ok(Self {
            pipeline,
            invoker,
            registry,
            ledger: Arc::new(InMemoryLedger::from_config(&config.ledger)),
            intake,
            audit,
            event_bus: Arc::new(EventBus::default()),
            sessions: Mutex::new(HashSet::new()),
        })
    }

    /// Replace the ledger, e.g. with a fake in tests.
    pub fn with_ledger(mut self, ledger: Arc<dyn Ledger>) -> Self {
        self.ledger = ledger;
        self
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    pub fn audit(&self) -> &Arc<AuditLogger> {
        &self.audit
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    pub fn intake(&self) -> &SubmissionIntake {
        &self.intake
    }

    pub fn process_request(&self, text: &str, user_id: &str) -> brx_core::Result<RequestReport> {
        self.process(&Request::new(text), user_id)
    }

    /// Run the pipeline for `request` and record the run in the ledger.
    pub fn process(&self, request: &Request, user_id: &str) -> brx_core::Result<RequestReport> {
        let started = Instant::now();
        self.sessions
            .lock()
            .expect("session lock poisoned")
            .insert(user_id.to_string());

        let thinking = self.pipeline.process(request, self.invoker.as_ref())?;
        let tool_results = self.collect_tool_results(&thinking, request.text());

        for entry in &tool_results {
            self.event_bus.publish(DomainEvent::ToolExecuted {
                tool_name: entry.tool.clone(),
                success: !entry.is_failure(),
                confidence: entry.confidence(),
                timestamp: Utc::now(),
            });
        }

        let label = self.ledger.record(ImprovementEvent::new(
            INTERACTION_KIND,
            thinking.quality_achieved,
            describe(request.text()),
        ));
        let status = self.ledger.status();

        self.event_bus.publish(DomainEvent::PipelineCompleted {
            version_label: label.to_string(),
            final_quality: thinking.quality_achieved,
            iterations: thinking.iterations_performed,
            threshold_met: thinking.outcome.quality_threshold_met,
            timestamp: Utc::now(),
        });

        info!(
            user = %user_id,
            version = %label,
            quality = thinking.quality_achieved,
            "Request processed"
        );

        Ok(RequestReport {
            request_id: Uuid::new_v4(),
            user_input: request.text().to_string(),
            user_id: user_id.to_string(),
            tool_results,
            quality_metrics: QualityMetrics {
                final_quality: thinking.quality_achieved,
                iterations: thinking.iterations_performed,
                threshold_met: thinking.outcome.quality_threshold_met,
                processing_time_secs: started.elapsed().as_secs_f64(),
            },
            thinking_process: thinking.trace,
            system_info: SystemInfo {
                version: status.symbolic_version,
                version_label: label.0,
                build: status.internal_build,
                improvements: status.improvements,
            },
            community_stats: self.intake.community_tools(),
        })
    }

    /// Per-tool results of the best execution. Simulated runs carry no
    /// per-tool entries, so the plan is run once through the registry.
    fn collect_tool_results(&self, thinking: &ThinkingResult, text: &str) -> Vec<ToolRunEntry> {
        if let Some(best) = &thinking.outcome.best_result
            && !best.entries.is_empty()
        {
            return best.entries.clone();
        }

        RegistryInvoker::new(Arc::clone(&self.registry))
            .invoke(thinking.plan.execution_order(), text, 0)
            .entries
    }

    /// Drop `user_id` from the active sessions. Returns whether it was present.
    pub fn end_session(&self, user_id: &str) -> bool {
        self.sessions
            .lock()
            .expect("session lock poisoned")
            .remove(user_id)
    }

    pub fn system_status(&self) -> SystemStatus {
        SystemStatus {
            ledger: self.ledger.status(),
            community_stats: self.intake.community_tools(),
            total_base_tools: self.registry.count_by_origin(ToolOrigin::BuiltIn),
            registered_community_tools: self.registry.count_by_origin(ToolOrigin::Community),
            active_sessions: self.sessions.lock().expect("session lock poisoned").len(),
        }
    }

    /// Screen a community tool and, if approved, register it.
    pub fn submit_tool(&self, user_id: &str, code: &str, metadata: ToolMetadata) -> SubmissionOutcome {
        let name = metadata.name.clone();
        let description = metadata.description.clone();
        let outcome = self.intake.submit(user_id, code, metadata);

        self.event_bus.publish(DomainEvent::SubmissionScreened {
            tool_id: outcome.tool_id().to_string(),
            submitter: user_id.to_string(),
            approved: outcome.is_approved(),
            timestamp: Utc::now(),
        });

        if let SubmissionOutcome::Approved { tool_id, .. } = &outcome {
            let tool = CommunityTool::new(tool_id.as_str(), name.as_str(), description, user_id);
            if self.registry.register_if_absent(Box::new(tool)) {
                self.audit.log(
                    AuditEvent::ToolRegistration { tool_name: name.clone() },
                    user_id,
                    tool_id,
                    AuditOutcome::Success,
                    None,
                );
                self.ledger.expand_architecture(ArchitectureExpansion {
                    new_tools: 1,
                    new_layers: 0,
                    memory_growth: code.len() as u64,
                });
            } else {
                warn!(tool = %name, "A tool with this name is already registered");
                self.audit.log(
                    AuditEvent::ToolRegistration { tool_name: name.clone() },
                    user_id,
                    tool_id,
                    AuditOutcome::Failure,
                    Some("name already registered".into()),
                );
            }
        }

        outcome
    }

    /// One background evolution cycle. Logs and announces the current build.
    pub fn evolution_tick(&self) -> u64 {
        let build = self.ledger.status().internal_build;
        info!(build, "Evolution cycle executed");
        self.event_bus.publish(DomainEvent::EvolutionTick {
            build,
            timestamp: Utc::now(),
        });
        build
    }
}

fn describe(text: &str) -> String {
    let prefix: String = text.chars().take(DESCRIPTION_PREFIX_CHARS).collect();
    format!("Processed: {prefix}...")
}
