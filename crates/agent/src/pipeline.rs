//! The layered thinking pipeline.
//!
//! raw text → lexical features → context insights → tool plan → quality
//! policy → convergence loop. Each stage appends one record to a
//! request-scoped [`StageTrace`].

use crate::convergence::{ConvergenceLoop, PipelineOutcome};
use crate::enrichment;
use crate::invoker::ToolInvoker;
use crate::lexical;
use crate::quality::QualityPolicy;
use crate::strategy::{self, ToolPlan};
use crate::trace::{Stage, StageTrace};
use brx_core::request::Request;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Everything one pipeline run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingResult {
    pub outcome: PipelineOutcome,
    pub plan: ToolPlan,
    pub trace: StageTrace,
    pub total_stages: usize,
    pub quality_achieved: f64,
    pub iterations_performed: usize,
    pub processing_time_secs: f64,
}

/// Stateless apart from its policy; safe to share across concurrent
/// requests.
#[derive(Debug, Clone, Default)]
pub struct ThinkingPipeline {
    policy: QualityPolicy,
    deadline: Option<Duration>,
}

impl ThinkingPipeline {
    pub fn new(policy: QualityPolicy) -> Self {
        Self {
            policy,
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn policy(&self) -> &QualityPolicy {
        &self.policy
    }

    pub fn process(
        &self,
        request: &Request,
        invoker: &dyn ToolInvoker,
    ) -> brx_core::Result<ThinkingResult> {
        let started = Instant::now();
        let text = request.text();
        let mut trace = StageTrace::new();

        let features = lexical::analyze(text);
        debug!(tokens = features.tokens, intents = ?features.intents, "Lexical analysis done");
        trace.push(Stage::LexicalAnalysis, serde_json::to_value(&features)?);

        let insights = enrichment::enrich(text, &features, request.history());
        debug!(domain = %insights.primary_domain, "Context enriched");
        trace.push(Stage::ContextEnrichment, serde_json::to_value(&insights)?);

        let plan = strategy::plan(text, &features, &insights);
        debug!(tools = ?plan.selected_tools, "Tool plan selected");
        trace.push(Stage::ToolStrategy, serde_json::to_value(&plan)?);

        let policy = self.policy.clone();
        trace.push(Stage::QualityPlanning, serde_json::to_value(&policy)?);

        let mut convergence = ConvergenceLoop::new(invoker);
        if let Some(deadline) = self.deadline {
            convergence = convergence.with_deadline(deadline);
        }
        let outcome = convergence.run(plan.execution_order(), text, &policy)?;
        trace.push(Stage::Execution, serde_json::to_value(&outcome)?);

        let elapsed = started.elapsed();
        info!(
            tools = plan.selected_tools.len(),
            iterations = outcome.iterations,
            quality = outcome.final_quality,
            elapsed_ms = elapsed.as_millis() as u64,
            "Pipeline run complete"
        );

        Ok(ThinkingResult {
            total_stages: trace.len(),
            quality_achieved: outcome.final_quality,
            iterations_performed: outcome.iterations,
            processing_time_secs: elapsed.as_secs_f64(),
            outcome,
            plan,
            trace,
        })
    }
}
