//! Best-of-N convergence loop.
//!
//! Runs the tool plan up to `max_iterations` times, scores every run, and
//! keeps the best. Nothing from attempt *k* feeds attempt *k + 1* except the
//! attempt offset itself. The loop stops as soon as the *running best* meets
//! the policy threshold, or when the iteration budget runs out.

use crate::invoker::{ExecutionResult, ToolInvoker};
use crate::quality::QualityPolicy;
use brx_core::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const ITERATION_BOOST: f64 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based.
    pub iteration: u32,
    pub quality_score: f64,
    pub improvements_made: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineOutcome {
    /// `None` only when no iteration scored above zero.
    pub best_result: Option<ExecutionResult>,
    pub final_quality: f64,
    pub iterations: usize,
    pub iteration_history: Vec<IterationRecord>,
    pub quality_threshold_met: bool,
    /// The deadline, not the threshold or the budget, ended the loop.
    #[serde(default)]
    pub deadline_exceeded: bool,
}

/// Score one execution: base confidence plus 0.1 per prior attempt, capped
/// at 1.0. The text and policy do not currently affect the score.
pub fn evaluate_quality(result: &ExecutionResult, _text: &str, _policy: &QualityPolicy) -> f64 {
    (result.confidence + ITERATION_BOOST * f64::from(result.attempt)).min(1.0)
}

pub struct ConvergenceLoop<'a> {
    invoker: &'a dyn ToolInvoker,
    deadline: Option<Duration>,
}

impl<'a> ConvergenceLoop<'a> {
    pub fn new(invoker: &'a dyn ToolInvoker) -> Self {
        Self {
            invoker,
            deadline: None,
        }
    }

    /// Stop early once this much time has passed. Checked between
    /// iterations only; the first iteration always runs.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn run(
        &self,
        tools: &[String],
        text: &str,
        policy: &QualityPolicy,
    ) -> Result<PipelineOutcome, PipelineError> {
        if tools.is_empty() {
            return Err(PipelineError::EmptyPlan);
        }

        let started = Instant::now();
        let threshold = policy.target_threshold();
        let mut best_result: Option<ExecutionResult> = None;
        let mut best_quality = 0.0_f64;
        let mut history: Vec<IterationRecord> = Vec::new();
        let mut deadline_exceeded = false;

        for attempt in 0..policy.max_iterations() {
            if attempt > 0
                && let Some(limit) = self.deadline
                && started.elapsed() >= limit
            {
                warn!(
                    completed = attempt,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Convergence deadline reached"
                );
                deadline_exceeded = true;
                break;
            }

            let result = self.invoker.invoke(tools, text, attempt);
            let quality = evaluate_quality(&result, text, policy);

            history.push(IterationRecord {
                iteration: attempt + 1,
                quality_score: quality,
                improvements_made: Vec::new(),
            });

            debug!(iteration = attempt + 1, quality, best = best_quality, "Iteration scored");

            if quality > best_quality {
                best_quality = quality;
                best_result = Some(result);
            }

            if best_quality >= threshold {
                break;
            }
        }

        let outcome = PipelineOutcome {
            best_result,
            final_quality: best_quality,
            iterations: history.len(),
            iteration_history: history,
            quality_threshold_met: best_quality >= threshold,
            deadline_exceeded,
        };

        info!(
            iterations = outcome.iterations,
            final_quality = outcome.final_quality,
            threshold_met = outcome.quality_threshold_met,
            "Convergence loop finished"
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoker::SimulatedInvoker;

    /// Returns a fixed base confidence per attempt.
    struct Scripted(Vec<f64>);

    impl ToolInvoker for Scripted {
        fn invoke(&self, tools: &[String], _text: &str, attempt: u32) -> ExecutionResult {
            ExecutionResult {
                tools_executed: tools.to_vec(),
                attempt,
                result: format!("attempt {attempt}"),
                confidence: self.0[attempt as usize],
                entries: Vec::new(),
            }
        }
    }

    fn plan() -> Vec<String> {
        vec!["text_generation".to_string()]
    }

    #[test]
    fn evaluate_adds_boost_and_caps() {
        let policy = QualityPolicy::standard();
        let mut r = SimulatedInvoker.invoke(&plan(), "x", 0);
        assert!((evaluate_quality(&r, "x", &policy) - 0.8).abs() < 1e-12);
        r.attempt = 1;
        assert!((evaluate_quality(&r, "x", &policy) - 0.9).abs() < 1e-12);
        r.attempt = 4;
        assert_eq!(evaluate_quality(&r, "x", &policy), 1.0);
    }

    #[test]
    fn simulated_run_converges_on_second_iteration() {
        // attempt 0: 0.80; attempt 1: 0.85 + 0.1 = 0.95
        let outcome = ConvergenceLoop::new(&SimulatedInvoker)
            .run(&plan(), "oi", &QualityPolicy::standard())
            .unwrap();
        assert_eq!(outcome.iterations, 2);
        assert!(outcome.quality_threshold_met);
        assert_eq!(outcome.best_result.unwrap().attempt, 1);
        assert!(!outcome.deadline_exceeded);
    }

    #[test]
    fn zero_threshold_stops_after_one_iteration() {
        let policy = QualityPolicy::new(0.0, 5).unwrap();
        let outcome = ConvergenceLoop::new(&Scripted(vec![0.0; 5]))
            .run(&plan(), "x", &policy)
            .unwrap();
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.quality_threshold_met);
        // strict comparison against an initial best of zero
        assert!(outcome.best_result.is_none());
    }

    #[test]
    fn first_iteration_meeting_threshold_runs_once() {
        let outcome = ConvergenceLoop::new(&Scripted(vec![0.97, 0.99]))
            .run(&plan(), "x", &QualityPolicy::standard())
            .unwrap();
        assert_eq!(outcome.iterations, 1);
        assert_eq!(outcome.iteration_history[0].iteration, 1);
    }

    #[test]
    fn budget_caps_iterations() {
        let policy = QualityPolicy::new(1.0, 3).unwrap();
        let outcome = ConvergenceLoop::new(&Scripted(vec![0.1, 0.1, 0.1]))
            .run(&plan(), "x", &policy)
            .unwrap();
        assert_eq!(outcome.iterations, 3);
        assert!(!outcome.quality_threshold_met);
        // 0.1 + 0.1 * 2
        assert!((outcome.final_quality - 0.3).abs() < 1e-9);
    }

    #[test]
    fn ties_keep_the_earliest_result() {
        // scores: 0.5, 0.5, 0.5
        let policy = QualityPolicy::new(1.0, 3).unwrap();
        let outcome = ConvergenceLoop::new(&Scripted(vec![0.5, 0.4, 0.3]))
            .run(&plan(), "x", &policy)
            .unwrap();
        assert_eq!(outcome.best_result.unwrap().attempt, 0);
        assert!((outcome.final_quality - 0.5).abs() < 1e-9);
    }

    #[test]
    fn best_quality_is_max_over_history() {
        let policy = QualityPolicy::new(1.0, 5).unwrap();
        let outcome = ConvergenceLoop::new(&Scripted(vec![0.6, 0.2, 0.1, 0.55, 0.0]))
            .run(&plan(), "x", &policy)
            .unwrap();
        let max = outcome
            .iteration_history
            .iter()
            .map(|r| r.quality_score)
            .fold(0.0, f64::max);
        assert_eq!(outcome.final_quality, max);
        assert_eq!(outcome.best_result.unwrap().attempt, 3);
        assert!(outcome.iteration_history.iter().all(|r| r.improvements_made.is_empty()));
    }

    #[test]
    fn running_best_ends_the_loop() {
        // attempt 0 scores 0.6 (already >= 0.5); attempt 1 never runs
        let policy = QualityPolicy::new(0.5, 5).unwrap();
        let outcome = ConvergenceLoop::new(&Scripted(vec![0.6, 0.0]))
            .run(&plan(), "x", &policy)
            .unwrap();
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn empty_plan_fails_fast() {
        let err = ConvergenceLoop::new(&SimulatedInvoker)
            .run(&[], "x", &QualityPolicy::standard())
            .unwrap_err();
        assert_eq!(err, PipelineError::EmptyPlan);
    }

    #[test]
    fn elapsed_deadline_stops_after_first_iteration() {
        let policy = QualityPolicy::new(1.0, 5).unwrap();
        let outcome = ConvergenceLoop::new(&Scripted(vec![0.1; 5]))
            .with_deadline(Duration::ZERO)
            .run(&plan(), "x", &policy)
            .unwrap();
        assert_eq!(outcome.iterations, 1);
        assert!(outcome.deadline_exceeded);
        assert!(!outcome.quality_threshold_met);
    }
}
