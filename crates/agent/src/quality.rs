//! Quality policy: threshold, iteration cap and evaluation criteria for a
//! pipeline run. Independent of the request text.

use brx_core::error::PipelineError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_THRESHOLD: f64 = 0.95;
pub const DEFAULT_MAX_ITERATIONS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Accuracy,
    Completeness,
    Creativity,
    Relevance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefinementStrategy {
    IterativeImprovement,
}

/// Immutable once built; every request gets its own copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityPolicy {
    target_threshold: f64,
    max_iterations: u32,
    evaluation_criteria: Vec<Criterion>,
    refinement_strategy: RefinementStrategy,
}

impl QualityPolicy {
    /// The fixed default policy: 0.95 threshold, 5 iterations.
    pub fn standard() -> Self {
        Self {
            target_threshold: DEFAULT_TARGET_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            evaluation_criteria: vec![
                Criterion::Accuracy,
                Criterion::Completeness,
                Criterion::Creativity,
                Criterion::Relevance,
            ],
            refinement_strategy: RefinementStrategy::IterativeImprovement,
        }
    }

    /// A policy with a custom threshold and iteration cap.
    pub fn new(target_threshold: f64, max_iterations: u32) -> Result<Self, PipelineError> {
        if !(0.0..=1.0).contains(&target_threshold) {
            return Err(PipelineError::InvalidPolicy(format!(
                "target threshold {target_threshold} outside [0, 1]"
            )));
        }
        if max_iterations < 1 {
            return Err(PipelineError::InvalidPolicy(
                "max iterations must be at least 1".into(),
            ));
        }

        Ok(Self {
            target_threshold,
            max_iterations,
            ..Self::standard()
        })
    }

    pub fn target_threshold(&self) -> f64 {
        self.target_threshold
    }

    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    pub fn evaluation_criteria(&self) -> &[Criterion] {
        &self.evaluation_criteria
    }

    pub fn refinement_strategy(&self) -> RefinementStrategy {
        self.refinement_strategy
    }
}

impl Default for QualityPolicy {
    fn default() -> Self {
        Self::standard()
    }
}
