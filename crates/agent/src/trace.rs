//! Per-request stage trace.
//!
//! One record per pipeline stage, appended strictly in pipeline order. A
//! trace is owned by a single request; nothing is shared across runs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LexicalAnalysis,
    ContextEnrichment,
    ToolStrategy,
    QualityPlanning,
    Execution,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::LexicalAnalysis,
        Stage::ContextEnrichment,
        Stage::ToolStrategy,
        Stage::QualityPlanning,
        Stage::Execution,
    ];

    /// 1-based position in the pipeline.
    pub fn index(self) -> usize {
        self as usize + 1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub index: usize,
    pub stage: Stage,
    pub payload: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageTrace {
    records: Vec<StageRecord>,
}

impl StageTrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record for `stage`.
    ///
    /// # Panics
    /// If `stage` is not the next stage in pipeline order. The pipeline
    /// drives stages in a fixed sequence, so this is a programming error.
    pub fn push(&mut self, stage: Stage, payload: Value) {
        let expected = Stage::ALL.get(self.records.len()).copied();
        assert_eq!(
            expected,
            Some(stage),
            "stage {stage:?} appended out of order"
        );
        self.records.push(StageRecord {
            index: stage.index(),
            stage,
            payload,
        });
    }

    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    pub fn get(&self, stage: Stage) -> Option<&StageRecord> {
        self.records.iter().find(|r| r.stage == stage)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.records.len() == Stage::ALL.len()
    }
}
