//! Tool strategy planning: keyword-driven, additive tool selection.

use crate::enrichment::ContextInsights;
use crate::keywords;
use crate::lexical::LexicalFeatures;
use serde::{Deserialize, Serialize};

/// How the selected tools are combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationStrategy {
    Sequential,
}

/// Ordered tools to run for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolPlan {
    /// Selection order is execution order.
    pub selected_tools: Vec<String>,
    pub integration_strategy: IntegrationStrategy,
    /// Tool count × intent depth. Reported only; never drives control flow.
    pub estimated_complexity: f64,
}

impl ToolPlan {
    pub fn execution_order(&self) -> &[String] {
        &self.selected_tools
    }

    pub fn is_empty(&self) -> bool {
        self.selected_tools.is_empty()
    }
}

/// Pick tools for `text`. Falls back to text generation when no tool family
/// matches, so the plan is never empty.
pub fn plan(text: &str, _features: &LexicalFeatures, insights: &ContextInsights) -> ToolPlan {
    let lowered = text.to_lowercase();
    let mut tools: Vec<String> = keywords::matching_tags(keywords::TOOL_FAMILIES, &lowered)
        .into_iter()
        .map(String::from)
        .collect();

    if tools.is_empty() {
        tools.push(brx_tools::text_generation::NAME.to_string());
    }

    let estimated_complexity = tools.len() as f64 * insights.intent_depth;

    ToolPlan {
        selected_tools: tools,
        integration_strategy: IntegrationStrategy::Sequential,
        estimated_complexity,
    }
}
