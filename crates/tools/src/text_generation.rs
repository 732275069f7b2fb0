//! Text generation tool: the planner's fallback when nothing else matches.

use brx_core::error::ToolError;
use brx_core::tool::{Tool, ToolMode, ToolOutput};

pub const NAME: &str = "text_generation";

pub struct TextGenerationTool;

impl Tool for TextGenerationTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Write text (answers, documents, summaries) from a prompt."
    }

    fn execute_basic(&self, input: &str, skill_level: f64) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::new(format!("Text generated: {input}"), skill_level, ToolMode::Basic)
            .with_field("length", input.chars().count()))
    }
}
