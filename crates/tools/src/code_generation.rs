//! Code generation tool.

use brx_core::error::ToolError;
use brx_core::tool::{Tool, ToolMode, ToolOutput};

pub const NAME: &str = "code_generation";

pub struct CodeGenerationTool;

impl Tool for CodeGenerationTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Produce source code for a described program or snippet."
    }

    fn execute_basic(&self, input: &str, skill_level: f64) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::new(format!("Code generated for: {input}"), skill_level, ToolMode::Basic)
            .with_field("language", "python"))
    }
}
