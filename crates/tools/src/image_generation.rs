//! Image generation tool: stub that describes the image it would render.

use brx_core::error::ToolError;
use brx_core::tool::{Tool, ToolMode, ToolOutput};

pub const NAME: &str = "image_generation";

pub struct ImageGenerationTool;

impl Tool for ImageGenerationTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Generate an image from a text description."
    }

    fn execute_basic(&self, input: &str, skill_level: f64) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::new(format!("Image generated: {input}"), skill_level, ToolMode::Basic)
            .with_field("resolution", "512x512")
            .with_field("style", "basic"))
    }
}
