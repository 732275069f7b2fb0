//! Community tools: capabilities admitted through the submission intake.
//!
//! Submitted code is screened but never run; the registered tool reports
//! its provenance and echoes the request.

use brx_core::error::ToolError;
use brx_core::tool::{Tool, ToolMode, ToolOrigin, ToolOutput};

#[derive(Debug, Clone)]
pub struct CommunityTool {
    tool_id: String,
    name: String,
    description: String,
    creator: String,
}

impl CommunityTool {
    pub fn new(
        tool_id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        creator: impl Into<String>,
    ) -> Self {
        Self {
            tool_id: tool_id.into(),
            name: name.into(),
            description: description.into(),
            creator: creator.into(),
        }
    }

    pub fn tool_id(&self) -> &str {
        &self.tool_id
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }
}

impl Tool for CommunityTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn origin(&self) -> ToolOrigin {
        ToolOrigin::Community
    }

    fn execute_basic(&self, input: &str, skill_level: f64) -> Result<ToolOutput, ToolError> {
        Ok(ToolOutput::new(
            format!("Community tool {} executed: {input}", self.name),
            skill_level,
            ToolMode::Basic,
        )
        .with_field("tool_id", self.tool_id.as_str())
        .with_field("creator", self.creator.as_str()))
    }
}
