//! Web research tool: stub that returns mock sources.
//!
//! In production this would call a real search API. The stub returns
//! plausible, deterministic sources so the pipeline can be exercised
//! end-to-end without network access.

use brx_core::error::ToolError;
use brx_core::tool::{Tool, ToolMode, ToolOutput};
use serde::Serialize;

pub const NAME: &str = "web_research";

/// Number of sources every research run reports.
const SOURCES_CHECKED: usize = 3;

pub struct WebResearchTool;

impl Tool for WebResearchTool {
    fn name(&self) -> &str {
        NAME
    }

    fn description(&self) -> &str {
        "Research a topic on the web and summarize the sources consulted."
    }

    fn execute_basic(&self, input: &str, skill_level: f64) -> Result<ToolOutput, ToolError> {
        let sources = mock_sources(input, SOURCES_CHECKED);
        let sources = serde_json::to_value(&sources).map_err(|e| ToolError::ExecutionFailed {
            tool_name: NAME.into(),
            reason: e.to_string(),
        })?;

        Ok(ToolOutput::new(format!("Research completed: {input}"), skill_level, ToolMode::Basic)
            .with_field("sources_checked", SOURCES_CHECKED)
            .with_field("sources", sources))
    }
}

#[derive(Debug, Clone, Serialize)]
struct Source {
    title: String,
    url: String,
    snippet: String,
}

fn mock_sources(query: &str, count: usize) -> Vec<Source> {
    let q = query.trim();
    (0..count)
        .map(|i| Source {
            title: format!("Source {} for: {}", i + 1, q),
            url: format!("https://example.com/search?q={}&p={}", q.replace(' ', "+"), i + 1),
            snippet: format!("Mock source for the query '{q}'. A real backend would return page content."),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn research_reports_three_sources() {
        let output = WebResearchTool.execute_basic("pesquisar rust", 0.7).unwrap();
        assert_eq!(output.extra["sources_checked"], 3);
        assert_eq!(output.extra["sources"].as_array().unwrap().len(), 3);
        assert!(output.result.contains("pesquisar rust"));
    }

    #[test]
    fn sources_are_deterministic() {
        let a = WebResearchTool.execute_basic("buscar dados", 0.7).unwrap();
        let b = WebResearchTool.execute_basic("buscar dados", 0.7).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn urls_encode_spaces() {
        let sources = mock_sources("a b", 1);
        assert!(sources[0].url.contains("q=a+b"));
    }
}
