//! `brx submit`: screen a community tool submission.

use brx_agent::Runtime;
use brx_config::AppConfig;
use brx_security::{SubmissionOutcome, ToolMetadata};
use std::path::PathBuf;

pub async fn run(
    user: String,
    name: String,
    description: String,
    file: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let code = tokio::fs::read_to_string(&file)
        .await
        .map_err(|e| format!("Failed to read {}: {e}", file.display()))?;

    let runtime = Runtime::from_config(&config)?;
    tracing::debug!(bytes = code.len(), tool = %name, "Screening submission");

    match runtime.submit_tool(&user, &code, ToolMetadata::new(name, description)) {
        SubmissionOutcome::Approved {
            tool_id,
            message,
            rights_notice,
        } => {
            println!("✅ {message}");
            println!("  Tool id: {tool_id}");
            println!("  {rights_notice}");
        }
        SubmissionOutcome::Rejected { tool_id, issues } => {
            println!("❌ Submission {tool_id} rejected");
            for issue in &issues {
                println!("  - {issue}");
            }
            return Err(format!("{} issue(s) found", issues.len()).into());
        }
    }

    Ok(())
}
