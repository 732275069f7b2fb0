//! `brx chat`: interactive or single-message mode.

use super::status::print_status;
use brx_agent::{RequestReport, Runtime};
use brx_config::AppConfig;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

pub async fn run(
    message: Option<String>,
    json: bool,
    user: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let runtime = Arc::new(Runtime::from_config(&config)?);

    if let Some(msg) = message {
        let report = runtime.process_request(&msg, &user)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        return Ok(());
    }

    let evolution = config
        .evolution
        .enabled
        .then(|| spawn_evolution_cycle(Arc::clone(&runtime), config.evolution.interval_minutes));

    println!();
    println!("  ╔══════════════════════════════════════╗");
    println!("  ║       BRX ∞  Interactive Mode        ║");
    println!("  ╚══════════════════════════════════════╝");
    println!();
    println!("  Invoker:   {}", config.pipeline.invoker);
    println!("  Tools:     {}", runtime.registry().names().join(", "));
    println!();
    println!("  Type 'status' for system status.");
    println!("  Type 'exit' or 'sair' to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input.to_lowercase().as_str() {
            "" => {}
            "exit" | "quit" | "sair" => break,
            "status" => {
                println!();
                print_status(&runtime.system_status());
            }
            _ => match runtime.process_request(input, &user) {
                Ok(report) => {
                    println!();
                    print_report(&report);
                }
                Err(e) => eprintln!("  [Error] {e}"),
            },
        }
        prompt()?;
    }

    if let Some(handle) = evolution {
        handle.abort();
    }
    runtime.end_session(&user);

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}

fn prompt() -> std::io::Result<()> {
    print!("\n  You > ");
    std::io::stdout().flush()
}

fn print_report(report: &RequestReport) {
    let metrics = &report.quality_metrics;
    println!("  BRX > {}", report.primary_result().unwrap_or("(no tool result)"));
    println!("  Quality: {:.1}%", metrics.final_quality * 100.0);
    println!("  Time:    {:.2}s", metrics.processing_time_secs);
    println!("  Tools:   {}", report.tools_used().join(", "));
    for entry in report.tool_results.iter().filter(|e| e.is_failure()) {
        if let brx_agent::ToolOutcome::Failed { error } = &entry.outcome {
            println!("  [{}] {error}", entry.tool);
        }
    }
}

/// Ticks the runtime's evolution cycle once per interval until aborted.
fn spawn_evolution_cycle(runtime: Arc<Runtime>, interval_minutes: u32) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = Duration::from_secs(u64::from(interval_minutes) * 60);
        let mut ticker = tokio::time::interval(period);
        // the first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            runtime.evolution_tick();
        }
    })
}
