//! `brx status`: show ledger, registry and configuration status.

use brx_agent::{Runtime, SystemStatus};
use brx_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let runtime = Runtime::from_config(&config)?;

    println!("BRX ∞ Status");
    println!("============");
    print_status(&runtime.system_status());
    println!("  Invoker:        {}", config.pipeline.invoker);
    println!("  Threshold:      {}", config.pipeline.quality_threshold);
    println!("  Max iterations: {}", config.pipeline.max_iterations);
    println!("  Tools:          {}", runtime.registry().names().join(", "));

    if AppConfig::config_path().exists() {
        println!("\n  ✅ Config file found");
    } else {
        println!("\n  ⚠️  No config file, run `brx init` first");
    }

    Ok(())
}

pub fn print_status(status: &SystemStatus) {
    let ledger = &status.ledger;
    println!("  Version:        {}", ledger.symbolic_version);
    println!("  Build:          {}", ledger.internal_build);
    println!("  Improvements:   {}", ledger.improvements);
    println!("  Per hour:       {:.2}", ledger.improvements_per_hour);
    println!("  Evolution:      {} events", ledger.evolution_events);
    println!("  Base tools:     {}", status.total_base_tools);
    println!("  Community:      {} tools", status.community_stats.total_tools);
    println!("  Sessions:       {}", status.active_sessions);
    println!("  {}", ledger.motto);
}
