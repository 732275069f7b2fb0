//! `brx init`: write the default configuration file.

use brx_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    println!("BRX ∞ Setup");
    println!("===========\n");

    if AppConfig::write_default(&config_path)? {
        println!("✅ Wrote default config: {}", config_path.display());
    } else {
        println!("  Config file exists: {}", config_path.display());
    }

    println!("\nNext steps:");
    println!("  brx chat          Start an interactive session");
    println!("  brx chat -m TEXT  Process a single request");
    println!("  brx status        Show system status");

    Ok(())
}
