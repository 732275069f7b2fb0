//! BRX CLI, the main entry point.
//!
//! Commands:
//! - `init`    Write the default config file
//! - `chat`    Interactive chat or single-message mode
//! - `status`  Show ledger and registry status
//! - `submit`  Screen a community tool submission

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "brx",
    about = "BRX ∞: layered request pipeline with quality convergence",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file if none exists
    Init,

    /// Send requests through the pipeline
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Print the full report as JSON (single-message mode)
        #[arg(long, requires = "message")]
        json: bool,

        /// User id the requests are attributed to
        #[arg(short, long, default_value = "anonymous")]
        user: String,
    },

    /// Show system status
    Status,

    /// Submit community tool code for screening
    Submit {
        /// Submitter id
        #[arg(short, long)]
        user: String,

        /// Tool name
        #[arg(short, long)]
        name: String,

        /// Tool description
        #[arg(short, long, default_value = "")]
        description: String,

        /// File containing the tool code
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Chat {
            message,
            json,
            user,
        } => commands::chat::run(message, json, user).await?,
        Commands::Status => commands::status::run().await?,
        Commands::Submit {
            user,
            name,
            description,
            file,
        } => commands::submit::run(user, name, description, file).await?,
    }

    Ok(())
}
