use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::{health, resolve};

/// Relay CLI - operator tooling for the relay gateway
#[derive(Parser)]
#[command(name = "relayctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Gateway base URL
    #[arg(
        long,
        global = true,
        env = "RELAY_URL",
        default_value = "http://localhost:3030"
    )]
    gateway: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Probe the gateway health endpoint
    Health {
        /// Output format (json, text)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Validate a directory file and resolve a prefix against it
    Resolve {
        /// Path to the application directory JSON file
        #[arg(long, env = "RELAY_DIRECTORY_PATH")]
        directory: String,

        /// The application prefix to resolve
        prefix: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt().with_env_filter(log_level).init();

    match cli.command {
        Commands::Health { format } => health::execute(&cli.gateway, &format).await,
        Commands::Resolve { directory, prefix } => resolve::execute(&directory, &prefix).await,
    }
}
