//! Leasebot CLI: the main entry point.
//!
//! Commands:
//! - `chat`       Talk to the bot in the terminal
//! - `gateway`    Start the HTTP chat server
//! - `summaries`  List, show or delete saved summaries
//! - `config`     Show, locate or validate the configuration
//! - `status`     Show system status

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "leasebot",
    about = "Leasebot — keeps an eye on the kilometers of your leasing contract",
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
    /// Chat with the bot in the terminal
    Chat {
        /// Begin the conversation in this state instead of `start`
        #[arg(long)]
        state: Option<String>,

        /// Seed phrase selection for a reproducible conversation
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Start the HTTP gateway server
    Gateway {
        /// Override the port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Manage saved summaries
    Summaries {
        #[command(subcommand)]
        action: SummaryAction,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show system status
    Status,
}

#[derive(Subcommand)]
enum SummaryAction {
    /// List saved summaries
    List,
    /// Print one saved summary
    Show { id: u32 },
    /// Delete one saved summary
    Delete { id: u32 },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file path
    Path,
    /// Validate the configuration and the bot data
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { state, seed } => commands::chat::run(state, seed).await?,
        Commands::Gateway { port } => commands::gateway::run(port).await?,
        Commands::Summaries { action } => match action {
            SummaryAction::List => commands::summaries::list()?,
            SummaryAction::Show { id } => commands::summaries::show(id)?,
            SummaryAction::Delete { id } => commands::summaries::delete(id)?,
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show()?,
            ConfigAction::Path => commands::config_cmd::path()?,
            ConfigAction::Validate => commands::config_cmd::validate()?,
        },
        Commands::Status => commands::status::run()?,
    }

    Ok(())
}
