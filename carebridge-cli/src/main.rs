//! Main entry point for the CareBridge CLI.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use shared::config::ClientConfig;
use url::Url;

mod commands;
mod logging;

use commands::{
    Context,
    resources::{BeneficiaryAction, CharityAction, DonationAction, StoryAction},
    session::SessionAction,
    volunteer::VolunteerArgs,
};

/// CareBridge CLI
#[derive(Parser)]
#[command(name = "carebridge", version)]
#[command(about = "Command-line client for the CareBridge donation platform", long_about = None)]
pub struct Cli {
    /// Path to a configuration file (YAML or JSON)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to a configuration file (e.g., carebridge.yaml or carebridge.json)"
    )]
    config: Option<PathBuf>,

    /// API origin, overriding the configuration file and environment
    #[arg(
        long,
        global = true,
        help = "API origin to talk to (e.g., http://localhost:5000). Overrides CAREBRIDGE_API_BASE_URL"
    )]
    api_base: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the CareBridge CLI
#[derive(Subcommand)]
enum Commands {
    /// Sign in, sign up, pick a role, or inspect the current session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Manage the beneficiaries of your charity
    Beneficiaries {
        #[command(subcommand)]
        action: BeneficiaryAction,
    },

    /// Manage published impact stories
    Stories {
        #[command(subcommand)]
        action: StoryAction,
    },

    /// List, make, and total donations
    Donations {
        #[command(subcommand)]
        action: DonationAction,
    },

    /// Browse and apply for charities, and edit your charity's settings
    Charities {
        #[command(subcommand)]
        action: CharityAction,
    },

    /// Sign up to volunteer; no account needed
    Volunteer(VolunteerArgs),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(*shell);
            return Ok(());
        }
        Commands::Config { format } => {
            return commands::config::generate_config(format.as_deref().unwrap_or("yaml"));
        }
        _ => {}
    }

    let config = ClientConfig::load_config(cli.config, cli.api_base)
        .context("failed to load configuration")?;
    logging::initialize_tracing(&config);
    tracing::debug!(api = %config.api_base_url, "configuration loaded");
    let ctx = Context::new(config)?;

    match cli.command {
        Commands::Session { action } => commands::session::run(&ctx, action).await,
        Commands::Beneficiaries { action } => {
            commands::resources::beneficiaries(&ctx, action).await
        }
        Commands::Stories { action } => commands::resources::stories(&ctx, action).await,
        Commands::Donations { action } => commands::resources::donations(&ctx, action).await,
        Commands::Charities { action } => commands::resources::charities(&ctx, action).await,
        Commands::Volunteer(args) => commands::volunteer::run(&ctx, args).await,
        Commands::Completion { .. } | Commands::Config { .. } => Ok(()),
    }
}
