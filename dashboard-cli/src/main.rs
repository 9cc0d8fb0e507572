//! Main entry point for the admin dashboard CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use client::App;
use dotenv::dotenv;
use shared::config::ClientConfig;

mod commands;

/// Admin dashboard CLI
#[derive(Parser)]
#[command(name = "dashboard", version)]
#[command(about = "Command-line client for the admin dashboard API", long_about = None)]
pub(crate) struct Cli {
    /// Path to a YAML, JSON or TOML configuration file.
    #[arg(long, short, global = true, env = "DASHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the REST API, e.g. `https://host/api`. Beats every other source.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the dashboard CLI
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Sign in and store the session token
    Login(commands::session::LoginArgs),

    /// Sign out and forget the stored token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Show the dashboard overview counters
    Stats,

    /// List users, one page at a time
    Users(commands::users::UsersArgs),

    /// Search messages by date range
    Reports(commands::reports::ReportsArgs),

    /// Send a new message
    Send(commands::reports::SendArgs),

    /// Delete one of your messages
    Delete(commands::reports::DeleteArgs),

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script
        #[arg(long, short, value_enum)]
        shell: Shell,
    },

    /// Generate a configuration file in the current directory
    Config {
        /// Format of the configuration file to generate (yaml, json or toml)
        #[arg(long, short, default_value = "yaml")]
        format: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Completion { shell } => commands::completion::generate_completion(shell),
        Commands::Config { format } => commands::config::generate_config(&format)?,
        command => {
            let config = ClientConfig::load_config(cli.config, cli.api_url)
                .context("failed to load configuration")?;
            commands::logging::init(&config);
            let app = App::with_file_store(config).context("failed to set up the API client")?;
            commands::run(&app, command).await?;
        }
    }

    Ok(())
}
