//! # FURIA CLI
//!
//! Command-line client for the FURIA backend: account flows and the password
//! recovery workflow.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

mod commands;
mod console;
mod context;

use commands::config_cmd::ConfigAction;
use context::AppContext;

/// CLI structure
#[derive(Parser, Debug)]
#[command(name = "furia")]
#[command(about = "FURIA - fan app client")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to $FURIA_CONFIG, ./furia.toml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Main commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in and keep the session
    Login {
        /// Account e-mail
        email: String,
        /// Account password
        #[arg(long, env = "FURIA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        /// Display name
        #[arg(long)]
        name: String,
        /// Account e-mail
        #[arg(long)]
        email: String,
        /// Account password
        #[arg(long, env = "FURIA_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Re-send the account activation link
    Activate {
        /// Account e-mail
        email: String,
    },

    /// Send a password reset e-mail and wait until its link is opened
    Recover {
        /// Account e-mail
        email: String,
    },

    /// Keep waiting for a reset e-mail sent earlier
    Resume,

    /// Choose a new password once the reset e-mail was confirmed
    ResetPassword {
        /// New password
        #[arg(long, env = "FURIA_NEW_PASSWORD", hide_env_values = true)]
        password: String,
        /// New password, again
        #[arg(long)]
        confirm: String,
    },

    /// Show the logged-in user's profile
    Profile,

    /// Forget the stored session
    Logout,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run_command(cli.command, cli.config, cli.json).await {
        Ok(()) => {
            info!("Command completed successfully");
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            eprintln!("❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

async fn run_command(command: Commands, config: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let ctx = AppContext::load(config.as_deref())?;

    match command {
        Commands::Login { email, password } => commands::auth::login(&ctx, &email, &password).await,
        Commands::Register {
            name,
            email,
            password,
        } => commands::auth::register(&ctx, &name, &email, &password).await,
        Commands::Activate { email } => commands::auth::activate(&ctx, &email).await,
        Commands::Recover { email } => commands::recover::recover(&ctx, &email, json).await,
        Commands::Resume => commands::recover::resume(&ctx, json).await,
        Commands::ResetPassword { password, confirm } => {
            commands::auth::reset_password(&ctx, &password, &confirm).await
        }
        Commands::Profile => commands::auth::profile(&ctx, json).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Config { action } => commands::config_cmd::handle_config(&ctx, action, json),
    }
}
