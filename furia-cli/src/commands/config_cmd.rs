//! # Configuration Commands
//!
//! View the effective FURIA configuration.

use anyhow::Result;
use clap::Subcommand;

use crate::context::AppContext;

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (defaults, file and environment merged)
    Show,

    /// Show which configuration file is read
    Path,
}

pub fn handle_config(ctx: &AppContext, action: ConfigAction, json: bool) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", ctx.config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = &ctx.config_path;
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "path": path, "exists": path.exists() })
                );
            } else if path.exists() {
                println!("{}", path.display());
            } else {
                println!("{} (not found, using defaults)", path.display());
            }
        }
    }
    Ok(())
}
