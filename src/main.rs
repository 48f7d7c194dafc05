use anyhow::Result;
use clap::Parser;
use colored::*;

mod cli;
mod commands;
mod config;
mod error;
mod executor;
mod firewall;
mod install;
mod pipeline;
mod tasks;
mod ui;

use cli::{Cli, Command};
use config::Profile;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        println!("{} {:?}", "DEBUG:".yellow(), cli);
    }

    match cli.command {
        Command::Apply {
            profile,
            yes,
            properties,
        } => {
            let path = match profile {
                Some(path) => path,
                None => Profile::default_path()?,
            };
            commands::apply::execute_apply(&path, properties.as_deref(), yes).await?;
        }
        Command::Validate { profile } => {
            let path = match profile {
                Some(path) => path,
                None => Profile::default_path()?,
            };
            commands::validate::execute_validate(&path)?;
        }
        Command::Watch { log, json } => {
            commands::watch::execute_watch(&log, json).await?;
        }
        Command::Groups { installed } => {
            commands::groups::execute_groups(installed).await?;
        }
    }

    Ok(())
}
