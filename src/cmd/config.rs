use crate::cmd::prompts;
use crate::config::ConfigManager;
use crate::error::{Result, ToolsError};
use clap::{Args, Subcommand};
use colored::Colorize;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Write a default config file
    Init(ConfigInitArgs),

    /// Print the config file location
    Path,
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    force: bool,
}

pub async fn run(command: ConfigCommands, manager: &ConfigManager) -> Result<()> {
    match command {
        ConfigCommands::Show => show(manager),
        ConfigCommands::Init(args) => init(args, manager),
        ConfigCommands::Path => {
            println!("{}", manager.config_file().display());
            Ok(())
        }
    }
}

fn show(manager: &ConfigManager) -> Result<()> {
    let config = manager.load_config()?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| ToolsError::ConfigError(format!("Failed to serialize config: {}", e)))?;

    let source = if manager.config_file().exists() {
        manager.config_file().display().to_string()
    } else {
        "defaults (no config file)".into()
    };

    println!("{} {}", "Source:".bold(), source);
    println!("{}", "─".repeat(60).dimmed());
    print!("{}", rendered);
    Ok(())
}

fn init(args: ConfigInitArgs, manager: &ConfigManager) -> Result<()> {
    let path = manager.config_file();
    if manager.init_config(args.force)? {
        prompts::success(&format!("Wrote {}", path.display()));
    } else {
        prompts::warning(&format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}
