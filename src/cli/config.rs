//! Configuration inspection commands.

use std::path::Path;

use clap::Subcommand;

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::scoring::Category;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Show which config file is used
    Path,
}

/// Run a config command.
pub fn run_config_command(cmd: ConfigCommand, config: &Config) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(config),
        ConfigCommand::Path => show_path(config),
    }
}

/// Print the effective configuration.
fn show_config(config: &Config) -> anyhow::Result<()> {
    let rules = match &config.rules_path {
        Some(path) => path.display().to_string(),
        None => "(reference bank)".to_string(),
    };

    println!("Configuration:");
    println!();
    println!("  {:12}  {}", "rules", rules);
    println!("  {:12}  {}", "top_reasons", config.top_reasons);
    println!();
    println!("Presentation:");
    for category in Category::ALL {
        let style = config.presentation.style(category);
        println!(
            "  {:8}  {:2}  #{:06x}  {}",
            category.as_str(),
            style.reaction.as_deref().unwrap_or("-"),
            style.color,
            style.verdict
        );
    }
    Ok(())
}

/// Print the config file path and whether it exists.
fn show_path(config: &Config) -> anyhow::Result<()> {
    let path = config
        .source
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    println!("{}", path.display());

    if path.exists() {
        let metadata = std::fs::metadata(path)?;
        println!("  Size: {} bytes", metadata.len());
    } else {
        println!("  (does not exist, using defaults)");
    }
    Ok(())
}
