//! Command-line shell around the scoring engine.
//!
//! The shell owns everything the engine must not: reading input, running
//! counters, and presentation.

mod check;
mod config;
mod rules;
mod scan;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LogFormat};

pub use check::{run_breakdown, run_check};
pub use config::{ConfigCommand, run_config_command};
pub use rules::run_rules;
pub use scan::{run_scan, scan_lines};

#[derive(Parser, Debug)]
#[command(name = "ragebait")]
#[command(version, about = "Score chat messages for provocation")]
pub struct Cli {
    /// Rule bank file (TOML); defaults to the built-in reference bank
    #[arg(long, global = true, env = "RAGEBAIT_RULES")]
    pub rules: Option<PathBuf>,

    /// Config file; defaults to ./ragebait.toml when present
    #[arg(long, global = true, env = "RAGEBAIT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format: pretty or json
    #[arg(long, global = true, env = "RAGEBAIT_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score a piece of text
    Check {
        /// Print the full result as JSON
        #[arg(long)]
        json: bool,

        /// Text to score (joined with spaces)
        text: Vec<String>,
    },

    /// Score a piece of text and show the leading reasons and intensity
    Breakdown {
        /// Number of reasons to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Print the breakdown as JSON
        #[arg(long)]
        json: bool,

        /// Text to score (joined with spaces)
        text: Vec<String>,
    },

    /// Score every line of a file (or stdin) and summarise
    Scan {
        /// Emit one JSON object per line plus a JSON summary
        #[arg(long)]
        json: bool,

        /// Input file; reads stdin when omitted
        file: Option<PathBuf>,
    },

    /// List the loaded rule bank
    Rules {
        /// Print the rules as JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Install the global tracing subscriber. Logs go to stderr so command
/// output stays clean on stdout.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

/// Run a parsed command line.
///
/// Config inspection never builds the engine, so it still works when the
/// rule bank is broken.
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load(cli.config.as_deref())?.with_rules_path(cli.rules);

    match cli.command {
        Command::Config(cmd) => run_config_command(cmd, &config),
        Command::Check { json, text } => {
            run_check(&config.engine()?, &config, &text.join(" "), json)
        }
        Command::Breakdown { top, json, text } => {
            let engine = config.engine()?;
            let config = config.with_top_reasons(top);
            run_breakdown(&engine, &config, &text.join(" "), json)
        }
        Command::Scan { json, file } => {
            run_scan(&config.engine()?, &config, file.as_deref(), json)
        }
        Command::Rules { json } => run_rules(&config.engine()?, json),
    }
}
