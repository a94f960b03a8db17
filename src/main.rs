//! `ragebait` command-line entry point.

use clap::Parser;

use ragebait::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    // Load .env before clap reads env-backed flags
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli::init_tracing(cli.log_format);

    cli::run(cli)
}
