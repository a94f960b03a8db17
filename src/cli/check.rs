//! `check` and `breakdown` commands.

use crate::config::Config;
use crate::scoring::ScoringEngine;

/// Score one piece of text and print the analysis.
pub fn run_check(
    engine: &ScoringEngine,
    config: &Config,
    text: &str,
    json: bool,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Provide text to check: ragebait check <text>");
    }

    let result = engine.classify(text);
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("Ragebait Analysis");
        println!("{}", config.presentation.render(&result));
    }
    Ok(())
}

/// Score one piece of text and print its breakdown.
pub fn run_breakdown(
    engine: &ScoringEngine,
    config: &Config,
    text: &str,
    json: bool,
) -> anyhow::Result<()> {
    if text.trim().is_empty() {
        anyhow::bail!("Provide text to check: ragebait breakdown <text>");
    }

    let breakdown = engine.breakdown(text, config.top_reasons);
    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        println!("Ragebait Breakdown");
        println!("{}", config.presentation.render_breakdown(&breakdown));
    }
    Ok(())
}
