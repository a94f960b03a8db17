//! `rules` command: list the loaded rule bank in evaluation order.

use serde::Serialize;

use crate::scoring::ScoringEngine;

#[derive(Debug, Serialize)]
struct RuleListing<'a> {
    name: &'a str,
    version: u32,
    signals: Vec<SignalRow<'a>>,
    intensifiers: Vec<IntensifierRow<'a>>,
}

#[derive(Debug, Serialize)]
struct SignalRow<'a> {
    id: &'a str,
    label: &'a str,
    weight: f64,
    case_sensitive: bool,
    matcher: String,
}

#[derive(Debug, Serialize)]
struct IntensifierRow<'a> {
    id: &'a str,
    multiplier: f64,
    case_sensitive: bool,
    matcher: String,
}

fn listing(engine: &ScoringEngine) -> RuleListing<'_> {
    let bank = engine.bank();
    RuleListing {
        name: bank.name(),
        version: bank.version(),
        signals: bank
            .signals()
            .iter()
            .map(|s| SignalRow {
                id: &s.id,
                label: &s.label,
                weight: s.weight,
                case_sensitive: s.case_sensitive,
                matcher: s.matcher().describe(),
            })
            .collect(),
        intensifiers: bank
            .intensifiers()
            .iter()
            .map(|i| IntensifierRow {
                id: &i.id,
                multiplier: i.multiplier,
                case_sensitive: i.case_sensitive,
                matcher: i.matcher().describe(),
            })
            .collect(),
    }
}

/// Print the rule bank.
pub fn run_rules(engine: &ScoringEngine, json: bool) -> anyhow::Result<()> {
    let listing = listing(engine);
    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Rule bank '{}' (v{})", listing.name, listing.version);
    println!();
    println!("Signals:");
    for row in &listing.signals {
        let case = if row.case_sensitive { "Aa" } else { "" };
        println!(
            "  {:26} {:>5.2} {:2} {}",
            row.id, row.weight, case, row.label
        );
    }
    println!();
    println!("Intensifiers:");
    for row in &listing.intensifiers {
        println!("  {:26} x{:<5.2} {}", row.id, row.multiplier, row.matcher);
    }
    Ok(())
}
