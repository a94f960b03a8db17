//! `scan` command: classify a stream of messages, one per line.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::Config;
use crate::scoring::{ClassificationResult, ScoringEngine};
use crate::stats::StatsCollector;

/// Classify each non-empty line of `reader`, calling `on_line` with the
/// 1-based line number, the text and its result. Returns the counters.
pub fn scan_lines<R, F>(
    engine: &ScoringEngine,
    reader: R,
    mut on_line: F,
) -> io::Result<StatsCollector>
where
    R: BufRead,
    F: FnMut(usize, &str, &ClassificationResult) -> io::Result<()>,
{
    let mut stats = StatsCollector::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let result = engine.classify(&line);
        stats.record(&result);
        on_line(index + 1, &line, &result)?;
    }
    Ok(stats)
}

/// Scan a file or stdin and print flagged lines and a summary.
pub fn run_scan(
    engine: &ScoringEngine,
    config: &Config,
    file: Option<&Path>,
    json: bool,
) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = match file {
        Some(path) => Box::new(BufReader::new(File::open(path).map_err(|e| {
            anyhow::anyhow!("Failed to open {}: {}", path.display(), e)
        })?)),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stats = scan_lines(engine, reader, |line_no, text, result| {
        if json {
            let record = serde_json::json!({
                "line": line_no,
                "text": text,
                "result": result,
            });
            println!("{}", record);
        } else if result.is_flagged() {
            let reaction = config.presentation.reaction(result.category).unwrap_or("-");
            println!(
                "{} {}: [{} {:.2}] {}",
                reaction, line_no, result.category, result.score, text
            );
        }
        Ok(())
    })?;

    let summary = stats.summary();
    tracing::info!(
        messages = summary.messages_processed,
        flagged = summary.flagged,
        "Scan complete"
    );

    if json {
        println!("{}", serde_json::json!({ "summary": summary }));
        return Ok(());
    }

    println!();
    println!(
        "Scanned {} messages, {} flagged ({:.1}%)",
        summary.messages_processed,
        summary.flagged,
        summary.flag_rate * 100.0
    );
    for (category, count) in &summary.by_category {
        println!("  {:8} {}", category.as_str(), count);
    }
    println!("Mean score: {:.2}", summary.mean_score);
    if let Some((reason, count)) = &summary.top_reason {
        println!("Most common indicator: {} ({})", reason, count);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use crate::scoring::Category;

    #[test]
    fn test_scan_lines_skips_blank_and_counts() {
        let engine = ScoringEngine::reference().unwrap();
        let input = "lunch at noon?\n\n   \nYOU ARE ALL IDIOTS!!!! WAKE UP SHEEPLE!!!\nthanks for the help\n";
        let mut seen = Vec::new();
        let stats = scan_lines(&engine, Cursor::new(input), |line_no, _, result| {
            seen.push((line_no, result.category));
            Ok(())
        })
        .unwrap();

        assert_eq!(stats.messages_processed(), 3);
        assert_eq!(stats.flagged(), 1);
        assert_eq!(
            seen,
            vec![
                (1, Category::None),
                (4, Category::Extreme),
                (5, Category::None),
            ]
        );
    }

    #[test]
    fn test_scan_lines_propagates_callback_error() {
        let engine = ScoringEngine::reference().unwrap();
        let err = scan_lines(&engine, Cursor::new("one\ntwo\n"), |_, _, _| {
            Err(io::Error::other("closed"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "closed");
    }
}
