//! Console output for run progress.

use owo_colors::OwoColorize;
use pprecalc::{Progress, RecalcSummary, RowOutcome, RowReport, SkipReason};

pub fn matched_line(count: usize) -> String {
    if count == 0 {
        "Failed to find any scores.".to_string()
    } else {
        format!("Found {} scores to recalculate.", count)
    }
}

pub fn row_line(report: &RowReport) -> String {
    match &report.outcome {
        RowOutcome::Updated { pp, loved: false } => {
            format!("Updated {} to {:.2}pp.", report.score_id, pp)
        }
        RowOutcome::Updated { pp, loved: true } => {
            format!("Updated {} to {:.2} (loved).", report.score_id, pp)
        }
        RowOutcome::Skipped { reason } => format!("{} ({})", reason, report.score_id),
    }
}

/// Skips printed in red
fn is_failure(reason: &SkipReason) -> bool {
    !matches!(reason, SkipReason::MissingBeatmap)
}

pub fn print_progress(progress: &Progress) {
    match progress {
        Progress::Matched(0) => println!("{}", matched_line(0).bright_red()),
        Progress::Matched(count) => println!("{}", matched_line(*count)),
        Progress::Row(report) => {
            let line = row_line(report);
            match report.outcome.skip_reason() {
                Some(reason) if is_failure(reason) => println!("{}", line.bright_red()),
                _ => println!("{}", line),
            }
        }
    }
}

pub fn print_summary(summary: &RecalcSummary) {
    println!();
    println!(
        "Done: {} matched, {} updated, {} skipped in {:.1}s",
        summary.matched,
        summary.updated.green(),
        summary.skipped.total(),
        summary.elapsed_secs
    );

    let skipped = &summary.skipped;
    let breakdown = [
        ("missing beatmap", skipped.missing_beatmap),
        ("map unavailable", skipped.map_unavailable),
        ("map invalid", skipped.map_invalid),
        ("engine failed", skipped.engine_failed),
        ("rejected", skipped.rejected),
        ("persist failed", skipped.persist_failed),
        ("worker failed", skipped.worker_failed),
    ];
    for (label, count) in breakdown.into_iter().filter(|(_, count)| *count > 0) {
        println!("  {:<16} {}", label, count);
    }

    if summary.not_attempted > 0 {
        println!(
            "{}",
            format!("Interrupted: {} scores not attempted", summary.not_attempted).yellow()
        );
    }
}
