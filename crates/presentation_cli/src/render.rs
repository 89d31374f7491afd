//! Human and machine renderings of a terminal report.

use std::fmt::Write as _;

use domain::TerminalReport;

/// Render a report for the terminal
pub fn summary(report: &TerminalReport) -> String {
    let mut out = format!(
        "Conversation {} finished in {}: {}/{} cycles ({} ms)",
        report.run_id,
        report.final_state,
        report.cycles_completed,
        report.target_cycles,
        report.elapsed_ms()
    );

    let path = report
        .visited
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" -> ");
    let _ = write!(out, "\nStates: {path}");

    if report.cancelled {
        out.push_str("\nCancelled before reaching the cycle target.");
    }

    if report.had_failures() {
        let _ = write!(out, "\nFallbacks used: {}", report.failures.len());
        for failure in &report.failures {
            let _ = write!(
                out,
                "\n  cycle {} {}: {}",
                failure.cycle, failure.state, failure.message
            );
        }
    }

    out
}

/// Render a report as pretty-printed JSON
///
/// # Errors
///
/// Returns a serialization error from `serde_json`.
pub fn json(report: &TerminalReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}
