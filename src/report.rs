//! Output formatting for headless commands.
//!
//! Pure functions: (report, OutputFormat) → String. No I/O.

use serde::Serialize;

use crate::types::{Feedback, OutputFormat, ThemeMode};

/// Result of replaying a key sequence through the keypad.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionReport {
    /// Labels that were dispatched, in order.
    pub keys: Vec<String>,
    /// Labels that matched no button and were ignored.
    pub ignored: Vec<String>,
    /// One entry per dispatched key.
    pub feedback: Vec<Feedback>,
    /// Display text after the last key.
    pub display: String,
    pub theme: ThemeMode,
}

/// Result of a one-shot evaluation.
#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    /// Expression after whitespace removal.
    pub expression: String,
    /// Formatted result, or None on error.
    pub result: Option<String>,
    pub error: Option<String>,
}

pub fn format_session(report: &SessionReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_session_human(report),
        OutputFormat::Json => to_json(report),
    }
}

pub fn format_eval(report: &EvalReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => match (&report.result, &report.error) {
            (Some(result), _) => format!("{}\n", result),
            (None, Some(error)) => format!("Error: {}\n", error),
            (None, None) => "\n".to_string(),
        },
        OutputFormat::Json => to_json(report),
    }
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_session_human(report: &SessionReport) -> String {
    let mut out = String::new();

    if !report.feedback.is_empty() {
        out.push_str("=== Feedback ===\n");
        for (key, feedback) in report.keys.iter().zip(&report.feedback) {
            let chime = if feedback.chime { " ♪" } else { "" };
            out.push_str(&format!("  {:>2}  {}{}\n", key, feedback.phrase, chime));
        }
        out.push('\n');
    }

    if !report.ignored.is_empty() {
        out.push_str(&format!("Ignored keys: {}\n\n", report.ignored.join(" ")));
    }

    out.push_str("=== Display ===\n");
    out.push_str(&format!("{}\n", report.display));

    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn to_json<T: Serialize>(value: &T) -> String {
    // Only plain strings, bools and enums in these types
    let mut json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| panic!("Failed to serialize report to JSON: {}", e));
    json.push('\n');
    json
}

// ============================================================================
// TESTS
// ============================================================================
