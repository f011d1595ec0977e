//! Terminal output utilities: notes, table rendering, ANSI formatting.

use legallens_core::{DiscrepancyReport, Document, Severity};

// ---------------------------------------------------------------------------
// ANSI Color/Style helpers
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM").map(|t| t != "dumb").unwrap_or(false))
}

/// Strip ANSI escape codes from a string.
pub fn strip_ansi(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            for next in chars.by_ref() {
                if next == 'm' {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

fn paint(color: &str, s: &str) -> String {
    if supports_color() {
        format!("{color}{s}{RESET}")
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// Formatted notes (stderr, so stdout stays machine-readable)
// ---------------------------------------------------------------------------

pub fn note_info(msg: &str) {
    if supports_color() {
        eprintln!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        eprintln!("INFO: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        eprintln!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        eprintln!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        eprintln!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        eprintln!("OK: {msg}");
    }
}

// ---------------------------------------------------------------------------
// Table rendering
// ---------------------------------------------------------------------------

/// Render a left-aligned table. Cells wider than `max_width` are cut.
pub fn render_table(headers: &[&str], rows: &[Vec<String>], max_width: usize) -> String {
    let cols = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().take(cols).enumerate() {
            widths[i] = widths[i].max(strip_ansi(cell).chars().count().min(max_width));
        }
    }

    let mut out = String::new();
    let header: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad_cell(h, widths[i], max_width))
        .collect();
    out.push_str(&format!("  {}\n", header.join("  ").trim_end()));

    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&format!("  {}\n", sep.join("  ")));

    for row in rows {
        let cells: Vec<String> = (0..cols)
            .map(|i| pad_cell(row.get(i).map(String::as_str).unwrap_or(""), widths[i], max_width))
            .collect();
        out.push_str(&format!("  {}\n", cells.join("  ").trim_end()));
    }
    out
}

fn pad_cell(s: &str, width: usize, max_width: usize) -> String {
    let visible = strip_ansi(s);
    let len = visible.chars().count();
    if len > max_width {
        let cut: String = visible.chars().take(max_width.saturating_sub(1)).collect();
        return format!("{cut}…{}", " ".repeat(width.saturating_sub(max_width)));
    }
    format!("{s}{}", " ".repeat(width.saturating_sub(len)))
}

// ---------------------------------------------------------------------------
// Domain views
// ---------------------------------------------------------------------------

/// Human-readable view of an extracted document.
pub fn render_document(doc: &Document) -> String {
    let rows: Vec<Vec<String>> = doc
        .fields
        .iter()
        .map(|(key, value)| vec![key.clone(), value.to_string()])
        .collect();
    format!(
        "Document type: {}\n\n{}",
        doc.document_type,
        render_table(&["Field", "Value"], &rows, 60)
    )
}

fn severity_label(severity: Severity) -> String {
    match severity {
        Severity::High => paint(RED, "high"),
        Severity::Medium => paint(YELLOW, "medium"),
        Severity::Low => "low".to_string(),
    }
}

/// Human-readable view of a discrepancy report.
pub fn render_report(report: &DiscrepancyReport) -> String {
    let mut out = format!("{}\n", report.summary);
    let discrepancies = report.discrepancies.as_deref().unwrap_or_default();
    if !discrepancies.is_empty() {
        let rows: Vec<Vec<String>> = discrepancies
            .iter()
            .map(|d| {
                vec![
                    severity_label(d.severity),
                    serde_json::to_value(d.kind)
                        .ok()
                        .and_then(|v| v.as_str().map(str::to_string))
                        .unwrap_or_default(),
                    d.documents_involved.join(", "),
                    d.description.clone(),
                ]
            })
            .collect();
        out.push('\n');
        out.push_str(&render_table(
            &["Severity", "Type", "Documents", "Description"],
            &rows,
            60,
        ));
    }
    if let Some(recommendations) = &report.recommendations {
        out.push_str("\nRecommendations:\n");
        for r in recommendations {
            out.push_str(&format!("  - {r}\n"));
        }
    }
    out
}
