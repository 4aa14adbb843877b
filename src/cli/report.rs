//! Report formatting and printing utilities.
//!
//! Extracted text is shown cargo-style: a header with the text and its key,
//! a clickable `--> path:line:col` location, and the source line with a
//! caret under the text. Kept apart from the engine so the library never
//! prints on its own.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::{EntryStatus, FailedFile, KeyCollision, RunReport, TranslationEntry};
use crate::utils::plural;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// What happened to the dictionary artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractSummary {
    pub applied: bool,
    pub files_scanned: usize,
    pub files_rewritten: usize,
    pub new_entries: usize,
    pub updated_entries: usize,
    pub dictionary_size: usize,
    pub dictionary_path: String,
}

/// Print every entry that would be (or was) rewritten.
pub fn print_entries(report: &RunReport) {
    print_entries_to(report, &mut io::stdout().lock());
}

pub fn print_entries_to<W: Write>(report: &RunReport, writer: &mut W) {
    let pending: Vec<(&str, &TranslationEntry)> = report
        .processed
        .iter()
        .flat_map(|file| {
            file.outcome
                .entries
                .iter()
                .filter(|entry| entry.status != EntryStatus::Unchanged)
                .map(move |entry| (file.file_path.as_str(), entry))
        })
        .collect();

    let max_line_width = pending
        .iter()
        .filter_map(|(_, entry)| entry.position.as_ref())
        .map(|position| position.line.to_string().len())
        .max()
        .unwrap_or(1);

    for (file_path, entry) in pending {
        print_entry(file_path, entry, writer, max_line_width);
    }
}

pub fn print_collisions(collisions: &[KeyCollision]) {
    print_collisions_to(collisions, &mut io::stderr().lock());
}

pub fn print_collisions_to<W: Write>(collisions: &[KeyCollision], writer: &mut W) {
    for collision in collisions {
        let _ = writeln!(
            writer,
            "{} key {} maps to different text: \"{}\" and \"{}\"",
            "warning:".bold().yellow(),
            collision.key.cyan(),
            collision.previous,
            collision.incoming
        );
    }
}

pub fn print_failures(failures: &[FailedFile], verbose: bool) {
    print_failures_to(failures, verbose, &mut io::stderr().lock());
}

/// Failures are listed one per line; without `-v` only the first line of
/// each error chain is shown.
pub fn print_failures_to<W: Write>(failures: &[FailedFile], verbose: bool, writer: &mut W) {
    for failure in failures {
        let error = if verbose {
            failure.error.as_str()
        } else {
            failure.error.lines().next().unwrap_or_default()
        };
        let _ = writeln!(
            writer,
            "{} {}: {}",
            "error:".bold().red(),
            failure.file_path,
            error
        );
    }
}

pub fn print_summary(summary: &ExtractSummary, failures: usize) {
    print_summary_to(summary, failures, &mut io::stdout().lock());
}

pub fn print_summary_to<W: Write>(summary: &ExtractSummary, failures: usize, writer: &mut W) {
    let changes = summary.new_entries + summary.updated_entries;

    let headline = if summary.applied {
        format!(
            "Rewrote {}, {} in {} ({})",
            plural(summary.files_rewritten, "file"),
            plural(summary.dictionary_size, "key"),
            summary.dictionary_path,
            describe_changes(summary)
        )
    } else if changes == 0 {
        format!(
            "Scanned {} - nothing to extract",
            plural(summary.files_scanned, "source file")
        )
    } else {
        format!(
            "Scanned {} - would rewrite {}, {} in {} ({}); run with {} to apply",
            plural(summary.files_scanned, "source file"),
            plural(summary.files_rewritten, "file"),
            plural(summary.dictionary_size, "key"),
            summary.dictionary_path,
            describe_changes(summary),
            "--apply"
        )
    };

    if failures == 0 {
        let _ = writeln!(writer, "{} {}", SUCCESS_MARK.green(), headline.green());
    } else {
        let _ = writeln!(
            writer,
            "{} {}; {} failed",
            FAILURE_MARK.red(),
            headline,
            plural(failures, "file").red()
        );
    }
}

// ============================================================
// Internal Functions
// ============================================================

fn describe_changes(summary: &ExtractSummary) -> String {
    format!(
        "{} new, {} updated",
        summary.new_entries, summary.updated_entries
    )
}

fn print_entry<W: Write>(
    file_path: &str,
    entry: &TranslationEntry,
    writer: &mut W,
    max_line_width: usize,
) {
    let label = match entry.status {
        EntryStatus::Updated => "update".bold().yellow(),
        _ => "extract".bold().green(),
    };
    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        label,
        entry.value,
        entry.key.dimmed().cyan()
    );

    let Some(position) = &entry.position else {
        let _ = writeln!(writer, "  {} {}", "-->".blue(), file_path);
        let _ = writeln!(writer);
        return;
    };

    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        file_path,
        position.line,
        position.col
    );
    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        position.line.to_string().blue(),
        "|".blue(),
        position.source_line,
        width = max_line_width
    );

    // col is 1-based and counts display columns
    let prefix: String = position
        .source_line
        .chars()
        .scan(0, |width, c| {
            *width += UnicodeWidthChar::width(c).unwrap_or(0);
            (*width < position.col).then_some(c)
        })
        .collect();
    let caret_padding = UnicodeWidthStr::width(prefix.as_str());
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        "^".green(),
        width = max_line_width,
        padding = caret_padding
    );
    let _ = writeln!(writer);
}

// ============================================================
// Tests
// ============================================================
