//! Report formatting and printing utilities.
//!
//! Kept apart from the import engine so transync can be used as a library.
//! Every printer has a `_to` variant taking a writer, used by tests.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CommandResult, CommandSummary, ImportRunSummary, InitSummary, StatusSummary,
};
use crate::core::{FileOutcome, FileReport};
use crate::utils::{pad_left, pad_right, plural};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

const DOMAIN_HEADER: &str = "Domain";
const UNITS_HEADER: &str = "Units";

/// `*** <title> ***`
pub fn print_heading_to<W: Write>(title: &str, writer: &mut W) {
    let _ = writeln!(writer, "{}", format!("*** {} ***", title).green());
}

pub fn print_bundle_heading_to<W: Write>(name: &str, writer: &mut W) {
    let _ = writeln!(writer, "{}", format!("# {} :", name).green());
}

pub fn print_no_files_to<W: Write>(writer: &mut W) {
    let _ = writeln!(
        writer,
        "{}",
        "No file to import for managed locales.".yellow()
    );
}

pub fn print_cache_clear_to<W: Write>(writer: &mut W) {
    let _ = writeln!(writer, "{}", "Removing translations cache files ...".green());
}

/// One line per imported file: `Importing "<path>" ... N translations`.
pub fn print_file_report_to<W: Write>(report: &FileReport, writer: &mut W) {
    let prefix = format!("Importing \"{}\" ...", report.file.path.display());
    let _ = match &report.outcome {
        FileOutcome::Imported(stats) => writeln!(
            writer,
            "{} {}",
            prefix.yellow(),
            format!(
                "{} {}",
                stats.imported,
                plural(stats.imported, "translation", "translations")
            )
            .yellow()
        ),
        FileOutcome::Skipped(reason) => writeln!(
            writer,
            "{} {}",
            prefix.yellow(),
            format!("skipped ({})", reason).dimmed()
        ),
        FileOutcome::Failed(error) => writeln!(
            writer,
            "{} {} {}",
            prefix.yellow(),
            "failed:".bold().red(),
            error
        ),
    };
}

pub fn print(result: &CommandResult, verbose: bool) {
    let mut out = io::stdout().lock();
    let mut err = io::stderr().lock();
    print_to(result, verbose, &mut out, &mut err);
}

pub fn print_to<O: Write, E: Write>(result: &CommandResult, verbose: bool, out: &mut O, err: &mut E) {
    match &result.summary {
        CommandSummary::Import(summary) => {
            print_import_summary_to(summary, out);
            print_import_warnings_to(summary, verbose, err);
        }
        CommandSummary::Status(summary) => print_status_to(summary, out),
        CommandSummary::Init(summary) => print_init_to(summary, out, err),
    }
}

// ============================================================
// Import
// ============================================================

fn print_import_summary_to<W: Write>(summary: &ImportRunSummary, writer: &mut W) {
    let totals = &summary.totals;

    if let Some(removed) = summary.cache_files_removed {
        let _ = writeln!(
            writer,
            "Removed {} cache {}",
            removed,
            plural(removed, "file", "files")
        );
    }

    let _ = writeln!(writer);
    if totals.files_seen() == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "No translation files found - nothing imported".green()
        );
        return;
    }

    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Imported {} {} from {} {} into {}",
            totals.translations_imported,
            plural(totals.translations_imported, "translation", "translations"),
            totals.files_imported,
            plural(totals.files_imported, "file", "files"),
            summary.database.display()
        )
        .green()
    );

    if totals.units_created > 0 {
        let _ = writeln!(
            writer,
            "  - {} new translation {}",
            totals.units_created,
            plural(totals.units_created, "unit", "units")
        );
    }
    if totals.entries_skipped > 0 {
        let _ = writeln!(
            writer,
            "  - {} {} with a blank key skipped",
            totals.entries_skipped,
            plural(totals.entries_skipped, "entry", "entries")
        );
    }
}

fn print_import_warnings_to<W: Write>(summary: &ImportRunSummary, verbose: bool, writer: &mut W) {
    let totals = &summary.totals;
    let hint = if verbose {
        String::new()
    } else {
        format!(" (use {} for details)", "-v".cyan())
    };

    if totals.files_skipped > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} skipped: no loader for the extension",
            "warning:".bold().yellow(),
            totals.files_skipped,
            plural(totals.files_skipped, "file", "files")
        );
    }
    if totals.files_failed > 0 {
        let _ = writeln!(
            writer,
            "{} {} {} could not be loaded{}",
            "warning:".bold().yellow(),
            totals.files_failed,
            plural(totals.files_failed, "file", "files"),
            hint
        );
    }
}

// ============================================================
// Status
// ============================================================

fn print_status_to<W: Write>(summary: &StatusSummary, writer: &mut W) {
    let report = &summary.report;

    if !report.tables_exist {
        let _ = writeln!(
            writer,
            "{} Translation tables do not exist in {}",
            FAILURE_MARK.red(),
            summary.database.display()
        );
        let _ = writeln!(writer, "Run {} to create them.", "transync import".cyan());
        return;
    }

    let _ = writeln!(writer, "{} {}", "Database:".bold(), summary.database.display());
    let latest = report
        .latest_updated_at
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    let _ = writeln!(writer, "{} {}", "Last update:".bold(), latest);
    let _ = writeln!(writer);

    if report.domains.is_empty() {
        let msg = match &summary.domain_filter {
            Some(domain) => format!("No translation units found for domain \"{}\"", domain),
            None => "No translation units found".to_string(),
        };
        let _ = writeln!(writer, "{}", msg.yellow());
        return;
    }

    // Managed locales first, then any other locale present in the database.
    let mut locales: Vec<&str> = summary.locales.iter().map(String::as_str).collect();
    for locale in report.locales() {
        if !locales.contains(&locale) {
            locales.push(locale);
        }
    }

    let domain_width = report
        .domains
        .iter()
        .map(|d| UnicodeWidthStr::width(d.domain.as_str()))
        .chain(std::iter::once(DOMAIN_HEADER.len()))
        .max()
        .unwrap_or(DOMAIN_HEADER.len());
    let count_width = |header: &str, counts: &mut dyn Iterator<Item = usize>| {
        counts
            .map(|n| n.to_string().len())
            .chain(std::iter::once(UnicodeWidthStr::width(header)))
            .max()
            .unwrap_or(header.len())
    };
    let units_width = count_width(
        UNITS_HEADER,
        &mut report.domains.iter().map(|d| d.units),
    );
    let locale_widths: Vec<usize> = locales
        .iter()
        .map(|&locale| {
            count_width(
                locale,
                &mut report.domains.iter().map(|d| d.translations(locale)),
            )
        })
        .collect();

    let mut header = format!(
        "{}  {}",
        pad_right(DOMAIN_HEADER, domain_width),
        pad_left(UNITS_HEADER, units_width)
    );
    for (locale, width) in locales.iter().zip(&locale_widths) {
        header.push_str("  ");
        header.push_str(&pad_left(locale, *width));
    }
    let _ = writeln!(writer, "{}", header.trim_end().bold());

    for stats in &report.domains {
        let mut row = format!(
            "{}  {}",
            pad_right(&stats.domain, domain_width),
            pad_left(&stats.units.to_string(), units_width)
        );
        for (locale, width) in locales.iter().zip(&locale_widths) {
            row.push_str("  ");
            row.push_str(&pad_left(&stats.translations(locale).to_string(), *width));
        }
        let _ = writeln!(writer, "{}", row.trim_end());
    }

    let total = report.total_units();
    let _ = writeln!(writer);
    let _ = writeln!(
        writer,
        "{} translation {} in {} {}",
        total,
        plural(total, "unit", "units"),
        report.domains.len(),
        plural(report.domains.len(), "domain", "domains")
    );
}

// ============================================================
// Init
// ============================================================

fn print_init_to<O: Write, E: Write>(summary: &InitSummary, out: &mut O, err: &mut E) {
    if let Some(error) = &summary.error {
        let _ = writeln!(err, "Error: {}", error);
        return;
    }
    if summary.created {
        let _ = writeln!(
            out,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", crate::config::CONFIG_FILE_NAME).green()
        );
    }
}
