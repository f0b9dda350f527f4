use std::path::PathBuf;

use crate::core::{ImportSummary, StatusReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    Import,
    Status,
    Init,
}

#[derive(Debug)]
pub enum CommandSummary {
    Import(ImportRunSummary),
    Status(StatusSummary),
    Init(InitSummary),
}

#[derive(Debug)]
pub struct ImportRunSummary {
    pub totals: ImportSummary,
    /// Cached catalogues removed, `None` unless `--cache-clear` was given.
    pub cache_files_removed: Option<usize>,
    pub database: PathBuf,
}

#[derive(Debug)]
pub struct StatusSummary {
    pub report: StatusReport,
    pub database: PathBuf,
    /// Managed locales, shown as columns even when they have no translations.
    pub locales: Vec<String>,
    pub domain_filter: Option<String>,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running transync commands
pub struct CommandResult {
    pub kind: CommandKind,
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// If true, exit code 1 should be returned when error_count > 0.
    /// If false, always exit 0 (import reports unreadable files but still succeeds).
    pub exit_on_errors: bool,
}
