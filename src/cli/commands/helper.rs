use super::{CommandKind, CommandResult, CommandSummary};

pub fn finish(kind: CommandKind, summary: CommandSummary, exit_on_errors: bool) -> CommandResult {
    let (error_count, warning_count) = match &summary {
        CommandSummary::Import(run) => (run.totals.files_failed, run.totals.files_skipped),
        CommandSummary::Status(_) => (0, 0),
        CommandSummary::Init(init) => (usize::from(init.error.is_some()), 0),
    };

    CommandResult {
        kind,
        summary,
        error_count,
        warning_count,
        exit_on_errors,
    }
}
