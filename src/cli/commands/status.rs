use anyhow::{Context, Result};

use super::super::args::StatusCommand;
use super::{CommandKind, CommandResult, CommandSummary, StatusSummary, helper::finish};
use crate::core::{ProjectContext, collect_status};

/// Read-only: a missing database is reported as "no tables", never created.
pub fn status(cmd: StatusCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = ProjectContext::new(&args.common)?;
    let store = ctx.open_store();

    let report = collect_status(&store, args.domain.as_deref()).with_context(|| {
        format!(
            "Failed to read translations from {}",
            ctx.database_path.display()
        )
    })?;

    let summary = StatusSummary {
        report,
        database: ctx.database_path.clone(),
        locales: ctx.managed_locales().to_vec(),
        domain_filter: args.domain.clone(),
    };
    Ok(finish(
        CommandKind::Status,
        CommandSummary::Status(summary),
        true,
    ))
}
