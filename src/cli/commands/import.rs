use std::io::{self, Write};

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::super::{args::ImportCommand, report};
use super::{CommandKind, CommandResult, CommandSummary, ImportRunSummary, helper::finish};
use crate::core::{
    CacheInvalidator, ImportSummary, Importer, LoaderRegistry, ProjectContext, SourceRoot,
    TranslationStore, find_translation_files,
};

pub fn import(cmd: ImportCommand) -> Result<CommandResult> {
    let args = &cmd.args;
    let ctx = ProjectContext::new(&args.common)?;
    let policy = args.commit.unwrap_or(ctx.config.commit_policy);

    let mut store = ctx.open_store();
    store.install_schema().with_context(|| {
        format!(
            "Failed to prepare database {}",
            ctx.database_path.display()
        )
    })?;
    info!(database = %ctx.database_path.display(), ?policy, "importing");

    let mut importer = Importer::new(&mut store, LoaderRegistry::default(), policy);
    let mut totals = ImportSummary::default();
    let mut out = io::stdout().lock();

    let mut sources = ctx.source_roots().into_iter();
    if let Some(app) = sources.next() {
        report::print_heading_to("Importing application translation files", &mut out);
        import_source(&ctx, &app, &mut importer, &mut totals, &mut out)?;
    }

    let bundles: Vec<SourceRoot> = sources.collect();
    if !bundles.is_empty() {
        report::print_heading_to("Importing bundles translation files", &mut out);
        for bundle in &bundles {
            report::print_bundle_heading_to(&bundle.name, &mut out);
            import_source(&ctx, bundle, &mut importer, &mut totals, &mut out)?;
        }
    }

    let cache_files_removed = if args.cache_clear {
        report::print_cache_clear_to(&mut out);
        let removed = ctx
            .catalogue_cache()
            .invalidate_locales(ctx.managed_locales())
            .context("Failed to remove translations cache files")?;
        Some(removed)
    } else {
        None
    };

    let summary = ImportRunSummary {
        totals,
        cache_files_removed,
        database: ctx.database_path.clone(),
    };
    Ok(finish(
        CommandKind::Import,
        CommandSummary::Import(summary),
        false,
    ))
}

fn import_source<S: TranslationStore, W: Write>(
    ctx: &ProjectContext,
    source: &SourceRoot,
    importer: &mut Importer<'_, S>,
    totals: &mut ImportSummary,
    out: &mut W,
) -> Result<()> {
    let discovery = find_translation_files(
        &source.path,
        &ctx.config.resources_dir,
        ctx.managed_locales(),
        &ctx.ignores,
    );

    if discovery.skipped_count > 0 {
        warn!(
            source = %source.name,
            count = discovery.skipped_count,
            "paths skipped due to access errors"
        );
    }

    if discovery.directory.is_none() {
        report::print_no_files_to(out);
        return Ok(());
    }

    for file in &discovery.files {
        let file_report = importer
            .import_file(file)
            .with_context(|| format!("Failed to import {}", file.path.display()))?;
        report::print_file_report_to(&file_report, out);
        totals.record(&file_report);
    }

    Ok(())
}
