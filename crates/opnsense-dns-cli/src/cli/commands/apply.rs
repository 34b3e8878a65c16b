//! `opnsense-dns apply` - Apply a changeset.

use anyhow::Result;
use colored::Colorize;
use opnsense_dns::Changes;
use tracing::info;

use super::{read_json, Context};
use crate::cli::args::InputArgs;
use crate::output::print_structured;

pub async fn execute(ctx: Context, args: InputArgs) -> Result<()> {
    let changes: Changes = read_json(args.file.as_deref())?;
    let provider = ctx.provider()?;

    let report = provider.apply_changes(&changes).await?;
    info!(
        created = report.created,
        updated = report.updated,
        deleted = report.deleted,
        skipped = report.skipped,
        dry_run = ctx.settings.dry_run,
        "Changeset applied"
    );

    if print_structured(ctx.settings.output, &report)? {
        return Ok(());
    }

    if ctx.settings.dry_run {
        println!("{}", "Dry run: no changes were made.".yellow());
    }

    println!(
        "{} {} created, {} updated, {} deleted",
        "Applied:".green().bold(),
        report.created.to_string().cyan(),
        report.updated.to_string().cyan(),
        report.deleted.to_string().cyan()
    );

    if report.skipped > 0 {
        println!(
            "{} {} endpoint(s) with unsupported record types",
            "Skipped:".yellow().bold(),
            report.skipped
        );
    }

    Ok(())
}
