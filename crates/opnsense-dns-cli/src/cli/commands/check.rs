//! `opnsense-dns check` - Verify the Unbound service is running.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::output::print_structured;

pub async fn execute(ctx: Context) -> Result<()> {
    let client = ctx.client()?;
    let service = client.service().check_unbound().await?;

    if print_structured(ctx.settings.output, &service)? {
        return Ok(());
    }

    println!(
        "{} {} is running on {}",
        "OK:".green().bold(),
        if service.description.is_empty() { "unbound" } else { service.description.as_str() },
        client.base_url().cyan()
    );

    Ok(())
}
