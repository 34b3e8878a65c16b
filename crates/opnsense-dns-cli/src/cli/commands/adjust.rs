//! `opnsense-dns adjust` - Normalize desired endpoints.

use anyhow::Result;
use opnsense_dns::{normalize, Endpoint};
use tabled::{settings::Style, Table, Tabled};

use super::{read_json, Context};
use crate::cli::args::InputArgs;
use crate::output::print_structured;

#[derive(Tabled)]
struct AdjustedRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Set Identifier")]
    set_identifier: String,
}

pub async fn execute(ctx: Context, args: InputArgs) -> Result<()> {
    let endpoints: Vec<Endpoint> = read_json(args.file.as_deref())?;
    let adjusted = normalize(endpoints)?;

    if print_structured(ctx.settings.output, &adjusted)? {
        return Ok(());
    }

    let rows: Vec<AdjustedRow> = adjusted
        .iter()
        .map(|ep| AdjustedRow {
            name: ep.dns_name.clone(),
            record_type: ep.record_type.to_string(),
            target: super::records::truncate(&ep.targets.join(", "), 60),
            set_identifier: ep.set_identifier.chars().take(12).collect(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");

    Ok(())
}
