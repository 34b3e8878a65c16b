//! `opnsense-dns records` - Current records as external-dns sees them.

use anyhow::Result;
use colored::Colorize;
use opnsense_dns::Endpoint;
use tabled::{settings::Style, Table, Tabled};

use super::Context;
use crate::output::print_structured;

#[derive(Tabled)]
pub(crate) struct EndpointRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "UUID")]
    uuid: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Endpoint> for EndpointRow {
    fn from(ep: &Endpoint) -> Self {
        Self {
            name: ep.dns_name.clone(),
            record_type: ep.record_type.to_string(),
            target: truncate(&ep.targets.join(", "), 60),
            uuid: ep.uuid().unwrap_or("-").to_string(),
            description: truncate(ep.description().unwrap_or(""), 40),
        }
    }
}

pub async fn execute(ctx: Context) -> Result<()> {
    let provider = ctx.provider()?;
    let records = provider.records().await?;

    if print_structured(ctx.settings.output, &records)? {
        return Ok(());
    }

    if records.is_empty() {
        println!("{}", "No records found.".dimmed());
        return Ok(());
    }

    let rows: Vec<EndpointRow> = records.iter().map(EndpointRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    println!("{table}");
    println!();
    println!("{} {}", "Total:".bold(), records.len().to_string().cyan());

    Ok(())
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        s.to_string()
    }
}
