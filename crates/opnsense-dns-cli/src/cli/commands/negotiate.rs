//! `opnsense-dns negotiate` - Domain filter advertised to external-dns.

use anyhow::Result;
use colored::Colorize;
use opnsense_dns::DomainFilter;

use super::Context;
use crate::output::print_structured;

pub async fn execute(ctx: Context) -> Result<()> {
    let filter = DomainFilter::new(&ctx.settings.provider.domain_filter)?.config();

    if print_structured(ctx.settings.output, &filter)? {
        return Ok(());
    }

    println!("{}", "Domain Filter".bold().underline());
    println!();

    if filter.is_regex() {
        println!("  {} {}", "Regex include:".bold(), filter.regex_include.cyan());
        if !filter.regex_exclude.is_empty() {
            println!("  {} {}", "Regex exclude:".bold(), filter.regex_exclude.yellow());
        }
    } else if filter.include.is_empty() && filter.exclude.is_empty() {
        println!("  {}", "(all domains)".dimmed());
    } else {
        for domain in &filter.include {
            println!("  {} {}", "+".green(), domain);
        }
        for domain in &filter.exclude {
            println!("  {} {}", "-".red(), domain);
        }
    }

    Ok(())
}
