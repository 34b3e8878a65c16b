//! `opnsense-dns config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::print_structured;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&ctx, &key, &value),
        ConfigCommands::Path => {
            println!("{}", ctx.config_path.display());
            Ok(())
        }
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load(&ctx.config_path)?.masked();

    if print_structured(ctx.settings.output, &config)? {
        return Ok(());
    }

    println!("{} {}", "Configuration:".bold(), ctx.config_path.display().to_string().dimmed());
    println!();

    let content = toml::to_string_pretty(&config)?;
    if content.trim().is_empty() {
        println!("  {}", "(empty)".dimmed());
    }
    for line in content.lines() {
        match line.split_once(" = ") {
            Some((key, value)) => println!("  {} {}", format!("{key}:").bold(), value),
            None => println!("  {line}"),
        }
    }

    Ok(())
}

fn set_config(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(&ctx.config_path)?;
    config.set(key, value)?;
    config.save(&ctx.config_path)?;

    let shown = if key.starts_with("api_") { "****" } else { value };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());

    Ok(())
}
