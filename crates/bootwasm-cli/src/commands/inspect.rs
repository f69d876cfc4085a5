//! Fetch and compile a module without running it.

use anyhow::{Context, Result};
use bootwasm_runtime::{fetch, Loader};
use colored::Colorize;

use crate::config::Config;

pub async fn run(config: &Config, json: bool) -> Result<()> {
    let fetcher = fetch::from_origin(&config.loader.origin)?;
    let loader = Loader::new(fetcher, config.diagnostic_log()).with_config(config.loader_config());

    let interface = loader
        .inspect()
        .await
        .with_context(|| format!("Failed to compile {}", config.loader.resource))?;
    let unsatisfied: Vec<_> = interface
        .unsatisfied(&config.imports)
        .into_iter()
        .cloned()
        .collect();
    let has_entry = interface.exports_named(&config.loader.entry_point);

    if json {
        let value = serde_json::json!({
            "resource": config.loader.resource,
            "imports": interface.imports,
            "exports": interface.exports,
            "unsatisfied": unsatisfied,
            "has_entry_point": has_entry,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Imports".bold());
    if interface.imports.is_empty() {
        println!("  (none)");
    }
    for import in &interface.imports {
        let provided = config.imports.provides(&import.module, &import.name);
        let mark = if provided { "✓".green() } else { "✗".red() };
        println!("  {} {}.{}: {}", mark, import.module, import.name, import.kind.dimmed());
    }

    println!("{}", "Exports".bold());
    if interface.exports.is_empty() {
        println!("  (none)");
    }
    for export in &interface.exports {
        println!("  • {}: {}", export.name.cyan(), export.kind.dimmed());
    }

    println!();
    if !unsatisfied.is_empty() {
        println!(
            "{} {} import(s) not provided; instantiation would fail",
            "•".yellow(),
            unsatisfied.len()
        );
    }
    if !has_entry {
        println!(
            "{} no `{}` export to run",
            "•".yellow(),
            config.loader.entry_point
        );
    }
    if unsatisfied.is_empty() && has_entry {
        println!("{} Ready to run", "✓".green().bold());
    }

    Ok(())
}
