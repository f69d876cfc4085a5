//! Load and run a module.

use anyhow::{Context, Result};
use bootwasm_runtime::{fetch, Loader};
use colored::Colorize;

use crate::config::Config;

pub async fn run(config: &Config, json: bool) -> Result<()> {
    let fetcher = fetch::from_origin(&config.loader.origin)?;
    let loader = Loader::new(fetcher, config.diagnostic_log()).with_config(config.loader_config());

    let report = loader
        .spawn()
        .await
        .context("Load task did not complete")?
        .with_context(|| {
            format!(
                "Failed to load {} from {}",
                config.loader.resource, config.loader.origin
            )
        })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    // Status goes to stderr so stdout carries only the diagnostic stream.
    eprintln!(
        "{} {} ({} bytes): {} print call(s) in {} ms",
        "✓".green().bold(),
        report.resource.cyan(),
        report.byte_len,
        report.print_calls.to_string().cyan(),
        report.elapsed_ms
    );

    Ok(())
}
