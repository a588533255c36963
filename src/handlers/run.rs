use super::build_combiner;
use crate::cli::Cli;
use anyhow::Result;
use argcomb::config::load_config;
use colored::*;
use log::info;

pub fn handle_run(cli: &Cli) -> Result<i32> {
    let config = load_config(&cli.file)?;
    let combiner = build_combiner(cli, &config)?;
    let expr = config.command_expr()?;

    if let Some(name) = config.settings.as_ref().and_then(|s| s.name.as_ref()) {
        info!("{} Running: {}", "⚡".yellow(), name.bold());
    }

    combiner.run(&expr)
}
