use super::build_combiner;
use crate::cli::Cli;
use anyhow::Result;
use argcomb::config::load_config;
use colored::*;

pub fn handle_explain(cli: &Cli) -> Result<i32> {
    let config = load_config(&cli.file)?;
    let combiner = build_combiner(cli, &config)?;
    let expr = config.command_expr()?;

    let mut count = 0;
    for item in combiner.commands(&expr)? {
        let (command, env) = item?;
        count += 1;
        println!("{} {}", format!("[{}]", count).cyan(), command.bold());
        if env.is_empty() {
            println!("    {}", "(no variables)".dimmed());
        }
        for (name, value) in env.iter() {
            println!("    {} = {}", name.yellow(), value);
        }
    }

    if count == 0 {
        println!("No commands produced.");
    }
    Ok(0)
}
