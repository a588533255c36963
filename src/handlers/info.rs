use crate::cli::Cli;
use anyhow::Result;
use argcomb::config::load_config;
use colored::*;

pub fn handle_info(cli: &Cli) -> Result<i32> {
    let config = load_config(&cli.file)?;
    let settings = config.settings.as_ref();

    let name = settings
        .and_then(|s| s.name.as_deref())
        .unwrap_or("Unnamed Combinator");
    println!("{} {} {}", "📦".green(), name.bold(), format!("({})", cli.file.display()).dimmed());

    if let Some(desc) = settings.and_then(|s| s.description.as_ref()) {
        println!("  {}", desc.italic());
    }
    if let Some(shell) = config.shell() {
        println!("  {} {}", "Shell:".bold(), shell);
    }
    println!();

    if config.vars.is_empty() {
        println!("No variables defined in configuration.");
        return Ok(0);
    }

    println!("{}", "Variables:".bold().underline());
    let max_len = config.vars.keys().map(String::len).max().unwrap_or(0);
    for (name, value) in config.var_exprs()? {
        let padding = " ".repeat(max_len - name.len() + 2);
        println!("  {}{}{}", name.cyan(), padding, value);
    }
    Ok(0)
}
