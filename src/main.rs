mod cli;
mod handlers;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use handlers::{explain, info, run};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let code = if cli.info {
        info::handle_info(&cli)?
    } else if cli.explain {
        explain::handle_explain(&cli)?
    } else {
        run::handle_run(&cli)?
    };

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
