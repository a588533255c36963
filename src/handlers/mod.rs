pub mod explain;
pub mod info;
pub mod run;

use crate::cli::Cli;
use anyhow::Result;
use argcomb::Combiner;
use argcomb::config::CombinatorFile;

/// Command-line values first, then the file's `[vars]` as defaults.
pub fn build_combiner(cli: &Cli, config: &CombinatorFile) -> Result<Combiner> {
    let mut combiner = Combiner::from_args(&cli.args, cli.dry_run);
    for (name, value) in config.var_exprs()? {
        combiner = combiner.with_default(&name, value);
    }
    if let Some(shell) = cli.shell.as_ref().or(config.shell()) {
        combiner = combiner.with_shell(shell.clone());
    }
    Ok(combiner)
}
