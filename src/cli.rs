use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "argcomb", version, about = "ArgComb: build and run combinations of command lines")]
pub struct Cli {
    /// Combinator file (TOML, or JSON with a .json extension)
    pub file: PathBuf,

    /// Print commands without executing them
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Print every command with the variables that produced it, execute nothing
    #[arg(long, conflicts_with = "info")]
    pub explain: bool,

    /// Show the file's name, description and variables
    #[arg(long)]
    pub info: bool,

    /// Shell used to execute commands (default: settings.shell, then $SHELL)
    #[arg(long)]
    pub shell: Option<String>,

    /// Initial variables (@name=value) and extra tokens appended to the command
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
