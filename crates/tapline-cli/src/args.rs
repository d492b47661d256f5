use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "tapline",
    version,
    about = "Run a checklist of shell commands and report each as a TAP check on stdout"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    Run(RunArgs),
}

#[derive(clap::Args)]
pub struct RunArgs {
    /// Checklist script: one shell command per line; blank lines and
    /// `#` comments are ignored
    pub script: PathBuf,

    /// Defer the plan header until the end of the run
    #[arg(long)]
    pub no_plan: bool,

    /// Skip the whole run: emit `1..0 # skip <REASON>` and exit 0
    #[arg(long, value_name = "REASON")]
    pub skip_all: Option<String>,

    /// Shell used to run each command
    #[arg(long, default_value = "sh")]
    pub shell: String,

    /// Write a JSON run summary to this path after the run
    #[arg(long, value_name = "PATH")]
    pub summary_json: Option<PathBuf>,
}
