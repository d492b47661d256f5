use clap::Parser;

mod args;
mod commands;

use args::{Cli, Command};
use tapline_core::exit_codes;

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
    let cli = Cli::parse();
    let code = match cli.cmd {
        Command::Run(args) => match commands::run(&args) {
            Ok(code) => code,
            Err(e) => {
                // Driver-level failure (unreadable checklist, unwritable
                // summary): nothing TAP-shaped happened, exit fatal.
                eprintln!("fatal: {e:?}");
                exit_codes::BAIL_OUT
            }
        },
    };
    std::process::exit(code);
}
