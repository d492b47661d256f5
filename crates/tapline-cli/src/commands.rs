use std::fs;
use std::io;
use std::process::{Command, Stdio};

use anyhow::{Context, Result};
use tapline_core::{Reporter, RunSummary, Terminate};

use crate::args::RunArgs;

/// Runs the checklist and returns the process exit code. The TAP stream
/// goes to stdout; child output is captured so it cannot corrupt it.
pub fn run(args: &RunArgs) -> Result<i32> {
    let mut tap = Reporter::stdout();

    if let Some(reason) = &args.skip_all {
        return Ok(tap.plan_skip_all(reason).exit_code());
    }

    let script = fs::read_to_string(&args.script)
        .with_context(|| format!("failed to read checklist {}", args.script.display()))?;
    let commands: Vec<&str> = script
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .collect();
    tracing::debug!(count = commands.len(), "checklist parsed");

    let code = match drive(&mut tap, args, &commands) {
        // The run was cut short; the stream already carries the reason.
        Err(sig) => sig.exit_code(),
        Ok(()) => match tap.exit_status() {
            Ok(code) => code,
            Err(sig) => sig.exit_code(),
        },
    };

    if let Some(path) = &args.summary_json {
        let summary = RunSummary {
            planned: tap.planned(),
            done: tap.done(),
            failed: tap.failed(),
            exit_code: code,
        };
        fs::write(path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
    }

    Ok(code)
}

fn drive(
    tap: &mut Reporter<io::Stdout>,
    args: &RunArgs,
    commands: &[&str],
) -> std::result::Result<(), Terminate> {
    if args.no_plan {
        tap.plan_unknown()?;
    } else {
        // An empty checklist means plan(0), which is the fatal contract
        // violation; no special-casing here.
        tap.plan(commands.len() as u32)?;
    }

    for cmd in commands {
        let output = Command::new(&args.shell)
            .arg("-c")
            .arg(cmd)
            .stdin(Stdio::null())
            .output();
        match output {
            Ok(out) => {
                let passed = tap.check(out.status.success(), *cmd)?;
                if !passed {
                    tap.diag(&format!("command exited with {}", out.status))?;
                    for line in String::from_utf8_lossy(&out.stderr).lines() {
                        tap.diag(line)?;
                    }
                }
            }
            Err(e) => {
                tap.check(false, *cmd)?;
                tap.diag(&format!("failed to spawn {}: {e}", args.shell))?;
            }
        }
    }
    Ok(())
}
