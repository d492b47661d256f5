use std::io::{self, Write};

use crate::error::{exit_codes, Terminate};
use crate::summary::RunSummary;

/// Mutable state of one TAP run.
#[derive(Debug, Default)]
struct RunState {
    /// Declared check count; `None` while in deferred-plan mode.
    planned: Option<u32>,
    /// Set by `plan_unknown` so a later declaration is still caught.
    deferred: bool,
    /// Result lines emitted so far.
    done: u32,
    /// Counted failures; excludes checks suppressed by skip or todo.
    failed: u32,
    skip: Option<String>,
    todo: Option<String>,
}

impl RunState {
    fn plan_declared(&self) -> bool {
        self.planned.is_some() || self.deferred
    }
}

/// TAP run reporter: owns the output sink and the state of one run.
///
/// One reporter drives one linear sequence of checks; every operation takes
/// `&mut self`, so concurrent use requires external serialization by
/// construction. Operations that can cut the run short return
/// [`Terminate`], which the caller turns into a process exit code — the
/// reporter itself never exits the process.
pub struct Reporter<W: Write> {
    out: W,
    state: RunState,
}

impl Reporter<io::Stdout> {
    /// Reporter writing to standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            state: RunState::default(),
        }
    }

    pub fn planned(&self) -> Option<u32> {
        self.state.planned
    }

    pub fn done(&self) -> u32 {
        self.state.done
    }

    pub fn failed(&self) -> u32 {
        self.state.failed
    }

    /// Consumes the reporter and returns the sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    // Every line is flushed as soon as it is written so a consumer observes
    // it promptly and in order even under abnormal termination.
    fn line(&mut self, line: &str) -> Result<(), Terminate> {
        writeln!(self.out, "{line}")?;
        self.out.flush()?;
        Ok(())
    }

    /// Declares that the run will perform exactly `count` checks and writes
    /// the `1..<count>` header. A zero count or a re-declaration is a
    /// contract violation and bails out.
    pub fn plan(&mut self, count: u32) -> Result<(), Terminate> {
        if count == 0 {
            return Err(self.bail_out("plan of 0 checks makes no sense"));
        }
        if self.state.plan_declared() {
            return Err(self.bail_out("plan already declared"));
        }
        tracing::debug!(count, "plan declared");
        self.state.planned = Some(count);
        self.line(&format!("1..{count}"))
    }

    /// Deferred-plan mode: no header now; `exit_status` emits `1..<done>`
    /// from the final count.
    pub fn plan_unknown(&mut self) -> Result<(), Terminate> {
        if self.state.plan_declared() {
            return Err(self.bail_out("plan already declared"));
        }
        self.state.deferred = true;
        Ok(())
    }

    /// Skips the entire run before any checks execute: writes
    /// `1..0 # skip <reason>` and signals termination with exit code 0.
    pub fn plan_skip_all(&mut self, reason: &str) -> Terminate {
        if let Err(e) = self.line(&format!("1..0 # skip {reason}")) {
            return e;
        }
        Terminate::SkipAll(reason.to_string())
    }

    /// Reports one check. See [`Reporter::check_with`] for the skip/todo
    /// interaction; here `condition` was necessarily already evaluated by
    /// the caller, so use `check_with` when a skipped check must not run
    /// its condition at all.
    pub fn check<'a>(
        &mut self,
        condition: bool,
        message: impl Into<Option<&'a str>>,
    ) -> Result<bool, Terminate> {
        self.check_with(|| condition, message)
    }

    /// The fundamental check primitive. Emits exactly one result line and
    /// increments `done`:
    ///
    /// - active skip block: `condition` is never called, the line is a
    ///   forced `ok` annotated `# skip <reason>`, and `true` is returned;
    /// - active todo block: the line carries `# todo <reason>`, a failure
    ///   is not counted, but the returned value is the real condition so
    ///   callers still see the true result;
    /// - otherwise: a false condition increments `failed`.
    pub fn check_with<'a, F>(
        &mut self,
        condition: F,
        message: impl Into<Option<&'a str>>,
    ) -> Result<bool, Terminate>
    where
        F: FnOnce() -> bool,
    {
        let message = message.into();
        if self.state.skip.is_some() {
            self.emit_result(true, message)?;
            return Ok(true);
        }
        let outcome = condition();
        if !outcome && self.state.todo.is_none() {
            self.state.failed += 1;
        }
        self.emit_result(outcome, message)?;
        Ok(outcome)
    }

    pub fn pass<'a>(&mut self, message: impl Into<Option<&'a str>>) -> Result<bool, Terminate> {
        self.check(true, message)
    }

    pub fn fail<'a>(&mut self, message: impl Into<Option<&'a str>>) -> Result<bool, Terminate> {
        self.check(false, message)
    }

    fn emit_result(&mut self, outcome: bool, message: Option<&str>) -> Result<(), Terminate> {
        self.state.done += 1;
        let verdict = if outcome { "ok" } else { "not ok" };
        let mut line = format!("{verdict} {}", self.state.done);
        if let Some(msg) = message {
            line.push_str(&format!(" - {msg}"));
        }
        if let Some(reason) = &self.state.skip {
            line.push_str(&format!(" # skip {reason}"));
        } else if let Some(reason) = &self.state.todo {
            line.push_str(&format!(" # todo {reason}"));
        }
        self.line(&line)
    }

    /// Every check until `skip_end` reports as passing without running its
    /// condition, annotated with `reason`. Mutually exclusive with an
    /// active todo block; violating that bails out.
    pub fn skip_begin(&mut self, reason: &str) -> Result<(), Terminate> {
        if self.state.todo.is_some() {
            return Err(self.bail_out("skip block entered while a todo block is active"));
        }
        tracing::debug!(reason, "skip block begin");
        self.state.skip = Some(reason.to_string());
        Ok(())
    }

    pub fn skip_end(&mut self) {
        tracing::debug!("skip block end");
        self.state.skip = None;
    }

    /// Every check until `todo_end` is annotated as an expected failure and
    /// excluded from the failure count. Mutually exclusive with an active
    /// skip block.
    pub fn todo_begin(&mut self, reason: &str) -> Result<(), Terminate> {
        if self.state.skip.is_some() {
            return Err(self.bail_out("todo block entered while a skip block is active"));
        }
        tracing::debug!(reason, "todo block begin");
        self.state.todo = Some(reason.to_string());
        Ok(())
    }

    pub fn todo_end(&mut self) {
        tracing::debug!("todo block end");
        self.state.todo = None;
    }

    /// Bulk-skips `count` checks determined unreachable at runtime: emits
    /// `count` consecutive `ok <seq> # skip <reason>` lines, each
    /// incrementing `done`, without running anything.
    pub fn skip_n(&mut self, count: u32, reason: &str) -> Result<(), Terminate> {
        for _ in 0..count {
            self.state.done += 1;
            self.line(&format!("ok {} # skip {reason}", self.state.done))?;
        }
        Ok(())
    }

    /// Writes a `# <message>` comment line; never affects counts or the
    /// exit status. `message` must be a single line.
    pub fn diag(&mut self, message: &str) -> Result<(), Terminate> {
        self.line(&format!("# {message}"))
    }

    /// Writes `Bail out! <message>` and returns the fatal signal the
    /// driver must translate into exit code 255.
    pub fn bail_out(&mut self, message: &str) -> Terminate {
        tracing::debug!(reason = message, "bail out");
        if let Err(e) = self.line(&format!("Bail out! {message}")) {
            return e;
        }
        Terminate::BailOut(message.to_string())
    }

    /// Computes the process exit code at the end of the run.
    ///
    /// Deferred-plan runs get their `1..<done>` header now. A planned
    /// count that does not match `done` is diagnosed and short-circuits to
    /// 255 without consulting the failure count. Otherwise the code is the
    /// failure count saturated at 254, with a summary diagnostic when
    /// anything failed.
    pub fn exit_status(&mut self) -> Result<i32, Terminate> {
        match self.state.planned {
            None => {
                self.line(&format!("1..{}", self.state.done))?;
            }
            Some(planned) if planned == self.state.done => {}
            Some(planned) => {
                self.diag(&format!(
                    "planned {planned} checks but ran {}",
                    self.state.done
                ))?;
                return Ok(exit_codes::BAD_PLAN);
            }
        }
        if self.state.failed > 0 {
            self.diag(&format!(
                "failed {} of {} checks run",
                self.state.failed, self.state.done
            ))?;
        }
        tracing::debug!(
            done = self.state.done,
            failed = self.state.failed,
            "exit status computed"
        );
        Ok(self.state.failed.min(exit_codes::MAX_FAILED as u32) as i32)
    }

    /// Consuming wrapper over [`Reporter::exit_status`] returning the
    /// machine-readable end-of-run record.
    pub fn finish(mut self) -> Result<RunSummary, Terminate> {
        let exit_code = self.exit_status()?;
        Ok(RunSummary {
            planned: self.state.planned,
            done: self.state.done,
            failed: self.state.failed,
            exit_code,
        })
    }
}
