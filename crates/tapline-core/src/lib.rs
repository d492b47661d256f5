//! TAP (Test Anything Protocol) producer.
//!
//! A run declares how many checks it intends to perform, emits one
//! `ok` / `not ok` line per check on a line-oriented text stream, and ends
//! by computing a process exit code that reconciles the planned and actual
//! counts. A harness or CI tool consuming the stream can determine
//! pass/fail from the exit code alone and diagnose why from the
//! `#`-prefixed comment lines.
//!
//! ```no_run
//! use tapline_core::Reporter;
//!
//! fn main() -> std::process::ExitCode {
//!     let mut tap = Reporter::stdout();
//!     let code = (|| {
//!         tap.plan(2)?;
//!         tap.check(1 + 1 == 2, "arithmetic works")?;
//!         tap.check("tap".len() == 3, "strings too")?;
//!         tap.exit_status()
//!     })()
//!     .unwrap_or_else(|sig| sig.exit_code());
//!     std::process::ExitCode::from(code as u8)
//! }
//! ```
//!
//! The reporter never terminates the process: operations that must cut a
//! run short ([`Reporter::bail_out`], [`Reporter::plan_skip_all`], contract
//! violations) return a [`Terminate`] signal carrying the exit code, and
//! the top-level driver performs the actual `process::exit`.

mod error;
mod reporter;
mod summary;

pub use error::{exit_codes, Terminate};
pub use reporter::Reporter;
pub use summary::RunSummary;
