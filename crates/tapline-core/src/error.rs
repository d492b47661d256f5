use thiserror::Error;

/// Why a run ended before its normal `exit_status` computation.
///
/// The reporter never terminates the process itself. Operations that must
/// cut a run short return one of these signals with the corresponding TAP
/// line already written, and the top-level driver translates the signal
/// into a real `process::exit`.
#[derive(Debug, Error)]
pub enum Terminate {
    /// The whole run was skipped; `1..0 # skip <reason>` is on the stream.
    #[error("run skipped: {0}")]
    SkipAll(String),

    /// Unrecoverable run-level error; `Bail out! <reason>` is on the stream.
    #[error("bailed out: {0}")]
    BailOut(String),

    /// Writing to the output sink failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Terminate {
    /// Exit code the driver should terminate the process with.
    pub fn exit_code(&self) -> i32 {
        match self {
            Terminate::SkipAll(_) => exit_codes::SUCCESS,
            Terminate::BailOut(_) | Terminate::Io(_) => exit_codes::BAIL_OUT,
        }
    }
}

/// Unified exit codes of the TAP contract.
/// A consumer can determine pass/fail from the exit code alone.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const MAX_FAILED: i32 = 254; // Failure counts saturate here
    pub const BAD_PLAN: i32 = 255; // Planned N checks but ran M != N
    pub const BAIL_OUT: i32 = 255; // Run aborted via `Bail out!`
}
