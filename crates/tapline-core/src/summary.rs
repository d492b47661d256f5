use serde::{Deserialize, Serialize};

/// Machine-readable end-of-run record, suitable for persisting next to the
/// TAP stream (e.g. a `summary.json` CI artifact).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Declared plan; `None` for deferred-plan runs.
    pub planned: Option<u32>,
    pub done: u32,
    pub failed: u32,
    pub exit_code: i32,
}
