//! Error types for OS command execution and startup checks

use thiserror::Error;

/// Failures that cross a component boundary.
///
/// Parse misses are deliberately not represented here: an unmatched line or
/// an unresolved name is an `Option::None` on the relevant step, and the
/// fallback chain continues.
#[derive(Debug, Error)]
pub enum SentryError {
    /// An OS command exited nonzero or could not be spawned.
    #[error("command `{command}` failed: {detail}")]
    CommandFailure { command: String, detail: String },

    /// The pre-flight neighbor-table check failed; elevated privileges are
    /// required to read the neighbor table and control the access point.
    #[error("insufficient privileges to read the neighbor table; run elevated")]
    PrivilegeDenied,
}
