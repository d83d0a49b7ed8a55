// ── Core error types ──
//
// Errors from the sampling pipeline. Lookup failures never reach the
// dashboard through this type -- the resolvers absorb them -- but the
// `From<netwatch_api::Error>` impl lets construction-time failures
// (building HTTP clients, bad service URLs) propagate with `?`.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Interface counters ───────────────────────────────────────────
    #[error("Interface '{interface}' not found (no statistics at {})", .path.display())]
    InterfaceNotFound { interface: String, path: PathBuf },

    #[error("Permission denied reading {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Unexpected counter value in {}: {value:?}", .path.display())]
    CounterParse { path: PathBuf, value: String },

    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Connection listing ───────────────────────────────────────────
    #[error("Connection listing via '{command}' failed: {reason}")]
    SamplerFailed { command: String, reason: String },

    // ── Lookup services ──────────────────────────────────────────────
    #[error("Lookup service error: {0}")]
    Api(#[from] netwatch_api::Error),

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the configured interface cannot be sampled at all,
    /// as opposed to a one-off read failure.
    pub fn is_interface_unavailable(&self) -> bool {
        matches!(
            self,
            Self::InterfaceNotFound { .. } | Self::PermissionDenied { .. }
        )
    }
}
