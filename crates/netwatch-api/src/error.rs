use thiserror::Error;

/// Top-level error type for the `netwatch-api` crate.
///
/// Covers every failure mode of a single lookup request: transport,
/// HTTP status, response decoding, and service-reported failure.
/// `netwatch-core` absorbs these into display fallbacks.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Service answered with a non-success HTTP status.
    #[error("Lookup service returned HTTP {status}")]
    Status { status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The service answered but reported that it could not resolve the query.
    #[error("Lookup failed: {message}")]
    LookupFailed { message: String },
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying next cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short, stable label for the failure kind (used as a log field).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Status { .. } => "status",
            Self::Deserialization { .. } => "deserialization",
            Self::LookupFailed { .. } => "lookup_failed",
        }
    }
}
