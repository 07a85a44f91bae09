// ── Core error types ──
//
// User-facing errors from ripwatch-core. Consumers never match on HTTP
// transport details; the `From<ripwatch_api::Error>` impl folds them into
// the handful of cases the dashboard distinguishes when framing an alert.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach ripper service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Ripper service did not answer in time")]
    Timeout,

    // ── Service errors ───────────────────────────────────────────────
    /// The service refused the request and said why (`{ "error": ... }`).
    #[error("{message}")]
    Rejected { message: String, status: u16 },

    #[error("Unexpected response from ripper service: {message}")]
    InvalidResponse { message: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Could not persist preference: {message}")]
    Persistence { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Text shown to the operator inside localized alert framing.
    ///
    /// Service rejections are passed through verbatim so the backend's own
    /// wording (e.g. "disk full") reaches the screen.
    pub fn detail(&self) -> String {
        match self {
            Self::Rejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<ripwatch_api::Error> for CoreError {
    fn from(err: ripwatch_api::Error) -> Self {
        match err {
            ripwatch_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.origin().ascii_serialization())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::InvalidResponse {
                        message: e.to_string(),
                    }
                }
            }
            ripwatch_api::Error::Api { status, message } => CoreError::Rejected { message, status },
            ripwatch_api::Error::Deserialization { message, .. } => {
                CoreError::InvalidResponse { message }
            }
            ripwatch_api::Error::InvalidUrl(e) => CoreError::Internal(format!("invalid URL: {e}")),
            ripwatch_api::Error::ClientSetup(message) => CoreError::Internal(message),
        }
    }
}
