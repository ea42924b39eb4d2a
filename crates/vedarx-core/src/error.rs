//! VedaRx error taxonomy.
//!
//! Three error domains with different blast radii:
//! - [`DataLoadError`] is fatal at startup — the process must not serve
//!   requests with a sub-minimum knowledge base.
//! - [`GenerationError`] is request-scoped — surfaced to the caller, never
//!   crashes the process, never touches the shared knowledge base.
//! - Ranking has no error type at all: it degrades to zero-score results.

use thiserror::Error;

/// The knowledge base source could not be turned into a usable record set.
///
/// Individual bad rows are NOT an error — the loader skips and counts them.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("knowledge base source unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed knowledge base: {0}")]
    Malformed(String),

    #[error("knowledge base is missing required column '{0}'")]
    MissingColumn(&'static str),

    /// Every row was skipped (or the file had no data rows).
    #[error("knowledge base contains no usable records")]
    Empty,
}

/// The upstream generation call failed, timed out, or produced content the
/// section parser could not recognize.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no API key configured for provider '{0}'")]
    ApiKeyMissing(String),

    /// Transport-level failure (connection refused, DNS, TLS).
    #[error("generation request failed: {0}")]
    Http(String),

    #[error("generation request timed out after {0}s")]
    Timeout(u64),

    /// The provider answered with a non-success status.
    #[error("generation provider returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The response text had none of the requested section markers.
    /// Carries the raw response for diagnostics; retrying the same prompt
    /// would reproduce the same structure, so this is never retried.
    #[error("generation response had no recognizable sections")]
    Unparseable { raw: String },
}

impl GenerationError {
    /// Whether a single retry is permitted for this failure.
    ///
    /// Timeouts, transport failures, and 5xx responses are transient;
    /// auth problems, 4xx responses, and unparseable content are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Http(_) => true,
            Self::Upstream { status, .. } => *status >= 500,
            Self::ApiKeyMissing(_) | Self::Unparseable { .. } => false,
        }
    }
}

/// Top-level error for binary-level propagation.
#[derive(Debug, Error)]
pub enum VedarxError {
    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    Generation(#[from] GenerationError),
}

pub type Result<T, E = VedarxError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(GenerationError::Timeout(30).is_transient());
        assert!(GenerationError::Http("connection refused".into()).is_transient());
        assert!(
            GenerationError::Upstream {
                status: 503,
                body: "overloaded".into()
            }
            .is_transient()
        );
        assert!(
            !GenerationError::Upstream {
                status: 401,
                body: "bad key".into()
            }
            .is_transient()
        );
        assert!(!GenerationError::ApiKeyMissing("openai".into()).is_transient());
        assert!(
            !GenerationError::Unparseable {
                raw: "gibberish".into()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_unparseable_carries_raw_response() {
        let err = GenerationError::Unparseable {
            raw: "the model rambled".into(),
        };
        match err {
            GenerationError::Unparseable { raw } => assert_eq!(raw, "the model rambled"),
            _ => unreachable!(),
        }
    }
}
