//! Error types for reunite.

use thiserror::Error;

/// Application result type.
pub type AppResult<T> = Result<T, AppError>;

/// Application error type.
///
/// Every failure surfaced to a caller is exactly one of these kinds with
/// exactly one human-readable message. Server-supplied messages are carried
/// verbatim where available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Rejected input. Shown inline, changes no state.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Missing or rejected session credential. The stored session is
    /// invalidated and the caller is expected to re-authenticate.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Transport-level or server-side failure. Retryable by resubmitting.
    #[error("Network error: {0}")]
    Network(String),

    /// The requested record does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    /// Returns the error code for display and logging.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Auth(_) => "AUTH_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
        }
    }

    /// Returns whether this error invalidates the current session.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }

    /// Returns whether retrying the same operation may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

// === From implementations ===

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::Network(format!("Malformed response: {err}"))
    }
}

impl From<crate::session::SessionStoreError> for AppError {
    fn from(err: crate::session::SessionStoreError) -> Self {
        Self::Network(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation("Full name is required".into()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::Auth("Token has expired".into()).error_code(), "AUTH_ERROR");
        assert_eq!(AppError::Network("connection refused".into()).error_code(), "NETWORK_ERROR");
        assert_eq!(AppError::NotFound("missing person".into()).error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_only_auth_invalidates_session() {
        assert!(AppError::Auth("expired".into()).is_auth());
        assert!(!AppError::Validation("bad".into()).is_auth());
        assert!(!AppError::Network("down".into()).is_auth());
        assert!(!AppError::NotFound("gone".into()).is_auth());
    }

    #[test]
    fn test_only_network_is_retryable() {
        assert!(AppError::Network("timeout".into()).is_retryable());
        assert!(!AppError::Auth("expired".into()).is_retryable());
    }

    #[test]
    fn test_display_carries_message_verbatim() {
        let err = AppError::Validation("Full name is required".into());
        assert_eq!(err.to_string(), "Validation error: Full name is required");
    }

    #[test]
    fn test_from_validation_errors() {
        use validator::Validate;

        #[derive(Validate)]
        struct Probe {
            #[validate(length(min = 1))]
            name: String,
        }

        let probe = Probe { name: String::new() };
        let err: AppError = probe.validate().unwrap_err().into();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }
}
