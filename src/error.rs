//! Relay error types with WebSocket close-code mapping.
//!
//! [`RelayError`] is the central error type for the relay. Every failure
//! is scoped to one connection or one inbound frame; nothing here is
//! fatal to the process. Errors surfaced during admission map to a
//! custom close code sent before the session is admitted.

/// Server-side error enum with close-code mapping.
///
/// # Close Code Ranges
///
/// | Code | Category                   | Sent when                       |
/// |------|----------------------------|---------------------------------|
/// | 4429 | Too many requests          | Admission denied                |
/// | 4403 | Forbidden                  | Admission challenged            |
/// | 4500 | Internal error             | Decision service failed/timeout |
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The admission decision service refused the connection.
    #[error("admission denied")]
    AdmissionDenied,

    /// The admission decision service issued a challenge.
    #[error("admission challenged")]
    AdmissionChallenged,

    /// The admission decision service could not be reached or returned
    /// an unusable response.
    #[error("admission service unavailable: {0}")]
    AdmissionUnavailable(String),

    /// The admission check did not complete within the configured bound.
    #[error("admission check timed out")]
    AdmissionTimeout,

    /// A configuration value could not be parsed at startup.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RelayError {
    /// Returns the WebSocket close code used to reject a connection for
    /// this error at admission time.
    #[must_use]
    pub const fn close_code(&self) -> u16 {
        match self {
            Self::AdmissionDenied => 4429,
            Self::AdmissionChallenged => 4403,
            Self::AdmissionUnavailable(_) | Self::AdmissionTimeout | Self::Config(_) => 4500,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn denial_maps_to_too_many_requests() {
        assert_eq!(RelayError::AdmissionDenied.close_code(), 4429);
    }

    #[test]
    fn challenge_maps_to_forbidden() {
        assert_eq!(RelayError::AdmissionChallenged.close_code(), 4403);
    }

    #[test]
    fn service_failure_maps_to_internal_error() {
        let err = RelayError::AdmissionUnavailable("connect refused".to_string());
        assert_eq!(err.close_code(), 4500);
        assert_eq!(RelayError::AdmissionTimeout.close_code(), 4500);
    }
}
