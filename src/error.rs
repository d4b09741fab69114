//! Error types for bpm-playlist.
//!
//! Defines the error codes and types used for failures that stop a run.
//! Recoverable failures (tempo lookups, cache reads) never surface here;
//! they degrade to typed outcomes inside the component that hit them.

use std::fmt;

/// Error codes for failures reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Spotify client credentials are not configured.
    /// Trigger: SPOTIFY_CLIENT_ID or SPOTIFY_CLIENT_SECRET unset or empty.
    MissingCredentials,

    /// Configuration values are inconsistent.
    /// Trigger: min BPM above max BPM, non-finite bounds, bad page size.
    InvalidConfig,

    /// OAuth authorization or token exchange failed.
    /// Trigger: user denied access, bad redirect URL, rejected code.
    AuthFailed,

    /// A provider call failed at the transport or HTTP status level.
    Http,

    /// A provider returned a body that could not be decoded.
    InvalidResponse,

    /// Local cache could not be read or written.
    CacheIo,
}

impl ErrorCode {
    /// Returns the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::MissingCredentials => "MISSING_CREDENTIALS",
            ErrorCode::InvalidConfig => "INVALID_CONFIG",
            ErrorCode::AuthFailed => "AUTH_FAILED",
            ErrorCode::Http => "HTTP_ERROR",
            ErrorCode::InvalidResponse => "INVALID_RESPONSE",
            ErrorCode::CacheIo => "CACHE_IO",
        }
    }

    /// Returns a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::MissingCredentials => "Spotify API credentials are not configured",
            ErrorCode::InvalidConfig => "Configuration values are invalid",
            ErrorCode::AuthFailed => "Spotify authorization failed",
            ErrorCode::Http => "Request to an external service failed",
            ErrorCode::InvalidResponse => "External service returned an unexpected response",
            ErrorCode::CacheIo => "Local cache could not be accessed",
        }
    }

    /// Returns a recovery hint suggesting how to resolve this error.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCode::MissingCredentials => {
                "Set SPOTIFY_CLIENT_ID and SPOTIFY_CLIENT_SECRET from your Spotify \
                 Developer Dashboard"
            }
            ErrorCode::InvalidConfig => {
                "Check --min-bpm/--max-bpm (min must not exceed max) and the \
                 BPM_PLAYLIST_* environment variables"
            }
            ErrorCode::AuthFailed => {
                "Make sure SPOTIFY_REDIRECT_URI exactly matches the URI registered in the \
                 Developer Dashboard, and paste the complete URL from the browser after \
                 authorizing"
            }
            ErrorCode::Http => "Check your network connection and try again later",
            ErrorCode::InvalidResponse => {
                "The service API may have changed; run with --verbose for details"
            }
            ErrorCode::CacheIo => {
                "Check permissions on the cache directory or point --cache-dir elsewhere"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type for run-stopping failures.
#[derive(Debug)]
pub struct AppError {
    /// The error code identifying the type of error.
    pub code: ErrorCode,
    /// Human-readable error message with context.
    pub message: String,
    /// Optional underlying cause of the error.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Creates a new AppError with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new AppError with an underlying cause.
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a MISSING_CREDENTIALS error naming the unset variables.
    pub fn missing_credentials(missing: &[&str]) -> Self {
        Self::new(
            ErrorCode::MissingCredentials,
            format!("Missing Spotify credentials: {}", missing.join(", ")),
        )
    }

    /// Creates an INVALID_CONFIG error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidConfig, reason)
    }

    /// Creates an AUTH_FAILED error.
    pub fn auth_failed(reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::AuthFailed,
            format!("Authorization failed: {}", reason.into()),
        )
    }

    /// Creates an HTTP_ERROR for a non-success status.
    pub fn http_status(context: &str, status: u16, body: &str) -> Self {
        Self::new(
            ErrorCode::Http,
            format!("{} returned HTTP {}: {}", context, status, body.trim()),
        )
    }

    /// Creates an HTTP_ERROR for a transport failure.
    pub fn transport(context: &str, source: reqwest::Error) -> Self {
        Self::with_source(
            ErrorCode::Http,
            format!("{} failed: {}", context, source),
            source,
        )
    }

    /// Creates an INVALID_RESPONSE error.
    pub fn invalid_response(context: &str, reason: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidResponse,
            format!("{} returned an unreadable body: {}", context, reason),
        )
    }

    /// Creates a CACHE_IO error.
    pub fn cache_io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::with_source(
            ErrorCode::CacheIo,
            format!("Cache I/O failed for {}: {}", path.display(), source),
            source,
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}. Recovery: {}",
            self.code,
            self.message,
            self.code.recovery_hint()
        )
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_as_str() {
        assert_eq!(ErrorCode::MissingCredentials.as_str(), "MISSING_CREDENTIALS");
        assert_eq!(ErrorCode::InvalidConfig.as_str(), "INVALID_CONFIG");
        assert_eq!(ErrorCode::AuthFailed.as_str(), "AUTH_FAILED");
        assert_eq!(ErrorCode::Http.as_str(), "HTTP_ERROR");
        assert_eq!(ErrorCode::InvalidResponse.as_str(), "INVALID_RESPONSE");
        assert_eq!(ErrorCode::CacheIo.as_str(), "CACHE_IO");
    }

    #[test]
    fn error_code_recovery_hints_not_empty() {
        for code in [
            ErrorCode::MissingCredentials,
            ErrorCode::InvalidConfig,
            ErrorCode::AuthFailed,
            ErrorCode::Http,
            ErrorCode::InvalidResponse,
            ErrorCode::CacheIo,
        ] {
            assert!(!code.recovery_hint().is_empty());
            assert!(!code.description().is_empty());
        }
    }

    #[test]
    fn missing_credentials_lists_variables() {
        let err = AppError::missing_credentials(&["SPOTIFY_CLIENT_ID", "SPOTIFY_CLIENT_SECRET"]);
        let text = err.to_string();
        assert!(text.contains("MISSING_CREDENTIALS"));
        assert!(text.contains("SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET"));
        assert!(text.contains("Recovery:"));
    }

    #[test]
    fn http_status_trims_body() {
        let err = AppError::http_status("Create playlist", 403, "  forbidden\n");
        assert_eq!(err.code, ErrorCode::Http);
        assert!(err.message.ends_with("HTTP 403: forbidden"));
    }

    #[test]
    fn cache_io_keeps_source() {
        use std::error::Error;
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = AppError::cache_io(std::path::Path::new("/tmp/x.json"), io);
        assert!(err.source().is_some());
    }
}
