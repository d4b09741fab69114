//! Tempo provider interface.

use std::fmt;

/// Why a tempo lookup produced no value.
///
/// Every variant is recovered by the resolver as "not found"; the variant
/// only decides how the failure is logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// No API credential is configured; nothing was sent.
    Unconfigured,
    /// The provider answered 404.
    NotFound,
    /// The provider rejected the credential (401/403).
    Unauthorized(u16),
    /// Any other non-success status.
    Http(u16),
    /// The request never produced a response (DNS, timeout, connection).
    Transport(String),
    /// The response body or its tempo field could not be decoded.
    Malformed(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupError::Unconfigured => write!(f, "API key is not configured"),
            LookupError::NotFound => write!(f, "not found (404)"),
            LookupError::Unauthorized(status) => write!(f, "unauthorized ({})", status),
            LookupError::Http(status) => write!(f, "HTTP error {}", status),
            LookupError::Transport(reason) => write!(f, "request error: {}", reason),
            LookupError::Malformed(reason) => write!(f, "unreadable response: {}", reason),
        }
    }
}

impl std::error::Error for LookupError {}

/// A text-search tempo source.
pub trait TempoProvider {
    /// Returns true if the provider has the credential it needs.
    ///
    /// The resolver never calls [`lookup`](Self::lookup) on an unconfigured
    /// provider.
    fn is_configured(&self) -> bool {
        true
    }

    /// Looks up the tempo for a `song:<name> artist:<artist>` query.
    ///
    /// `Ok(None)` means the provider answered but had no tempo.
    fn lookup(&self, query: &str) -> Result<Option<f64>, LookupError>;
}

impl<T: TempoProvider + ?Sized> TempoProvider for &T {
    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    fn lookup(&self, query: &str) -> Result<Option<f64>, LookupError> {
        (**self).lookup(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_status() {
        assert_eq!(LookupError::Unauthorized(403).to_string(), "unauthorized (403)");
        assert_eq!(LookupError::Http(500).to_string(), "HTTP error 500");
    }

    #[test]
    fn providers_are_configured_by_default() {
        struct Fixed;
        impl TempoProvider for Fixed {
            fn lookup(&self, _query: &str) -> Result<Option<f64>, LookupError> {
                Ok(Some(120.0))
            }
        }
        assert!(Fixed.is_configured());
    }
}
