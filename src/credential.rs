//! Bearer credential passed explicitly into remote operations.
//!
//! The sign-in collaborator owns acquisition and persistence of the token;
//! the core only carries the value into requests and never reads it from
//! process-global state.

use std::fmt;

/// An opaque bearer token for the analysis service.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wrap a raw token value. Empty or whitespace-only values are treated
    /// as "no credential".
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// The raw token value, for the `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

// Keep the token out of logs.
impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_is_no_credential() {
        assert!(BearerToken::new("").is_none());
        assert!(BearerToken::new("   ").is_none());
        assert!(BearerToken::new("abc123").is_some());
    }

    #[test]
    fn test_debug_redacts_value() {
        let token = BearerToken::new("super-secret").unwrap();
        let rendered = format!("{:?}", token);
        assert!(!rendered.contains("super-secret"));
    }
}
