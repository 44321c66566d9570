//! Error taxonomy for remote operations.

use thiserror::Error;

use crate::decode::DecodeError;

/// Errors produced by the remote client.
///
/// The client converts every transport and status anomaly into one of these
/// variants; it never retries internally.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Credential absent or rejected by the server.
    #[error("not signed in or credential rejected")]
    Unauthorized,

    /// The server determined the account has insufficient credit (HTTP 402).
    #[error("server reports insufficient credit")]
    PaymentRequired,

    /// Any other non-2xx response.
    #[error("server returned status {0}")]
    ServerError(u16),

    /// Timeout, DNS failure, connection reset and friends.
    #[error("network transport failed: {0}")]
    Transport(String),

    /// Empty (or unusable) body where one is required.
    #[error("server returned no usable data")]
    NoData,

    /// The response body could not be interpreted as text at all.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

/// Map an HTTP status onto the error taxonomy. Any 2xx is a success.
pub fn classify_http_status(status: u16) -> Result<(), RemoteError> {
    match status {
        200..=299 => Ok(()),
        401 => Err(RemoteError::Unauthorized),
        402 => Err(RemoteError::PaymentRequired),
        other => Err(RemoteError::ServerError(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2xx_is_success() {
        assert!(classify_http_status(200).is_ok());
        assert!(classify_http_status(204).is_ok());
        assert!(classify_http_status(299).is_ok());
    }

    #[test]
    fn test_payment_required_is_distinguished() {
        assert!(matches!(
            classify_http_status(402),
            Err(RemoteError::PaymentRequired)
        ));
    }

    #[test]
    fn test_rejected_credential_is_unauthorized() {
        assert!(matches!(
            classify_http_status(401),
            Err(RemoteError::Unauthorized)
        ));
    }

    #[test]
    fn test_other_statuses_carry_their_code() {
        assert!(matches!(
            classify_http_status(500),
            Err(RemoteError::ServerError(500))
        ));
        assert!(matches!(
            classify_http_status(404),
            Err(RemoteError::ServerError(404))
        ));
        assert!(matches!(
            classify_http_status(302),
            Err(RemoteError::ServerError(302))
        ));
    }
}
