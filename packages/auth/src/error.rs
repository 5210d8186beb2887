//! Error type shared by every provider and the gateway.
//!
//! End users see all variants the same way: the `Display` message is rendered
//! as-is next to the form that triggered the request.

/// Failure reported by the identity provider or the local session plumbing.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider answered and refused the request (bad credentials,
    /// duplicate account, expired refresh token, ...).
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("could not reach the identity provider: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected identity provider response: {0}")]
    Decode(String),
    #[error("session storage error: {0}")]
    Storage(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl AuthError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a provider rejection, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_provider_message_verbatim() {
        let err = AuthError::rejected(400, "Invalid login credentials");
        assert_eq!(err.to_string(), "Invalid login credentials");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn local_failures_have_no_status() {
        let err = AuthError::Storage("disk full".to_string());
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "session storage error: disk full");
    }
}
