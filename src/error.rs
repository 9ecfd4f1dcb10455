//! Error types shared by the API client, the registry resolver and the
//! provider handlers.

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A name scan over a registry listing found no candidate
    #[error("Registry '{name}' not found.")]
    NotFound { name: String },

    /// Invalid or contradictory input in a configuration document
    #[error("{0}")]
    Validation(String),

    /// The Palette API answered with a non-success status
    #[error("API request failed: {status} - {message}")]
    Api { status: u16, message: String },

    /// Missing or rejected credentials
    #[error("authentication error: {0}")]
    Auth(String),

    #[error("failed to send request: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse response JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl Error {
    pub fn not_found(name: &str) -> Self {
        Error::NotFound {
            name: name.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// HTTP status carried by the error, if it came from the remote API
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. }) || self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_registry() {
        let err = Error::not_found("my-pack-registry");
        assert_eq!(err.to_string(), "Registry 'my-pack-registry' not found.");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_api_404_counts_as_not_found() {
        let err = Error::Api {
            status: 404,
            message: "missing".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_validation_is_not_not_found() {
        let err = Error::validation("bad input");
        assert!(!err.is_not_found());
        assert_eq!(err.status(), None);
    }
}
