//! Error types for external collaborators and configuration.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the detection and record-store clients.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServiceError {
    /// The image to analyse does not exist.
    #[error("image not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    /// The image could not be decoded or re-encoded.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Network request failed.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// A required setting was not configured.
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),

    /// A configured value cannot be used, e.g. a key that is not a valid header.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ServiceError {
    /// Returns a user-friendly error message suitable for display.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::ImageNotFound(_) => "Image path not found.",
            Self::Image(_) => "The image could not be read. Please use a JPEG or PNG file.",
            Self::Network(_) => {
                "Could not reach the service. Please check your internet connection."
            }
            Self::Api { status, .. } if *status == 401 || *status == 403 => {
                "The service rejected the credentials. Please check your API key."
            }
            Self::Api { .. } => "The service returned an error. Please try again later.",
            Self::MissingConfig(_) => {
                "A required setting is missing. Set it in cmm.toml or the environment."
            }
            Self::InvalidConfig(_) => "A setting is invalid. Please check cmm.toml.",
        }
    }
}

/// Result type alias for collaborator operations.
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Errors loading the service configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages() {
        let err = ServiceError::ImageNotFound(PathBuf::from("missing.jpg"));
        assert_eq!(err.user_message(), "Image path not found.");
        assert_eq!(err.to_string(), "image not found: missing.jpg");

        let err = ServiceError::Api {
            status: 401,
            message: "unauthorized".to_string(),
        };
        assert!(err.user_message().contains("API key"));

        let err = ServiceError::MissingConfig("SUPABASE_URL");
        assert_eq!(err.to_string(), "missing configuration: SUPABASE_URL");

        let err = ServiceError::InvalidConfig("SUPABASE_KEY: bad header".to_string());
        assert_eq!(err.user_message(), "A setting is invalid. Please check cmm.toml.");
    }
}
