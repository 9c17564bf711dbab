//! Error types for the generation and auth lifecycle.

/// Errors that can occur while validating input, talking to the identity
/// provider, or generating images.
#[derive(Debug, thiserror::Error)]
pub enum ForgeError {
    /// Input rejected before any network call (empty prompt, short password,
    /// password mismatch).
    #[error("{0}")]
    Validation(String),

    /// Identity provider rejected the operation.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// An external endpoint returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The generation endpoint answered 2xx but carried no image field.
    #[error("response contained no image")]
    MissingImage,

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 or a data URL.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// A fetched image could not be rendered. Non-fatal.
    #[error("display error: {0}")]
    Display(String),

    /// I/O error (e.g., saving a downloaded image).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ForgeError {
    /// Returns true if this error was raised before any network call.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if a generation attempt failed after submission.
    ///
    /// Validation and display errors are excluded: the former never reach the
    /// network, the latter occur after a generation already succeeded.
    pub fn is_generation_failure(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::MissingImage | Self::Network(_) | Self::Decode(_)
        )
    }

    /// Message suitable for showing to the person at the keyboard.
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Auth(msg) => msg.clone(),
            Self::Display(_) => "Failed to load generated image".into(),
            e if e.is_generation_failure() => {
                "Failed to generate image. Please try again.".into()
            }
            e => e.to_string(),
        }
    }
}

/// Result type alias for generation and auth operations.
pub type Result<T> = std::result::Result<T, ForgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_validation() {
        assert!(ForgeError::Validation("empty prompt".into()).is_validation());
        assert!(!ForgeError::MissingImage.is_validation());
        assert!(!ForgeError::Auth("bad password".into()).is_validation());
    }

    #[test]
    fn test_is_generation_failure() {
        assert!(ForgeError::Api {
            status: 500,
            message: "boom".into()
        }
        .is_generation_failure());
        assert!(ForgeError::MissingImage.is_generation_failure());
        assert!(ForgeError::Decode("bad base64".into()).is_generation_failure());

        assert!(!ForgeError::Validation("empty".into()).is_generation_failure());
        assert!(!ForgeError::Display("broken".into()).is_generation_failure());
    }

    #[test]
    fn test_error_display() {
        let err = ForgeError::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");
        assert_eq!(ForgeError::MissingImage.to_string(), "response contained no image");
    }

    #[test]
    fn test_user_message_for_generation_failure() {
        let err = ForgeError::Api {
            status: 500,
            message: "upstream down".into(),
        };
        assert_eq!(err.user_message(), "Failed to generate image. Please try again.");
    }
}
