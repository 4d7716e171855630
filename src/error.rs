//! Error types for the generation pipeline.

use std::time::Duration;

/// Errors that can occur while generating or preparing images.
#[derive(Debug, thiserror::Error)]
pub enum EduVizError {
    /// API key missing or invalid.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Daily or per-minute quota exceeded.
    #[error("quota exceeded, retry after {retry_after:?}")]
    Quota { retry_after: Option<Duration> },

    /// The call succeeded but the response carried no image payload
    /// (model declined or returned text only).
    #[error("empty response: {0}")]
    EmptyResponse(String),

    /// Content was blocked by the service's safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// API returned a non-success status that is not covered above.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Bad caller input: empty prompt, unsupported upload format, oversized file.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Failed to decode base64 or image data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// Bitmap decode/encode error from the `image` crate.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error (e.g., saving a file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EduVizError {
    /// Returns true if this error is likely transient and a manual re-try
    /// may succeed. Nothing in this crate retries automatically.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Quota { .. } | Self::Network(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// A short human-readable message suitable for direct display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth(_) => "API key rejected. Check your Gemini API key.".into(),
            Self::Quota { retry_after } => match retry_after {
                Some(d) => format!(
                    "API quota exceeded. Try again in about {} seconds.",
                    d.as_secs()
                ),
                None => "API quota exceeded. Check your plan or try again later.".into(),
            },
            Self::EmptyResponse(_) => {
                "The model returned no image for this prompt. Try rephrasing it.".into()
            }
            Self::ContentBlocked(_) => {
                "The prompt or result was blocked by safety filters.".into()
            }
            Self::Api { status, .. } => format!("The image service returned an error ({status})."),
            Self::Network(_) => "Could not reach the image service.".into(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::Decode(_) | Self::Image(_) => "The returned image could not be decoded.".into(),
            Self::Io(_) => "A file could not be read or written.".into(),
            Self::Json(_) => "The service response could not be parsed.".into(),
        }
    }

    /// An optional remediation hint to show alongside [`user_message`].
    ///
    /// [`user_message`]: Self::user_message
    pub fn remediation(&self) -> Option<&'static str> {
        match self {
            Self::Auth(_) => Some("Get a free key at https://aistudio.google.com/app/apikey"),
            Self::Quota { .. } => {
                Some("Free tier allows a limited number of requests per day; wait or upgrade.")
            }
            Self::EmptyResponse(_) => {
                Some("Make the character or concept description more concrete.")
            }
            Self::Network(_) | Self::Api { .. } => {
                Some("Wait a few minutes and trigger the action again.")
            }
            Self::InvalidInput(_) => Some("Upload a JPG, JPEG, or PNG file."),
            _ => None,
        }
    }
}

/// Result type alias for generation operations.
pub type Result<T> = std::result::Result<T, EduVizError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retryable() {
        assert!(EduVizError::Quota { retry_after: None }.is_retryable());
        assert!(EduVizError::Api {
            status: 503,
            message: "unavailable".into()
        }
        .is_retryable());

        assert!(!EduVizError::Auth("bad key".into()).is_retryable());
        assert!(!EduVizError::EmptyResponse("no parts".into()).is_retryable());
        assert!(!EduVizError::Api {
            status: 400,
            message: "bad request".into()
        }
        .is_retryable());
        assert!(!EduVizError::InvalidInput("empty prompt".into()).is_retryable());
    }

    #[test]
    fn test_user_messages_are_distinct() {
        let errors = [
            EduVizError::Auth("x".into()),
            EduVizError::Quota { retry_after: None },
            EduVizError::EmptyResponse("x".into()),
            EduVizError::ContentBlocked("x".into()),
            EduVizError::InvalidInput("bad upload".into()),
        ];
        let messages: Vec<String> = errors.iter().map(|e| e.user_message()).collect();
        for (i, a) in messages.iter().enumerate() {
            for b in &messages[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_quota_message_includes_delay() {
        let err = EduVizError::Quota {
            retry_after: Some(Duration::from_secs(30)),
        };
        assert!(err.user_message().contains("30"));
    }

    #[test]
    fn test_error_display() {
        let err = EduVizError::Api {
            status: 404,
            message: "Not found".into(),
        };
        assert_eq!(err.to_string(), "API error: 404 - Not found");

        let err = EduVizError::EmptyResponse("No image data in response".into());
        assert_eq!(err.to_string(), "empty response: No image data in response");
    }
}
