//! Error types for the Huobi SDK

use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the Huobi SDK
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The exchange rejected the request (`err-code` in v1 envelopes, `code` in v2)
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },

    /// Non-success HTTP status without a recognizable exchange error body
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Authentication error
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid parameter error
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The exchange answered `ok` but the payload was missing or malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// WebSocket error
    #[error("WebSocket error: {0}")]
    WebSocket(String),
}

impl Error {
    pub(crate) fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The exchange error code, if this error came from the exchange
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Error::Api { code, .. } => Some(code),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_api() {
        let err = Error::api("order-value-min-error", "order total cannot be lower than 5");
        assert_eq!(
            err.to_string(),
            "API error order-value-min-error: order total cannot be lower than 5"
        );
        assert_eq!(err.api_code(), Some("order-value-min-error"));
    }

    #[test]
    fn test_error_display_status() {
        let err = Error::Status {
            status: 502,
            body: "Bad Gateway".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status 502: Bad Gateway");
        assert_eq!(err.api_code(), None);
    }

    #[test]
    fn test_error_display_auth() {
        let err = Error::Auth("missing credentials".to_string());
        assert_eq!(err.to_string(), "Authentication error: missing credentials");
    }

    #[test]
    fn test_error_display_invalid_parameter() {
        let err = Error::InvalidParameter("size must be between 1 and 500".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: size must be between 1 and 500"
        );
    }

    #[test]
    fn test_error_display_invalid_response() {
        let err = Error::InvalidResponse("missing data".to_string());
        assert_eq!(err.to_string(), "Invalid response: missing data");
    }

    #[test]
    fn test_error_display_websocket() {
        let err = Error::WebSocket("connection closed".to_string());
        assert_eq!(err.to_string(), "WebSocket error: connection closed");
    }

    #[test]
    fn test_error_display_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.to_string().starts_with("JSON error:"));
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
