use thiserror::Error;

/// Errors that can occur while talking to the remote store
#[derive(Error, Debug)]
pub enum CommonRequestError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization of a request body failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response whose body carried an error message
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Non-2xx response without a readable error message
    #[error("{status} {status_text}")]
    Status { status: u16, status_text: String },

    /// 2xx response whose body could not be decoded
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl CommonRequestError {
    /// HTTP status attached to the error, if the remote answered at all
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Json(_) | Self::UnexpectedResponse(_) => None,
        }
    }
}

/// Parse error response from HTTP status and body
///
/// Prefers the remote's own message; anything unreadable falls back to
/// `"<status> <statusText>"`.
#[must_use]
pub fn parse_error_response(status: reqwest::StatusCode, body: &[u8]) -> CommonRequestError {
    if let Ok(json_value) = serde_json::from_slice::<serde_json::Value>(body) {
        if let Some(message) = extract_error_message(&json_value) {
            return CommonRequestError::Api {
                status: status.as_u16(),
                message,
            };
        }
    }

    CommonRequestError::Status {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
    }
}

/// Extract error message from the known JSON error formats
fn extract_error_message(json: &serde_json::Value) -> Option<String> {
    // {"error": {"message": "..."}}
    if let Some(msg) = json
        .get("error")
        .and_then(|error| error.get("message"))
        .and_then(serde_json::Value::as_str)
    {
        return Some(msg.to_string());
    }

    // {"error": "..."}
    if let Some(msg) = json.get("error").and_then(serde_json::Value::as_str) {
        return Some(msg.to_string());
    }

    // Generic message field
    json.get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToString::to_string)
}
