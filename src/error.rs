// HTTP client error types
use serde_json::Value;
use thiserror::Error;

pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Check your internet connection.";

/// Error returned by backend calls, classified by HTTP status where there is one
#[derive(Error, Debug)]
pub enum ApiError {
    // 400 Bad Request
    #[error("{0}")]
    BadRequest(String),

    // 401 Unauthorized: the session cookie is missing or expired
    #[error("{0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("{0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("{0}")]
    NotFound(String),

    // 409 Conflict
    #[error("{0}")]
    Conflict(String),

    // 422 Unprocessable Entity
    #[error("{0}")]
    UnprocessableEntity(String),

    // 429 Too Many Requests
    #[error("{0}")]
    TooManyRequests(String),

    // 5xx
    #[error("{message}")]
    Server { status: u16, message: String },

    // Any other non-success status
    #[error("{message}")]
    Http { status: u16, message: String },

    // 2xx with `{ success: false, message }`
    #[error("{0}")]
    Rejected(String),

    // No response received
    #[error("{0}")]
    Connection(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Invalid response from backend: {0}")]
    InvalidResponse(String),

    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    #[error("Could not encode request body: {0}")]
    Encode(String),
}

impl ApiError {
    /// Classify an error response by status
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            400 => ApiError::BadRequest(message),
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            422 => ApiError::UnprocessableEntity(message),
            429 => ApiError::TooManyRequests(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Http { status, message },
        }
    }

    /// HTTP status, when the backend answered
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::BadRequest(_) => Some(400),
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Conflict(_) => Some(409),
            ApiError::UnprocessableEntity(_) => Some(422),
            ApiError::TooManyRequests(_) => Some(429),
            ApiError::Server { status, .. } | ApiError::Http { status, .. } => Some(*status),
            ApiError::Rejected(_)
            | ApiError::Connection(_)
            | ApiError::Timeout(_)
            | ApiError::InvalidResponse(_)
            | ApiError::InvalidUrl(_)
            | ApiError::Encode(_) => None,
        }
    }

    /// Get error code for output
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::UnprocessableEntity(_) => "UNPROCESSABLE_ENTITY",
            ApiError::TooManyRequests(_) => "TOO_MANY_REQUESTS",
            ApiError::Server { .. } => "SERVER_ERROR",
            ApiError::Http { .. } => "HTTP_ERROR",
            ApiError::Rejected(_) => "REJECTED",
            ApiError::Connection(_) => "CONNECTION_ERROR",
            ApiError::Timeout(_) => "TIMEOUT",
            ApiError::InvalidResponse(_) => "INVALID_RESPONSE",
            ApiError::InvalidUrl(_) => "INVALID_URL",
            ApiError::Encode(_) => "ENCODE_ERROR",
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

/// Message for an error response: the body's `message`, else its `error`,
/// else `Error {status}: {reason}`. Array messages are joined with ", ".
pub fn error_message(status: u16, reason: &str, body: Option<&Value>) -> String {
    let field = body.and_then(|b| {
        [b.get("message"), b.get("error")]
            .into_iter()
            .flatten()
            .find(|v| is_present(v))
    });

    match field {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
        None => format!("Error {}: {}", status, reason),
    }
}

// Falsy JSON values do not count as a message
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(0)
        } else if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else if err.is_builder() {
            ApiError::InvalidUrl(err.to_string())
        } else {
            tracing::debug!("No response received from backend: {}", err);
            ApiError::Connection(CONNECTION_ERROR_MESSAGE.to_string())
        }
    }
}

impl From<url::ParseError> for ApiError {
    fn from(err: url::ParseError) -> Self {
        ApiError::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_prefers_message_then_error() {
        let body = json!({"message": "Role already exists", "error": "Conflict"});
        assert_eq!(error_message(409, "Conflict", Some(&body)), "Role already exists");

        let body = json!({"error": "Bad token"});
        assert_eq!(error_message(401, "Unauthorized", Some(&body)), "Bad token");

        let body = json!({"message": "", "error": "Fallback"});
        assert_eq!(error_message(400, "Bad Request", Some(&body)), "Fallback");
    }

    #[test]
    fn message_joins_arrays() {
        let body = json!({"message": ["name should not be empty", "accesses must be an array"]});
        assert_eq!(
            error_message(400, "Bad Request", Some(&body)),
            "name should not be empty, accesses must be an array"
        );
    }

    #[test]
    fn message_falls_back_to_status_line() {
        assert_eq!(
            error_message(502, "Bad Gateway", None),
            "Error 502: Bad Gateway"
        );
        assert_eq!(
            error_message(500, "Internal Server Error", Some(&json!("oops"))),
            "Error 500: Internal Server Error"
        );
    }

    #[test]
    fn status_classification() {
        assert!(ApiError::from_status(401, "expired").is_unauthorized());
        assert_eq!(ApiError::from_status(404, "x").error_code(), "NOT_FOUND");
        assert_eq!(ApiError::from_status(503, "x").status_code(), Some(503));
        assert_eq!(ApiError::from_status(418, "x").error_code(), "HTTP_ERROR");
        assert_eq!(ApiError::Connection(CONNECTION_ERROR_MESSAGE.into()).status_code(), None);
    }
}
