//! API Errors
//!
//! Every backend call fails with an [`ApiError`] carrying a classified
//! [`ErrorKind`], the HTTP status when there was one, and the message the
//! backend sent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Validation,
    Authorization,
    NotFound,
    Server,
    Timeout,
    Network,
    Unknown,
}

impl ErrorKind {
    /// Classify a non-success HTTP status
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => ErrorKind::Validation,
            401 | 403 => ErrorKind::Authorization,
            404 => ErrorKind::NotFound,
            _ => ErrorKind::Server,
        }
    }

    /// Fixed display text for the kind
    pub fn user_message(self) -> &'static str {
        match self {
            ErrorKind::Network => "Unable to connect to server. Please check your internet connection.",
            ErrorKind::Validation => "Please check the information you entered.",
            ErrorKind::Authorization => "You do not have permission to perform this action.",
            ErrorKind::NotFound => "The requested resource was not found.",
            ErrorKind::Server => "An error occurred on the server. Please try again later.",
            ErrorKind::Timeout => "Request timed out. Please try again.",
            ErrorKind::Unknown => "An unexpected error occurred. Please try again.",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Validation => "VALIDATION_ERROR",
            ErrorKind::Authorization => "AUTHORIZATION_ERROR",
            ErrorKind::NotFound => "NOT_FOUND_ERROR",
            ErrorKind::Server => "SERVER_ERROR",
            ErrorKind::Timeout => "TIMEOUT_ERROR",
            ErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Network, timeout and server errors may succeed on a second try
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Network | ErrorKind::Timeout | ErrorKind::Server)
    }
}

#[derive(Clone, Debug, Error)]
#[error("{message}")]
pub struct ApiError {
    pub kind: ErrorKind,
    pub status: Option<u16>,
    pub message: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            details: None,
        }
    }

    pub fn timeout() -> Self {
        Self::new(ErrorKind::Timeout, ErrorKind::Timeout.user_message())
    }

    pub fn network(reason: impl std::fmt::Display) -> Self {
        log::debug!("[Api] Network failure: {}", reason);
        Self::new(ErrorKind::Network, ErrorKind::Network.user_message())
    }

    pub fn decode(reason: impl std::fmt::Display) -> Self {
        Self::new(ErrorKind::Unknown, format!("Unexpected response: {}", reason))
    }

    /// Build an error from a non-success response.
    ///
    /// Message: body `detail` string, else body `message`, else the status
    /// text. Details: body `details`, else the whole body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let fallback = if body.is_empty() {
            format!("Request failed with status code {}", status)
        } else {
            String::from_utf8_lossy(body).into_owned()
        };

        let message = parsed
            .as_ref()
            .and_then(|v| {
                v.get("detail")
                    .and_then(Value::as_str)
                    .or_else(|| v.get("message").and_then(Value::as_str))
            })
            .map(str::to_string)
            .unwrap_or(fallback);

        let details = parsed.map(|v| match v.get("details") {
            Some(d) if !d.is_null() => d.clone(),
            _ => v,
        });

        Self {
            kind: ErrorKind::from_status(status),
            status: Some(status),
            message,
            details,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == Some(401)
    }

    /// Text for a toast: the backend's own message for responses, the fixed
    /// text for transport failures
    pub fn user_message(&self) -> String {
        match self.status {
            Some(_) if !self.message.is_empty() => self.message.clone(),
            _ => self.kind.user_message().to_string(),
        }
    }

    pub fn summary(&self) -> ErrorSummary {
        ErrorSummary {
            title: format!("{} - Please try again", self.kind.code()),
            message: self.kind.user_message().to_string(),
            details: self.details.clone(),
            retryable: self.is_retryable(),
            timestamp: Utc::now(),
        }
    }
}

/// Display text for a kind, with an optional override
pub fn user_message(kind: ErrorKind, custom: Option<&str>) -> String {
    match custom {
        Some(msg) if !msg.is_empty() => msg.to_string(),
        _ => kind.user_message().to_string(),
    }
}

/// Client-side form validation failure listing the offending fields
pub fn validation_error(fields: &[(&str, &str)]) -> ApiError {
    let details = fields
        .iter()
        .map(|(field, msg)| (field.to_string(), Value::String(msg.to_string())))
        .collect::<serde_json::Map<_, _>>();
    let names = fields.iter().map(|(f, _)| *f).collect::<Vec<_>>().join(", ");
    log::warn!("[Validation] Failed fields: {}", names);
    ApiError {
        kind: ErrorKind::Validation,
        status: None,
        message: format!("Validation failed: {}", names),
        details: Some(Value::Object(details)),
    }
}

/// UI-ready error description
#[derive(Clone, Debug, Serialize)]
pub struct ErrorSummary {
    pub title: String,
    pub message: String,
    pub details: Option<Value>,
    pub retryable: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_classification() {
        assert_eq!(ErrorKind::from_status(400), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Authorization);
        assert_eq!(ErrorKind::from_status(403), ErrorKind::Authorization);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(500), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Server);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::Server);
    }

    #[test]
    fn test_detail_takes_precedence_over_message() {
        let body = json!({"detail": "Item not found", "message": "other"}).to_string();
        let err = ApiError::from_response(404, body.as_bytes());
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message, "Item not found");
        assert_eq!(err.user_message(), "Item not found");
    }

    #[test]
    fn test_message_and_details_from_body() {
        let body = json!({"message": "bad", "details": {"field": "serial"}}).to_string();
        let err = ApiError::from_response(400, body.as_bytes());
        assert_eq!(err.message, "bad");
        assert_eq!(err.details, Some(json!({"field": "serial"})));

        let body = json!({"message": "bad"}).to_string();
        let err = ApiError::from_response(400, body.as_bytes());
        assert_eq!(err.details, Some(json!({"message": "bad"})));
    }

    #[test]
    fn test_non_json_body_falls_back() {
        let err = ApiError::from_response(502, b"");
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.message, "Request failed with status code 502");
        assert!(err.details.is_none());

        let err = ApiError::from_response(500, b"gateway down");
        assert_eq!(err.message, "gateway down");
    }

    #[test]
    fn test_transport_failures() {
        assert_eq!(ApiError::timeout().kind, ErrorKind::Timeout);
        assert_eq!(ApiError::network("refused").kind, ErrorKind::Network);
        assert_eq!(ApiError::decode("eof").kind, ErrorKind::Unknown);
        assert_eq!(ApiError::network("x").user_message(), ErrorKind::Network.user_message());
    }

    #[test]
    fn test_retryable_kinds() {
        assert!(ErrorKind::Network.is_retryable());
        assert!(ErrorKind::Timeout.is_retryable());
        assert!(ErrorKind::Server.is_retryable());
        assert!(!ErrorKind::Validation.is_retryable());
        assert!(!ErrorKind::Authorization.is_retryable());
        assert!(!ErrorKind::NotFound.is_retryable());
        assert!(!ErrorKind::Unknown.is_retryable());
    }

    #[test]
    fn test_user_message_override() {
        assert_eq!(user_message(ErrorKind::Server, Some("custom")), "custom");
        assert_eq!(user_message(ErrorKind::Server, None), ErrorKind::Server.user_message());
    }

    #[test]
    fn test_summary_and_validation_error() {
        let summary = ApiError::from_response(503, b"").summary();
        assert_eq!(summary.title, "SERVER_ERROR - Please try again");
        assert!(summary.retryable);

        let err = validation_error(&[("username", "required"), ("password", "too short")]);
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(err.message, "Validation failed: username, password");
        assert_eq!(err.details.as_ref().and_then(|d| d.get("password")), Some(&json!("too short")));
    }
}
