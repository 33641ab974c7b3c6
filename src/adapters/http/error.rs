//! JSON error body shared by every endpoint.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::publication::GatewayErrorKind;

/// Error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(resource_type: &str, id: &str) -> Self {
        Self::new("NOT_FOUND", format!("{} not found: {}", resource_type, id))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::new("UNPROCESSABLE", message)
    }

    pub fn gateway(message: impl Into<String>) -> Self {
        Self::new("GATEWAY_ERROR", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Pairs the body with a status.
    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// 503 when retrying may help, 502 when the remote refused.
pub fn gateway_status(kind: GatewayErrorKind) -> StatusCode {
    match kind {
        GatewayErrorKind::Transient => StatusCode::SERVICE_UNAVAILABLE,
        GatewayErrorKind::Permanent => StatusCode::BAD_GATEWAY,
    }
}

/// 400 for a path id that does not parse.
pub fn invalid_id(resource_type: &str) -> Response {
    ErrorResponse::bad_request(format!("Invalid {} ID", resource_type))
        .into_response_with(StatusCode::BAD_REQUEST)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_kinds_map_to_distinct_statuses() {
        assert_eq!(
            gateway_status(GatewayErrorKind::Transient),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            gateway_status(GatewayErrorKind::Permanent),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn details_are_omitted_when_absent() {
        let body = serde_json::to_value(ErrorResponse::forbidden("no")).unwrap();
        assert_eq!(body, serde_json::json!({"code": "FORBIDDEN", "message": "no"}));
    }
}
