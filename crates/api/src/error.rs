//! API error types with HTTP response mapping.

use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Bad request from the client (malformed body or identifier).
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::NotFound { .. } => (StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Conflict(_) => (StatusCode::CONFLICT, err.to_string()),
        DomainError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        DomainError::Store(store_err) => {
            tracing::error!(error = %store_err, "store failure");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

/// Parses a path identifier, mapping a parse failure to a 400 with the
/// entity named in the message.
pub(crate) fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {what} format")))
}

#[cfg(test)]
mod tests {
    use common::OrderId;

    use super::*;

    #[test]
    fn parse_id_accepts_well_formed_uuid() {
        let id = OrderId::new();
        let parsed: OrderId = parse_id(&id.to_string(), "ID").unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn parse_id_names_the_entity_in_the_message() {
        let err = parse_id::<OrderId>("garbage", "customer ID").unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Invalid customer ID format"),
            other => panic!("expected BadRequest, got {other:?}"),
        }
    }
}
