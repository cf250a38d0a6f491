use std::collections::BTreeMap;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid request: {}", format_fields(.0))]
    Validation(BTreeMap<String, Vec<String>>),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<serde_json::Value>,
}

fn format_fields(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{}: {}", field, messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ClientError {
    pub(crate) async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status();
        match resp.text().await {
            Ok(body) => Self::from_parts(status, &body),
            Err(err) => ClientError::Request(err),
        }
    }

    /// Maps an error status and the server's `{error, details}` body.
    pub(crate) fn from_parts(status: StatusCode, body: &str) -> Self {
        let parsed = serde_json::from_str::<ErrorBody>(body).ok();
        let message = parsed
            .as_ref()
            .map(|b| b.error.clone())
            .unwrap_or_else(|| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED => ClientError::Unauthorized(message),
            StatusCode::FORBIDDEN => ClientError::Forbidden(message),
            StatusCode::NOT_FOUND => ClientError::NotFound(message),
            StatusCode::BAD_REQUEST => {
                let fields = parsed
                    .and_then(|b| b.details)
                    .and_then(|details| serde_json::from_value(details).ok())
                    .unwrap_or_else(|| BTreeMap::from([("non_field_errors".to_string(), vec![message])]));
                ClientError::Validation(fields)
            }
            other => ClientError::Server {
                status: other.as_u16(),
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_details_are_kept_per_field() {
        let body = r#"{"error":"validation failed","details":{"following":["You cannot follow yourself."]}}"#;
        match ClientError::from_parts(StatusCode::BAD_REQUEST, body) {
            ClientError::Validation(fields) => {
                assert_eq!(fields["following"], vec!["You cannot follow yourself."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn statuses_map_to_variants() {
        let body = r#"{"error":"forbidden"}"#;
        assert!(matches!(
            ClientError::from_parts(StatusCode::FORBIDDEN, body),
            ClientError::Forbidden(msg) if msg == "forbidden"
        ));
        assert!(matches!(
            ClientError::from_parts(StatusCode::UNAUTHORIZED, "{}"),
            ClientError::Unauthorized(_)
        ));
        assert!(matches!(
            ClientError::from_parts(StatusCode::CONFLICT, r#"{"error":"user already exists: leo"}"#),
            ClientError::Server { status: 409, .. }
        ));
    }

    #[test]
    fn non_json_bodies_become_messages() {
        match ClientError::from_parts(StatusCode::NOT_FOUND, "no route\n") {
            ClientError::NotFound(msg) => assert_eq!(msg, "no route"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validation_display_lists_fields() {
        let err = ClientError::Validation(BTreeMap::from([(
            "text".to_string(),
            vec!["This field is required.".to_string()],
        )]));
        assert_eq!(err.to_string(), "invalid request: text: This field is required.");
    }
}
