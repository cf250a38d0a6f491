use std::collections::BTreeMap;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Field name to the list of messages reported for it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("user not found: {0}")]
    UserNotFound(Uuid),
    #[error("user already exists: {0}")]
    UserAlreadyExists(String),
    #[error("post not found: {0}")]
    PostNotFound(Uuid),
    #[error("comment not found: {0}")]
    CommentNotFound(Uuid),
    #[error("group not found: {0}")]
    GroupNotFound(Uuid),
    #[error("forbidden")]
    Forbidden,
    #[error("authentication credentials were not provided")]
    Unauthorized,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid token")]
    InvalidToken,
    #[error("validation failed")]
    Validation(FieldErrors),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Validation failure carrying a single message for one field.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field.to_string(), vec![message.into()]);
        DomainError::Validation(errors)
    }

    pub fn required(field: &str) -> Self {
        Self::field(field, "This field is required.")
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages = errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(message) => message.to_string(),
                        None => format!("invalid value ({})", err.code),
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        DomainError::Validation(fields)
    }
}

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Internal(format!("database error: {}", err))
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::UserNotFound(_)
            | DomainError::PostNotFound(_)
            | DomainError::CommentNotFound(_)
            | DomainError::GroupNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Unauthorized
            | DomainError::InvalidCredentials
            | DomainError::InvalidToken => StatusCode::UNAUTHORIZED,
            DomainError::Forbidden => StatusCode::FORBIDDEN,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::UserAlreadyExists(_) => StatusCode::CONFLICT,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // Database details stay in the logs.
            DomainError::Internal(_) => "internal server error".to_string(),
            other => other.to_string(),
        };
        let details = match self {
            DomainError::PostNotFound(resource)
            | DomainError::UserNotFound(resource)
            | DomainError::CommentNotFound(resource)
            | DomainError::GroupNotFound(resource) => Some(json!({ "resource": resource })),
            DomainError::Forbidden => Some(json!({
                "message": "you do not have permission to perform this action"
            })),
            DomainError::Validation(fields) => Some(json!(fields)),
            _ => None,
        };
        let body = ErrorBody {
            error: message.as_str(),
            details,
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Payload {
        #[validate(required(message = "This field is required."))]
        text: Option<String>,
    }

    #[test]
    fn status_codes_follow_error_taxonomy() {
        assert_eq!(DomainError::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(DomainError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            DomainError::PostNotFound(Uuid::new_v4()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::required("text").status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn validator_errors_keep_field_messages() {
        let err = DomainError::from(Payload { text: None }.validate().unwrap_err());
        match err {
            DomainError::Validation(fields) => {
                assert_eq!(fields["text"], vec!["This field is required.".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[actix_web::test]
    async fn validation_response_lists_fields() {
        let resp = DomainError::field("following", "You cannot follow yourself.").error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "validation failed");
        assert_eq!(json["details"]["following"][0], "You cannot follow yourself.");
    }

    #[actix_web::test]
    async fn internal_errors_hide_details() {
        let resp = DomainError::Internal("connection refused".into()).error_response();
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "internal server error");
    }
}
