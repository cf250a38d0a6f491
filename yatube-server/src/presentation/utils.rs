use actix_web::dev::Payload;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::error::{DomainError, NON_FIELD_ERRORS};
use crate::domain::user::User;
use crate::presentation::middleware::RequestId;

#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Extracting `AuthenticatedUser` rejects anonymous requests.
impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>() {
            Some(user) => ready(Ok(user.clone())),
            None => ready(Err(DomainError::Unauthorized.into())),
        }
    }
}

pub fn request_id(req: &HttpRequest) -> String {
    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}

/// Absolute URL of the current path, without the query string.
pub fn absolute_path(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), req.path())
}

/// Decodes a raw JSON body. Updates read the body this way so that the
/// ownership check runs before the payload is looked at.
pub fn parse_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(body)
        .map_err(|err| DomainError::field(NON_FIELD_ERRORS, format!("Json deserialize error: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::dto::CommentRequest;

    #[test]
    fn malformed_body_is_a_non_field_error() {
        let err = parse_json::<CommentRequest>(b"{not json").unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref fields) if fields.contains_key(NON_FIELD_ERRORS)));

        let ok: CommentRequest = parse_json(br#"{"text": "hi"}"#).unwrap();
        assert_eq!(ok.text.as_deref(), Some("hi"));
    }
}
