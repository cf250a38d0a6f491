//! Author-or-read-only authorization.
//!
//! The rule is evaluated twice per request. The collection-level check runs
//! before any record is loaded: safe methods always pass, writes need an
//! authenticated requester (401 otherwise). The object-level check runs
//! against the resolved record: safe methods pass, writes need the requester
//! to be the record's author (403 otherwise).

use actix_web::dev::Payload;
use actix_web::http::Method;
use actix_web::{Error, FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::Authored;
use crate::domain::error::DomainError;
use crate::presentation::utils::AuthenticatedUser;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn of(method: &Method) -> Self {
        if matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS) {
            Access::Read
        } else {
            Access::Write
        }
    }

    pub fn is_write(self) -> bool {
        self == Access::Write
    }
}

/// Reads are always allowed; writes need an authenticated owner.
pub fn allows(is_write: bool, is_authenticated: bool, is_owner: bool) -> bool {
    !is_write || (is_authenticated && is_owner)
}

/// Collection-level check. Ownership is not known yet, so only
/// authentication is considered.
pub fn has_permission(access: Access, is_authenticated: bool) -> bool {
    allows(access.is_write(), is_authenticated, true)
}

pub fn has_object_permission(access: Access, is_authenticated: bool, is_owner: bool) -> bool {
    allows(access.is_write(), is_authenticated, is_owner)
}

/// A request that passed the collection-level check for its method.
///
/// Declare it before any body extractor so an anonymous write is rejected
/// with 401 before its payload is looked at.
#[derive(Debug, Clone)]
pub struct Authorized {
    access: Access,
    requester: Option<AuthenticatedUser>,
}

impl Authorized {
    pub fn new(access: Access, requester: Option<AuthenticatedUser>) -> Result<Self, DomainError> {
        if has_permission(access, requester.is_some()) {
            Ok(Self { access, requester })
        } else {
            Err(DomainError::Unauthorized)
        }
    }

    /// The authenticated requester, required by every write.
    pub fn user(&self) -> Result<&AuthenticatedUser, DomainError> {
        self.requester.as_ref().ok_or(DomainError::Unauthorized)
    }

    pub fn check_object<T: Authored>(&self, record: &T) -> Result<(), DomainError> {
        let is_owner = self
            .requester
            .as_ref()
            .is_some_and(|user| user.id == record.author_id());
        if has_object_permission(self.access, self.requester.is_some(), is_owner) {
            Ok(())
        } else {
            Err(DomainError::Forbidden)
        }
    }
}

impl FromRequest for Authorized {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let requester = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Authorized::new(Access::of(req.method()), requester).map_err(Error::from))
    }
}
