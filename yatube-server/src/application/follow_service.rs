use std::sync::Arc;

use tracing::instrument;

use crate::data::follow_repository::{ALREADY_FOLLOWING, FollowRepository, SELF_FOLLOW};
use crate::data::user_repository::UserRepository;
use crate::domain::error::{DomainError, NON_FIELD_ERRORS};
use crate::domain::follow::Follow;
use crate::presentation::utils::AuthenticatedUser;

#[derive(Clone)]
pub struct FollowService {
    follows: Arc<dyn FollowRepository>,
    users: Arc<dyn UserRepository>,
}

impl FollowService {
    pub fn new(follows: Arc<dyn FollowRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { follows, users }
    }

    /// Outgoing edges of the requester only. An empty search term means no filter.
    pub async fn get_follows(
        &self,
        user: &AuthenticatedUser,
        search: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError> {
        let search = search.map(str::trim).filter(|term| !term.is_empty());
        self.follows.list_for_user(user.id, search).await
    }

    #[instrument(skip(self, user), fields(user = %user.username))]
    pub async fn follow(
        &self,
        user: &AuthenticatedUser,
        following: &str,
    ) -> Result<Follow, DomainError> {
        let target = self
            .users
            .find_by_username(following)
            .await?
            .ok_or_else(|| {
                DomainError::field(
                    "following",
                    format!("Object with username={following} does not exist."),
                )
            })?;

        if target.id == user.id {
            return Err(DomainError::field("following", SELF_FOLLOW));
        }
        if self.follows.exists(user.id, target.id).await? {
            return Err(DomainError::field(NON_FIELD_ERRORS, ALREADY_FOLLOWING));
        }

        let follow = Follow::new(user.id, user.username.clone(), target.id, target.username);
        self.follows.create(follow).await
    }
}
