use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Directed edge: `user` follows `following`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user: String,
    pub following_id: Uuid,
    pub following: String,
}

impl Follow {
    pub fn new(user_id: Uuid, user: String, following_id: Uuid, following: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            user,
            following_id,
            following,
        }
    }
}
