use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Authored;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    /// Username of the author, joined from `users`.
    pub author: String,
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
}

impl Post {
    pub fn new(
        author_id: Uuid,
        author: String,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            author,
            text,
            group_id,
            image,
            pub_date: Utc::now(),
        }
    }
}

impl Authored for Post {
    fn author_id(&self) -> Uuid {
        self.author_id
    }
}

/// Field changes for an existing post. `None` leaves the column untouched;
/// `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub text: Option<String>,
    pub group_id: Option<Option<Uuid>>,
    pub image: Option<Option<String>>,
}
