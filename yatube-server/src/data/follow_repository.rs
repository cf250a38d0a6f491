use crate::domain::error::{DomainError, NON_FIELD_ERRORS};
use crate::domain::follow::Follow;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

pub const ALREADY_FOLLOWING: &str = "You are already following this user.";
pub const SELF_FOLLOW: &str = "You cannot follow yourself.";

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Persists the edge. Duplicate pairs and self-follows are rejected as
    /// validation errors even when two requests race past the service checks.
    async fn create(&self, follow: Follow) -> Result<Follow, DomainError>;
    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, DomainError>;
    /// Outgoing edges of `user_id`, optionally narrowed to one followed username
    /// (case-insensitive exact match).
    async fn list_for_user(
        &self,
        user_id: Uuid,
        following: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError>;
}

#[derive(Clone)]
pub struct PostgresFollowRepository {
    pool: PgPool,
}

impl PostgresFollowRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn constraint_violation(err: &sqlx::Error) -> Option<DomainError> {
    match err.as_database_error().and_then(|db| db.constraint()) {
        Some("follows_unique_pair") => Some(DomainError::field(NON_FIELD_ERRORS, ALREADY_FOLLOWING)),
        Some("follows_no_self_follow") => Some(DomainError::field("following", SELF_FOLLOW)),
        _ => None,
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn create(&self, follow: Follow) -> Result<Follow, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO follows (id, user_id, following_id)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(follow.id)
        .bind(follow.user_id)
        .bind(follow.following_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            constraint_violation(&e).unwrap_or_else(|| {
                error!("failed to create follow: {}", e);
                DomainError::Internal(format!("database error: {}", e))
            })
        })?;

        info!(user = %follow.user, following = %follow.following, "follow created");
        Ok(follow)
    }

    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE user_id = $1 AND following_id = $2)",
        )
        .bind(user_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to check follow {} -> {}: {}", user_id, following_id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        following: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError> {
        sqlx::query_as::<_, Follow>(
            r#"
            SELECT f.id, f.user_id, u.username AS "user", f.following_id, t.username AS following
            FROM follows f
            JOIN users u ON u.id = f.user_id
            JOIN users t ON t.id = f.following_id
            WHERE f.user_id = $1
              AND ($2::TEXT IS NULL OR LOWER(t.username) = LOWER($2))
            ORDER BY t.username
            "#,
        )
        .bind(user_id)
        .bind(following)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching follows of {}: {}", user_id, e);
            DomainError::Internal(e.to_string())
        })
    }
}
