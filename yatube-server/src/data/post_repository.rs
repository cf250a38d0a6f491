use crate::domain::error::DomainError;
use crate::domain::post::{Post, PostChanges};
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn create(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError>;
    /// Returns `false` when no post with `id` existed.
    async fn delete(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Post>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
}

#[derive(Clone)]
pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, author_id, text, group_id, image, pub_date)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id)
        .bind(post.author_id)
        .bind(&post.text)
        .bind(post.group_id)
        .bind(&post.image)
        .bind(post.pub_date)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to create post: {}", e);
            DomainError::Internal(format!("database error: {}", e))
        })?;

        info!(post_id = %post.id, author_id = %post.author_id, "post created");
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.author_id, u.username AS author, p.text, p.group_id, p.image, p.pub_date
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("db error find_by_id {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            WITH updated AS (
                UPDATE posts
                SET
                    text = COALESCE($1, text),
                    group_id = CASE WHEN $2 THEN $3 ELSE group_id END,
                    image = CASE WHEN $4 THEN $5 ELSE image END
                WHERE id = $6
                RETURNING id, author_id, text, group_id, image, pub_date
            )
            SELECT p.id, p.author_id, u.username AS author, p.text, p.group_id, p.image, p.pub_date
            FROM updated p
            JOIN users u ON u.id = p.author_id
            "#,
        )
        .bind(changes.text)
        .bind(changes.group_id.is_some())
        .bind(changes.group_id.flatten())
        .bind(changes.image.is_some())
        .bind(changes.image.flatten())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("failed to update post {}: {}", id, e);
            DomainError::Internal(e.to_string())
        })?;

        if post.is_some() {
            info!(post_id = %id, "post updated");
        }

        Ok(post)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let deleted = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("failed to delete post {}: {}", id, e);
                DomainError::Internal(e.to_string())
            })?;

        if deleted.rows_affected() == 0 {
            return Ok(false);
        }

        info!(post_id = %id, "post deleted");
        Ok(true)
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT p.id, p.author_id, u.username AS author, p.text, p.group_id, p.image, p.pub_date
            FROM posts p
            JOIN users u ON u.id = p.author_id
            ORDER BY p.pub_date DESC, p.id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("db error while fetching posts: {}", e);
            DomainError::Internal(e.to_string())
        })
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("db error while counting posts: {}", e);
                DomainError::Internal(e.to_string())
            })?;
        Ok(total as usize)
    }
}
