use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::comment_repository::CommentRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::comment::Comment;
use crate::domain::error::DomainError;
use crate::domain::post::Post;
use crate::presentation::utils::AuthenticatedUser;

/// Comments are always addressed through their parent post. Callers resolve
/// the post once with [`CommentService::resolve_post`] and pass it to every
/// other operation of the same request.
#[derive(Clone)]
pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, comments: Arc<dyn CommentRepository>) -> Self {
        Self { posts, comments }
    }

    pub async fn resolve_post(&self, post_id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    pub async fn get_comments(&self, post: &Post) -> Result<Vec<Comment>, DomainError> {
        self.comments.list_for_post(post.id).await
    }

    pub async fn get_comment(&self, post: &Post, id: Uuid) -> Result<Comment, DomainError> {
        self.comments
            .find_in_post(post.id, id)
            .await?
            .ok_or(DomainError::CommentNotFound(id))
    }

    #[instrument(skip(self, post, author, text), fields(post_id = %post.id, author = %author.username))]
    pub async fn create_comment(
        &self,
        post: &Post,
        author: &AuthenticatedUser,
        text: String,
    ) -> Result<Comment, DomainError> {
        let comment = Comment::new(post.id, author.id, author.username.clone(), text);
        self.comments.create(comment).await
    }

    #[instrument(skip(self, comment, text), fields(comment_id = %comment.id))]
    pub async fn update_comment(
        &self,
        comment: &Comment,
        text: String,
    ) -> Result<Comment, DomainError> {
        self.comments
            .update_text(comment.id, text)
            .await?
            .ok_or(DomainError::CommentNotFound(comment.id))
    }

    #[instrument(skip(self, comment), fields(comment_id = %comment.id))]
    pub async fn delete_comment(&self, comment: &Comment) -> Result<(), DomainError> {
        if self.comments.delete(comment.id).await? {
            Ok(())
        } else {
            Err(DomainError::CommentNotFound(comment.id))
        }
    }
}
