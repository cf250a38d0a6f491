use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::application::pagination::{Page, PageRequest};
use crate::data::group_repository::GroupRepository;
use crate::data::post_repository::PostRepository;
use crate::domain::post::PostChanges;
use crate::domain::{error::DomainError, post::Post};
use crate::presentation::utils::AuthenticatedUser;

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>, groups: Arc<dyn GroupRepository>) -> Self {
        Self { posts, groups }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn get_posts(&self, request: PageRequest) -> Result<Page<Post>, DomainError> {
        let count = self.posts.count().await?;
        let items = self.posts.list(request.limit, request.offset).await?;
        Ok(Page {
            items,
            count,
            request,
        })
    }

    /// The author always comes from the authenticated requester.
    #[instrument(skip(self, author, text), fields(author = %author.username))]
    pub async fn create_post(
        &self,
        author: &AuthenticatedUser,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Result<Post, DomainError> {
        if let Some(group_id) = group_id {
            self.ensure_group(group_id).await?;
        }
        let post = Post::new(author.id, author.username.clone(), text, group_id, image);
        self.posts.create(post).await
    }

    #[instrument(skip(self, changes))]
    pub async fn update_post(&self, post_id: Uuid, changes: PostChanges) -> Result<Post, DomainError> {
        if let Some(Some(group_id)) = changes.group_id {
            self.ensure_group(group_id).await?;
        }
        self.posts
            .update(post_id, changes)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        if self.posts.delete(post_id).await? {
            Ok(())
        } else {
            Err(DomainError::PostNotFound(post_id))
        }
    }

    async fn ensure_group(&self, group_id: Uuid) -> Result<(), DomainError> {
        match self.groups.find_by_id(group_id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::field(
                "group",
                format!("Invalid pk \"{group_id}\" - object does not exist."),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::InMemoryStore;

    fn user(name: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::new_v4(),
            username: name.to_string(),
        }
    }

    fn service() -> (PostService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::default());
        (PostService::new(store.clone(), store.clone()), store)
    }

    #[tokio::test]
    async fn created_post_belongs_to_requester() {
        let (posts, _) = service();
        let author = user("anna");
        let post = posts
            .create_post(&author, "hello".into(), None, None)
            .await
            .unwrap();
        assert_eq!(post.author_id, author.id);
        assert_eq!(post.author, "anna");
        assert_eq!(posts.get_post(post.id).await.unwrap().text, "hello");
    }

    #[tokio::test]
    async fn unknown_group_is_a_field_error() {
        let (posts, store) = service();
        let author = user("anna");
        let err = posts
            .create_post(&author, "hello".into(), Some(Uuid::new_v4()), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref fields) if fields.contains_key("group")));

        let group = store.add_group("Cats", "cats");
        let post = posts
            .create_post(&author, "hello".into(), Some(group.id), None)
            .await
            .unwrap();
        assert_eq!(post.group_id, Some(group.id));
    }

    #[tokio::test]
    async fn pages_report_total_count() {
        let (posts, _) = service();
        let author = user("anna");
        for i in 0..5 {
            posts
                .create_post(&author, format!("post {i}"), None, None)
                .await
                .unwrap();
        }
        let page = posts
            .get_posts(PageRequest { limit: 2, offset: 4 })
            .await
            .unwrap();
        assert_eq!(page.count, 5);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.next_offset(), None);
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let (posts, _) = service();
        let author = user("anna");
        let post = posts
            .create_post(&author, "before".into(), None, Some("cat.png".into()))
            .await
            .unwrap();
        let updated = posts
            .update_post(
                post.id,
                PostChanges {
                    text: Some("after".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.text, "after");
        assert_eq!(updated.image.as_deref(), Some("cat.png"));
    }

    #[tokio::test]
    async fn group_can_be_cleared() {
        let (posts, store) = service();
        let author = user("anna");
        let group = store.add_group("Cats", "cats");
        let post = posts
            .create_post(&author, "hello".into(), Some(group.id), Some("cat.png".into()))
            .await
            .unwrap();

        let untouched = posts
            .update_post(post.id, PostChanges::default())
            .await
            .unwrap();
        assert_eq!(untouched.group_id, Some(group.id));

        let cleared = posts
            .update_post(
                post.id,
                PostChanges {
                    group_id: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.group_id, None);
        assert_eq!(cleared.image.as_deref(), Some("cat.png"));
    }

    #[tokio::test]
    async fn deleting_missing_post_is_not_found() {
        let (posts, _) = service();
        let err = posts.delete_post(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::PostNotFound(_)));
    }
}
