//! In-memory repositories backing the handler and service tests.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use super::comment_repository::CommentRepository;
use super::follow_repository::{ALREADY_FOLLOWING, FollowRepository, SELF_FOLLOW};
use super::group_repository::GroupRepository;
use super::post_repository::PostRepository;
use super::user_repository::UserRepository;
use crate::domain::comment::Comment;
use crate::domain::error::{DomainError, NON_FIELD_ERRORS};
use crate::domain::follow::Follow;
use crate::domain::group::Group;
use crate::domain::post::{Post, PostChanges};
use crate::domain::user::User;

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<User>>,
    groups: Mutex<Vec<Group>>,
    posts: Mutex<Vec<Post>>,
    comments: Mutex<Vec<Comment>>,
    follows: Mutex<Vec<Follow>>,
}

impl InMemoryStore {
    pub fn add_group(&self, title: &str, slug: &str) -> Group {
        let group = Group {
            id: Uuid::new_v4(),
            title: title.to_string(),
            slug: slug.to_string(),
            description: format!("{title} description"),
        };
        self.groups.lock().unwrap().push(group.clone());
        group
    }

    pub fn comment_count(&self) -> usize {
        self.comments.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(DomainError::UserAlreadyExists(user.username));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Group>, DomainError> {
        let groups = self.groups.lock().unwrap();
        Ok(groups.iter().find(|g| g.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, DomainError> {
        Ok(self.groups.lock().unwrap().clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, post: Post) -> Result<Post, DomainError> {
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let posts = self.posts.lock().unwrap();
        Ok(posts.iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<Option<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let Some(post) = posts.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(text) = changes.text {
            post.text = text;
        }
        if let Some(group_id) = changes.group_id {
            post.group_id = group_id;
        }
        if let Some(image) = changes.image {
            post.image = image;
        }
        Ok(Some(post.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|p| p.id != id);
        let deleted = posts.len() != before;
        if deleted {
            self.comments.lock().unwrap().retain(|c| c.post_id != id);
        }
        Ok(deleted)
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<Post>, DomainError> {
        let mut posts = self.posts.lock().unwrap().clone();
        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(a.id.cmp(&b.id)));
        Ok(posts.into_iter().skip(offset).take(limit).collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.posts.lock().unwrap().len())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, comment: Comment) -> Result<Comment, DomainError> {
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn find_in_post(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let comments = self.comments.lock().unwrap();
        Ok(comments
            .iter()
            .find(|c| c.post_id == post_id && c.id == id)
            .cloned())
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let comments = self.comments.lock().unwrap();
        Ok(comments
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn update_text(&self, id: Uuid, text: String) -> Result<Option<Comment>, DomainError> {
        let mut comments = self.comments.lock().unwrap();
        Ok(comments.iter_mut().find(|c| c.id == id).map(|c| {
            c.text = text;
            c.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.id != id);
        Ok(comments.len() != before)
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn create(&self, follow: Follow) -> Result<Follow, DomainError> {
        if follow.user_id == follow.following_id {
            return Err(DomainError::field("following", SELF_FOLLOW));
        }
        let mut follows = self.follows.lock().unwrap();
        if follows
            .iter()
            .any(|f| f.user_id == follow.user_id && f.following_id == follow.following_id)
        {
            return Err(DomainError::field(NON_FIELD_ERRORS, ALREADY_FOLLOWING));
        }
        follows.push(follow.clone());
        Ok(follow)
    }

    async fn exists(&self, user_id: Uuid, following_id: Uuid) -> Result<bool, DomainError> {
        let follows = self.follows.lock().unwrap();
        Ok(follows
            .iter()
            .any(|f| f.user_id == user_id && f.following_id == following_id))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        following: Option<&str>,
    ) -> Result<Vec<Follow>, DomainError> {
        let follows = self.follows.lock().unwrap();
        Ok(follows
            .iter()
            .filter(|f| f.user_id == user_id)
            .filter(|f| following.is_none_or(|name| f.following.eq_ignore_ascii_case(name)))
            .cloned()
            .collect())
    }
}
