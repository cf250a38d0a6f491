use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::application::pagination::Page;
use crate::domain::comment::Comment;
use crate::domain::follow::Follow;
use crate::domain::post::{Post, PostChanges};

// ======================= AUTH =======================

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 3, max = 150, message = "Username must be 3-150 characters long.")
    )]
    pub username: Option<String>,
    #[validate(
        required(message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 8, message = "Password must be at least 8 characters long.")
    )]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "This field is required."))]
    pub username: Option<String>,
    #[validate(required(message = "This field is required."))]
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyTokenRequest {
    #[validate(required(message = "This field is required."))]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub expires_in: i64,
    #[serde(rename = "token_type")]
    pub token_type: String, // "Bearer"
}

// ======================= POSTS =======================

/// Keeps an explicit `null` (`Some(None)`) apart from an absent field (`None`).
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Body of `POST` and `PUT`. Any `author` in the body is ignored; `group`
/// or `image` sent as `null` clears the field on update.
#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub group: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub image: Option<Option<String>>,
}

/// Body of `PATCH`: every field optional.
#[derive(Debug, Deserialize, Validate)]
pub struct PatchPostRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub group: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub image: Option<Option<String>>,
}

impl From<PostRequest> for PostChanges {
    fn from(req: PostRequest) -> Self {
        Self {
            text: req.text,
            group_id: req.group,
            image: req.image,
        }
    }
}

impl From<PatchPostRequest> for PostChanges {
    fn from(req: PatchPostRequest) -> Self {
        Self {
            text: req.text,
            group_id: req.group,
            image: req.image,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub group: Option<Uuid>,
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            author: post.author,
            text: post.text,
            pub_date: post.pub_date,
            image: post.image,
            group: post.group_id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PageResponse<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> PageResponse<T> {
    /// `base` is the absolute URL of the listing without a query string.
    pub fn from_page(page: Page<T>, base: &str) -> Self {
        let limit = page.request.limit;
        let link = |offset: usize| {
            if offset == 0 {
                format!("{base}?limit={limit}")
            } else {
                format!("{base}?limit={limit}&offset={offset}")
            }
        };
        Self {
            count: page.count,
            next: page.next_offset().map(link),
            previous: page.previous_offset().map(link),
            results: page.items,
        }
    }
}

// ======================= COMMENTS =======================

#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PatchCommentRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub author: String,
    pub post: Uuid,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl From<Comment> for CommentResponse {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id,
            author: comment.author,
            post: comment.post_id,
            text: comment.text,
            created: comment.created,
        }
    }
}

// ======================= FOLLOWS =======================

#[derive(Debug, Deserialize, Validate)]
pub struct FollowRequest {
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub following: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FollowQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FollowResponse {
    pub user: String,
    pub following: String,
}

impl From<Follow> for FollowResponse {
    fn from(follow: Follow) -> Self {
        Self {
            user: follow.user,
            following: follow.following,
        }
    }
}
