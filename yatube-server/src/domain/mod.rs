pub mod comment;
pub mod error;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;

use uuid::Uuid;

/// Records that carry an owning author.
pub trait Authored {
    fn author_id(&self) -> Uuid;
}
