pub mod auth_service;
pub mod comment_service;
pub mod follow_service;
pub mod group_service;
pub mod pagination;
pub mod post_service;
