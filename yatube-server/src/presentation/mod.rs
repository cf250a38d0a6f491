pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod permissions;
pub mod utils;
