use std::sync::Arc;

use actix_cors::Cors;
use actix_web::error::JsonPayloadError;
use actix_web::middleware::{DefaultHeaders, Logger, NormalizePath};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::application::comment_service::CommentService;
use crate::application::follow_service::FollowService;
use crate::application::group_service::GroupService;
use crate::application::post_service::PostService;
use crate::data::comment_repository::{CommentRepository, PostgresCommentRepository};
use crate::data::follow_repository::{FollowRepository, PostgresFollowRepository};
use crate::data::group_repository::{GroupRepository, PostgresGroupRepository};
use crate::data::post_repository::{PostRepository, PostgresPostRepository};
use crate::data::user_repository::{PostgresUserRepository, UserRepository};
use crate::domain::error::{DomainError, NON_FIELD_ERRORS};
use crate::infrastructure::config::{AppConfig, PaginationConfig};
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::{JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware};

pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub follows: Arc<dyn FollowRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            users: Arc::new(PostgresUserRepository::new(pool.clone())),
            posts: Arc::new(PostgresPostRepository::new(pool.clone())),
            groups: Arc::new(PostgresGroupRepository::new(pool.clone())),
            comments: Arc::new(PostgresCommentRepository::new(pool.clone())),
            follows: Arc::new(PostgresFollowRepository::new(pool)),
        }
    }
}

/// Everything a worker needs to serve the API.
#[derive(Clone)]
pub struct AppServices {
    pub auth: AuthService,
    pub posts: PostService,
    pub groups: GroupService,
    pub comments: CommentService,
    pub follows: FollowService,
    pub pagination: PaginationConfig,
}

impl AppServices {
    pub fn new(repos: Repositories, keys: JwtKeys, pagination: PaginationConfig) -> Self {
        Self {
            auth: AuthService::new(Arc::clone(&repos.users), keys),
            posts: PostService::new(Arc::clone(&repos.posts), Arc::clone(&repos.groups)),
            groups: GroupService::new(Arc::clone(&repos.groups)),
            comments: CommentService::new(Arc::clone(&repos.posts), repos.comments),
            follows: FollowService::new(repos.follows, repos.users),
            pagination,
        }
    }

    /// Registers shared state and the `/api/v1` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.posts.clone()))
            .app_data(web::Data::new(self.groups.clone()))
            .app_data(web::Data::new(self.comments.clone()))
            .app_data(web::Data::new(self.follows.clone()))
            .app_data(web::Data::new(self.pagination))
            .route("/health", web::get().to(health))
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth::configure)
                    .configure(handlers::post::configure)
                    .configure(handlers::group::configure)
                    .configure(handlers::comment::configure)
                    .configure(handlers::follow::configure),
            );
    }
}

pub async fn start_rest_server(config: AppConfig, services: AppServices) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);

    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config);
        let services = services.clone();

        App::new()
            .wrap(JwtAuthMiddleware::new(services.auth.clone()))
            .wrap(NormalizePath::trim())
            .wrap(Logger::default())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(|cfg| services.configure(cfg))
    })
    .bind(bind_address)?
    .run()
    .await
    .map_err(anyhow::Error::new)?;

    Ok(())
}

/// Malformed JSON bodies are reported like any other validation failure.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    DomainError::field(NON_FIELD_ERRORS, err.to_string()).into()
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
