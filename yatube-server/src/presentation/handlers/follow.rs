use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;
use validator::Validate;

use crate::application::follow_service::FollowService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{FollowQuery, FollowRequest, FollowResponse};
use crate::presentation::utils::{AuthenticatedUser, request_id};

/// List and create only: follow edges cannot be edited or removed here.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/follow")
            .route(web::get().to(get_follows))
            .route(web::head().to(get_follows))
            .route(web::post().to(create_follow)),
    );
}

async fn get_follows(
    user: AuthenticatedUser,
    service: web::Data<FollowService>,
    query: web::Query<FollowQuery>,
) -> Result<HttpResponse, DomainError> {
    let follows: Vec<FollowResponse> = service
        .get_follows(&user, query.search.as_deref())
        .await?
        .into_iter()
        .map(FollowResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(follows))
}

async fn create_follow(
    req: HttpRequest,
    user: AuthenticatedUser,
    service: web::Data<FollowService>,
    payload: web::Json<FollowRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    payload.validate()?;
    let following = payload
        .following
        .ok_or_else(|| DomainError::required("following"))?;

    let follow = service.follow(&user, &following).await?;

    info!(
        request_id = %request_id(&req),
        user = %follow.user,
        following = %follow.following,
        "follow created"
    );

    Ok(HttpResponse::Created().json(FollowResponse::from(follow)))
}
