use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::comment_service::CommentService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CommentRequest, CommentResponse, PatchCommentRequest};
use crate::presentation::permissions::Authorized;
use crate::presentation::utils::{parse_json, request_id};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts/{post_id}/comments")
            .route(web::get().to(get_comments))
            .route(web::head().to(get_comments))
            .route(web::post().to(create_comment)),
    )
    .service(
        web::resource("/posts/{post_id}/comments/{id}")
            .route(web::get().to(get_comment))
            .route(web::head().to(get_comment))
            .route(web::put().to(update_comment))
            .route(web::patch().to(partial_update_comment))
            .route(web::delete().to(delete_comment)),
    );
}

async fn get_comments(
    service: web::Data<CommentService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = service.resolve_post(path.into_inner()).await?;
    let comments: Vec<CommentResponse> = service
        .get_comments(&post)
        .await?
        .into_iter()
        .map(CommentResponse::from)
        .collect();
    Ok(HttpResponse::Ok().json(comments))
}

async fn get_comment(
    service: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    let post = service.resolve_post(post_id).await?;
    let comment = service.get_comment(&post, comment_id).await?;
    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

async fn create_comment(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<CommentService>,
    path: web::Path<Uuid>,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let user = auth.user()?;
    let post = service.resolve_post(path.into_inner()).await?;
    let payload = payload.into_inner();
    payload.validate()?;
    let text = payload.text.ok_or_else(|| DomainError::required("text"))?;

    let comment = service.create_comment(&post, user, text).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        comment_id = %comment.id,
        "comment created"
    );

    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

async fn update_comment(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    let post = service.resolve_post(post_id).await?;
    let comment = service.get_comment(&post, comment_id).await?;
    auth.check_object(&comment)?;

    let payload: CommentRequest = parse_json(&body)?;
    payload.validate()?;
    let text = payload.text.ok_or_else(|| DomainError::required("text"))?;

    let comment = service.update_comment(&comment, text).await?;
    info!(request_id = %request_id(&req), comment_id = %comment.id, "comment updated");
    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

async fn partial_update_comment(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Bytes,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    let post = service.resolve_post(post_id).await?;
    let comment = service.get_comment(&post, comment_id).await?;
    auth.check_object(&comment)?;

    let payload: PatchCommentRequest = parse_json(&body)?;
    payload.validate()?;
    let comment = match payload.text {
        Some(text) => service.update_comment(&comment, text).await?,
        None => comment,
    };

    info!(request_id = %request_id(&req), comment_id = %comment.id, "comment updated");
    Ok(HttpResponse::Ok().json(CommentResponse::from(comment)))
}

async fn delete_comment(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<CommentService>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, comment_id) = path.into_inner();
    let post = service.resolve_post(post_id).await?;
    let comment = service.get_comment(&post, comment_id).await?;
    auth.check_object(&comment)?;

    service.delete_comment(&comment).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %post.id,
        comment_id = %comment.id,
        "comment deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
