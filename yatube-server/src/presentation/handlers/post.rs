use actix_web::{HttpRequest, HttpResponse, web};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::application::pagination::PageRequest;
use crate::application::post_service::PostService;
use crate::domain::error::DomainError;
use crate::domain::post::PostChanges;
use crate::infrastructure::config::PaginationConfig;
use crate::presentation::dto::{
    ListPostsQuery, PageResponse, PatchPostRequest, PostRequest, PostResponse,
};
use crate::presentation::permissions::Authorized;
use crate::presentation::utils::{absolute_path, parse_json, request_id};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(get_posts))
            .route(web::head().to(get_posts))
            .route(web::post().to(create_post)),
    )
    .service(
        web::resource("/posts/{id}")
            .route(web::get().to(get_post))
            .route(web::head().to(get_post))
            .route(web::put().to(update_post))
            .route(web::patch().to(partial_update_post))
            .route(web::delete().to(delete_post)),
    );
}

async fn get_posts(
    req: HttpRequest,
    service: web::Data<PostService>,
    pagination: web::Data<PaginationConfig>,
    query: web::Query<ListPostsQuery>,
) -> Result<HttpResponse, DomainError> {
    let request = PageRequest::resolve(
        query.limit.as_deref(),
        query.offset.as_deref(),
        &pagination,
    );
    let page = service.get_posts(request).await?;

    info!(
        request_id = %request_id(&req),
        limit = request.limit,
        offset = request.offset,
        total = page.count,
        "posts retrieved"
    );

    let body = PageResponse::from_page(page.map(PostResponse::from), &absolute_path(&req));
    Ok(HttpResponse::Ok().json(body))
}

async fn get_post(
    service: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post = service.get_post(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

async fn create_post(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<PostService>,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, DomainError> {
    let user = auth.user()?;
    let payload = payload.into_inner();
    payload.validate()?;
    let text = payload.text.ok_or_else(|| DomainError::required("text"))?;

    let post = service
        .create_post(user, text, payload.group.flatten(), payload.image.flatten())
        .await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post created"
    );

    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

async fn update_post(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<PostService>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, DomainError> {
    let post = service.get_post(path.into_inner()).await?;
    auth.check_object(&post)?;
    let payload: PostRequest = parse_json(&body)?;
    payload.validate()?;
    apply_update(&req, &auth, &service, post.id, payload.into()).await
}

async fn partial_update_post(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<PostService>,
    path: web::Path<Uuid>,
    body: web::Bytes,
) -> Result<HttpResponse, DomainError> {
    let post = service.get_post(path.into_inner()).await?;
    auth.check_object(&post)?;
    let payload: PatchPostRequest = parse_json(&body)?;
    payload.validate()?;
    apply_update(&req, &auth, &service, post.id, payload.into()).await
}

async fn apply_update(
    req: &HttpRequest,
    auth: &Authorized,
    service: &PostService,
    post_id: Uuid,
    changes: PostChanges,
) -> Result<HttpResponse, DomainError> {
    let user = auth.user()?;
    let post = service.update_post(post_id, changes).await?;

    info!(
        request_id = %request_id(req),
        username = %user.username,
        post_id = %post.id,
        "post updated"
    );

    Ok(HttpResponse::Ok().json(PostResponse::from(post)))
}

async fn delete_post(
    req: HttpRequest,
    auth: Authorized,
    service: web::Data<PostService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let user = auth.user()?;
    let post = service.get_post(path.into_inner()).await?;
    auth.check_object(&post)?;

    service.delete_post(post.id).await?;

    info!(
        request_id = %request_id(&req),
        username = %user.username,
        post_id = %post.id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
