use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::application::group_service::GroupService;
use crate::domain::error::DomainError;

/// Groups expose reads only; other methods get 405.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/groups")
            .route(web::get().to(get_groups))
            .route(web::head().to(get_groups)),
    )
    .service(
        web::resource("/groups/{id}")
            .route(web::get().to(get_group))
            .route(web::head().to(get_group)),
    );
}

async fn get_groups(service: web::Data<GroupService>) -> Result<HttpResponse, DomainError> {
    let groups = service.get_groups().await?;
    Ok(HttpResponse::Ok().json(groups))
}

async fn get_group(
    service: web::Data<GroupService>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let group = service.get_group(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(group))
}
