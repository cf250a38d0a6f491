use actix_web::{HttpRequest, HttpResponse, post, web};
use serde_json::json;
use tracing::info;
use validator::Validate;

use crate::application::auth_service::AuthService;
use crate::domain::error::DomainError;
use crate::presentation::dto::{AuthResponse, LoginRequest, RegisterRequest, VerifyTokenRequest};
use crate::presentation::utils::request_id;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/auth").service(register)).service(
        web::scope("/jwt")
            .service(create_token)
            .service(verify_token),
    );
}

fn token_response(service: &AuthService, access_token: String) -> AuthResponse {
    AuthResponse {
        access_token,
        expires_in: service.keys().expires_in(),
        token_type: "Bearer".to_string(),
    }
}

#[post("/register")]
async fn register(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    payload.validate()?;
    let (Some(username), Some(email), Some(password)) =
        (payload.username, payload.email, payload.password)
    else {
        return Err(DomainError::required("username"));
    };

    let user = service.register(username, email, password).await?;
    let jwt = service.issue_token(&user)?;

    info!(
        request_id = %request_id(&req),
        user_id = %user.id,
        username = %user.username,
        "user registered"
    );

    Ok(HttpResponse::Created().json(token_response(&service, jwt)))
}

#[post("/create")]
async fn create_token(
    req: HttpRequest,
    service: web::Data<AuthService>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    payload.validate()?;
    let username = payload.username.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    let jwt = service.login(&username, &password).await?;

    info!(request_id = %request_id(&req), username = %username, "user logged in");

    Ok(HttpResponse::Ok().json(token_response(&service, jwt)))
}

#[post("/verify")]
async fn verify_token(
    service: web::Data<AuthService>,
    payload: web::Json<VerifyTokenRequest>,
) -> Result<HttpResponse, DomainError> {
    let payload = payload.into_inner();
    payload.validate()?;
    service
        .authenticate(payload.token.as_deref().unwrap_or_default())
        .await?;
    Ok(HttpResponse::Ok().json(json!({})))
}
