use actix_web::{web, HttpResponse};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::response::MessageResponse;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/register").route(web::post().to(register)))
        .service(web::resource("/login").route(web::post().to(login)));
}

#[derive(Deserialize)]
struct RegisterRequest {
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
}

#[derive(Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
}

#[derive(Serialize)]
struct LoginResponse {
    token: String,
    username: String,
    role: String,
}

async fn register(
    db: web::Data<DatabaseConnection>,
    payload: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let username = payload.username.clone().unwrap_or_default();
    let email = payload.email.clone().unwrap_or_default();
    let password = payload.password.clone().unwrap_or_default();

    auth::register(db.get_ref(), &username, &email, &password).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("user registered")))
}

async fn login(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    payload: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let email = payload.email.clone().unwrap_or_default();
    let password = payload.password.clone().unwrap_or_default();

    let outcome = auth::login(db.get_ref(), config.get_ref(), &email, &password).await?;
    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.token,
        username: outcome.username,
        role: outcome.role,
    }))
}
