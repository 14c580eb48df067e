use actix_web::{web, HttpResponse};
use chrono::SecondsFormat;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::auth;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::policy::{self, Verdict};
use crate::response::MessageResponse;
use crate::store;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("").route(web::post().to(add)))
        .service(
            web::resource("/{id}")
                .route(web::get().to(list))
                .route(web::delete().to(remove)),
        );
}

#[derive(Deserialize)]
struct AddCommentRequest {
    token: Option<String>,
    station_id: Option<String>,
    comment: Option<String>,
}

#[derive(Deserialize)]
struct DeleteCommentRequest {
    token: Option<String>,
}

#[derive(Serialize)]
struct CommentDto {
    id: i32,
    username: String,
    comment: String,
    created_at: Option<String>,
}

async fn add(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    payload: web::Json<AddCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let token = payload.token.clone().unwrap_or_default();
    let station_id = payload.station_id.clone().unwrap_or_default();
    let text = payload.comment.clone().unwrap_or_default();

    // here a missing token counts as a missing field, not an auth failure
    if token.trim().is_empty() || station_id.trim().is_empty() || text.trim().is_empty() {
        return Err(AppError::validation(
            "token, station_id and comment are required",
        ));
    }

    let claims = auth::verify_token(config.get_ref(), &token)?;

    if policy::evaluate(&text) == Verdict::Rejected {
        return Err(AppError::validation(
            "comment rejected: negative or spam content",
        ));
    }

    store::comment::insert(db.get_ref(), &station_id, claims.id, &claims.username, &text).await?;
    Ok(HttpResponse::Created().json(MessageResponse::new("comment created")))
}

async fn list(
    db: web::Data<DatabaseConnection>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let rows = store::comment::list_by_station(db.get_ref(), &path).await?;
    let list: Vec<CommentDto> = rows
        .into_iter()
        .map(|row| CommentDto {
            id: row.id,
            username: row.username,
            comment: row.comment,
            created_at: row
                .created_at
                .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        })
        .collect();
    Ok(HttpResponse::Ok().json(list))
}

async fn remove(
    db: web::Data<DatabaseConnection>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
    payload: web::Json<DeleteCommentRequest>,
) -> Result<HttpResponse, AppError> {
    let token = payload.token.clone().unwrap_or_default();
    if token.trim().is_empty() {
        return Err(AppError::InvalidToken);
    }

    let claims = auth::verify_token(config.get_ref(), &token)?;
    if claims.role != "admin" {
        return Err(AppError::Forbidden);
    }

    // the path segment is an opaque station id for GET; DELETE needs the
    // numeric comment id
    let id: i32 = path.parse().map_err(|_| AppError::NotFound)?;
    let removed = store::comment::delete_by_id(db.get_ref(), id).await?;
    if removed == 0 {
        return Err(AppError::NotFound);
    }
    Ok(HttpResponse::Ok().json(MessageResponse::new("comment deleted")))
}
