use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::store;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub id: i32,
    pub username: String,
    pub role: String,
    pub exp: usize,
}

pub struct LoginOutcome {
    pub token: String,
    pub username: String,
    pub role: String,
}

pub async fn register(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password: &str,
) -> Result<(), AppError> {
    if username.trim().is_empty() || email.trim().is_empty() || password.trim().is_empty() {
        return Err(AppError::validation("username, email and password are required"));
    }

    if store::user::find_by_username_or_email(db, username, email)
        .await?
        .is_some()
    {
        return Err(AppError::DuplicateUser);
    }

    let password_hash = hash(password, 10).map_err(|_| AppError::Internal)?;
    match store::user::insert(db, username, email, &password_hash, "user").await {
        Ok(_) => Ok(()),
        Err(err) if is_unique_violation(&err) => Err(AppError::DuplicateUser),
        Err(err) => Err(err.into()),
    }
}

pub async fn login(
    db: &DatabaseConnection,
    config: &AppConfig,
    email: &str,
    password: &str,
) -> Result<LoginOutcome, AppError> {
    if email.trim().is_empty() || password.trim().is_empty() {
        return Err(AppError::validation("email and password are required"));
    }

    // a missing user and a wrong password must look identical to the caller
    let user = match store::user::find_by_email(db, email).await? {
        Some(user) => user,
        None => return Err(AppError::InvalidCredentials),
    };

    let ok = verify(password, &user.password).map_err(|_| AppError::Internal)?;
    if !ok {
        return Err(AppError::InvalidCredentials);
    }

    let role = user.role.clone().unwrap_or_else(|| "user".to_string());
    let token = issue_token(config, user.id, &user.username, &role)?;
    Ok(LoginOutcome {
        token,
        username: user.username,
        role,
    })
}

pub fn issue_token(
    config: &AppConfig,
    id: i32,
    username: &str,
    role: &str,
) -> Result<String, AppError> {
    let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
    let claims = Claims {
        id,
        username: username.to_string(),
        role: role.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|_| AppError::Internal)
}

pub fn verify_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);
    decode::<Claims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::InvalidToken)
}

fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("UNIQUE") || msg.contains("Duplicate")
}
