use bcrypt::hash;
use log::info;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use std::fs::{self, OpenOptions};
use std::path::Path;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::store;

pub async fn connect_db(config: &AppConfig) -> DatabaseConnection {
    ensure_sqlite_path(config);
    let url = config.database_url();
    Database::connect(&url)
        .await
        .unwrap_or_else(|e| panic!("db connect failed: {}", e))
}

/// Startup migration: creates the schema and seeds the admin account.
/// Safe to run on every startup.
pub async fn migrate(db: &DatabaseConnection, config: &AppConfig) -> Result<(), AppError> {
    init_schema(db).await?;
    seed_admin(db, config).await?;
    Ok(())
}

fn ensure_sqlite_path(config: &AppConfig) {
    let raw = config.database_url();
    let path = raw
        .strip_prefix("sqlite://")
        .or_else(|| raw.strip_prefix("sqlite:"))
        .unwrap_or(raw.as_str());
    let path = Path::new(path);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let _ = OpenOptions::new().create(true).write(true).open(path);
}

async fn init_schema(db: &DatabaseConnection) -> Result<(), AppError> {
    let backend = db.get_database_backend();
    let sql = include_str!("../schema.sql");
    for stmt in split_sql(sql) {
        db.execute(Statement::from_string(backend, stmt)).await?;
    }
    Ok(())
}

async fn seed_admin(db: &DatabaseConnection, config: &AppConfig) -> Result<(), AppError> {
    let existing =
        store::user::find_by_username_or_email(db, "admin", &config.admin_email).await?;
    if existing.is_some() {
        return Ok(());
    }

    let password = config
        .admin_password
        .as_deref()
        .unwrap_or_else(|| panic!("ADMIN_PASSWORD must be set on first startup"));
    let password_hash = hash(password, 10).map_err(|_| AppError::Internal)?;
    store::user::insert(db, "admin", &config.admin_email, &password_hash, "admin").await?;
    info!("seeded admin user");
    Ok(())
}

fn split_sql(input: &str) -> Vec<String> {
    let mut buf = String::new();
    for line in input.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("--") || trimmed.is_empty() {
            continue;
        }
        buf.push_str(line);
        buf.push('\n');
    }
    buf.split(';')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
