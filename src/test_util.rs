//! Test fixtures: an in-memory database run through the same startup
//! migration as production, plus the app wiring for HTTP tests.

use actix_web::web;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::AppConfig;
use crate::db;
use crate::response::json_error_handler;
use crate::routes;

pub const TEST_ADMIN_PASSWORD: &str = "admin-pw";

pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        sqlite_path: String::new(),
        database_url: Some("sqlite::memory:".to_string()),
        jwt_secret: "test-secret".to_string(),
        admin_password: Some(TEST_ADMIN_PASSWORD.to_string()),
        admin_email: "admin@example.com".to_string(),
    }
}

/// A single pooled connection, so the memory database outlives individual
/// checkouts.
pub async fn test_db(config: &AppConfig) -> DatabaseConnection {
    let mut opts = ConnectOptions::new(config.database_url());
    opts.max_connections(1);
    let conn = Database::connect(opts).await.unwrap();
    db::migrate(&conn, config).await.unwrap();
    conn
}

/// App wiring for `test::init_service`, mirroring `main`.
pub fn service_config(
    db: DatabaseConnection,
    config: AppConfig,
) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        cfg.app_data(web::Data::new(config))
            .app_data(web::Data::new(db))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler));
        routes::user::config(cfg);
        cfg.service(web::scope("/comments").configure(routes::comment::config));
    }
}
