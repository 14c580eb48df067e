use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set,
};

use crate::entity::user;

pub async fn find_by_username_or_email(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(username))
                .add(user::Column::Email.eq(email)),
        )
        .one(db)
        .await
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, DbErr> {
    user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await
}

pub async fn insert(
    db: &DatabaseConnection,
    username: &str,
    email: &str,
    password_hash: &str,
    role: &str,
) -> Result<i32, DbErr> {
    let model = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password: Set(password_hash.to_string()),
        role: Set(Some(role.to_string())),
        created_at: Set(Some(Utc::now())),
        ..Default::default()
    };
    let inserted = model.insert(db).await?;
    Ok(inserted.id)
}
