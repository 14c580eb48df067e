use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};

use crate::entity::comment;

pub async fn insert(
    db: &DatabaseConnection,
    station_id: &str,
    user_id: i32,
    username: &str,
    text: &str,
) -> Result<i32, DbErr> {
    let model = comment::ActiveModel {
        station_id: Set(station_id.to_string()),
        user_id: Set(user_id),
        username: Set(username.to_string()),
        comment: Set(text.to_string()),
        created_at: Set(Some(Utc::now())),
        ..Default::default()
    };
    let inserted = model.insert(db).await?;
    Ok(inserted.id)
}

pub async fn list_by_station(
    db: &DatabaseConnection,
    station_id: &str,
) -> Result<Vec<comment::Model>, DbErr> {
    comment::Entity::find()
        .filter(comment::Column::StationId.eq(station_id))
        .order_by_desc(comment::Column::CreatedAt)
        .all(db)
        .await
}

pub async fn delete_by_id(db: &DatabaseConnection, id: i32) -> Result<u64, DbErr> {
    let result = comment::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_util::{test_config, test_db};

    #[actix_web::test]
    async fn lists_newest_first_per_station() {
        let config = test_config();
        let db = test_db(&config).await;

        let first = insert(&db, "s1", 1, "bob", "first").await.unwrap();
        actix_web::rt::time::sleep(Duration::from_millis(10)).await;
        let second = insert(&db, "s1", 1, "bob", "second").await.unwrap();
        insert(&db, "s2", 1, "bob", "elsewhere").await.unwrap();

        let rows = list_by_station(&db, "s1").await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, second);
        assert_eq!(rows[1].id, first);

        let empty = list_by_station(&db, "s3").await.unwrap();
        assert!(empty.is_empty());
    }

    #[actix_web::test]
    async fn delete_reports_removed_rows() {
        let config = test_config();
        let db = test_db(&config).await;

        let id = insert(&db, "s1", 1, "bob", "bye").await.unwrap();
        assert_eq!(delete_by_id(&db, id).await.unwrap(), 1);
        assert_eq!(delete_by_id(&db, id).await.unwrap(), 0);
    }
}
