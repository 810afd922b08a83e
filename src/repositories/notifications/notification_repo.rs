//! 인앱 알림 리포지토리

use std::sync::Arc;

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppResult;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::entities::notifications::Notification;

#[repository(name = "notification", collection = "notifications")]
pub struct NotificationRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

impl NotificationRepository {
    pub async fn create(&self, mut notification: Notification) -> AppResult<Notification> {
        let result = self
            .collection::<Notification>()
            .insert_one(&notification)
            .await?;

        notification.id = result.inserted_id.as_object_id();
        Ok(notification)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "user": 1, "read": 1, "createdAt": -1 })
            .options(IndexOptions::builder().name("user_unread".to_string()).build())
            .build();

        self.collection::<Notification>().create_index(index).await?;
        Ok(())
    }
}
