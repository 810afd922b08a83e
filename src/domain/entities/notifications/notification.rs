//! 인앱 알림 엔티티 (`notifications` 컬렉션)

use mongodb::bson::{oid::ObjectId, DateTime, Document};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    BookingConfirmed,
    BookingCancelled,
    TripUpdated,
    PaymentReceived,
    System,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "user")]
    pub user_id: ObjectId,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Document>,
    #[serde(default)]
    pub read: bool,
    pub created_at: DateTime,
}

impl Notification {
    pub fn new(user_id: ObjectId, kind: NotificationKind, title: &str, message: String, data: Option<Document>) -> Self {
        Self {
            id: None,
            user_id,
            kind,
            title: title.to_string(),
            message,
            data,
            read: false,
            created_at: DateTime::now(),
        }
    }
}
