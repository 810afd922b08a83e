//! 인앱 알림 서비스
//!
//! 예약 확정/취소 시 사용자에게 알림 문서를 남깁니다.
//! 호출자(예약 서비스)는 결과를 기다리지 않고 실패는 로그로만 남깁니다.

use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId};
use singleton_macro::service;

use crate::core::errors::AppResult;
use crate::domain::entities::notifications::{Notification, NotificationKind};
use crate::repositories::notifications::NotificationRepository;

pub fn booking_confirmed(user_id: ObjectId, trip_title: &str, booking_id: &str) -> Notification {
    Notification::new(
        user_id,
        NotificationKind::BookingConfirmed,
        "Booking Confirmed",
        format!("Your booking for {} has been confirmed", trip_title),
        Some(doc! { "bookingId": booking_id, "tripTitle": trip_title }),
    )
}

pub fn booking_cancelled(user_id: ObjectId, trip_title: &str) -> Notification {
    Notification::new(
        user_id,
        NotificationKind::BookingCancelled,
        "Booking Cancelled",
        format!("Your booking for {} has been cancelled", trip_title),
        Some(doc! { "tripTitle": trip_title }),
    )
}

#[service(name = "notification")]
pub struct NotificationService {
    notification_repo: Arc<NotificationRepository>,
}

impl NotificationService {
    pub async fn notify_booking_confirmation(&self, user_id: ObjectId, trip_title: &str, booking_id: &str) -> AppResult<Notification> {
        self.notification_repo
            .create(booking_confirmed(user_id, trip_title, booking_id))
            .await
    }

    pub async fn notify_booking_cancellation(&self, user_id: ObjectId, trip_title: &str) -> AppResult<Notification> {
        self.notification_repo
            .create(booking_cancelled(user_id, trip_title))
            .await
    }
}
