//! Booking Entity
//!
//! `bookings` 컬렉션 문서입니다. 필드 이름은 기존 프론트엔드와 맞추기 위해 camelCase로 저장되며,
//! 사용자/여행 참조는 `user`, `trip` 필드에 `ObjectId`로 들어갑니다.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::core::errors::AppError;

/// 예약 상태
///
/// `pending`으로 생성되고, 관리자 또는 소유자 요청으로 전이됩니다.
/// `cancelled`로의 전이는 정원 반환을 동반하며 정확히 한 번만 일어나야 합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BookingStatus::Cancelled)
    }
}

impl FromStr for BookingStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BookingStatus::Pending),
            "confirmed" => Ok(BookingStatus::Confirmed),
            "cancelled" => Ok(BookingStatus::Cancelled),
            "completed" => Ok(BookingStatus::Completed),
            other => Err(AppError::ValidationError(format!("Invalid booking status: {}", other))),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 결제 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "paid" => Ok(PaymentStatus::Paid),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(AppError::ValidationError(format!("Invalid payment status: {}", other))),
        }
    }
}

/// 참가자 한 명의 연락처. 입력 순서가 그대로 보존됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantDetail {
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(rename = "user")]
    pub user_id: ObjectId,
    #[serde(rename = "trip")]
    pub trip_id: ObjectId,
    pub number_of_participants: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub booking_date: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    #[serde(default)]
    pub participant_details: Vec<ParticipantDetail>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Booking {
    /// `pending` / 결제 `pending` 상태의 새 예약. id는 저장소가 부여합니다.
    pub fn new_pending(
        user_id: ObjectId,
        trip_id: ObjectId,
        number_of_participants: u32,
        total_price: f64,
        participant_details: Vec<ParticipantDetail>,
        special_requests: Option<String>,
    ) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            user_id,
            trip_id,
            number_of_participants,
            total_price,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            booking_date: now,
            special_requests,
            participant_details,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id.to_hex() == user_id
    }

    pub fn mark_cancelled(&mut self) {
        self.status = BookingStatus::Cancelled;
        self.payment_status = PaymentStatus::Refunded;
        self.updated_at = DateTime::now();
    }
}
