//! # 정원 원장 (Capacity Ledger)
//!
//! 여행별 `currentParticipants / maxParticipants`를 관리합니다.
//!
//! 모든 변경은 호출자가 연 [`BookingTransaction`] 안에서 조건부 업데이트로 이뤄지므로,
//! 커밋된 어떤 상태에서도 `current <= max`가 유지됩니다.
//!
//! | 연산 | 조건 | 실패 시 |
//! |------|------|---------|
//! | `reserve(trip, n)` | `current + n <= max` | `CapacityExceeded`, 변경 없음 |
//! | `release(trip, n)` | 항상 | - (`current`는 0 아래로 내려가지 않음) |
//!
//! `n == 0`은 두 연산 모두 `ValidationError`입니다.

use mongodb::bson::oid::ObjectId;

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::trips::Trip;
use crate::repositories::bookings::BookingTransaction;

pub const NOT_ENOUGH_SPOTS: &str = "Not enough available spots for this trip";

/// 여행 정원 스냅샷
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripCapacity {
    pub max: u32,
    pub current: u32,
}

impl TripCapacity {
    pub fn of(trip: &Trip) -> Self {
        Self {
            max: trip.max_participants,
            current: trip.current_participants,
        }
    }

    pub fn available(&self) -> u32 {
        self.max.saturating_sub(self.current)
    }

    pub fn can_reserve(&self, count: u32) -> bool {
        self.current
            .checked_add(count)
            .is_some_and(|total| total <= self.max)
    }
}

pub struct CapacityLedger;

fn ensure_positive(count: u32) -> AppResult<()> {
    if count == 0 {
        return Err(AppError::ValidationError("Participant count must be greater than 0".to_string()));
    }
    Ok(())
}

impl CapacityLedger {
    pub async fn reserve(tx: &mut dyn BookingTransaction, trip_id: &ObjectId, count: u32) -> AppResult<()> {
        ensure_positive(count)?;

        if tx.try_reserve_seats(trip_id, count).await? {
            log::debug!("🎟️ 정원 예약: trip={}, +{}", trip_id, count);
            Ok(())
        } else {
            Err(AppError::CapacityExceeded(NOT_ENOUGH_SPOTS.to_string()))
        }
    }

    pub async fn release(tx: &mut dyn BookingTransaction, trip_id: &ObjectId, count: u32) -> AppResult<()> {
        ensure_positive(count)?;

        tx.release_seats(trip_id, count).await?;
        log::debug!("🎟️ 정원 반환: trip={}, -{}", trip_id, count);
        Ok(())
    }
}
