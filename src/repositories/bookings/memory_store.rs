//! 인메모리 예약 저장소
//!
//! MongoDB 없이 예약 코디네이터의 불변식을 검증하기 위한 구현입니다.
//!
//! - 트랜잭션은 한 번에 하나만 열립니다. (`tokio::sync::Mutex`의 owned guard 보유)
//! - 트랜잭션은 상태의 작업 사본을 수정하고, `commit` 시에만 원본에 반영합니다.
//! - `abort` 또는 drop 시 작업 사본은 버려집니다.
//! - [`MemoryBookingStore::fail_next`]로 특정 연산에서 한 번 실패하도록 주입할 수 있습니다.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::bookings::Booking;
use crate::domain::entities::trips::Trip;
use crate::repositories::bookings::booking_store::{BookingStore, BookingTransaction};

/// 실패를 주입할 수 있는 연산 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePoint {
    InsertBooking,
    ReserveSeats,
    ReleaseSeats,
    SaveBookingState,
    DeleteBooking,
    Commit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 쓰기 충돌처럼 재시도 가능한 실패
    Transient,
    /// 재시도해도 소용없는 실패
    Permanent,
}

impl FailureKind {
    fn into_error(self, point: FailurePoint) -> AppError {
        match self {
            FailureKind::Transient => AppError::TransientTransaction(format!("injected write conflict at {:?}", point)),
            FailureKind::Permanent => AppError::DatabaseError(format!("injected failure at {:?}", point)),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    trips: HashMap<ObjectId, Trip>,
    bookings: HashMap<ObjectId, Booking>,
}

type FailurePlan = Arc<StdMutex<Vec<(FailurePoint, FailureKind)>>>;

fn take_failure(plan: &FailurePlan, point: FailurePoint) -> AppResult<()> {
    let mut plan = plan.lock().unwrap_or_else(|e| e.into_inner());
    match plan.iter().position(|(p, _)| *p == point) {
        Some(index) => {
            let (point, kind) = plan.remove(index);
            Err(kind.into_error(point))
        }
        None => Ok(()),
    }
}

#[derive(Clone, Default)]
pub struct MemoryBookingStore {
    state: Arc<Mutex<MemoryState>>,
    failures: FailurePlan,
    transactions_started: Arc<AtomicU32>,
}

impl MemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 여행을 커밋된 상태로 바로 추가합니다.
    pub async fn insert_trip(&self, mut trip: Trip) -> ObjectId {
        let id = trip.id.unwrap_or_else(ObjectId::new);
        trip.id = Some(id);
        self.state.lock().await.trips.insert(id, trip);
        id
    }

    pub async fn trip(&self, trip_id: &ObjectId) -> Option<Trip> {
        self.state.lock().await.trips.get(trip_id).cloned()
    }

    pub async fn booking(&self, booking_id: &ObjectId) -> Option<Booking> {
        self.state.lock().await.bookings.get(booking_id).cloned()
    }

    pub async fn bookings(&self) -> Vec<Booking> {
        self.state.lock().await.bookings.values().cloned().collect()
    }

    /// 다음 번 `point` 연산을 한 번 실패시킵니다. 여러 번 호출하면 누적됩니다.
    pub fn fail_next(&self, point: FailurePoint, kind: FailureKind) {
        self.failures.lock().unwrap_or_else(|e| e.into_inner()).push((point, kind));
    }

    pub fn transactions_started(&self) -> u32 {
        self.transactions_started.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookingStore for MemoryBookingStore {
    async fn begin(&self) -> AppResult<Box<dyn BookingTransaction>> {
        let committed = self.state.clone().lock_owned().await;
        let working = committed.clone();
        self.transactions_started.fetch_add(1, Ordering::SeqCst);

        Ok(Box::new(MemoryBookingTransaction {
            committed,
            working,
            failures: self.failures.clone(),
        }))
    }
}

pub struct MemoryBookingTransaction {
    committed: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
    failures: FailurePlan,
}

#[async_trait]
impl BookingTransaction for MemoryBookingTransaction {
    async fn find_trip(&mut self, trip_id: &ObjectId) -> AppResult<Option<Trip>> {
        Ok(self.working.trips.get(trip_id).cloned())
    }

    async fn find_booking(&mut self, booking_id: &ObjectId) -> AppResult<Option<Booking>> {
        Ok(self.working.bookings.get(booking_id).cloned())
    }

    async fn insert_booking(&mut self, booking: &Booking) -> AppResult<ObjectId> {
        take_failure(&self.failures, FailurePoint::InsertBooking)?;

        let id = ObjectId::new();
        let mut stored = booking.clone();
        stored.id = Some(id);
        self.working.bookings.insert(id, stored);
        Ok(id)
    }

    async fn save_booking_state(&mut self, booking: &Booking) -> AppResult<()> {
        take_failure(&self.failures, FailurePoint::SaveBookingState)?;

        let stored = booking
            .id
            .and_then(|id| self.working.bookings.get_mut(&id))
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;
        stored.status = booking.status;
        stored.payment_status = booking.payment_status;
        stored.updated_at = booking.updated_at;
        Ok(())
    }

    async fn delete_booking(&mut self, booking_id: &ObjectId) -> AppResult<bool> {
        take_failure(&self.failures, FailurePoint::DeleteBooking)?;
        Ok(self.working.bookings.remove(booking_id).is_some())
    }

    async fn try_reserve_seats(&mut self, trip_id: &ObjectId, count: u32) -> AppResult<bool> {
        take_failure(&self.failures, FailurePoint::ReserveSeats)?;

        match self.working.trips.get_mut(trip_id) {
            Some(trip) if trip.current_participants + count <= trip.max_participants => {
                trip.current_participants += count;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_seats(&mut self, trip_id: &ObjectId, count: u32) -> AppResult<()> {
        take_failure(&self.failures, FailurePoint::ReleaseSeats)?;

        if let Some(trip) = self.working.trips.get_mut(trip_id) {
            trip.current_participants = trip.current_participants.saturating_sub(count);
        }
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryBookingTransaction { mut committed, working, failures } = *self;
        take_failure(&failures, FailurePoint::Commit)?;
        *committed = working;
        Ok(())
    }

    async fn abort(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_uncommitted_changes_are_invisible() {
        let store = MemoryBookingStore::new();
        let trip_id = store.insert_trip(Trip::new("Bali", "Indonesia", 700.0, 4)).await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.try_reserve_seats(&trip_id, 3).await.unwrap());
        tx.abort().await.unwrap();

        assert_eq!(store.trip(&trip_id).await.unwrap().current_participants, 0);
    }

    #[actix_web::test]
    async fn test_commit_applies_working_copy() {
        let store = MemoryBookingStore::new();
        let trip_id = store.insert_trip(Trip::new("Bali", "Indonesia", 700.0, 4)).await;

        let mut tx = store.begin().await.unwrap();
        assert!(tx.try_reserve_seats(&trip_id, 4).await.unwrap());
        assert!(!tx.try_reserve_seats(&trip_id, 1).await.unwrap());
        tx.commit().await.unwrap();

        assert_eq!(store.trip(&trip_id).await.unwrap().current_participants, 4);
    }

    #[actix_web::test]
    async fn test_injected_failure_fires_once() {
        let store = MemoryBookingStore::new();
        let trip_id = store.insert_trip(Trip::new("Bali", "Indonesia", 700.0, 4)).await;
        store.fail_next(FailurePoint::ReleaseSeats, FailureKind::Transient);

        let mut tx = store.begin().await.unwrap();
        assert!(tx.release_seats(&trip_id, 1).await.unwrap_err().is_transient());
        assert!(tx.release_seats(&trip_id, 1).await.is_ok());
    }
}
