//! # 예약 트랜잭션 코디네이터
//!
//! 예약 생성/취소/삭제/상태 변경을 하나의 원자적 단위로 실행합니다.
//!
//! ```text
//! Start → TripLoaded → CapacityChecked → PriceComputed → BookingPersisted → LedgerUpdated → Committed
//!   └──────────────┴────────────────┴───────────────┴──────────────────┴───────────────→ Aborted
//! ```
//!
//! - 모든 단계는 같은 [`BookingTransaction`] 안에서 실행되고, 어느 단계든 실패하면
//!   트랜잭션 전체가 abort 되어 예약 문서와 정원 변경이 함께 사라집니다.
//! - 쓰기 충돌(`TransientTransaction`)은 트랜잭션을 처음부터 다시 실행합니다.
//!   최대 시도 횟수는 `BOOKING_TRANSACTION_MAX_ATTEMPTS`입니다.
//! - 그 외 에러는 복구 없이 그대로 호출자에게 전달됩니다.

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use mongodb::bson::{oid::ObjectId, DateTime};

use crate::core::errors::{AppError, AppResult};
use crate::domain::entities::bookings::{Booking, BookingStatus, ParticipantDetail};
use crate::domain::entities::trips::Trip;
use crate::repositories::bookings::{BookingStore, BookingTransaction};
use crate::services::bookings::capacity_ledger::{CapacityLedger, TripCapacity, NOT_ENOUGH_SPOTS};

/// 한 요청 안에서 예약이 거치는 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStep {
    Start,
    TripLoaded,
    CapacityChecked,
    PriceComputed,
    BookingPersisted,
    LedgerUpdated,
    Committed,
    Aborted,
}

struct Progress {
    operation: &'static str,
    step: BookingStep,
}

impl Progress {
    fn new(operation: &'static str) -> Self {
        Self { operation, step: BookingStep::Start }
    }

    fn advance(&mut self, next: BookingStep) {
        log::debug!("🧭 {}: {:?} → {:?}", self.operation, self.step, next);
        self.step = next;
    }

    fn finish<T>(self, outcome: AppResult<T>) -> AppResult<T> {
        if let Err(ref e) = outcome {
            log::debug!("🧭 {}: {:?} → {:?} ({})", self.operation, self.step, BookingStep::Aborted, e);
        }
        outcome
    }
}

/// 예약 생성 입력. 사용자 ID는 인증된 요청에서, 나머지는 검증된 요청 본문에서 옵니다.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub user_id: ObjectId,
    pub trip_id: ObjectId,
    pub number_of_participants: u32,
    pub participant_details: Vec<ParticipantDetail>,
    pub special_requests: Option<String>,
}

/// 예약을 변경하려는 주체
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAccess {
    Admin,
    Owner(ObjectId),
}

impl BookingAccess {
    fn authorize(&self, booking: &Booking) -> AppResult<()> {
        match self {
            BookingAccess::Admin => Ok(()),
            BookingAccess::Owner(user_id) if booking.user_id == *user_id => Ok(()),
            BookingAccess::Owner(_) => Err(AppError::AuthorizationError(
                "Not authorized to access this booking".to_string(),
            )),
        }
    }
}

/// 커밋된 예약과, 같은 트랜잭션에서 읽은 여행 (여행이 지워졌다면 `None`)
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub trip: Option<Trip>,
}

#[derive(Clone)]
pub struct BookingCoordinator {
    store: Arc<dyn BookingStore>,
    max_attempts: u32,
}

impl BookingCoordinator {
    pub fn new(store: Arc<dyn BookingStore>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// 예약 생성: 여행 조회 → 정원 확인 → 가격 계산 → 예약 저장 → 정원 예약
    pub async fn create(&self, request: NewBooking) -> AppResult<BookingOutcome> {
        self.run_in_transaction("create", move |tx| {
            Self::create_steps(tx, request.clone()).boxed()
        })
        .await
    }

    /// 예약 취소: 이미 취소된 예약이면 `AlreadyCancelled`, 아니면 정원 반환 + `cancelled`/`refunded`
    pub async fn cancel(&self, booking_id: ObjectId, access: BookingAccess) -> AppResult<BookingOutcome> {
        self.run_in_transaction("cancel", move |tx| {
            Self::cancel_steps(tx, booking_id, access).boxed()
        })
        .await
    }

    /// 예약 삭제: 취소되지 않은 예약일 때만 정원을 반환하고 문서를 지웁니다.
    pub async fn delete(&self, booking_id: ObjectId) -> AppResult<Booking> {
        self.run_in_transaction("delete", move |tx| {
            Self::delete_steps(tx, booking_id).boxed()
        })
        .await
    }

    /// 관리자 상태 변경
    ///
    /// - 취소되지 않은 상태 → `cancelled`: 정원 반환
    /// - `cancelled` → 다른 상태: 정원 재예약 (자리가 없으면 `CapacityExceeded`)
    /// - 그 외: 상태만 변경
    pub async fn change_status(&self, booking_id: ObjectId, status: BookingStatus) -> AppResult<BookingOutcome> {
        self.run_in_transaction("change_status", move |tx| {
            Self::change_status_steps(tx, booking_id, status).boxed()
        })
        .await
    }

    async fn run_in_transaction<T, F>(&self, operation: &'static str, mut plan: F) -> AppResult<T>
    where
        T: Send,
        F: for<'t> FnMut(&'t mut dyn BookingTransaction) -> BoxFuture<'t, AppResult<T>> + Send,
    {
        let mut attempt = 1;

        loop {
            let mut tx = self.store.begin().await?;

            let outcome = plan(&mut *tx).await;
            let error = match outcome {
                Ok(value) => match tx.commit().await {
                    Ok(()) => {
                        log::debug!("🧭 {}: {:?} (시도 {})", operation, BookingStep::Committed, attempt);
                        return Ok(value);
                    }
                    Err(e) => e,
                },
                Err(e) => {
                    if let Err(abort_error) = tx.abort().await {
                        log::warn!("⚠️ {}: 트랜잭션 abort 실패: {}", operation, abort_error);
                    }
                    e
                }
            };

            if error.is_transient() && attempt < self.max_attempts {
                log::warn!(
                    "🔁 {}: 트랜잭션 충돌, 재시도 ({}/{}): {}",
                    operation, attempt, self.max_attempts, error
                );
                attempt += 1;
                continue;
            }

            return Err(error);
        }
    }

    async fn create_steps(tx: &mut dyn BookingTransaction, request: NewBooking) -> AppResult<BookingOutcome> {
        let mut progress = Progress::new("create");
        let outcome = Self::create_inner(tx, request, &mut progress).await;
        progress.finish(outcome)
    }

    async fn create_inner(
        tx: &mut dyn BookingTransaction,
        request: NewBooking,
        progress: &mut Progress,
    ) -> AppResult<BookingOutcome> {
        let count = request.number_of_participants;

        let trip = tx
            .find_trip(&request.trip_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))?;
        progress.advance(BookingStep::TripLoaded);

        if !TripCapacity::of(&trip).can_reserve(count) {
            return Err(AppError::CapacityExceeded(NOT_ENOUGH_SPOTS.to_string()));
        }
        progress.advance(BookingStep::CapacityChecked);

        let total_price = trip.price * f64::from(count);
        progress.advance(BookingStep::PriceComputed);

        let mut booking = Booking::new_pending(
            request.user_id,
            request.trip_id,
            count,
            total_price,
            request.participant_details,
            request.special_requests,
        );
        booking.id = Some(tx.insert_booking(&booking).await?);
        progress.advance(BookingStep::BookingPersisted);

        // 조건부 갱신이므로 위의 확인 이후 다른 트랜잭션이 끼어들었어도 초과 예약은 불가
        CapacityLedger::reserve(tx, &request.trip_id, count).await?;
        progress.advance(BookingStep::LedgerUpdated);

        let trip = Trip {
            current_participants: trip.current_participants + count,
            ..trip
        };

        Ok(BookingOutcome { booking, trip: Some(trip) })
    }

    async fn cancel_steps(
        tx: &mut dyn BookingTransaction,
        booking_id: ObjectId,
        access: BookingAccess,
    ) -> AppResult<BookingOutcome> {
        let mut booking = tx
            .find_booking(&booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        access.authorize(&booking)?;

        if booking.status.is_cancelled() {
            return Err(AppError::AlreadyCancelled("Booking is already cancelled".to_string()));
        }

        CapacityLedger::release(tx, &booking.trip_id, booking.number_of_participants).await?;

        booking.mark_cancelled();
        tx.save_booking_state(&booking).await?;

        let trip = tx.find_trip(&booking.trip_id).await?;
        Ok(BookingOutcome { booking, trip })
    }

    async fn delete_steps(tx: &mut dyn BookingTransaction, booking_id: ObjectId) -> AppResult<Booking> {
        let booking = tx
            .find_booking(&booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if !booking.status.is_cancelled() {
            CapacityLedger::release(tx, &booking.trip_id, booking.number_of_participants).await?;
        }

        if !tx.delete_booking(&booking_id).await? {
            return Err(AppError::NotFound("Booking not found".to_string()));
        }

        Ok(booking)
    }

    async fn change_status_steps(
        tx: &mut dyn BookingTransaction,
        booking_id: ObjectId,
        status: BookingStatus,
    ) -> AppResult<BookingOutcome> {
        let mut booking = tx
            .find_booking(&booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        match (booking.status.is_cancelled(), status.is_cancelled()) {
            (false, true) => {
                CapacityLedger::release(tx, &booking.trip_id, booking.number_of_participants).await?;
            }
            (true, false) => {
                CapacityLedger::reserve(tx, &booking.trip_id, booking.number_of_participants).await?;
            }
            _ => {}
        }

        booking.status = status;
        booking.updated_at = DateTime::now();
        tx.save_booking_state(&booking).await?;

        let trip = tx.find_trip(&booking.trip_id).await?;
        Ok(BookingOutcome { booking, trip })
    }
}
