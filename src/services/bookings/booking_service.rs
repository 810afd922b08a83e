//! # 예약 서비스
//!
//! HTTP 핸들러가 호출하는 예약 API 파사드입니다.
//!
//! - 정원이 바뀌는 작업(생성, 취소, 삭제, 상태 변경)은 [`BookingCoordinator`]를
//!   분리된 태스크(`actix_web::rt::spawn`)에서 실행합니다. 클라이언트가 연결을 끊어
//!   핸들러 future가 drop 되어도 트랜잭션은 끝까지 커밋되거나 abort 됩니다.
//! - 알림은 커밋 후 fire-and-forget으로 보냅니다. 응답 캐시 무효화는 [`crate::middlewares::CacheMiddleware`]가 맡습니다.
//! - 소유자 또는 관리자만 개별 예약을 조회/취소할 수 있습니다.

use std::future::Future;
use std::sync::Arc;

use mongodb::bson::{doc, oid::ObjectId, Document};
use singleton_macro::service;

use crate::config::BookingConfig;
use crate::core::errors::{AppError, AppResult, ErrorContext};
use crate::domain::dto::bookings::{BookingListQuery, BookingResponse, CreateBookingRequest, Pagination};
use crate::domain::entities::bookings::{BookingStatus, PaymentStatus};
use crate::domain::models::auth::AuthenticatedUser;
use crate::repositories::bookings::{parse_object_id, BookingRepository};
use crate::services::bookings::booking_coordinator::{BookingAccess, BookingCoordinator, NewBooking};
use crate::services::notifications::NotificationService;

const DEFAULT_PAGE_SIZE: u64 = 10;
const MAX_PAGE_SIZE: u64 = 100;

/// 관리자 목록 조회 필터 (`status`, `paymentStatus`, `trip`)
pub fn booking_filter(query: &BookingListQuery) -> AppResult<Document> {
    let mut filter = Document::new();

    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("status", status.parse::<BookingStatus>()?.as_str());
    }
    if let Some(payment_status) = query.payment_status.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("paymentStatus", payment_status.parse::<PaymentStatus>()?.as_str());
    }
    if let Some(trip) = query.trip.as_deref().filter(|s| !s.is_empty()) {
        filter.insert("trip", parse_object_id(trip, "trip")?);
    }

    Ok(filter)
}

/// `(page, limit)`: page는 1 이상, limit은 1..=100 (기본 10)
pub fn page_params(page: Option<u64>, limit: Option<u64>) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

fn user_object_id(user: &AuthenticatedUser) -> AppResult<ObjectId> {
    ObjectId::parse_str(&user.user_id)
        .map_err(|_| AppError::AuthenticationError("유효하지 않은 사용자 토큰입니다".to_string()))
}

/// 요청 태스크와 분리해 끝까지 실행합니다.
async fn run_detached<T, F>(work: F) -> AppResult<T>
where
    T: 'static,
    F: Future<Output = AppResult<T>> + 'static,
{
    actix_web::rt::spawn(work)
        .await
        .context("예약 작업이 중단되었습니다")?
}

#[service(name = "booking")]
pub struct BookingService {
    booking_repo: Arc<BookingRepository>,
    notification_service: Arc<NotificationService>,
}

impl BookingService {
    fn coordinator(&self) -> BookingCoordinator {
        BookingCoordinator::new(
            Arc::new(self.booking_repo.transactional_store()),
            BookingConfig::max_transaction_attempts(),
        )
    }

    pub async fn create_booking(&self, user: &AuthenticatedUser, request: CreateBookingRequest) -> AppResult<BookingResponse> {
        let new_booking = NewBooking {
            user_id: user_object_id(user)?,
            trip_id: parse_object_id(&request.trip_id, "trip")?,
            number_of_participants: request.number_of_participants,
            participant_details: request.participant_details.into_iter().map(Into::into).collect(),
            special_requests: request.special_requests,
        };

        let coordinator = self.coordinator();
        let outcome = run_detached(async move { coordinator.create(new_booking).await }).await?;

        let booking = outcome.booking;

        log::info!(
            "✅ 예약 생성: booking={}, trip={}, 인원={}",
            booking.id_string().unwrap_or_default(),
            booking.trip_id,
            booking.number_of_participants
        );

        let notifications = self.notification_service.clone();
        let trip_title = outcome.trip.map(|trip| trip.title).unwrap_or_default();
        let booking_id = booking.id_string().unwrap_or_default();
        let user_id = booking.user_id;
        actix_web::rt::spawn(async move {
            if let Err(e) = notifications.notify_booking_confirmation(user_id, &trip_title, &booking_id).await {
                log::error!("❌ 예약 확정 알림 실패 (booking={}): {}", booking_id, e);
            }
        });

        Ok(BookingResponse::from(booking))
    }

    pub async fn get_user_bookings(&self, user: &AuthenticatedUser) -> AppResult<Vec<BookingResponse>> {
        let bookings = self.booking_repo.find_by_user(&user_object_id(user)?).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    pub async fn get_booking(&self, id: &str, user: &AuthenticatedUser) -> AppResult<BookingResponse> {
        let booking = self
            .booking_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        if !user.can_access(&booking.user_id.to_hex()) {
            log::warn!("⚠️ 예약 조회 거부: user={}, booking={}", user.user_id, id);
            return Err(AppError::AuthorizationError("Not authorized to access this booking".to_string()));
        }

        Ok(BookingResponse::from(booking))
    }

    pub async fn list_bookings(&self, query: &BookingListQuery) -> AppResult<(Vec<BookingResponse>, Pagination)> {
        let filter = booking_filter(query)?;
        let (page, limit) = page_params(query.page, query.limit);

        let (bookings, total) = self.booking_repo.find_page(filter, page, limit).await?;

        Ok((
            bookings.into_iter().map(BookingResponse::from).collect(),
            Pagination::new(total, page, limit),
        ))
    }

    pub async fn update_status(&self, id: &str, status: &str) -> AppResult<BookingResponse> {
        let status = status.parse::<BookingStatus>()?;
        let booking_id = parse_object_id(id, "booking")?;

        let coordinator = self.coordinator();
        let outcome = run_detached(async move { coordinator.change_status(booking_id, status).await }).await?;

        log::info!("📝 예약 상태 변경: booking={}, status={}", id, status);
        Ok(BookingResponse::from(outcome.booking))
    }

    pub async fn update_payment_status(&self, id: &str, payment_status: &str) -> AppResult<BookingResponse> {
        let payment_status = payment_status.parse::<PaymentStatus>()?;

        let booking = self
            .booking_repo
            .update_payment_status(id, payment_status)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        Ok(BookingResponse::from(booking))
    }

    pub async fn cancel_booking(&self, id: &str, user: &AuthenticatedUser) -> AppResult<BookingResponse> {
        let booking_id = parse_object_id(id, "booking")?;
        let access = if user.is_admin() {
            BookingAccess::Admin
        } else {
            BookingAccess::Owner(user_object_id(user)?)
        };

        let coordinator = self.coordinator();
        let outcome = run_detached(async move { coordinator.cancel(booking_id, access).await }).await?;

        let booking = outcome.booking;
        log::info!("🚫 예약 취소: booking={}, by={}", id, user.user_id);

        let notifications = self.notification_service.clone();
        let trip_title = outcome.trip.map(|trip| trip.title).unwrap_or_default();
        let owner_id = booking.user_id;
        actix_web::rt::spawn(async move {
            if let Err(e) = notifications.notify_booking_cancellation(owner_id, &trip_title).await {
                log::error!("❌ 예약 취소 알림 실패 (user={}): {}", owner_id, e);
            }
        });

        Ok(BookingResponse::from(booking))
    }

    pub async fn delete_booking(&self, id: &str) -> AppResult<()> {
        let booking_id = parse_object_id(id, "booking")?;

        let coordinator = self.coordinator();
        let deleted = run_detached(async move { coordinator.delete(booking_id).await }).await?;

        log::info!("🗑️ 예약 삭제: booking={}", id);
        Ok(())
    }
}
