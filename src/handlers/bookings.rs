//! # Booking HTTP Handlers
//!
//! | 메서드 | 경로 | 권한 | 상태 코드 |
//! |--------|------|------|-----------|
//! | `POST` | `/api/bookings` | 로그인 | 201 Created |
//! | `GET` | `/api/bookings/user/my-bookings` | 로그인 | 200 OK |
//! | `GET` | `/api/bookings` | 관리자 | 200 OK (페이지네이션) |
//! | `GET` | `/api/bookings/{id}` | 소유자/관리자 | 200 OK |
//! | `PUT` | `/api/bookings/{id}/status` | 관리자 | 200 OK |
//! | `PUT` | `/api/bookings/{id}/payment-status` | 관리자 | 200 OK |
//! | `PUT` | `/api/bookings/{id}/cancel` | 소유자/관리자 | 200 OK |
//! | `DELETE` | `/api/bookings/{id}` | 관리자 | 200 OK |
//!
//! 스코프 전체에 필수 인증이 걸리고, 같은 경로에 관리자 메서드가 섞여 있으므로
//! 관리자 전용 여부는 [`AdminUser`] 추출자로, 소유권 검사는 서비스 계층에서 합니다.

use actix_web::{delete, get, post, put, web, HttpResponse};
use serde_json::json;
use validator::Validate;

use crate::core::errors::AppError;
use crate::domain::dto::bookings::{
    BookingListQuery, CreateBookingRequest, UpdateBookingStatusRequest, UpdatePaymentStatusRequest,
};
use crate::domain::models::auth::{AdminUser, AuthenticatedUser};
use crate::services::bookings::BookingService;

/// 예약 생성
///
/// 정원 확인, 예약 저장, 정원 증가가 하나의 트랜잭션으로 처리됩니다.
/// 정원이 부족하면 409, 여행이 없으면 404를 반환합니다.
#[post("")]
pub async fn create_booking(
    user: AuthenticatedUser,
    payload: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let booking = BookingService::instance()
        .create_booking(&user, payload.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "data": booking
    })))
}

#[get("/user/my-bookings")]
pub async fn get_my_bookings(user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
    let bookings = BookingService::instance().get_user_bookings(&user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": bookings
    })))
}

/// 전체 예약 목록 (관리자)
///
/// `?page=1&limit=10&status=confirmed&paymentStatus=paid&trip={tripId}`
#[get("")]
pub async fn list_bookings(
    _admin: AdminUser,
    query: web::Query<BookingListQuery>,
) -> Result<HttpResponse, AppError> {
    let (bookings, pagination) = BookingService::instance().list_bookings(&query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": bookings,
        "pagination": pagination
    })))
}

#[get("/{id}")]
pub async fn get_booking(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking = BookingService::instance().get_booking(&path, &user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": booking
    })))
}

/// 예약 상태 변경 (관리자)
///
/// `cancelled`로 바뀌면 정원이 반환되고, `cancelled`에서 벗어나면 정원을 다시 점유합니다.
#[put("/{id}/status")]
pub async fn update_booking_status(
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let booking = BookingService::instance()
        .update_status(&path, &payload.status)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": booking
    })))
}

#[put("/{id}/payment-status")]
pub async fn update_payment_status(
    _admin: AdminUser,
    path: web::Path<String>,
    payload: web::Json<UpdatePaymentStatusRequest>,
) -> Result<HttpResponse, AppError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let booking = BookingService::instance()
        .update_payment_status(&path, &payload.payment_status)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": booking
    })))
}

#[put("/{id}/cancel")]
pub async fn cancel_booking(
    user: AuthenticatedUser,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let booking = BookingService::instance().cancel_booking(&path, &user).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Booking cancelled successfully",
        "data": booking
    })))
}

#[delete("/{id}")]
pub async fn delete_booking(_admin: AdminUser, path: web::Path<String>) -> Result<HttpResponse, AppError> {
    BookingService::instance().delete_booking(&path).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Booking deleted successfully"
    })))
}
