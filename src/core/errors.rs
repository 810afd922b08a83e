//! # Application Error Handling System
//!
//! 여행사 백엔드 전역에서 사용하는 통합 에러 타입입니다.
//! 모든 계층(리포지토리, 서비스, 미들웨어, 핸들러)이 같은 `AppError`를 반환하고,
//! HTTP 경계에서 `actix_web::ResponseError` 구현을 통해 일관된 JSON 응답으로 변환됩니다.
//!
//! ## 응답 형식
//!
//! ```json
//! { "success": false, "error": "Not found: 예약을 찾을 수 없습니다" }
//! ```
//!
//! ## HTTP 응답 매핑
//!
//! | AppError | HTTP Status | 사용 시나리오 |
//! |----------|-------------|---------------|
//! | `ValidationError` | 400 Bad Request | 입력값 검증 실패 |
//! | `AlreadyCancelled` | 400 Bad Request | 이미 취소된 예약을 다시 취소 |
//! | `CsrfError` | 400 Bad Request | CSRF 토큰 누락/불일치 |
//! | `AuthenticationError` | 401 Unauthorized | 인증 실패 |
//! | `AuthorizationError` | 403 Forbidden | 소유자/관리자가 아님 |
//! | `NotFound` | 404 Not Found | 리소스 없음 |
//! | `CapacityExceeded` | 409 Conflict | 여행 정원 초과 |
//! | `ConflictError` | 409 Conflict | 중복 데이터 |
//! | `RateLimitExceeded` | 429 Too Many Requests | 요청 빈도 초과 (`Retry-After` 포함) |
//! | `TransientTransaction` | 503 Service Unavailable | 트랜잭션 충돌 재시도 한도 초과 |
//! | `DatabaseError` 외 | 500 Internal Server Error | 인프라/예상치 못한 오류 |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use crate::core::errors::{AppError, AppResult};
//!
//! async fn load_trip(&self, id: &str) -> AppResult<Trip> {
//!     self.trip_repo
//!         .find_by_id(id)
//!         .await?
//!         .ok_or_else(|| AppError::NotFound("여행을 찾을 수 없습니다".to_string()))
//! }
//! ```

use actix_web::http::header;
use thiserror::Error;

/// 애플리케이션 전역 에러 타입
///
/// ## 에러 카테고리
///
/// ### 1. 인프라 계층 에러
/// - `DatabaseError`, `RedisError`, `ExternalServiceError`
/// - `TransientTransaction`: 쓰기 충돌 등 재시도하면 성공할 수 있는 트랜잭션 오류.
///   예약 코디네이터가 재시도 한도 안에서 소비하며, 한도를 넘기면 503으로 노출됩니다.
///
/// ### 2. 비즈니스 계층 에러
/// - `ValidationError`, `NotFound`, `ConflictError`
/// - `CapacityExceeded`, `AlreadyCancelled`: 예약 정원 관리 규칙 위반
///
/// ### 3. 보안 계층 에러
/// - `AuthenticationError`, `AuthorizationError`
/// - `RateLimitExceeded`, `CsrfError`: 요청 형성(request shaping) 미들웨어가 반환
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Redis error: {0}")]
    RedisError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict error: {0}")]
    ConflictError(String),

    #[error("Capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("Already cancelled: {0}")]
    AlreadyCancelled(String),

    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    #[error("Authorization error: {0}")]
    AuthorizationError(String),

    /// 메시지는 접두어 없이 그대로 클라이언트에 전달됩니다.
    #[error("{message}")]
    RateLimitExceeded {
        message: String,
        retry_after_secs: u64,
    },

    #[error("CSRF error: {0}")]
    CsrfError(String),

    #[error("Transient transaction error: {0}")]
    TransientTransaction(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    /// 재시도하면 성공할 수 있는 트랜잭션 오류인지 여부
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::TransientTransaction(_))
    }
}

impl actix_web::ResponseError for AppError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::ValidationError(_)
            | AppError::AlreadyCancelled(_)
            | AppError::CsrfError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ConflictError(_) | AppError::CapacityExceeded(_) => StatusCode::CONFLICT,
            AppError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            AppError::AuthorizationError(_) => StatusCode::FORBIDDEN,
            AppError::RateLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::TransientTransaction(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        let mut builder = actix_web::HttpResponse::build(self.status_code());

        if let AppError::RateLimitExceeded { retry_after_secs, .. } = self {
            builder.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }

        builder.json(serde_json::json!({
            "success": false,
            "error": self.to_string()
        }))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        use mongodb::error::TRANSIENT_TRANSACTION_ERROR;

        // 커밋 결과 불명(UnknownTransactionCommitResult)은 저장소가 커밋 재시도로 직접 처리
        if e.contains_label(TRANSIENT_TRANSACTION_ERROR) {
            AppError::TransientTransaction(e.to_string())
        } else {
            AppError::DatabaseError(e.to_string())
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::RedisError(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// 외부 에러에 설명을 덧붙여 `InternalError`로 변환하는 확장 트레이트
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> AppResult<T>;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn context(self, msg: &str) -> AppResult<T> {
        self.map_err(|e| AppError::InternalError(format!("{}: {}", msg, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::ResponseError;

    #[test]
    fn test_validation_error_response() {
        let error = AppError::ValidationError("참가자 수는 1 이상이어야 합니다".to_string());
        assert_eq!(error.error_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_not_found_error_response() {
        let error = AppError::NotFound("Booking not found".to_string());
        assert_eq!(error.error_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_capacity_exceeded_maps_to_conflict() {
        let error = AppError::CapacityExceeded("Not enough available spots".to_string());
        assert_eq!(error.error_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_already_cancelled_and_csrf_are_bad_requests() {
        assert_eq!(
            AppError::AlreadyCancelled("x".to_string()).error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::CsrfError("Invalid CSRF token".to_string()).error_response().status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_authentication_and_authorization_responses() {
        assert_eq!(
            AppError::AuthenticationError("Invalid token".to_string()).error_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::AuthorizationError("Not the owner".to_string()).error_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_rate_limit_response_carries_retry_after() {
        let error = AppError::RateLimitExceeded {
            message: "Too many requests".to_string(),
            retry_after_secs: 42,
        };
        let response = error.error_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap().to_str().unwrap(),
            "42"
        );
        assert_eq!(error.to_string(), "Too many requests");
    }

    #[test]
    fn test_transient_transaction_is_retryable() {
        let error = AppError::TransientTransaction("WriteConflict".to_string());
        assert!(error.is_transient());
        assert_eq!(error.error_response().status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(!AppError::DatabaseError("down".to_string()).is_transient());
    }

    #[test]
    fn test_internal_error_response() {
        let error = AppError::InternalError("Something went wrong".to_string());
        assert_eq!(error.error_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_context_trait() {
        let result: Result<(), &str> = Err("original error");
        let app_result = result.context("Additional context");

        if let Err(AppError::InternalError(msg)) = app_result {
            assert!(msg.contains("Additional context"));
            assert!(msg.contains("original error"));
        } else {
            panic!("Expected InternalError");
        }
    }
}
