//! # HTTP Request Handlers Module
//!
//! HTTP 요청을 처리하는 핸들러 함수들입니다.
//! 핸들러는 입력 검증과 응답 포맷만 담당하고, 비즈니스 로직은 싱글톤 서비스에 위임합니다.
//!
//! ## 아키텍처 위치
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//!   Middlewares - 요청 제한, CSRF, 인증, 응답 캐시
//! ├─────────────────────────────────────────────┤
//!   Handlers (이 모듈) - HTTP 엔드포인트 처리         ← Web Layer
//! ├─────────────────────────────────────────────┤
//!   Services - 비즈니스 로직                        ← Service Layer
//! ├─────────────────────────────────────────────┤
//!   Repositories - 데이터 접근                     ← Repository Layer
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## 응답 형식
//!
//! 성공: `{"success": true, "data": ...}` (+ 필요 시 `message`, `pagination`)
//!
//! 실패: [`AppError`](crate::core::errors::AppError)가 `{"success": false, "error": "..."}`로 변환합니다.
//!
//! ## 핸들러 작성 패턴
//!
//! ```rust,ignore
//! #[post("")]
//! pub async fn create_booking(
//!     user: AuthenticatedUser,                      // AuthMiddleware가 넣어둔 사용자
//!     payload: web::Json<CreateBookingRequest>,    // 역직렬화 시 문자열 정화
//! ) -> Result<HttpResponse, AppError> {
//!     payload.validate()
//!         .map_err(|e| AppError::ValidationError(e.to_string()))?;
//!
//!     let booking = BookingService::instance()
//!         .create_booking(&user, payload.into_inner())
//!         .await?;
//!
//!     Ok(HttpResponse::Created().json(json!({ "success": true, "data": booking })))
//! }
//! ```
//!
//! ## 모듈 구성
//!
//! ```text
//! handlers/
//! ├── mod.rs        ← 이 파일
//! ├── auth.rs       ← 회원가입, 로그인, 비밀번호 재설정
//! ├── bookings.rs   ← 예약 생성/조회/취소/삭제, 관리자 상태 변경
//! ├── trips.rs      ← 여행 목록/상세 (캐시 대상)
//! ├── csrf.rs       ← CSRF 토큰 발급
//! └── admin.rs      ← 응답 캐시 통계/비우기
//! ```

pub mod admin;
pub mod auth;
pub mod bookings;
pub mod csrf;
pub mod trips;
