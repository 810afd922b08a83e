//! 비즈니스 로직을 담당하는 서비스 계층 모듈
//!
//! `#[service]` 매크로를 사용하여 싱글톤으로 관리되는 서비스들을 제공합니다.
//!
//! # Features
//!
//! - 예약 생성/취소/삭제/상태 변경 (정원과 원자적으로)
//! - 여행 카탈로그 조회
//! - 회원가입, 로그인, 비밀번호 재설정
//! - JWT 토큰 발급/검증
//! - 인앱 알림과 메일 (fire-and-forget)
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::bookings::BookingService;
//!
//! let booking_service = BookingService::instance();
//! let booking = booking_service.create_booking(&user, request).await?;
//! ```

pub mod auth;
pub mod bookings;
pub mod notifications;
pub mod trips;
pub mod users;
