//! 여행사 예약 백엔드
//!
//! 여행 상품의 정원을 초과 예약 없이 관리하는 예약 서비스와,
//! 그 앞단에서 요청을 다듬는 미들웨어(요청 제한, 응답 캐시, CSRF 이중 제출 쿠키)를 제공합니다.
//!
//! # Features
//!
//! - **정원 원장**: 예약 인원의 합이 여행 정원을 넘지 않도록 조건부 증감
//! - **예약 트랜잭션**: 정원 확인, 예약 저장, 정원 증가를 원자적으로 처리하고 일시적 오류는 재시도
//! - **요청 제한**: 정책별 고정 윈도우 카운터와 `X-RateLimit-*` 헤더
//! - **응답 캐시**: 공개 GET 응답을 TTL 동안 보관하고 쓰기 요청 후 패턴 무효화
//! - **CSRF 가드**: 쿠키와 헤더 토큰이 같은지 확인하는 이중 제출 방식
//! - **싱글톤 DI**: 매크로 기반 자동 의존성 주입
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   HTTP Routes   │ ← REST API 엔드포인트 + 요청 형성 미들웨어
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Handlers     │ ← 요청/응답 처리
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │    Services     │ ← 예약 조정자, 정원 원장, 알림
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │  Repositories   │ ← 데이터 액세스 (트랜잭션 스토어)
//! └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │ MongoDB + Redis │ ← 저장소
//! └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use travel_agency_backend::services::bookings::BookingService;
//!
//! let booking = BookingService::instance()
//!     .create_booking(&user, request)
//!     .await?;
//! ```

pub mod core;
pub mod config;
pub mod db;
pub mod caching;
pub mod domain;
pub mod repositories;
pub mod security;
pub mod services;
pub mod utils;
pub mod routes;
pub mod handlers;
pub mod middlewares;
