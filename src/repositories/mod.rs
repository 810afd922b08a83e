//! 데이터 액세스 계층을 담당하는 리포지토리 모듈
//!
//! `#[repository]` 매크로를 사용하여 싱글톤으로 관리되는 리포지토리들을 제공합니다.
//! MongoDB를 주 저장소로 사용하고 Redis를 통한 캐싱을 지원합니다.
//!
//! | 모듈 | 컬렉션 | 비고 |
//! |------|--------|------|
//! | [`bookings`] | `bookings` | 정원과 묶인 쓰기는 트랜잭션 저장소 경유 |
//! | [`trips`] | `trips` | Redis 문서 캐시 (10분) |
//! | [`users`] | `users` | 이메일/ID 캐시 |
//! | [`notifications`] | `notifications` | 쓰기 전용 |
//! | [`tokens`] | Redis | 비밀번호 재설정 토큰 |
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::repositories::trips::TripRepository;
//!
//! let trip_repo = TripRepository::instance();
//! let trip = trip_repo.find_by_id("665f1c2b9d3e4a0012345678").await?;
//! ```

pub mod bookings;
pub mod notifications;
pub mod tokens;
pub mod trips;
pub mod users;
