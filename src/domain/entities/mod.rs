//! # Domain Entities Module
//!
//! MongoDB 문서와 1:1로 대응되는 도메인 엔티티입니다.
//!
//! | 엔티티 | 컬렉션 | 비고 |
//! |--------|--------|------|
//! | [`users::user::User`] | `users` | 역할 기반 권한 (`user`, `admin`) |
//! | [`trips::trip::Trip`] | `trips` | 정원(`maxParticipants`/`currentParticipants`) 보유 |
//! | [`bookings::booking::Booking`] | `bookings` | 여행 정원을 점유하는 예약 |
//! | [`notifications::notification::Notification`] | `notifications` | 인앱 알림 |
//!
//! 모든 문서는 camelCase 필드 이름으로 저장되며 `_id`는 `Option<ObjectId>`로 매핑됩니다.
//! 엔티티 간 관계는 직접 참조 대신 `ObjectId`로만 표현합니다.

pub mod bookings;
pub mod notifications;
pub mod trips;
pub mod users;
