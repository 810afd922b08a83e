//! # Data Transfer Objects
//!
//! API 경계에서 주고받는 요청/응답 구조체입니다.
//! 요청 DTO는 `validator`로 검증하고, 자유 입력 문자열은 역직렬화 단계에서 정화합니다.

pub mod bookings;
pub mod trips;
pub mod users;
