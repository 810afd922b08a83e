//! 예약 서비스 모듈
//!
//! - [`capacity_ledger`] - 여행 정원 예약/반환
//! - [`booking_coordinator`] - 예약 변경을 하나의 트랜잭션으로 실행
//! - [`booking_service`] - 핸들러용 파사드 (권한 확인, 캐시 무효화, 알림)

pub mod booking_coordinator;
pub mod booking_service;
pub mod capacity_ledger;

pub use booking_coordinator::{BookingAccess, BookingCoordinator, BookingOutcome, BookingStep, NewBooking};
pub use booking_service::BookingService;
pub use capacity_ledger::{CapacityLedger, TripCapacity};
