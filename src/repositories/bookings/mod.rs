//! 예약 데이터 액세스
//!
//! - [`booking_store`]: 트랜잭션 단위 저장소 트레이트
//! - [`mongo_store`]: MongoDB 구현
//! - `memory_store`: 테스트 전용 인메모리 구현 (실패 주입)
//! - [`booking_repo`]: 트랜잭션이 필요 없는 조회용 리포지토리

pub mod booking_repo;
pub mod booking_store;
#[cfg(test)]
pub mod memory_store;
pub mod mongo_store;

pub use booking_repo::{parse_object_id, BookingRepository};
pub use booking_store::{BookingStore, BookingTransaction};
#[cfg(test)]
pub use memory_store::{FailureKind, FailurePoint, MemoryBookingStore};
pub use mongo_store::MongoBookingStore;
