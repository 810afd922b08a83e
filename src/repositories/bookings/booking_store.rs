//! # 예약 트랜잭션 저장소 추상화
//!
//! 예약 코디네이터가 하나의 원자적 단위 안에서 필요로 하는 연산만 모은 트레이트입니다.
//!
//! - [`BookingStore::begin`]으로 트랜잭션을 열고
//! - [`BookingTransaction`]의 연산은 모두 같은 트랜잭션 안에서 실행되며
//! - `commit` 전까지의 변경은 다른 트랜잭션에서 보이지 않고, `abort`(또는 drop) 시 모두 버려집니다.
//!
//! 구현체:
//! - [`super::mongo_store::MongoBookingStore`] - MongoDB 멀티 도큐먼트 트랜잭션
//! - `MemoryBookingStore` - 테스트 전용 인메모리 구현 (직렬 실행 + 실패 주입)

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::core::errors::AppResult;
use crate::domain::entities::bookings::Booking;
use crate::domain::entities::trips::Trip;

#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn BookingTransaction>>;
}

#[async_trait]
pub trait BookingTransaction: Send {
    async fn find_trip(&mut self, trip_id: &ObjectId) -> AppResult<Option<Trip>>;

    async fn find_booking(&mut self, booking_id: &ObjectId) -> AppResult<Option<Booking>>;

    /// 새 예약을 저장하고 부여된 id를 반환합니다.
    async fn insert_booking(&mut self, booking: &Booking) -> AppResult<ObjectId>;

    /// 예약의 `status`, `paymentStatus`, `updatedAt`을 덮어씁니다.
    async fn save_booking_state(&mut self, booking: &Booking) -> AppResult<()>;

    async fn delete_booking(&mut self, booking_id: &ObjectId) -> AppResult<bool>;

    /// `current + count <= max`일 때만 `current`를 `count`만큼 올립니다.
    ///
    /// 조건을 만족하지 않으면 아무것도 바꾸지 않고 `false`를 반환합니다.
    async fn try_reserve_seats(&mut self, trip_id: &ObjectId, count: u32) -> AppResult<bool>;

    /// `current`를 `count`만큼 내리되 0 아래로는 내리지 않습니다.
    async fn release_seats(&mut self, trip_id: &ObjectId, count: u32) -> AppResult<()>;

    async fn commit(self: Box<Self>) -> AppResult<()>;

    async fn abort(self: Box<Self>) -> AppResult<()>;
}
