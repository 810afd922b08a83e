//! MongoDB 트랜잭션 기반 예약 저장소
//!
//! 정원 변경은 항상 조건부 업데이트로 수행됩니다.
//!
//! ```text
//! reserve: { _id, $expr: currentParticipants + n <= maxParticipants }  →  $inc currentParticipants n
//! release: currentParticipants = max(0, currentParticipants - n)       (파이프라인 업데이트)
//! ```
//!
//! 같은 여행 문서를 두 트랜잭션이 동시에 갱신하면 한쪽이 `WriteConflict`
//! (`TransientTransactionError` 라벨)로 실패하고, 코디네이터가 트랜잭션 전체를 다시 시도합니다.

use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::error::UNKNOWN_TRANSACTION_COMMIT_RESULT;
use mongodb::{Client, ClientSession, Collection};

use crate::core::errors::{AppError, AppResult};
use crate::db::Database;
use crate::domain::entities::bookings::Booking;
use crate::domain::entities::trips::Trip;
use crate::repositories::bookings::booking_store::{BookingStore, BookingTransaction};

pub const TRIPS_COLLECTION: &str = "trips";
pub const BOOKINGS_COLLECTION: &str = "bookings";

/// 커밋 결과를 알 수 없을 때 커밋만 다시 시도하는 횟수
const COMMIT_RETRY_LIMIT: u32 = 3;

#[derive(Clone)]
pub struct MongoBookingStore {
    client: Client,
    trips: Collection<Trip>,
    bookings: Collection<Booking>,
}

impl MongoBookingStore {
    pub fn new(database: &Database) -> Self {
        let db = database.get_database();

        Self {
            client: database.client().clone(),
            trips: db.collection::<Trip>(TRIPS_COLLECTION),
            bookings: db.collection::<Booking>(BOOKINGS_COLLECTION),
        }
    }
}

#[async_trait]
impl BookingStore for MongoBookingStore {
    async fn begin(&self) -> AppResult<Box<dyn BookingTransaction>> {
        let mut session = self.client.start_session().await?;
        session.start_transaction().await?;

        Ok(Box::new(MongoBookingTransaction {
            session,
            trips: self.trips.clone(),
            bookings: self.bookings.clone(),
        }))
    }
}

pub struct MongoBookingTransaction {
    session: ClientSession,
    trips: Collection<Trip>,
    bookings: Collection<Booking>,
}

#[async_trait]
impl BookingTransaction for MongoBookingTransaction {
    async fn find_trip(&mut self, trip_id: &ObjectId) -> AppResult<Option<Trip>> {
        Ok(self
            .trips
            .find_one(doc! { "_id": *trip_id })
            .session(&mut self.session)
            .await?)
    }

    async fn find_booking(&mut self, booking_id: &ObjectId) -> AppResult<Option<Booking>> {
        Ok(self
            .bookings
            .find_one(doc! { "_id": *booking_id })
            .session(&mut self.session)
            .await?)
    }

    async fn insert_booking(&mut self, booking: &Booking) -> AppResult<ObjectId> {
        let result = self
            .bookings
            .insert_one(booking)
            .session(&mut self.session)
            .await?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AppError::DatabaseError("삽입된 예약 id가 ObjectId가 아닙니다".to_string()))
    }

    async fn save_booking_state(&mut self, booking: &Booking) -> AppResult<()> {
        let booking_id = booking
            .id
            .ok_or_else(|| AppError::InternalError("저장되지 않은 예약입니다".to_string()))?;

        self.bookings
            .update_one(
                doc! { "_id": booking_id },
                doc! { "$set": {
                    "status": booking.status.as_str(),
                    "paymentStatus": booking.payment_status.as_str(),
                    "updatedAt": booking.updated_at,
                }},
            )
            .session(&mut self.session)
            .await?;

        Ok(())
    }

    async fn delete_booking(&mut self, booking_id: &ObjectId) -> AppResult<bool> {
        let result = self
            .bookings
            .delete_one(doc! { "_id": *booking_id })
            .session(&mut self.session)
            .await?;

        Ok(result.deleted_count > 0)
    }

    async fn try_reserve_seats(&mut self, trip_id: &ObjectId, count: u32) -> AppResult<bool> {
        let count = i64::from(count);

        let result = self
            .trips
            .update_one(
                doc! {
                    "_id": *trip_id,
                    "$expr": { "$lte": [ { "$add": ["$currentParticipants", count] }, "$maxParticipants" ] },
                },
                doc! {
                    "$inc": { "currentParticipants": count },
                    "$set": { "updatedAt": DateTime::now() },
                },
            )
            .session(&mut self.session)
            .await?;

        Ok(result.matched_count == 1)
    }

    async fn release_seats(&mut self, trip_id: &ObjectId, count: u32) -> AppResult<()> {
        let count = i64::from(count);

        self.trips
            .update_one(
                doc! { "_id": *trip_id },
                vec![doc! { "$set": {
                    "currentParticipants": {
                        "$max": [0, { "$subtract": ["$currentParticipants", count] }]
                    },
                    "updatedAt": "$$NOW",
                }}],
            )
            .session(&mut self.session)
            .await?;

        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut tx = *self;
        let mut attempt = 1;

        loop {
            match tx.session.commit_transaction().await {
                Ok(()) => return Ok(()),
                Err(e) if e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT) && attempt < COMMIT_RETRY_LIMIT => {
                    log::warn!("⚠️ 커밋 결과 불명, 커밋 재시도 ({}/{}): {}", attempt, COMMIT_RETRY_LIMIT, e);
                    attempt += 1;
                }
                // 결과를 모르는 채로 트랜잭션 전체를 재실행하면 예약이 중복될 수 있음
                Err(e) if e.contains_label(UNKNOWN_TRANSACTION_COMMIT_RESULT) => {
                    return Err(AppError::DatabaseError(format!("커밋 결과를 확인할 수 없습니다: {}", e)));
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn abort(self: Box<Self>) -> AppResult<()> {
        let mut tx = *self;
        tx.session.abort_transaction().await?;
        Ok(())
    }
}
