//! # 예약 리포지토리
//!
//! 트랜잭션 밖에서 실행되는 예약 조회/단순 갱신을 담당합니다.
//! 정원과 함께 바뀌어야 하는 쓰기(생성, 취소, 삭제, 상태 변경)는 모두
//! [`transactional_store`](BookingRepository::transactional_store)가 돌려주는
//! [`MongoBookingStore`]를 통해 예약 코디네이터가 수행합니다.
//!
//! 예약 문서는 자주 바뀌므로 Redis에 캐싱하지 않습니다.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument};
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::{AppError, AppResult};
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::entities::bookings::{Booking, PaymentStatus};
use crate::repositories::bookings::mongo_store::MongoBookingStore;

#[repository(name = "booking", collection = "bookings")]
pub struct BookingRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

/// 24자리 16진수 문자열을 `ObjectId`로 변환합니다.
pub fn parse_object_id(id: &str, label: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::ValidationError(format!("Invalid {} ID", label)))
}

impl BookingRepository {
    /// 정원 변경을 동반하는 쓰기용 트랜잭션 저장소
    pub fn transactional_store(&self) -> MongoBookingStore {
        MongoBookingStore::new(&self.db)
    }

    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Booking>> {
        let object_id = parse_object_id(id, "booking")?;

        Ok(self
            .collection::<Booking>()
            .find_one(doc! { "_id": object_id })
            .await?)
    }

    /// 사용자의 예약 목록. 최신 생성 순입니다.
    pub async fn find_by_user(&self, user_id: &ObjectId) -> AppResult<Vec<Booking>> {
        let cursor = self
            .collection::<Booking>()
            .find(doc! { "user": *user_id })
            .sort(doc! { "createdAt": -1 })
            .await?;

        Ok(cursor.try_collect().await?)
    }

    /// 관리자용 페이지 조회
    ///
    /// `page`는 1부터 시작합니다. 반환값은 `(현재 페이지 예약들, 필터에 맞는 전체 개수)`입니다.
    pub async fn find_page(&self, filter: Document, page: u64, limit: u64) -> AppResult<(Vec<Booking>, u64)> {
        let collection = self.collection::<Booking>();
        let skip = page.saturating_sub(1) * limit;

        let cursor = collection
            .find(filter.clone())
            .sort(doc! { "createdAt": -1 })
            .skip(skip)
            .limit(limit as i64)
            .await?;
        let bookings: Vec<Booking> = cursor.try_collect().await?;

        let total = collection.count_documents(filter).await?;

        Ok((bookings, total))
    }

    /// 결제 상태만 갱신합니다. 정원과 무관하므로 트랜잭션 없이 단일 문서 갱신으로 충분합니다.
    pub async fn update_payment_status(&self, id: &str, payment_status: PaymentStatus) -> AppResult<Option<Booking>> {
        let object_id = parse_object_id(id, "booking")?;

        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .collection::<Booking>()
            .find_one_and_update(
                doc! { "_id": object_id },
                doc! { "$set": {
                    "paymentStatus": payment_status.as_str(),
                    "updatedAt": DateTime::now(),
                }},
            )
            .with_options(options)
            .await?)
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let user_index = IndexModel::builder()
            .keys(doc! { "user": 1, "createdAt": -1 })
            .options(IndexOptions::builder().name("user_created_at".to_string()).build())
            .build();

        let trip_index = IndexModel::builder()
            .keys(doc! { "trip": 1 })
            .options(IndexOptions::builder().name("trip".to_string()).build())
            .build();

        let status_index = IndexModel::builder()
            .keys(doc! { "status": 1, "paymentStatus": 1 })
            .options(IndexOptions::builder().name("status_payment_status".to_string()).build())
            .build();

        self.collection::<Booking>()
            .create_indexes([user_index, trip_index, status_index])
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id() {
        assert!(parse_object_id("665f1c2b9d3e4a0012345678", "booking").is_ok());

        match parse_object_id("not-an-id", "trip") {
            Err(AppError::ValidationError(msg)) => assert_eq!(msg, "Invalid trip ID"),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
