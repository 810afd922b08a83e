//! # 여행 리포지토리
//!
//! 여행 카탈로그 읽기 모델입니다.
//!
//! 여행 문서는 `currentParticipants`를 담고 있으므로 Redis에 따로 캐싱하지 않고 항상 MongoDB에서 읽습니다.
//! 조회 응답의 캐싱은 세대 검사를 하는 응답 캐시([`crate::caching::ResponseCache`])가 맡습니다.

use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document, Regex};
use mongodb::options::IndexOptions;
use mongodb::IndexModel;
use singleton_macro::repository;

use crate::caching::redis::RedisClient;
use crate::core::errors::AppResult;
use crate::core::registry::Repository;
use crate::db::Database;
use crate::domain::entities::trips::{Trip, TripStatus};
use crate::repositories::bookings::parse_object_id;

#[repository(name = "trip", collection = "trips")]
pub struct TripRepository {
    db: Arc<Database>,
    redis: Arc<RedisClient>,
}

/// 정규식 메타 문자를 이스케이프합니다. 사용자 입력을 `$regex`에 넣기 전에 사용합니다.
fn escape_regex(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if "\\^$.|?*+()[]{}".contains(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// 활성 여행 + (선택) 목적지 부분 일치 필터
pub fn active_trips_filter(destination: Option<&str>) -> Document {
    let mut filter = doc! { "status": TripStatus::Active.as_str() };

    if let Some(destination) = destination.map(str::trim).filter(|d| !d.is_empty()) {
        filter.insert(
            "destination",
            Regex {
                pattern: escape_regex(destination),
                options: "i".to_string(),
            },
        );
    }

    filter
}

impl TripRepository {
    /// ID로 여행 조회
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<Trip>> {
        let object_id = parse_object_id(id, "trip")?;

        let trip = self
            .collection::<Trip>()
            .find_one(doc! { "_id": object_id })
            .await?;

        Ok(trip)
    }

    /// 활성 여행 목록 (최신 등록 순). `(현재 페이지, 전체 개수)`를 반환합니다.
    pub async fn find_active_page(&self, destination: Option<&str>, page: u64, limit: u64) -> AppResult<(Vec<Trip>, u64)> {
        let collection = self.collection::<Trip>();
        let filter = active_trips_filter(destination);

        let cursor = collection
            .find(filter.clone())
            .sort(doc! { "createdAt": -1 })
            .skip(page.saturating_sub(1) * limit)
            .limit(limit as i64)
            .await?;
        let trips: Vec<Trip> = cursor.try_collect().await?;

        let total = collection.count_documents(filter).await?;

        Ok((trips, total))
    }

    pub async fn create_indexes(&self) -> AppResult<()> {
        let listing_index = IndexModel::builder()
            .keys(doc! { "status": 1, "createdAt": -1 })
            .options(IndexOptions::builder().name("status_created_at".to_string()).build())
            .build();

        let destination_index = IndexModel::builder()
            .keys(doc! { "destination": 1 })
            .options(IndexOptions::builder().name("destination".to_string()).build())
            .build();

        self.collection::<Trip>()
            .create_indexes([listing_index, destination_index])
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_filter_without_destination() {
        let filter = active_trips_filter(Some("   "));
        assert_eq!(filter.get_str("status").unwrap(), "active");
        assert!(!filter.contains_key("destination"));
    }

    #[test]
    fn test_destination_is_escaped_and_case_insensitive() {
        let filter = active_trips_filter(Some("Rio (Brazil)"));

        match filter.get("destination") {
            Some(mongodb::bson::Bson::RegularExpression(regex)) => {
                assert_eq!(regex.pattern, r"Rio \(Brazil\)");
                assert_eq!(regex.options, "i");
            }
            other => panic!("unexpected destination filter: {:?}", other),
        }
    }
}
