//! 여행 카탈로그 조회 서비스

use std::sync::Arc;

use singleton_macro::service;

use crate::core::errors::{AppError, AppResult};
use crate::domain::dto::bookings::Pagination;
use crate::domain::dto::trips::{TripListQuery, TripResponse};
use crate::repositories::trips::TripRepository;
use crate::services::bookings::booking_service::page_params;

#[service(name = "trip")]
pub struct TripService {
    trip_repo: Arc<TripRepository>,
}

impl TripService {
    /// 활성 여행 목록 (최신 순, 페이지 단위)
    pub async fn list_trips(&self, query: &TripListQuery) -> AppResult<(Vec<TripResponse>, Pagination)> {
        let (page, limit) = page_params(query.page, query.limit);

        let (trips, total) = self
            .trip_repo
            .find_active_page(query.destination.as_deref(), page, limit)
            .await?;

        Ok((
            trips.into_iter().map(TripResponse::from).collect(),
            Pagination::new(total, page, limit),
        ))
    }

    pub async fn get_trip(&self, id: &str) -> AppResult<TripResponse> {
        self.trip_repo
            .find_by_id(id)
            .await?
            .map(TripResponse::from)
            .ok_or_else(|| AppError::NotFound("Trip not found".to_string()))
    }
}
