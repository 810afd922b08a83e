//! 여행 조회 핸들러 (공개, 응답 캐시 대상)

use actix_web::{get, web, HttpResponse};
use serde_json::json;

use crate::core::errors::AppError;
use crate::domain::dto::trips::TripListQuery;
use crate::services::trips::TripService;

/// `GET /api/trips?page=1&limit=10&destination=kyoto`
#[get("")]
pub async fn list_trips(query: web::Query<TripListQuery>) -> Result<HttpResponse, AppError> {
    let (trips, pagination) = TripService::instance().list_trips(&query).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": trips,
        "pagination": pagination
    })))
}

#[get("/{id}")]
pub async fn get_trip(path: web::Path<String>) -> Result<HttpResponse, AppError> {
    let trip = TripService::instance().get_trip(&path).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "data": trip
    })))
}
