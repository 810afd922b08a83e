//! 여행 카탈로그 조회 DTO

use serde::{Deserialize, Serialize};

use crate::domain::entities::trips::{Difficulty, Trip, TripStatus};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TripListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TripResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub destination: String,
    pub duration: u32,
    pub price: f64,
    pub max_participants: u32,
    pub current_participants: u32,
    pub available_spots: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    pub itinerary: Vec<String>,
    pub images: Vec<String>,
    pub highlights: Vec<String>,
    pub difficulty: Difficulty,
    pub rating: f64,
    pub status: TripStatus,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        let available_spots = trip.available_spots();
        let to_string = |value: mongodb::bson::DateTime| value.try_to_rfc3339_string().ok();

        Self {
            id: trip.id.map(|id| id.to_hex()).unwrap_or_default(),
            title: trip.title,
            description: trip.description,
            destination: trip.destination,
            duration: trip.duration,
            price: trip.price,
            max_participants: trip.max_participants,
            current_participants: trip.current_participants,
            available_spots,
            start_date: trip.start_date.and_then(to_string),
            end_date: trip.end_date.and_then(to_string),
            itinerary: trip.itinerary,
            images: trip.images,
            highlights: trip.highlights,
            difficulty: trip.difficulty,
            rating: trip.rating,
            status: trip.status,
        }
    }
}
