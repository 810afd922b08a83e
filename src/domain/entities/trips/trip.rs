//! Trip Entity
//!
//! `trips` 컬렉션 문서. 예약 흐름은 정원 필드(`maxParticipants`, `currentParticipants`)와
//! `price`, `status`만 사용하고, 나머지는 카탈로그 조회 응답에 그대로 실립니다.

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Active,
    Inactive,
    Cancelled,
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Active => "active",
            TripStatus::Inactive => "inactive",
            TripStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Moderate,
    Hard,
}

fn default_status() -> TripStatus {
    TripStatus::Active
}

fn default_difficulty() -> Difficulty {
    Difficulty::Moderate
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub destination: String,
    #[serde(default)]
    pub duration: u32,
    pub price: f64,
    pub max_participants: u32,
    #[serde(default)]
    pub current_participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime>,
    #[serde(default)]
    pub itinerary: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub rating: f64,
    #[serde(default = "default_status")]
    pub status: TripStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime>,
}

impl Trip {
    /// 최소 필드만 채운 활성 여행 (시드/테스트용)
    pub fn new(title: &str, destination: &str, price: f64, max_participants: u32) -> Self {
        let now = DateTime::now();

        Self {
            id: None,
            title: title.to_string(),
            description: String::new(),
            destination: destination.to_string(),
            duration: 1,
            price,
            max_participants,
            current_participants: 0,
            start_date: None,
            end_date: None,
            itinerary: Vec::new(),
            images: Vec::new(),
            highlights: Vec::new(),
            difficulty: Difficulty::Moderate,
            rating: 0.0,
            status: TripStatus::Active,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|id| id.to_hex())
    }

    pub fn available_spots(&self) -> u32 {
        self.max_participants.saturating_sub(self.current_participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_spots_never_negative() {
        let mut trip = Trip::new("Alps", "Switzerland", 1200.0, 4);
        trip.current_participants = 3;
        assert_eq!(trip.available_spots(), 1);

        trip.current_participants = 6;
        assert_eq!(trip.available_spots(), 0);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let document = mongodb::bson::doc! {
            "title": "Jeju",
            "destination": "Korea",
            "price": 250.0,
            "maxParticipants": 10,
        };
        let trip: Trip = mongodb::bson::from_document(document).unwrap();

        assert_eq!(trip.current_participants, 0);
        assert_eq!(trip.status, TripStatus::Active);
        assert_eq!(trip.difficulty, Difficulty::Moderate);
    }
}
