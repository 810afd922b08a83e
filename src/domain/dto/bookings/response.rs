//! 예약 응답 DTO

use serde::Serialize;

use crate::domain::entities::bookings::{Booking, BookingStatus, ParticipantDetail, PaymentStatus};

fn rfc3339(value: mongodb::bson::DateTime) -> String {
    value.try_to_rfc3339_string().unwrap_or_default()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: String,
    pub user: String,
    pub trip: String,
    pub number_of_participants: u32,
    pub total_price: f64,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub booking_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_requests: Option<String>,
    pub participant_details: Vec<ParticipantDetail>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.map(|id| id.to_hex()).unwrap_or_default(),
            user: booking.user_id.to_hex(),
            trip: booking.trip_id.to_hex(),
            number_of_participants: booking.number_of_participants,
            total_price: booking.total_price,
            status: booking.status,
            payment_status: booking.payment_status,
            booking_date: rfc3339(booking.booking_date),
            special_requests: booking.special_requests,
            participant_details: booking.participant_details,
            created_at: rfc3339(booking.created_at),
            updated_at: rfc3339(booking.updated_at),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
    pub limit: u64,
}

impl Pagination {
    pub fn new(total: u64, page: u64, limit: u64) -> Self {
        let limit = limit.max(1);
        Self {
            total,
            pages: total.div_ceil(limit),
            current_page: page,
            limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_pagination_rounds_up() {
        assert_eq!(Pagination::new(21, 1, 10).pages, 3);
        assert_eq!(Pagination::new(0, 1, 10).pages, 0);
        assert_eq!(Pagination::new(5, 1, 0).limit, 1);
    }

    #[test]
    fn test_booking_response_uses_hex_ids() {
        let mut booking = Booking::new_pending(ObjectId::new(), ObjectId::new(), 2, 500.0, vec![], None);
        let id = ObjectId::new();
        booking.id = Some(id);

        let response = BookingResponse::from(booking);
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["id"], id.to_hex());
        assert_eq!(json["status"], "pending");
        assert_eq!(json["numberOfParticipants"], 2);
    }
}
