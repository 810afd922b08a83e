//! 예약 요청 DTO
//!
//! 문자열 필드는 역직렬화 단계에서 정화(trim + HTML 이스케이프)됩니다.

use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::domain::entities::bookings::ParticipantDetail;
use crate::utils::string_utils::{
    deserialize_email, deserialize_optional_sanitized, deserialize_sanitized_string,
};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ParticipantDetailRequest {
    #[serde(deserialize_with = "deserialize_sanitized_string")]
    #[validate(length(min = 1, max = 100, message = "참가자 이름은 1-100자 사이여야 합니다"))]
    pub name: String,

    #[serde(deserialize_with = "deserialize_email")]
    #[validate(email(message = "유효한 참가자 이메일 주소를 입력해주세요"))]
    pub email: String,

    #[serde(deserialize_with = "deserialize_sanitized_string")]
    #[validate(length(min = 1, max = 30, message = "참가자 연락처를 입력해주세요"))]
    pub phone: String,

    #[validate(range(max = 120, message = "나이가 올바르지 않습니다"))]
    pub age: Option<u32>,
}

impl From<ParticipantDetailRequest> for ParticipantDetail {
    fn from(request: ParticipantDetailRequest) -> Self {
        Self {
            name: request.name,
            email: request.email,
            phone: request.phone,
            age: request.age,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_participant_count"))]
pub struct CreateBookingRequest {
    #[serde(alias = "trip", deserialize_with = "deserialize_sanitized_string")]
    #[validate(length(min = 1, message = "Trip ID is required"))]
    pub trip_id: String,

    #[validate(range(min = 1, message = "참가자 수는 1 이상이어야 합니다"))]
    pub number_of_participants: u32,

    #[serde(default)]
    #[validate(nested)]
    pub participant_details: Vec<ParticipantDetailRequest>,

    #[serde(default, deserialize_with = "deserialize_optional_sanitized")]
    #[validate(length(max = 1000, message = "요청 사항은 1000자 이하여야 합니다"))]
    pub special_requests: Option<String>,
}

/// 참가자 상세를 보냈다면 인원 수와 같아야 합니다.
fn validate_participant_count(request: &CreateBookingRequest) -> Result<(), ValidationError> {
    if !request.participant_details.is_empty()
        && request.participant_details.len() != request.number_of_participants as usize
    {
        return Err(ValidationError::new("participant_count_mismatch")
            .with_message("참가자 상세 수가 참가자 수와 일치하지 않습니다".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBookingStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentStatusRequest {
    #[validate(length(min = 1, message = "Payment status is required"))]
    pub payment_status: String,
}

/// `GET /api/bookings` 쿼리
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingListQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub trip: Option<String>,
}
