//! 예약 엔티티

pub mod booking;

pub use booking::{Booking, BookingStatus, ParticipantDetail, PaymentStatus};
