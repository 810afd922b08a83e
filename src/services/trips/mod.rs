//! 여행 카탈로그 서비스

pub mod trip_service;

pub use trip_service::TripService;
