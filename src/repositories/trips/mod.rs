//! 여행 카탈로그 리포지토리

pub mod trip_repo;

pub use trip_repo::TripRepository;
