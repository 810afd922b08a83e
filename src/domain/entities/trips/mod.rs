pub mod trip;

pub use trip::{Difficulty, Trip, TripStatus};
