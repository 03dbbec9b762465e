pub mod generator;

pub use crate::services::materializer::{ItemOutcome, MaterializationReport, Materializer};
pub use generator::{GeneratedItinerary, ItineraryGenerator};
