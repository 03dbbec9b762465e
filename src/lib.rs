//! itinerary-gen: AI itinerary generation for a trip-planning app
//!
//! Turns per-city date, budget and plan-count constraints into a chat-completion
//! prompt, tolerantly parses the model's JSON array into typed suggestions,
//! attaches images concurrently, and saves confirmed suggestions as
//! type-specific plans.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use chrono::NaiveDate;
//! use itinerary_gen::{CityConstraint, GenerationRequest, ItineraryGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = ItineraryGenerator::from_env()?;
//!     let request = GenerationRequest::new(vec![CityConstraint::new(
//!         "Hanoi",
//!         NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
//!         NaiveDate::from_ymd_opt(2026, 1, 12).unwrap(),
//!     )
//!     .with_budget(5_000_000)])?;
//!
//!     let itinerary = generator.generate(&request).await?;
//!     println!("{}", itinerary.summary());
//!     Ok(())
//! }
//! ```

pub mod collaborators;
pub mod config;
pub mod core;
pub mod error;
pub mod services;
pub mod types;

pub use collaborators::{
    AssetStore, DownloadedImage, HttpAssetStore, HttpImageDownloader, HttpPlanStore,
    ImageDownloader, ImageSearch, PexelsImageSearch, PlanStore, Session,
};
pub use config::PlannerConfig;
pub use crate::core::{
    GeneratedItinerary, ItemOutcome, ItineraryGenerator, MaterializationReport, Materializer,
};
pub use error::{PlannerError, Result};
pub use services::budget::{check_budget, BudgetCheck};
pub use services::enrichment::enrich_with_images;
pub use services::materializer::build_plan_request;
pub use services::planning::generate_itinerary_prompt;
pub use services::response_parser::parse_suggestions;
pub use services::schedule::{
    find_all_conflicts, find_trip_conflicts, group_plans_by_day, DayBucket, TripConflict,
};
pub use types::{
    CityConstraint, CreatedPlan, DateRange, GenerationRequest, MaterializedPlanRequest,
    PlanDetails, PlanFamily, PlanRecord, PlanType, SuggestedItem, TripSummary,
};

#[cfg(feature = "cli")]
pub mod cli;
