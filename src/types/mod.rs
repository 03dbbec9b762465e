pub mod constraint;
pub mod datetime;
pub mod plan;
pub mod plan_type;
pub mod suggestion;
pub mod trip;

pub use constraint::{CityConstraint, GenerationRequest};
pub use plan::{CreatedPlan, MaterializedPlanRequest, PlanDetails};
pub use plan_type::{PlanFamily, PlanType};
pub use suggestion::SuggestedItem;
pub use trip::{DateRange, PlanRecord, TripSummary};
