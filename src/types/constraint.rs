use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

/// One city leg of a requested trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityConstraint {
    pub city: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Spending ceiling in the minor currency unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<u64>,
    /// Exact number of plans wanted for this city
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_count: Option<u32>,
}

impl CityConstraint {
    pub fn new(city: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            city: city.into(),
            start_date,
            end_date,
            budget: None,
            plan_count: None,
        }
    }

    pub fn with_budget(mut self, budget: u64) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_plan_count(mut self, plan_count: u32) -> Self {
        self.plan_count = Some(plan_count);
        self
    }

    /// Inclusive number of days covered by this leg
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    fn validate(&self, position: usize) -> Result<()> {
        if self.city.trim().is_empty() {
            return Err(PlannerError::InvalidRequest(format!(
                "city #{} has an empty name",
                position
            )));
        }
        if self.start_date > self.end_date {
            return Err(PlannerError::InvalidRequest(format!(
                "{} starts on {} after it ends on {}",
                self.city, self.start_date, self.end_date
            )));
        }
        if self.budget == Some(0) {
            return Err(PlannerError::InvalidRequest(format!(
                "{} has a zero budget",
                self.city
            )));
        }
        if self.plan_count == Some(0) {
            return Err(PlannerError::InvalidRequest(format!(
                "{} asks for zero plans",
                self.city
            )));
        }
        Ok(())
    }
}

/// Ordered, non-empty batch of city constraints for one generation action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CityConstraint>", into = "Vec<CityConstraint>")]
pub struct GenerationRequest {
    cities: Vec<CityConstraint>,
}

impl GenerationRequest {
    pub fn new(cities: Vec<CityConstraint>) -> Result<Self> {
        if cities.is_empty() {
            return Err(PlannerError::InvalidRequest(
                "at least one city is required".to_string(),
            ));
        }
        for (idx, city) in cities.iter().enumerate() {
            city.validate(idx + 1)?;
        }
        Ok(Self { cities })
    }

    pub fn cities(&self) -> &[CityConstraint] {
        &self.cities
    }

    pub fn any_budget(&self) -> bool {
        self.cities.iter().any(|c| c.budget.is_some())
    }

    pub fn any_plan_count(&self) -> bool {
        self.cities.iter().any(|c| c.plan_count.is_some())
    }

    /// Sum of all budgets, only when every city carries one
    pub fn total_budget(&self) -> Option<u64> {
        self.cities
            .iter()
            .map(|c| c.budget)
            .try_fold(0u64, |acc, budget| budget.map(|b| acc.saturating_add(b)))
    }
}

impl TryFrom<Vec<CityConstraint>> for GenerationRequest {
    type Error = PlannerError;

    fn try_from(cities: Vec<CityConstraint>) -> Result<Self> {
        Self::new(cities)
    }
}

impl From<GenerationRequest> for Vec<CityConstraint> {
    fn from(request: GenerationRequest) -> Self {
        request.cities
    }
}
