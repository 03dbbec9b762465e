use serde::Serialize;

use crate::types::{GenerationRequest, SuggestedItem};

/// Post-hoc comparison of suggested spend against the requested budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetCheck {
    /// Sum of every suggestion's cost; missing costs count as zero
    pub estimated_total: f64,
    /// Combined budget, present only when every city has one
    pub ceiling: Option<u64>,
}

impl BudgetCheck {
    pub fn within_budget(&self) -> bool {
        match self.ceiling {
            Some(ceiling) => self.estimated_total <= ceiling as f64,
            None => true,
        }
    }

    /// Amount over the ceiling, if any
    pub fn overrun(&self) -> Option<f64> {
        let ceiling = self.ceiling? as f64;
        (self.estimated_total > ceiling).then(|| self.estimated_total - ceiling)
    }
}

/// Suggestions carry no city, so only the batch total can be checked.
pub fn check_budget(request: &GenerationRequest, items: &[SuggestedItem]) -> BudgetCheck {
    BudgetCheck {
        estimated_total: items.iter().filter_map(|item| item.cost).sum(),
        ceiling: request.total_budget(),
    }
}
