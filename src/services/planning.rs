use crate::types::{CityConstraint, GenerationRequest, PlanType};

/// Share of a strict budget the model is asked to keep unspent
pub const BUDGET_SAFETY_MARGIN_PERCENT: u64 = 15;

/// Daily spend (minor units) at or below which a city is planned as economy
const ECONOMY_DAILY_CEILING: u64 = 1_000_000;
/// Daily spend (minor units) at or above which a city is planned as premium
const PREMIUM_DAILY_FLOOR: u64 = 5_000_000;

const STRICT_BUDGET_CHECK: &str =
    "Each city with a strict budget: the sum of `expense` stays under the budget and keeps the safety margin.";
const PLAN_COUNT_CHECK: &str =
    "Each city with a required plan count has exactly that many plans, no more and no fewer.";

/// Price tier derived from a city's budget per day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetTier {
    Economy,
    Standard,
    Premium,
}

impl BudgetTier {
    pub fn for_city(city: &CityConstraint) -> BudgetTier {
        let Some(budget) = city.budget else {
            return BudgetTier::Standard;
        };
        let per_day = budget / city.days().max(1) as u64;
        if per_day <= ECONOMY_DAILY_CEILING {
            BudgetTier::Economy
        } else if per_day >= PREMIUM_DAILY_FLOOR {
            BudgetTier::Premium
        } else {
            BudgetTier::Standard
        }
    }

    fn label(&self) -> &'static str {
        match self {
            BudgetTier::Economy => "economy",
            BudgetTier::Standard => "standard",
            BudgetTier::Premium => "premium",
        }
    }
}

/// Build the full generation prompt for a validated request.
///
/// Budget and plan-count clauses are emitted per city. When at least one city
/// in the batch is constrained, the unconstrained ones get an explicit
/// "flexible" note so the instructions read consistently.
pub fn generate_itinerary_prompt(request: &GenerationRequest) -> String {
    let mut lines = Vec::new();

    lines.push(
        "You are an experienced local travel planner. Build a realistic day-by-day itinerary for the trip below."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Destinations:".to_string());

    let any_budget = request.any_budget();
    let any_count = request.any_plan_count();

    for (idx, city) in request.cities().iter().enumerate() {
        lines.push(format!(
            "{}. {}: from {} to {} ({} day{})",
            idx + 1,
            city.city.trim(),
            city.start_date,
            city.end_date,
            city.days(),
            if city.days() == 1 { "" } else { "s" }
        ));
        if let Some(clause) = budget_clause(city, any_budget) {
            lines.push(format!("   - {}", clause));
        }
        if let Some(clause) = plan_count_clause(city, any_count) {
            lines.push(format!("   - {}", clause));
        }
    }

    lines.push(String::new());
    lines.push("Rules:".to_string());
    lines.push(format!(
        "- `type` must be one of: {}.",
        PlanType::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    ));
    lines.push(
        "- Every city needs LODGING for its nights, RESTAURANT plans for meals, and a mix of sights and experiences."
            .to_string(),
    );
    lines.push(
        "- Use FLIGHT, TRAIN, BOAT or CAR_RENTAL to move between consecutive cities when travel is needed."
            .to_string(),
    );
    lines.push(String::new());
    lines.push("Price guidance by tier (`expense` is in the same unit as the budgets):".to_string());
    lines.push(
        "- economy: hostels or guesthouses, street food and local eateries, free or low-cost sights, public transport."
            .to_string(),
    );
    lines.push(
        "- standard: 3-star hotels, casual sit-down restaurants, paid attractions and group tours."
            .to_string(),
    );
    lines.push(
        "- premium: 4-5 star hotels, fine dining, private tours and shows.".to_string(),
    );
    lines.push("- Cities without a strict budget use the standard tier.".to_string());
    lines.push(String::new());
    lines.push("Suggested times of day:".to_string());
    lines.push("- Morning 07:00-11:00: ACTIVITY, TOUR, RELIGION sites.".to_string());
    lines.push("- Lunch 11:30-13:30 and dinner 18:00-20:00: RESTAURANT.".to_string());
    lines.push("- Afternoon 14:00-17:00: ACTIVITY, SHOPPING, CAMPING; LODGING check-in at 14:00.".to_string());
    lines.push("- Evening 20:00-22:00: THEATER, SHOPPING.".to_string());
    lines.push(String::new());
    lines.push("Before answering, verify:".to_string());
    for (idx, item) in checklist(request).iter().enumerate() {
        lines.push(format!("{}. {}", idx + 1, item));
    }
    lines.push(String::new());
    lines.push(response_format_instructions());

    lines.join("\n")
}

fn budget_clause(city: &CityConstraint, any_budget: bool) -> Option<String> {
    match city.budget {
        Some(budget) => {
            let target = safety_target(budget);
            Some(format!(
                "Budget (strict): the total `expense` of all plans in this city MUST stay under {}. Leave about {}% safety margin, so aim for {} or less. Price tier: {}.",
                budget,
                BUDGET_SAFETY_MARGIN_PERCENT,
                target,
                BudgetTier::for_city(city).label()
            ))
        }
        None if any_budget => Some(
            "Budget: flexible, no fixed limit for this city. Keep prices reasonable for the standard tier."
                .to_string(),
        ),
        None => None,
    }
}

/// Budget minus the safety margin, rounded down
fn safety_target(budget: u64) -> u64 {
    let kept = u128::from(budget) * u128::from(100 - BUDGET_SAFETY_MARGIN_PERCENT) / 100;
    u64::try_from(kept).unwrap_or(budget)
}

fn plan_count_clause(city: &CityConstraint, any_count: bool) -> Option<String> {
    match city.plan_count {
        Some(count) => Some(format!(
            "Plan count (strict): create EXACTLY {} plan{} for this city.",
            count,
            if count == 1 { "" } else { "s" }
        )),
        None if any_count => Some(
            "Plan count: flexible, choose a sensible number of plans for the days available."
                .to_string(),
        ),
        None => None,
    }
}

/// Pre-submission checks in display order; numbering is assigned by position.
pub(crate) fn checklist(request: &GenerationRequest) -> Vec<&'static str> {
    let mut items = vec![
        "Every `type` is taken from the allowed list.",
        "Every `startTime` falls inside its city's date range and plans do not overlap in time.",
    ];
    if request.any_budget() {
        items.push(STRICT_BUDGET_CHECK);
    }
    if request.any_plan_count() {
        items.push(PLAN_COUNT_CHECK);
    }
    items.push("`lat` and `lng` are the real coordinates of `address`.");
    items.push("The answer is only the JSON array described below.");
    items
}

fn response_format_instructions() -> String {
    [
        "Response format: return ONLY a raw JSON array of objects. No markdown, no code fences, no prose, only the array.",
        "Each object has exactly these fields:",
        r#"{"type": "LODGING", "title": "string", "address": "string", "lat": 0.0, "lng": 0.0, "startTime": "YYYY-MM-DDTHH:MM:SS", "expense": 0, "description": "string", "notes": "string"}"#,
        "`startTime` is local time without a timezone. `expense` is a number without currency symbols.",
    ]
    .join("\n")
}
