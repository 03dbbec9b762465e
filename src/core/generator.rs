use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{
    collaborators::ImageSearch,
    config::PlannerConfig,
    error::{PlannerError, Result},
    services::{
        budget::{check_budget, BudgetCheck},
        enrichment::enrich_with_images,
        openai_client::OpenAIClient,
        planning::generate_itinerary_prompt,
        response_parser::parse_suggestions,
    },
    types::{GenerationRequest, SuggestedItem},
};

/// Suggestions produced by one generation run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedItinerary {
    pub suggestions: Vec<SuggestedItem>,
    pub budget: BudgetCheck,
    #[serde(skip)]
    pub duration: Duration,
}

impl GeneratedItinerary {
    /// Human-readable overview, one line per suggestion
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "{} suggestion{} in {:.2}s",
            self.suggestions.len(),
            if self.suggestions.len() == 1 { "" } else { "s" },
            self.duration.as_secs_f64()
        ));

        for item in &self.suggestions {
            lines.push(format!(
                "- {} [{}] {}{}{}",
                item.start_time.format("%Y-%m-%d %H:%M"),
                item.plan_type,
                item.title,
                item.cost.map(|c| format!(" ({:.0})", c)).unwrap_or_default(),
                if item.image_ref.is_some() { " +image" } else { "" }
            ));
        }

        match (self.budget.ceiling, self.budget.overrun()) {
            (Some(ceiling), Some(over)) => lines.push(format!(
                "Estimated total {:.0} exceeds budget {} by {:.0}",
                self.budget.estimated_total, ceiling, over
            )),
            (Some(ceiling), None) => lines.push(format!(
                "Estimated total {:.0} within budget {}",
                self.budget.estimated_total, ceiling
            )),
            (None, _) => lines.push(format!(
                "Estimated total {:.0}",
                self.budget.estimated_total
            )),
        }

        lines.join("\n")
    }
}

/// Runs prompt building, completion, parsing and image enrichment.
pub struct ItineraryGenerator {
    client: OpenAIClient,
    image_search: Option<Arc<dyn ImageSearch>>,
    image_results: usize,
}

impl std::fmt::Debug for ItineraryGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItineraryGenerator")
            .field("client", &self.client)
            .field("image_search", &self.image_search.is_some())
            .field("image_results", &self.image_results)
            .finish()
    }
}

impl ItineraryGenerator {
    pub fn new(config: &PlannerConfig) -> Result<Self> {
        Ok(Self {
            client: OpenAIClient::new(config)?,
            image_search: None,
            image_results: config.image_results,
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(&PlannerConfig::from_env()?)
    }

    pub fn with_image_search(mut self, search: Arc<dyn ImageSearch>) -> Self {
        self.image_search = Some(search);
        self
    }

    pub fn model(&self) -> &str {
        self.client.model()
    }

    /// Prompt that `generate` would send for this request
    pub fn build_prompt(&self, request: &GenerationRequest) -> String {
        generate_itinerary_prompt(request)
    }

    /// Generate and enrich suggestions for a validated request.
    ///
    /// Completion failures surface as-is. A response with no usable items is
    /// reported as [`PlannerError::NoSuggestions`]; image failures never are.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedItinerary> {
        let start_time = Instant::now();
        let prompt = generate_itinerary_prompt(request);
        info!(
            target: "itinerary::generator",
            cities = request.cities().len(),
            model = %self.client.model(),
            "generating itinerary"
        );
        debug!(target: "itinerary::prompt", chars = prompt.len(), %prompt);

        let raw = self.client.complete(&prompt).await?;

        let mut suggestions = parse_suggestions(&raw);
        if suggestions.is_empty() {
            return Err(PlannerError::NoSuggestions);
        }

        if let Some(search) = &self.image_search {
            suggestions =
                enrich_with_images(search.as_ref(), suggestions, self.image_results).await;
        }

        let budget = check_budget(request, &suggestions);
        if let Some(over) = budget.overrun() {
            warn!(
                target: "itinerary::generator",
                estimated = budget.estimated_total,
                ceiling = budget.ceiling,
                over,
                "suggested itinerary exceeds the requested budget"
            );
        }

        Ok(GeneratedItinerary {
            suggestions,
            budget,
            duration: start_time.elapsed(),
        })
    }
}
