use std::time::Duration;

use crate::error::{PlannerError, Result};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 4000;

/// Settings for the completion endpoint and enrichment.
///
/// The credential lives here and is handed to the completion client
/// explicitly; nothing in the pipeline reads it from the environment.
#[derive(Clone)]
pub struct PlannerConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Number of results requested from the image search per suggestion
    pub image_results: usize,
    /// Optional per-request deadline for the completion call
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for PlannerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlannerConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("image_results", &self.image_results)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl PlannerConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            image_results: 1,
            request_timeout: None,
        }
    }

    /// Build a config from `OPENAI_API_KEY` and friends, loading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PlannerError::Config(
                    "OPENAI_API_KEY environment variable must be set before generating itineraries"
                        .to_string(),
                )
            })?;

        Ok(Self::new(api_key).with_env_overrides())
    }

    /// Apply `OPENAI_BASE_URL` / `OPENROUTER_BASE_URL` and `ITINERARY_MODEL` when set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) =
            std::env::var("OPENAI_BASE_URL").or_else(|_| std::env::var("OPENROUTER_BASE_URL"))
        {
            self.base_url = base_url;
        }
        if let Ok(model) = std::env::var("ITINERARY_MODEL") {
            self.model = model;
        }
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_image_results(mut self, count: usize) -> Self {
        self.image_results = count.max(1);
        self
    }
}
