use thiserror::Error;

/// Main error type for the itinerary pipeline
#[derive(Error, Debug)]
pub enum PlannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Upstream returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Completion response contained no content")]
    EmptyCompletion,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No usable suggestions could be parsed from the completion")]
    NoSuggestions,

    #[error("Image search error: {0}")]
    ImageSearch(String),

    #[error("Image download error: {0}")]
    ImageDownload(String),

    #[error("Asset upload error: {0}")]
    AssetUpload(String),

    #[error("Plan creation via `{endpoint}` failed: {message}")]
    PlanCreation {
        endpoint: &'static str,
        message: String,
    },

    #[error("None of the {attempted} confirmed suggestions could be saved")]
    NothingMaterialized { attempted: usize },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PlannerError>;

impl PlannerError {
    /// Whether a caller-level retry has a reasonable chance of succeeding
    pub fn is_retryable(&self) -> bool {
        match self {
            PlannerError::Transport(_) => true,
            PlannerError::Upstream { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            PlannerError::Config(_) => "CONFIG_ERROR",
            PlannerError::InvalidRequest(_) => "INVALID_REQUEST",
            PlannerError::Transport(_) => "TRANSPORT_FAILURE",
            PlannerError::Upstream { .. } => "UPSTREAM_ERROR",
            PlannerError::EmptyCompletion => "EMPTY_COMPLETION",
            PlannerError::Serialization(_) => "SERIALIZATION_ERROR",
            PlannerError::NoSuggestions => "NO_SUGGESTIONS",
            PlannerError::ImageSearch(_) => "IMAGE_SEARCH_ERROR",
            PlannerError::ImageDownload(_) => "IMAGE_DOWNLOAD_ERROR",
            PlannerError::AssetUpload(_) => "ASSET_UPLOAD_ERROR",
            PlannerError::PlanCreation { .. } => "PLAN_CREATION_ERROR",
            PlannerError::NothingMaterialized { .. } => "NOTHING_MATERIALIZED",
        }
    }

    /// Convert to a structured error payload
    pub fn to_error_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "retryable": self.is_retryable()
            }
        })
    }
}
