use async_trait::async_trait;

use crate::error::Result;
use crate::types::{CreatedPlan, MaterializedPlanRequest, PlanFamily};

/// Authenticated user on whose behalf plans are created.
#[derive(Clone)]
pub struct Session {
    pub user_id: String,
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            access_token: access_token.into(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("access_token", &"***")
            .finish()
    }
}

/// Raw image bytes fetched from an external host.
#[derive(Debug, Clone)]
pub struct DownloadedImage {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
}

/// Free-text image search returning URLs, best match first.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<String>>;
}

/// Fetches an externally hosted image.
#[async_trait]
pub trait ImageDownloader: Send + Sync {
    async fn download(&self, url: &str) -> Result<DownloadedImage>;
}

/// Internal asset storage; returns a stable reference for the stored bytes.
#[async_trait]
pub trait AssetStore: Send + Sync {
    async fn upload(&self, image: DownloadedImage) -> Result<String>;
}

/// Trip persistence service exposing one creation endpoint per plan family.
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn create_plan(
        &self,
        session: &Session,
        family: PlanFamily,
        request: &MaterializedPlanRequest,
    ) -> Result<CreatedPlan>;
}
