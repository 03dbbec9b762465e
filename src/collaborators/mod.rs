//! External collaborators the pipeline talks to, plus HTTP adapters for them

pub mod http_store;
pub mod image_search;
pub mod traits;

pub use http_store::{HttpAssetStore, HttpPlanStore};
pub use image_search::{HttpImageDownloader, PexelsImageSearch};
pub use traits::{AssetStore, DownloadedImage, ImageDownloader, ImageSearch, PlanStore, Session};
