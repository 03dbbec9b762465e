use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::traits::{DownloadedImage, ImageDownloader, ImageSearch};
use crate::error::{PlannerError, Result};

const PEXELS_BASE_URL: &str = "https://api.pexels.com/v1";

#[derive(Debug, Deserialize)]
struct PexelsResponse {
    #[serde(default)]
    photos: Vec<PexelsPhoto>,
}

#[derive(Debug, Deserialize)]
struct PexelsPhoto {
    src: PexelsSources,
}

#[derive(Debug, Deserialize)]
struct PexelsSources {
    #[serde(default)]
    large: Option<String>,
    #[serde(default)]
    original: Option<String>,
}

/// Image search backed by the Pexels photo API
#[derive(Debug, Clone)]
pub struct PexelsImageSearch {
    api_key: String,
    base_url: String,
    client: Client,
}

impl PexelsImageSearch {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: PEXELS_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Build the search using the `PEXELS_API_KEY` environment variable
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("PEXELS_API_KEY")
            .map_err(|_| PlannerError::Config("Missing PEXELS_API_KEY env var".to_string()))?;
        Ok(Self::new(api_key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl ImageSearch for PexelsImageSearch {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<String>> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let per_page = count.max(1).to_string();

        let response = self
            .client
            .get(&url)
            .header("Authorization", &self.api_key)
            .query(&[("query", query), ("per_page", per_page.as_str())])
            .send()
            .await
            .map_err(|err| PlannerError::ImageSearch(format!("Failed to call Pexels: {}", err)))?;

        if !response.status().is_success() {
            return Err(PlannerError::ImageSearch(format!(
                "Pexels returned status {}",
                response.status()
            )));
        }

        let body: PexelsResponse = response.json().await.map_err(|err| {
            PlannerError::ImageSearch(format!("Failed to read Pexels response: {}", err))
        })?;

        Ok(body
            .photos
            .into_iter()
            .filter_map(|photo| photo.src.large.or(photo.src.original))
            .collect())
    }
}

/// Plain HTTP GET downloader for re-hosting external images
#[derive(Debug, Clone, Default)]
pub struct HttpImageDownloader {
    client: Client,
}

impl HttpImageDownloader {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageDownloader for HttpImageDownloader {
    async fn download(&self, url: &str) -> Result<DownloadedImage> {
        let response =
            self.client.get(url).send().await.map_err(|err| {
                PlannerError::ImageDownload(format!("Failed to fetch {}: {}", url, err))
            })?;

        if !response.status().is_success() {
            return Err(PlannerError::ImageDownload(format!(
                "{} returned status {}",
                url,
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|err| {
            PlannerError::ImageDownload(format!("Failed to read body of {}: {}", url, err))
        })?;

        if bytes.is_empty() {
            return Err(PlannerError::ImageDownload(format!("{} returned no data", url)));
        }

        Ok(DownloadedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }
}
