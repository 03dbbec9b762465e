use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::traits::{AssetStore, DownloadedImage, PlanStore, Session};
use crate::error::{PlannerError, Result};
use crate::types::{CreatedPlan, MaterializedPlanRequest, PlanFamily};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    filename: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|error| error.message)
        .unwrap_or_else(|| body.to_string())
}

/// Uploads raw image bytes to the app's file service.
#[derive(Debug, Clone)]
pub struct HttpAssetStore {
    upload_url: String,
    session: Session,
    client: Client,
}

impl HttpAssetStore {
    pub fn new(upload_url: impl Into<String>, session: Session) -> Self {
        Self {
            upload_url: upload_url.into(),
            session,
            client: Client::new(),
        }
    }
}

#[async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload(&self, image: DownloadedImage) -> Result<String> {
        let content_type = image
            .content_type
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let response = self
            .client
            .post(&self.upload_url)
            .bearer_auth(&self.session.access_token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(image.bytes)
            .send()
            .await
            .map_err(|err| PlannerError::AssetUpload(format!("Upload request failed: {}", err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| PlannerError::AssetUpload(format!("Failed to read upload response: {}", err)))?;

        if !status.is_success() {
            return Err(PlannerError::AssetUpload(format!(
                "upload returned {}: {}",
                status,
                error_message(&body)
            )));
        }

        let uploaded: UploadResponse = serde_json::from_str(&body)
            .map_err(|err| PlannerError::AssetUpload(format!("Unexpected upload response: {}", err)))?;
        Ok(uploaded.filename)
    }
}

/// Trip service client that posts plans to per-family endpoints.
#[derive(Debug, Clone)]
pub struct HttpPlanStore {
    base_url: String,
    client: Client,
}

impl HttpPlanStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    fn endpoint_url(&self, trip_id: &str, family: PlanFamily) -> String {
        format!(
            "{}/trips/{}/plans/{}",
            self.base_url.trim_end_matches('/'),
            trip_id,
            family.endpoint()
        )
    }
}

#[async_trait]
impl PlanStore for HttpPlanStore {
    async fn create_plan(
        &self,
        session: &Session,
        family: PlanFamily,
        request: &MaterializedPlanRequest,
    ) -> Result<CreatedPlan> {
        let url = self.endpoint_url(&request.trip_id, family);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&session.access_token)
            .json(request)
            .send()
            .await
            .map_err(|err| PlannerError::PlanCreation {
                endpoint: family.endpoint(),
                message: format!("request failed: {}", err),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|err| PlannerError::PlanCreation {
            endpoint: family.endpoint(),
            message: format!("failed to read response: {}", err),
        })?;

        if !status.is_success() {
            return Err(PlannerError::PlanCreation {
                endpoint: family.endpoint(),
                message: format!("{}: {}", status, error_message(&body)),
            });
        }

        serde_json::from_str(&body).map_err(|err| PlannerError::PlanCreation {
            endpoint: family.endpoint(),
            message: format!("unexpected response: {}", err),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlanDetails;

    fn request() -> MaterializedPlanRequest {
        MaterializedPlanRequest {
            trip_id: "trip-9".into(),
            title: "Dinner".into(),
            address: "1 Main St".into(),
            location: "1,2".into(),
            start_time: "2026-01-10T19:00:00".into(),
            end_time: "2026-01-10T20:00:00".into(),
            cost: 0.0,
            image_ref: None,
            type_tag: "RESTAURANT",
            description: None,
            notes: None,
            details: PlanDetails::Restaurant {
                reservation_date: "2026-01-10".into(),
                reservation_time: "19:00".into(),
            },
        }
    }

    #[tokio::test]
    async fn test_plan_store_posts_to_family_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/trips/trip-9/plans/restaurant")
            .match_header("authorization", "Bearer tok")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "reservationTime": "19:00",
                "type": "RESTAURANT"
            })))
            .with_status(201)
            .with_body(r#"{"id":"plan-1","title":"Dinner"}"#)
            .create_async()
            .await;

        let store = HttpPlanStore::new(server.url());
        let created = store
            .create_plan(&Session::new("u1", "tok"), PlanFamily::Restaurant, &request())
            .await
            .unwrap();
        assert_eq!(created.id, "plan-1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_plan_store_surfaces_error_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"message":"startTime outside trip"}"#)
            .create_async()
            .await;

        let store = HttpPlanStore::new(server.url());
        let err = store
            .create_plan(&Session::new("u1", "tok"), PlanFamily::Restaurant, &request())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("startTime outside trip"));
        assert!(err.to_string().contains("restaurant"));
    }

    #[tokio::test]
    async fn test_asset_store_returns_filename() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .match_header("content-type", "image/jpeg")
            .with_status(200)
            .with_body(r#"{"filename":"a1b2.jpg"}"#)
            .create_async()
            .await;

        let store = HttpAssetStore::new(format!("{}/upload", server.url()), Session::new("u1", "t"));
        let reference = store
            .upload(DownloadedImage {
                bytes: vec![1, 2, 3],
                content_type: Some("image/jpeg".into()),
            })
            .await
            .unwrap();
        assert_eq!(reference, "a1b2.jpg");
    }
}
