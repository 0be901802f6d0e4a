//! reqwest-backed training API client

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, COOKIE};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::TrainingApi;
use crate::config::ApiConfig;
use crate::models::{
    CreateTrainingSessionRequest, MySetDetail, MySetSummary, PreviousSessionData, SaveAck,
};
use crate::{MysetError, Result};

const CSRF_HEADER: &str = "X-CSRFToken";

/// HTTP client for the `/training/mysets` endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client from the `[api]` config section
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.csrf_token {
            headers.insert(CSRF_HEADER, header_value(token, "CSRF token")?);
        }
        if let Some(cookie) = &config.session_cookie {
            headers.insert(COOKIE, header_value(cookie, "session cookie")?);
        }

        let client = Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| MysetError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await.map_err(network_error)?;
        let text = checked_body(response).await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl TrainingApi for ApiClient {
    async fn list_mysets(&self) -> Result<Vec<MySetSummary>> {
        self.get_json("/training/mysets").await
    }

    async fn fetch_myset(&self, id: i64) -> Result<MySetDetail> {
        self.get_json(&format!("/training/mysets/{}", id)).await
    }

    async fn fetch_previous_session(&self, id: i64) -> Result<Option<PreviousSessionData>> {
        let url = self.url(&format!("/training/mysets/{}/record/", id));
        debug!(%url, "GET");
        let response = self.client.get(&url).send().await.map_err(network_error)?;
        let text = checked_body(response).await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn save_session(
        &self,
        id: i64,
        request: &CreateTrainingSessionRequest,
    ) -> Result<SaveAck> {
        let url = self.url(&format!("/training/mysets/{}/record/", id));
        debug!(%url, workouts = request.workouts.len(), "POST");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(network_error)?;
        let text = checked_body(response).await?;
        Ok(SaveAck::from_body(&text))
    }
}

fn header_value(value: &str, what: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|_| MysetError::Config(format!("{} contains invalid characters", what)))
}

fn network_error(err: reqwest::Error) -> MysetError {
    MysetError::Api {
        status: None,
        message: err.to_string(),
    }
}

/// Body of a 2xx response; any other status becomes `MysetError::Api`
async fn checked_body(response: Response) -> Result<String> {
    let status = response.status();
    let text = response.text().await.map_err(network_error)?;

    if !status.is_success() {
        return Err(MysetError::Api {
            status: Some(status.as_u16()),
            message: if text.trim().is_empty() {
                status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string()
            } else {
                text
            },
        });
    }
    Ok(text)
}
