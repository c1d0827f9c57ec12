/// Records API client
///
/// Talks JSON to `{base_url}/api/places`. Any non-success status is a
/// rejection; the body is only read to log it.

use reqwest::{Client, StatusCode, Url};
use std::time::Duration;
use thiserror::Error;

use super::RecordsApi;
use crate::config::ApiConfig;
use crate::state::data::{NewRecord, Record};

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response (connectivity, DNS, timeout)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-success status
    #[error("server responded with status {status}")]
    Rejected { status: u16 },
    /// The server answered with success but the body is not what we expect
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid API address: {0}")]
    InvalidUrl(String),
}

/// HTTP implementation of the records API
#[derive(Debug, Clone)]
pub struct HttpRecordsApi {
    client: Client,
    places: Url,
}

impl HttpRecordsApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        let places = places_url(&config.base_url)?;

        tracing::info!(url = %places, "records API");
        Ok(Self { client, places })
    }

    /// Read the body of a response, failing on non-success statuses
    async fn body(response: reqwest::Response) -> Result<Vec<u8>, ApiError> {
        let status = response.status();
        if !status.is_success() {
            log_rejection(status, response).await;
            return Err(ApiError::Rejected {
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// `{base}/api/places`, keeping any path prefix the base already has
fn places_url(base: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(base).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", base, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ApiError::InvalidUrl(format!("{}: scheme must be http or https", base)));
    }

    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["api", "places"]);
    Ok(url)
}

/// Best-effort logging of a rejected response's body
async fn log_rejection(status: StatusCode, response: reqwest::Response) {
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(%status, body = %body, "records API rejected request");
}

impl RecordsApi for HttpRecordsApi {
    async fn list(&self) -> Result<Vec<Record>, ApiError> {
        tracing::debug!(url = %self.places, "GET");
        let response = self.client.get(self.places.clone()).send().await?;
        let body = Self::body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn create(&self, new: &NewRecord) -> Result<Record, ApiError> {
        tracing::debug!(url = %self.places, title = %new.title, "POST");
        let response = self.client.post(self.places.clone()).json(new).send().await?;
        let body = Self::body(response).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
