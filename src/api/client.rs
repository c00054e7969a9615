use std::future::Future;
use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::error::ApiError;
use crate::model::{FieldDraft, FieldResponse};

/// The two-endpoint backend that stores field definitions.
pub trait FieldService: Send + Sync + 'static {
    /// `GET /fields`: every stored field.
    fn fetch_fields(&self) -> impl Future<Output = Result<Vec<FieldResponse>, ApiError>> + Send;

    /// `POST /fields`: stores `draft` and returns it with its new ID.
    fn create_field(
        &self,
        draft: &FieldDraft,
    ) -> impl Future<Output = Result<FieldResponse, ApiError>> + Send;
}

/// [`FieldService`] over HTTP with JSON bodies.
#[derive(Debug, Clone)]
pub struct HttpFieldService {
    client: reqwest::Client,
    fields_url: String,
    timeout: Duration,
}

impl HttpFieldService {
    /// Creates a client for the backend at `base_url`.
    ///
    /// Every request, body included, is bounded by `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Transport)?;
        Ok(Self {
            client,
            fields_url: format!("{}/fields", base_url.trim_end_matches('/')),
            timeout,
        })
    }

    /// Returns the URL of the fields collection.
    pub fn fields_url(&self) -> &str {
        &self.fields_url
    }

    fn transport_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout(self.timeout)
        } else {
            ApiError::Transport(e)
        }
    }

    async fn read_json<T: DeserializeOwned>(&self, response: Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        response.json().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout(self.timeout)
            } else {
                ApiError::Decode(e)
            }
        })
    }
}

impl FieldService for HttpFieldService {
    async fn fetch_fields(&self) -> Result<Vec<FieldResponse>, ApiError> {
        debug!(url = %self.fields_url, "fetching fields");
        let response = self
            .client
            .get(&self.fields_url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        let fields: Vec<FieldResponse> = self.read_json(response).await?;
        info!(count = fields.len(), "fetched fields");
        Ok(fields)
    }

    async fn create_field(&self, draft: &FieldDraft) -> Result<FieldResponse, ApiError> {
        debug!(url = %self.fields_url, label = %draft.label, "creating field");
        let response = self
            .client
            .post(&self.fields_url)
            .json(draft)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;
        self.read_json(response).await
    }
}
