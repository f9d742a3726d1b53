use crate::errors::ServiceError;
use serde_json::Value;
use std::time::Duration;
use tracing::instrument;

/// Thin client for the external Python prediction service
#[derive(Clone)]
pub struct PredictClient {
    client: reqwest::Client,
    base_url: String,
}

impl PredictClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    /// Forwards a health probe. An unreachable or failing service maps to
    /// an external-service error that handlers surface as 503.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<Value, ServiceError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map_err(|e| {
                ServiceError::ExternalServiceError(format!(
                    "Prediction service unreachable: {}",
                    e
                ))
            })?;

        if !response.status().is_success() {
            return Err(ServiceError::ExternalServiceError(format!(
                "Prediction service returned status {}",
                response.status()
            )));
        }

        response.json::<Value>().await.map_err(|e| {
            ServiceError::ExternalServiceError(format!(
                "Prediction service returned invalid body: {}",
                e
            ))
        })
    }
}
