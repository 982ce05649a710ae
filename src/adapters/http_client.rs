use crate::domain::model::{Species, BILL_DEPTH_MM, BILL_LENGTH_MM};
use crate::server::types::{HealthResponse, SpeciesResponse};
use crate::utils::error::{Result, ServiceError};
use crate::utils::validation::validate_url;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use url::Url;

/// Typed client for a running penguin-api server.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    client: Client,
    base_url: Url,
}

impl PredictionClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = validate_url("base_url", base_url)?;
        // join() replaces the last segment unless the path ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: self.base_url.to_string(),
                reason: format!("cannot join '{}': {}", path, e),
            })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::RemoteError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }

    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint("health")?;
        let response = self.client.get(url).send().await?;
        Self::decode(response).await
    }

    pub async fn guess(&self) -> Result<Species> {
        let url = self.endpoint("guess")?;
        let response = self.client.get(url).send().await?;
        Ok(Self::decode::<SpeciesResponse>(response).await?.species)
    }

    /// Values are sent as-is; range checks happen on the server.
    pub async fn predict(&self, bill_length_mm: f64, bill_depth_mm: f64) -> Result<Species> {
        let url = self.endpoint("predict")?;
        tracing::debug!("Making API request to: {}", url);

        let body = serde_json::json!({
            BILL_LENGTH_MM: bill_length_mm,
            BILL_DEPTH_MM: bill_depth_mm,
        });
        let response = self.client.post(url).json(&body).send().await?;
        Ok(Self::decode::<SpeciesResponse>(response).await?.species)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(PredictionClient::new("ftp://example.com").is_err());
        assert!(PredictionClient::new("not a url").is_err());
    }

    #[test]
    fn test_endpoint_joins_path() {
        let client = PredictionClient::new("http://localhost:8000/").unwrap();
        assert_eq!(
            client.endpoint("predict").unwrap().as_str(),
            "http://localhost:8000/predict"
        );

        let client = PredictionClient::new("http://localhost:8000").unwrap();
        assert_eq!(
            client.endpoint("guess").unwrap().as_str(),
            "http://localhost:8000/guess"
        );

        let client = PredictionClient::new("http://host/api").unwrap();
        assert_eq!(
            client.endpoint("predict").unwrap().as_str(),
            "http://host/api/predict"
        );
    }
}
