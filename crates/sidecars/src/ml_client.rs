//! HTTP client for ML sidecar services
//!
//! Contract: `POST {base_url}/classify` with `{"title", "body"}` returns a
//! relevance label and confidence plus per-domain extras; `GET /health`
//! answers 200 when the model is ready. Any non-200 response, transport
//! failure, or decode failure is classified into the ML error taxonomy.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use newsflow_core::{MlClassifier, MlError, MlErrorKind, MlResponse};

/// Configuration for one ML sidecar client
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Sidecar name for logs and metrics (`crime`, `mining`, ...)
    pub name: String,
    /// Service base URL, e.g. `http://crime-classifier:8000`
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl MlClientConfig {
    pub fn new(name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            timeout: Duration::from_secs(5),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Reqwest-backed ML sidecar client
pub struct HttpMlClassifier {
    config: MlClientConfig,
    client: Client,
}

impl HttpMlClassifier {
    pub fn new(config: MlClientConfig) -> Result<Self, MlError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MlError::new(MlErrorKind::Unknown, e.to_string()))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl MlClassifier for HttpMlClassifier {
    async fn classify(&self, title: &str, body: &str) -> Result<MlResponse, MlError> {
        let request = ClassifyRequest { title, body };
        let response = self
            .client
            .post(format!("{}/classify", self.config.base_url))
            .json(&request)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if status.is_server_error() {
            return Err(MlError::new(
                MlErrorKind::Http5xx,
                format!("HTTP {}", status),
            ));
        }
        if status.is_client_error() {
            return Err(MlError::new(
                MlErrorKind::Http4xx,
                format!("HTTP {}", status),
            ));
        }

        response
            .json::<MlResponse>()
            .await
            .map_err(|e| MlError::new(MlErrorKind::Decode, e.to_string()))
    }

    async fn health(&self) -> bool {
        match self
            .client
            .get(format!("{}/health", self.config.base_url))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

/// Map a reqwest failure onto the error taxonomy
fn classify_transport_error(err: reqwest::Error) -> MlError {
    let kind = if err.is_timeout() {
        MlErrorKind::Timeout
    } else if err.is_connect() {
        MlErrorKind::Connection
    } else if err.is_decode() {
        MlErrorKind::Decode
    } else {
        MlErrorKind::Unknown
    };
    MlError::new(kind, err.to_string())
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    title: &'a str,
    body: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ClassifyRequest {
            title: "Mine expands",
            body: "The smelter will add a shift.",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["title"], "Mine expands");
        assert_eq!(json["body"], "The smelter will add a shift.");
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "relevance": "core_mining",
            "relevance_confidence": 0.93,
            "processing_time_ms": 41,
            "model_version": "mining-v2",
            "commodities": ["nickel", "copper"],
            "mining_stage": "production"
        }"#;
        let response: MlResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.relevance, "core_mining");
        assert!((response.relevance_confidence - 0.93).abs() < 1e-6);
        assert_eq!(response.model_version.as_deref(), Some("mining-v2"));
        assert_eq!(
            response.commodities.as_deref(),
            Some(["nickel".to_string(), "copper".to_string()].as_slice())
        );
    }

    #[test]
    fn test_minimal_response_parses() {
        // Fields beyond the two required ones are optional
        let response: MlResponse =
            serde_json::from_str(r#"{"relevance": "not_crime", "relevance_confidence": 0.2}"#)
                .unwrap();
        assert_eq!(response.relevance, "not_crime");
        assert!(response.model_version.is_none());
    }

    #[test]
    fn test_config_builder() {
        let config = MlClientConfig::new("crime", "http://localhost:8001")
            .with_timeout(Duration::from_secs(2));
        assert_eq!(config.name, "crime");
        assert_eq!(config.timeout, Duration::from_secs(2));
    }
}
