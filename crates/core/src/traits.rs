//! Collaborator traits
//!
//! Seams toward the external systems the classifier depends on: the
//! source-reputation store and the per-domain ML sidecar services. Both
//! are injected so the pipeline can run against in-memory or stub
//! implementations in tests.

use async_trait::async_trait;

use crate::error::{MlError, Result};
use crate::reputation::SourceReputationRecord;

/// Durable, concurrency-safe store for source reputation records
#[async_trait]
pub trait ReputationStore: Send + Sync {
    /// Fetch the record for a source, creating it with the default score
    /// on first sight
    async fn get_or_create(
        &self,
        source_name: &str,
        default_score: u8,
    ) -> Result<SourceReputationRecord>;

    /// Persist an updated record
    async fn update(&self, record: &SourceReputationRecord) -> Result<()>;
}

/// Response from an ML sidecar `/classify` call
///
/// `relevance` carries the domain label (`core_mining`, `not_crime`, ...).
/// The per-domain extras are optional; each sidecar copies the fields it
/// understands into its own result.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct MlResponse {
    #[serde(default)]
    pub relevance: String,
    #[serde(default)]
    pub relevance_confidence: f32,
    #[serde(default)]
    pub processing_time_ms: Option<u64>,
    #[serde(default)]
    pub model_version: Option<String>,

    // Per-domain extras
    #[serde(default)]
    pub crime_types: Option<Vec<String>>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub commodities: Option<Vec<String>>,
    #[serde(default)]
    pub mining_stage: Option<String>,
    #[serde(default)]
    pub audience: Option<Vec<String>>,
    #[serde(default)]
    pub topics: Option<Vec<String>>,
    #[serde(default)]
    pub industries: Option<Vec<String>>,
}

/// One domain's ML sidecar service
///
/// Implementations must honor the caller's deadline; ML verdicts are
/// advisory and the pipeline survives any failure here.
#[async_trait]
pub trait MlClassifier: Send + Sync {
    /// Classify a (title, truncated body) pair
    async fn classify(&self, title: &str, body: &str)
        -> std::result::Result<MlResponse, MlError>;

    /// Whether the sidecar service is ready to serve
    async fn health(&self) -> bool;

    /// Sidecar name for logs and metrics (`crime`, `mining`, ...)
    fn name(&self) -> &str;
}
