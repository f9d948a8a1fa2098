//! Classification result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::location::LocationResult;
use crate::sidecar::{
    AnishinaabeResult, CoforgeResult, CrimeResult, EntertainmentResult, MiningResult,
};

/// Primary content type of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Page,
    Video,
    Image,
    Job,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Page => "page",
            ContentType::Video => "video",
            ContentType::Image => "image",
            ContentType::Job => "job",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the final classification was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMethod {
    RuleBased,
    MlModel,
    Hybrid,
}

/// Source reputation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceRank {
    Trusted,
    Moderate,
    Low,
    Spam,
}

impl SourceRank {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceRank::Trusted => "trusted",
            SourceRank::Moderate => "moderate",
            SourceRank::Low => "low",
            SourceRank::Spam => "spam",
        }
    }
}

/// One scored quality component (word count, metadata, richness, readability)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFactor {
    /// Points awarded for this component
    pub score: u8,
    /// Maximum points this component can award
    pub max: u8,
    /// Named detail flags explaining the score
    #[serde(default)]
    pub details: BTreeMap<String, bool>,
}

impl QualityFactor {
    pub fn new(score: u8) -> Self {
        Self {
            score,
            max: 25,
            details: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, name: &str, value: bool) -> Self {
        self.details.insert(name.to_string(), value);
        self
    }
}

/// Factor breakdown behind a quality score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityFactors {
    pub word_count: QualityFactor,
    pub metadata_completeness: QualityFactor,
    pub content_richness: QualityFactor,
    pub readability: QualityFactor,
}

impl QualityFactors {
    /// Sum of all component scores, clamped to 0..=100
    pub fn total(&self) -> u8 {
        let sum = self.word_count.score as u16
            + self.metadata_completeness.score as u16
            + self.content_richness.score as u16
            + self.readability.score as u16;
        sum.min(100) as u8
    }
}

/// Full classification output for one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub content_id: String,
    pub content_type: ContentType,
    /// Subtype such as `event` or `blotter`; empty when none was detected
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_subtype: String,
    pub type_confidence: f32,
    pub type_method: String,
    /// 0..=100
    pub quality_score: u8,
    pub quality_factors: QualityFactors,
    /// Ordered unique topic list, highest score first
    pub topics: Vec<String>,
    pub topic_scores: BTreeMap<String, f32>,
    /// 0..=100
    pub source_reputation: u8,
    pub source_category: String,
    pub source_rank: SourceRank,
    pub classifier_version: String,
    pub classification_method: ClassificationMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
    /// Overall confidence, 0..=1
    pub confidence: f32,
    pub processing_time_ms: u64,
    pub classified_at: DateTime<Utc>,

    // Optional domain sidecar results
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crime: Option<CrimeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mining: Option<MiningResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coforge: Option<CoforgeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entertainment: Option<EntertainmentResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anishinaabe: Option<AnishinaabeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationResult>,
}
