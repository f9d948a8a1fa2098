//! Source reputation records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rolling reputation state for one source
///
/// Created on first sight with the configured default score and category
/// `unknown`; updated after every classification when reputation updates
/// are enabled; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceReputationRecord {
    pub source_name: String,
    pub category: String,
    /// 0..=100
    pub reputation_score: u8,
    pub total_articles: u64,
    /// Rolling average quality of classified articles
    pub avg_quality: f64,
    pub spam_count: u64,
    #[serde(default)]
    pub last_classified_at: Option<DateTime<Utc>>,
}

impl SourceReputationRecord {
    /// Fresh record for a source seen for the first time
    pub fn new(source_name: impl Into<String>, default_score: u8) -> Self {
        Self {
            source_name: source_name.into(),
            category: "unknown".to_string(),
            reputation_score: default_score,
            total_articles: 0,
            avg_quality: 0.0,
            spam_count: 0,
            last_classified_at: None,
        }
    }

    /// Fraction of classified articles flagged as spam
    pub fn spam_ratio(&self) -> f64 {
        if self.total_articles == 0 {
            0.0
        } else {
            self.spam_count as f64 / self.total_articles as f64
        }
    }
}
