//! Raw crawled documents as handed over by the crawler

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lifecycle state of a document in the classification queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationStatus {
    /// Waiting for classification
    #[default]
    Pending,
    /// Successfully classified
    Classified,
    /// Classification failed and was dead-lettered
    Failed,
}

/// A raw document pulled from the content store
///
/// The `id` is non-empty and stable across reprocessing runs so that
/// classification stays idempotent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDocument {
    /// Unique, stable document id
    pub id: String,
    /// Name of the source (publisher) this document was crawled from
    pub source_name: String,
    /// Canonical crawl URL
    pub url: String,
    /// Document title
    pub title: String,
    /// Extracted plain text
    pub raw_text: String,
    /// Raw HTML, when the crawler kept it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_html: Option<String>,

    // Open Graph fields
    #[serde(default)]
    pub og_type: String,
    #[serde(default)]
    pub og_title: String,
    #[serde(default)]
    pub og_description: String,
    #[serde(default)]
    pub og_image: String,
    #[serde(default)]
    pub og_url: String,

    // Meta tags
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub canonical_url: String,

    /// When the crawler fetched this document
    pub crawled_at: DateTime<Utc>,
    /// Publication timestamp, when the crawler could extract one
    #[serde(default)]
    pub published_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub classification_status: ClassificationStatus,
    #[serde(default)]
    pub classified_at: Option<DateTime<Utc>>,

    /// Word count computed at crawl time
    #[serde(default)]
    pub word_count: u32,

    /// Free-form metadata bag. Recognized key: `detected_content_type`
    /// (subtype hint such as `event`, `blotter`, `report`).
    #[serde(default)]
    pub meta: HashMap<String, serde_json::Value>,
}

impl RawDocument {
    /// Minimal constructor for building documents in code (tests, fixtures)
    pub fn new(
        id: impl Into<String>,
        source_name: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        let word_count = raw_text.split_whitespace().count() as u32;
        Self {
            id: id.into(),
            source_name: source_name.into(),
            url: url.into(),
            title: title.into(),
            raw_text,
            raw_html: None,
            og_type: String::new(),
            og_title: String::new(),
            og_description: String::new(),
            og_image: String::new(),
            og_url: String::new(),
            meta_description: String::new(),
            meta_keywords: String::new(),
            canonical_url: String::new(),
            crawled_at: Utc::now(),
            published_date: None,
            classification_status: ClassificationStatus::Pending,
            classified_at: None,
            word_count,
            meta: HashMap::new(),
        }
    }

    /// Subtype hint from the metadata bag (`detected_content_type`)
    pub fn detected_content_type(&self) -> Option<&str> {
        self.meta
            .get("detected_content_type")
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Best available description: meta description, falling back to OG
    pub fn description(&self) -> &str {
        if !self.meta_description.is_empty() {
            &self.meta_description
        } else {
            &self.og_description
        }
    }

    /// Whether either description field is populated
    pub fn has_description(&self) -> bool {
        !self.meta_description.is_empty() || !self.og_description.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_from_text() {
        let doc = RawDocument::new("d1", "src", "https://example.com/a", "Title", "one two three");
        assert_eq!(doc.word_count, 3);
    }

    #[test]
    fn test_detected_content_type() {
        let mut doc = RawDocument::new("d1", "src", "https://example.com/a", "Title", "body");
        assert_eq!(doc.detected_content_type(), None);

        doc.meta.insert(
            "detected_content_type".to_string(),
            serde_json::json!("event"),
        );
        assert_eq!(doc.detected_content_type(), Some("event"));

        doc.meta
            .insert("detected_content_type".to_string(), serde_json::json!(""));
        assert_eq!(doc.detected_content_type(), None);
    }

    #[test]
    fn test_description_fallback() {
        let mut doc = RawDocument::new("d1", "src", "https://example.com/a", "Title", "body");
        assert_eq!(doc.description(), "");
        doc.og_description = "og".to_string();
        assert_eq!(doc.description(), "og");
        doc.meta_description = "meta".to_string();
        assert_eq!(doc.description(), "meta");
    }

    #[test]
    fn test_status_roundtrip() {
        let json = serde_json::to_string(&ClassificationStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let status: ClassificationStatus = serde_json::from_str("\"classified\"").unwrap();
        assert_eq!(status, ClassificationStatus::Classified);
    }
}
