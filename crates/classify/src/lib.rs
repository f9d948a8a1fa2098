//! Primary document classifiers
//!
//! The deterministic, CPU-only stages of the pipeline:
//! - Content type (URL exclusions, Open Graph, listing-page patterns, heuristics)
//! - Quality scoring (word count, metadata, richness, readability)
//! - Topic classification (keyword rules via the rule engine or a token scorer)
//! - Location extraction (zoned gazetteer scoring with a dominance rule)

pub mod content_type;
pub mod location;
pub mod quality;
pub mod topic;

pub use content_type::{ContentTypeClassifier, TypeVerdict};
pub use location::LocationClassifier;
pub use quality::{QualityConfig, QualityScorer};
pub use topic::{TopicClassifier, TopicVerdict};
