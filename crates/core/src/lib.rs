//! Core types and traits for the newsflow classification service
//!
//! This crate provides foundational types used across all other crates:
//! - Raw crawled documents and classification results
//! - Classification rules (keyword-based, hot-reloadable)
//! - Domain sidecar result types (crime, mining, coforge, entertainment, anishinaabe)
//! - Location results
//! - Source reputation records
//! - Collaborator traits for pluggable backends (reputation store, ML sidecars)
//! - Error types

pub mod document;
pub mod error;
pub mod location;
pub mod reputation;
pub mod result;
pub mod rule;
pub mod sidecar;
pub mod traits;

pub use document::{ClassificationStatus, RawDocument};
pub use error::{Error, MlError, MlErrorKind, Result};
pub use location::{LocationResult, LocationSpecificity};
pub use reputation::SourceReputationRecord;
pub use result::{
    ClassificationMethod, ClassificationResult, ContentType, QualityFactor, QualityFactors,
    SourceRank,
};
pub use rule::{ClassificationRule, RuleType};
pub use sidecar::{
    AnishinaabeRelevance, AnishinaabeResult, CoforgeRelevance, CoforgeResult, CrimeRelevance,
    CrimeResult, DecisionPath, EntertainmentRelevance, EntertainmentResult, MiningRelevance,
    MiningResult, Relevance,
};
pub use traits::{MlClassifier, MlResponse, ReputationStore};
