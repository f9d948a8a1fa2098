//! Classification pipeline
//!
//! Runs the fixed-order classification stages for one document, fans out
//! to domain sidecars through the routing table, and assembles the final
//! result record. Batch classification skips failed items instead of
//! failing the batch.

pub mod orchestrator;
pub mod routing;

pub use orchestrator::{ClassificationOrchestrator, OrchestratorConfig, SidecarSet};
pub use routing::{RoutingTable, KNOWN_SIDECARS};

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("{stage} stage failed: {source}")]
    Stage {
        stage: &'static str,
        #[source]
        source: newsflow_core::Error,
    },

    #[error("Classification cancelled: deadline exceeded")]
    Cancelled,
}

impl From<PipelineError> for newsflow_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Cancelled => newsflow_core::Error::Cancelled,
            PipelineError::InvalidDocument(msg) => newsflow_core::Error::InvalidDocument(msg),
            other => newsflow_core::Error::Classification(other.to_string()),
        }
    }
}
