//! Classification orchestrator
//!
//! Stage order per document:
//! 1. Content type (fatal on error)
//! 2. Quality (fatal)
//! 3. Topics (fatal)
//! 4. Reputation read (fatal) and best-effort update
//! 5. Sidecar fan-out through the routing table
//! 6. Location (best-effort)
//! 7. Result assembly
//!
//! Deadlines are checked between stages; a cancelled classification
//! yields an error, never a partial result.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;

use newsflow_classify::{
    ContentTypeClassifier, LocationClassifier, QualityConfig, QualityScorer, TopicClassifier,
};
use newsflow_core::{ClassificationMethod, ClassificationResult, RawDocument};
use newsflow_reputation::ReputationScorer;
use newsflow_rules::RuleEngine;
use newsflow_sidecars::{
    AnishinaabeSidecar, CoforgeSidecar, CrimeSidecar, EntertainmentSidecar, MiningSidecar,
};

use crate::routing::RoutingTable;
use crate::PipelineError;

/// Domain sidecar instances available to the orchestrator
///
/// A sidecar listed in the routing table but absent here is skipped with
/// a single warning at construction time.
#[derive(Default)]
pub struct SidecarSet {
    pub crime: Option<Arc<CrimeSidecar>>,
    pub mining: Option<Arc<MiningSidecar>>,
    pub coforge: Option<Arc<CoforgeSidecar>>,
    pub entertainment: Option<Arc<EntertainmentSidecar>>,
    pub anishinaabe: Option<Arc<AnishinaabeSidecar>>,
}

impl SidecarSet {
    fn has(&self, name: &str) -> bool {
        match name {
            "crime" => self.crime.is_some(),
            "mining" => self.mining.is_some(),
            "coforge" => self.coforge.is_some(),
            "entertainment" => self.entertainment.is_some(),
            "anishinaabe" => self.anishinaabe.is_some(),
            // Location is built in, never nil
            "location" => true,
            _ => false,
        }
    }
}

/// Orchestrator tuning
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub classifier_version: String,
    /// Write reputation observations after each classification
    pub update_reputation: bool,
    pub quality: QualityConfig,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            classifier_version: env!("CARGO_PKG_VERSION").to_string(),
            update_reputation: true,
            quality: QualityConfig::default(),
        }
    }
}

/// Fixed-order classification pipeline
pub struct ClassificationOrchestrator {
    content_type: ContentTypeClassifier,
    quality: QualityScorer,
    topics: TopicClassifier,
    location: LocationClassifier,
    reputation: Arc<ReputationScorer>,
    sidecars: SidecarSet,
    routing: RoutingTable,
    config: OrchestratorConfig,
}

impl ClassificationOrchestrator {
    pub fn new(
        rule_engine: Arc<RuleEngine>,
        reputation: Arc<ReputationScorer>,
        sidecars: SidecarSet,
        routing: RoutingTable,
        config: OrchestratorConfig,
    ) -> Self {
        for name in routing.routed_names() {
            if !sidecars.has(name) {
                tracing::warn!(
                    sidecar = name,
                    "Routing table lists a sidecar with no configured instance; it will be skipped"
                );
            }
        }
        Self {
            content_type: ContentTypeClassifier::new(),
            quality: QualityScorer::new(config.quality.clone()),
            topics: TopicClassifier::with_engine(rule_engine),
            location: LocationClassifier::new(),
            reputation,
            sidecars,
            routing,
            config,
        }
    }

    /// Classify one document with no deadline
    pub async fn classify(
        &self,
        doc: &RawDocument,
    ) -> Result<ClassificationResult, PipelineError> {
        self.classify_with_deadline(doc, None).await
    }

    /// Classify one document, honoring an optional deadline
    pub async fn classify_with_deadline(
        &self,
        doc: &RawDocument,
        deadline: Option<Instant>,
    ) -> Result<ClassificationResult, PipelineError> {
        if doc.id.is_empty() {
            return Err(PipelineError::InvalidDocument(
                "document id is empty".to_string(),
            ));
        }
        let started = Instant::now();

        // Stages 1-3: deterministic classifiers
        check_deadline(deadline)?;
        let type_verdict = self.content_type.classify(doc);
        let (quality_score, quality_factors) = self.quality.score(doc);
        let topic_verdict = self.topics.classify(&doc.title, &doc.raw_text);

        // Stage 4: reputation read (fatal), then best-effort update
        check_deadline(deadline)?;
        let (source_reputation, source_category, source_rank) = self
            .reputation
            .read(&doc.source_name)
            .await
            .map_err(|source| PipelineError::Stage {
                stage: "reputation",
                source,
            })?;
        if self.config.update_reputation {
            if let Err(error) = self
                .reputation
                .record_observation(&doc.source_name, quality_score, false)
                .await
            {
                tracing::warn!(
                    content_id = %doc.id,
                    source = %doc.source_name,
                    error = %error,
                    "Reputation update failed; continuing"
                );
            }
        }

        // Stage 5: sidecar fan-out by routing table
        let subtype = doc.detected_content_type().unwrap_or("");
        let content_type = type_verdict.content_type;
        let routed: &[String] = match self.routing.lookup(content_type.as_str(), subtype) {
            Some(routed) => routed,
            None => {
                tracing::warn!(
                    content_id = %doc.id,
                    content_type = %content_type,
                    subtype,
                    "No routing entry for content type; running no sidecars"
                );
                &[]
            }
        };

        let mut crime = None;
        let mut mining = None;
        let mut coforge = None;
        let mut entertainment = None;
        let mut anishinaabe = None;
        let mut location = None;

        for name in routed {
            check_deadline(deadline)?;
            match name.as_str() {
                "crime" => {
                    if let Some(sidecar) = &self.sidecars.crime {
                        crime =
                            Some(sidecar.classify(doc, content_type.as_str(), deadline).await);
                    }
                }
                "mining" => {
                    if let Some(sidecar) = &self.sidecars.mining {
                        mining =
                            Some(sidecar.classify(doc, content_type.as_str(), deadline).await);
                    }
                }
                "coforge" => {
                    if let Some(sidecar) = &self.sidecars.coforge {
                        coforge =
                            Some(sidecar.classify(doc, content_type.as_str(), deadline).await);
                    }
                }
                "entertainment" => {
                    if let Some(sidecar) = &self.sidecars.entertainment {
                        entertainment =
                            Some(sidecar.classify(doc, content_type.as_str(), deadline).await);
                    }
                }
                "anishinaabe" => {
                    if let Some(sidecar) = &self.sidecars.anishinaabe {
                        anishinaabe =
                            Some(sidecar.classify(doc, content_type.as_str(), deadline).await);
                    }
                }
                // Stage 6: location, best-effort, gated by routing like
                // the other sidecars
                "location" => {
                    location = Some(self.location.classify(&doc.title, &doc.raw_text));
                }
                _ => {}
            }
        }

        // Stage 7: assemble
        check_deadline(deadline)?;
        let topic_confidence = topic_verdict.top_score().unwrap_or(0.3);
        let confidence =
            (type_verdict.confidence + quality_score as f32 / 100.0 + topic_confidence) / 3.0;

        let ml_consulted = crime.as_ref().is_some_and(|r| r.ml_confidence.is_some())
            || mining.as_ref().is_some_and(|r| r.ml_confidence.is_some())
            || coforge.as_ref().is_some_and(|r| r.ml_confidence.is_some())
            || entertainment
                .as_ref()
                .is_some_and(|r| r.ml_confidence.is_some())
            || anishinaabe
                .as_ref()
                .is_some_and(|r| r.ml_confidence.is_some());
        let classification_method = if ml_consulted {
            ClassificationMethod::Hybrid
        } else {
            ClassificationMethod::RuleBased
        };

        let model_version = crime
            .as_ref()
            .and_then(|r| r.model_version.clone())
            .or_else(|| mining.as_ref().and_then(|r| r.model_version.clone()))
            .or_else(|| coforge.as_ref().and_then(|r| r.model_version.clone()))
            .or_else(|| entertainment.as_ref().and_then(|r| r.model_version.clone()))
            .or_else(|| anishinaabe.as_ref().and_then(|r| r.model_version.clone()));

        let processing_time_ms = started.elapsed().as_millis() as u64;
        metrics::counter!("classifier_documents_total").increment(1);
        metrics::histogram!("classifier_processing_time_ms").record(processing_time_ms as f64);

        Ok(ClassificationResult {
            content_id: doc.id.clone(),
            content_type,
            content_subtype: subtype.to_string(),
            type_confidence: type_verdict.confidence,
            type_method: type_verdict.method.to_string(),
            quality_score,
            quality_factors,
            topics: topic_verdict.topics,
            topic_scores: topic_verdict.scores,
            source_reputation,
            source_category,
            source_rank,
            classifier_version: self.config.classifier_version.clone(),
            classification_method,
            model_version,
            confidence,
            processing_time_ms,
            classified_at: Utc::now(),
            crime,
            mining,
            coforge,
            entertainment,
            anishinaabe,
            location,
        })
    }

    /// Classify a batch, skipping failed items
    ///
    /// The returned list aligns with the input; failed entries are `None`.
    pub async fn classify_batch(
        &self,
        docs: &[RawDocument],
        deadline: Option<Instant>,
    ) -> Vec<Option<ClassificationResult>> {
        let mut results = Vec::with_capacity(docs.len());
        for doc in docs {
            match self.classify_with_deadline(doc, deadline).await {
                Ok(result) => results.push(Some(result)),
                Err(error) => {
                    tracing::warn!(
                        content_id = %doc.id,
                        error = %error,
                        "Skipping document that failed classification"
                    );
                    results.push(None);
                }
            }
        }
        results
    }
}

fn check_deadline(deadline: Option<Instant>) -> Result<(), PipelineError> {
    match deadline {
        Some(deadline) if Instant::now() >= deadline => Err(PipelineError::Cancelled),
        _ => Ok(()),
    }
}
