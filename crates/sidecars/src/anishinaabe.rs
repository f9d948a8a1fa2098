//! Anishinaabe cultural-relevance sidecar
//!
//! Surfaces coverage of Anishinaabe communities, language, and
//! governance so it can be routed to dedicated sections. Topic tags
//! propagate from the ML sidecar.

use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;

use newsflow_core::{AnishinaabeRelevance, AnishinaabeResult, MlClassifier, RawDocument};

use crate::common::{run_hybrid, truncate_body, RelevanceRules};
use crate::telemetry::{log_ml_call, MlCallRecord, MlOutcome};

static RULES: Lazy<RelevanceRules> = Lazy::new(|| {
    RelevanceRules::new(
        &[
            r"\b(anishinaabe|anishinabek|ojibwe|ojibway|odawa|potawatomi)\b",
            r"\b(first nations?|powwow|pow.?wow|treaty rights|land claims?|residential schools?)\b",
            r"\b(indigenous (?:language|education|governance)|anishinaabemowin)\b",
        ],
        &[
            r"\b(indigenous|m[ée]tis|inuit|reconciliation|land acknowledgements?|elders?)\b",
        ],
    )
});

/// Anishinaabe sidecar: rule tables plus optional ML merge
pub struct AnishinaabeSidecar {
    ml: Option<Arc<dyn MlClassifier>>,
}

impl AnishinaabeSidecar {
    pub fn new(ml: Option<Arc<dyn MlClassifier>>) -> Self {
        Self { ml }
    }

    pub async fn classify(
        &self,
        doc: &RawDocument,
        content_type: &str,
        deadline: Option<Instant>,
    ) -> AnishinaabeResult {
        let started = Instant::now();
        let body = truncate_body(&doc.raw_text);
        let text = format!("{} {}", doc.title.to_lowercase(), body.to_lowercase());
        let rule = RULES.evaluate(&text);

        let outcome = run_hybrid(self.ml.as_ref(), rule, &doc.title, body, deadline).await;
        let decision = outcome.decision;
        let latency_ms = started.elapsed().as_millis() as u64;

        let result = AnishinaabeResult {
            relevance: AnishinaabeRelevance::from_band(decision.band),
            confidence: decision.confidence,
            topics: outcome
                .response
                .as_ref()
                .and_then(|r| r.topics.clone())
                .unwrap_or_default(),
            review_required: decision.review_required,
            model_version: outcome
                .response
                .as_ref()
                .and_then(|r| r.model_version.clone()),
            decision_path: decision.path,
            ml_confidence: outcome
                .response
                .as_ref()
                .filter(|_| !outcome.nil_result)
                .map(|r| r.relevance_confidence),
            processing_time_ms: latency_ms,
        };

        if self.ml.is_some() {
            let record = MlCallRecord {
                sidecar: "anishinaabe",
                content_id: &doc.id,
                content_type,
                source: &doc.source_name,
                title: &doc.title,
                relevance: result.relevance.as_str(),
                final_confidence: result.confidence,
                ml_confidence: result.ml_confidence,
                rule_label: AnishinaabeRelevance::from_band(rule.band).as_str(),
                decision_path: result.decision_path,
                latency_ms,
                ml_time_ms: outcome.response.as_ref().and_then(|r| r.processing_time_ms),
                model_version: result.model_version.as_deref(),
            };
            let log_outcome = if let Some(error) = &outcome.error {
                MlOutcome::Error {
                    kind: error.kind,
                    detail: &error.detail,
                }
            } else if outcome.nil_result {
                MlOutcome::NilResult
            } else {
                MlOutcome::Success
            };
            log_ml_call(&record, log_outcome);
        }

        result
    }
}
