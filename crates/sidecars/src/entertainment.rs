//! Entertainment sidecar
//!
//! Shows, festivals, releases, and the local arts scene. Category tags
//! come from the entertainment ML sidecar; strong core verdicts are
//! eligible for the homepage strip.

use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;

use newsflow_core::{EntertainmentRelevance, EntertainmentResult, MlClassifier, RawDocument};

use crate::common::{run_hybrid, truncate_body, RelevanceRules};
use crate::decision::homepage_eligible;
use crate::telemetry::{log_ml_call, MlCallRecord, MlOutcome};

static RULES: Lazy<RelevanceRules> = Lazy::new(|| {
    RelevanceRules::new(
        &[
            r"\b(concerts?|music festival|film festival|theatre premiere|album release|box office|live music|comedy (?:show|night)|art exhibit(?:ion)?)\b",
            r"\b(headliner|sold.?out show|on stage|opening night)\b",
        ],
        &[
            r"\b(entertainment|celebrity|musicians?|band|films?|movies?|arts scene|gallery)\b",
        ],
    )
});

/// Entertainment sidecar: rule tables plus optional ML merge
pub struct EntertainmentSidecar {
    ml: Option<Arc<dyn MlClassifier>>,
}

impl EntertainmentSidecar {
    pub fn new(ml: Option<Arc<dyn MlClassifier>>) -> Self {
        Self { ml }
    }

    pub async fn classify(
        &self,
        doc: &RawDocument,
        content_type: &str,
        deadline: Option<Instant>,
    ) -> EntertainmentResult {
        let started = Instant::now();
        let body = truncate_body(&doc.raw_text);
        let text = format!("{} {}", doc.title.to_lowercase(), body.to_lowercase());
        let rule = RULES.evaluate(&text);

        let outcome = run_hybrid(self.ml.as_ref(), rule, &doc.title, body, deadline).await;
        let decision = outcome.decision;
        let latency_ms = started.elapsed().as_millis() as u64;

        let result = EntertainmentResult {
            relevance: EntertainmentRelevance::from_band(decision.band),
            confidence: decision.confidence,
            categories: outcome
                .response
                .as_ref()
                .and_then(|r| r.categories.clone())
                .unwrap_or_default(),
            homepage_eligible: homepage_eligible(&decision, rule.confidence),
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
                sidecar: "entertainment",
                content_id: &doc.id,
                content_type,
                source: &doc.source_name,
                title: &doc.title,
                relevance: result.relevance.as_str(),
                final_confidence: result.confidence,
                ml_confidence: result.ml_confidence,
                rule_label: EntertainmentRelevance::from_band(rule.band).as_str(),
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
