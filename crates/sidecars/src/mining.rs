//! Mining sidecar
//!
//! Northern-industry beat: mine operations, exploration results, and
//! commodity production. Domain fields (stage, commodities) come from
//! the mining ML sidecar.

use once_cell::sync::Lazy;
use std::sync::Arc;
use std::time::Instant;

use newsflow_core::{MiningRelevance, MiningResult, MlClassifier, RawDocument};

use crate::common::{run_hybrid, truncate_body, RelevanceRules};
use crate::telemetry::{log_ml_call, MlCallRecord, MlOutcome};

static RULES: Lazy<RelevanceRules> = Lazy::new(|| {
    RelevanceRules::new(
        &[
            r"\b(mining operations?|mine site|open pit|underground mine|ore body|drill results?|mineral exploration|tailings|smelter|concentrator|headframe|mill feed)\b",
            r"\b(nickel|copper|gold|palladium|cobalt|lithium|zinc)\b.{0,60}\b(mine|mines|mining|deposit|production|output)\b",
            r"\b(shaft sinking|ramp development|feasibility study)\b.{0,60}\b(mine|project|deposit)\b",
        ],
        &[
            r"\b(mining|miners?|prospecting|claim staking|mineral claims?)\b",
            r"\b(commodity prices|metals market|ore shipments?)\b",
        ],
    )
});

/// Mining sidecar: rule tables plus optional ML merge
pub struct MiningSidecar {
    ml: Option<Arc<dyn MlClassifier>>,
}

impl MiningSidecar {
    pub fn new(ml: Option<Arc<dyn MlClassifier>>) -> Self {
        Self { ml }
    }

    pub async fn classify(
        &self,
        doc: &RawDocument,
        content_type: &str,
        deadline: Option<Instant>,
    ) -> MiningResult {
        let started = Instant::now();
        let body = truncate_body(&doc.raw_text);
        let text = format!("{} {}", doc.title.to_lowercase(), body.to_lowercase());
        let rule = RULES.evaluate(&text);

        let outcome = run_hybrid(self.ml.as_ref(), rule, &doc.title, body, deadline).await;
        let decision = outcome.decision;
        let latency_ms = started.elapsed().as_millis() as u64;

        let result = MiningResult {
            relevance: MiningRelevance::from_band(decision.band),
            confidence: decision.confidence,
            commodities: outcome
                .response
                .as_ref()
                .and_then(|r| r.commodities.clone())
                .unwrap_or_default(),
            mining_stage: outcome.response.as_ref().and_then(|r| r.mining_stage.clone()),
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
                sidecar: "mining",
                content_id: &doc.id,
                content_type,
                source: &doc.source_name,
                title: &doc.title,
                relevance: result.relevance.as_str(),
                final_confidence: result.confidence,
                ml_confidence: result.ml_confidence,
                rule_label: MiningRelevance::from_band(rule.band).as_str(),
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

#[cfg(test)]
mod tests {
    use super::*;
    use newsflow_core::DecisionPath;

    fn doc(title: &str, body: &str) -> RawDocument {
        RawDocument::new("d1", "example", "https://example.com/story", title, body)
    }

    #[tokio::test]
    async fn test_core_mining_story() {
        let sidecar = MiningSidecar::new(None);
        let result = sidecar
            .classify(
                &doc(
                    "Drill results extend ore body at Levack",
                    "The underground mine will add a second headframe.",
                ),
                "article",
                None,
            )
            .await;
        assert_eq!(result.relevance, MiningRelevance::CoreMining);
        assert!((result.confidence - 0.90).abs() < 1e-6);
        assert_eq!(result.decision_path, DecisionPath::RulesOnly);
    }

    #[tokio::test]
    async fn test_peripheral_mining_mention() {
        let sidecar = MiningSidecar::new(None);
        let result = sidecar
            .classify(
                &doc(
                    "Council debates road upgrades",
                    "Trucking firms serving local miners asked for the route.",
                ),
                "article",
                None,
            )
            .await;
        assert_eq!(result.relevance, MiningRelevance::PeripheralMining);
        assert!((result.confidence - 0.70).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_unrelated_story() {
        let sidecar = MiningSidecar::new(None);
        let result = sidecar
            .classify(
                &doc("Library expands weekend hours", "Patrons asked for more time."),
                "article",
                None,
            )
            .await;
        assert_eq!(result.relevance, MiningRelevance::NotMining);
        assert!(result.commodities.is_empty());
        assert!(result.mining_stage.is_none());
    }

    #[tokio::test]
    async fn test_commodity_plus_production_is_core() {
        let sidecar = MiningSidecar::new(None);
        let result = sidecar
            .classify(
                &doc(
                    "Nickel production rebounds in third quarter",
                    "Output rose at both local operations.",
                ),
                "article",
                None,
            )
            .await;
        assert_eq!(result.relevance, MiningRelevance::CoreMining);
    }
}
