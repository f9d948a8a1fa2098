//! Structured telemetry for ML sidecar calls
//!
//! One structured record per ML call, covering the merged outcome and the
//! raw ML verdict, so a single log line answers "what did the model say,
//! what did the rules say, and which branch won".

use newsflow_core::{DecisionPath, MlErrorKind};

/// Words kept in the logged title excerpt
const EXCERPT_WORDS: usize = 10;

/// Field set logged for every ML sidecar call
pub struct MlCallRecord<'a> {
    pub sidecar: &'a str,
    pub content_id: &'a str,
    pub content_type: &'a str,
    pub source: &'a str,
    pub title: &'a str,
    /// Final domain relevance label after merging
    pub relevance: &'a str,
    pub final_confidence: f32,
    /// Raw ML confidence, when the model answered
    pub ml_confidence: Option<f32>,
    /// Label the rule predicate produced
    pub rule_label: &'a str,
    pub decision_path: DecisionPath,
    /// Wall time of the whole sidecar evaluation
    pub latency_ms: u64,
    /// Model-reported processing time
    pub ml_time_ms: Option<u64>,
    pub model_version: Option<&'a str>,
}

/// How the ML call ended
pub enum MlOutcome<'a> {
    Success,
    Error { kind: MlErrorKind, detail: &'a str },
    /// The service answered 200 with no relevance label
    NilResult,
}

/// Emit the structured record for one ML call
pub fn log_ml_call(record: &MlCallRecord<'_>, outcome: MlOutcome<'_>) {
    let title = title_excerpt(record.title);
    match outcome {
        MlOutcome::Success => {
            tracing::info!(
                sidecar = record.sidecar,
                content_id = record.content_id,
                content_type = record.content_type,
                source = record.source,
                title = %title,
                relevance = record.relevance,
                final_confidence = record.final_confidence,
                ml_confidence = record.ml_confidence,
                rule_label = record.rule_label,
                decision_path = %record.decision_path,
                latency_ms = record.latency_ms,
                ml_time_ms = record.ml_time_ms,
                model_version = record.model_version,
                outcome = "success",
                "ML sidecar call completed"
            );
        }
        MlOutcome::Error { kind, detail } => {
            metrics::counter!(
                "classifier_ml_errors_total",
                "sidecar" => record.sidecar.to_string(),
                "kind" => kind.as_str(),
            )
            .increment(1);
            tracing::warn!(
                sidecar = record.sidecar,
                content_id = record.content_id,
                content_type = record.content_type,
                source = record.source,
                title = %title,
                relevance = record.relevance,
                final_confidence = record.final_confidence,
                rule_label = record.rule_label,
                decision_path = %record.decision_path,
                latency_ms = record.latency_ms,
                error_type = kind.as_str(),
                error_detail = detail,
                outcome = "error",
                "ML sidecar call failed; continuing with rule verdict"
            );
        }
        MlOutcome::NilResult => {
            // A 200 with no relevance label breaks the sidecar contract
            tracing::error!(
                sidecar = record.sidecar,
                content_id = record.content_id,
                content_type = record.content_type,
                source = record.source,
                title = %title,
                rule_label = record.rule_label,
                decision_path = %record.decision_path,
                latency_ms = record.latency_ms,
                model_version = record.model_version,
                outcome = "nil_result",
                "ML sidecar returned an empty result"
            );
        }
    }
}

/// First ten words of the title, with a `...` suffix when truncated
pub fn title_excerpt(title: &str) -> String {
    let words: Vec<&str> = title.split_whitespace().collect();
    if words.len() <= EXCERPT_WORDS {
        words.join(" ")
    } else {
        format!("{}...", words[..EXCERPT_WORDS].join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_excerpt_short() {
        assert_eq!(title_excerpt("Short headline"), "Short headline");
    }

    #[test]
    fn test_title_excerpt_truncates() {
        let title = "one two three four five six seven eight nine ten eleven twelve";
        assert_eq!(
            title_excerpt(title),
            "one two three four five six seven eight nine ten..."
        );
    }

    #[test]
    fn test_title_excerpt_collapses_whitespace() {
        assert_eq!(title_excerpt("  spaced   out  "), "spaced out");
    }
}
