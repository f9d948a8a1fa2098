//! Shared sidecar plumbing
//!
//! The regex relevance tables and the rule+ML merge flow are identical
//! across domains; each sidecar supplies its own pattern tables and
//! post-decision augmentations.

use std::sync::Arc;
use std::time::Instant;

use regex::Regex;
use tokio::time::timeout_at;

use newsflow_core::{MlClassifier, MlError, MlResponse, Relevance};

use crate::decision::{decide, Decision, MlVerdict, RuleVerdict};

/// Characters of body text kept for rule evaluation and ML calls
pub const BODY_TRUNCATE_CHARS: usize = 500;

const CORE_CONFIDENCE: f32 = 0.90;
const PERIPHERAL_CONFIDENCE: f32 = 0.70;
const NOT_CONFIDENCE: f32 = 0.50;

/// Truncate body text to the sidecar limit on a char boundary
pub fn truncate_body(body: &str) -> &str {
    match body.char_indices().nth(BODY_TRUNCATE_CHARS) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Core/peripheral regex tables producing a three-valued rule verdict
pub struct RelevanceRules {
    core: Vec<Regex>,
    peripheral: Vec<Regex>,
}

impl RelevanceRules {
    /// Compile the pattern tables; invalid patterns are programmer error
    pub fn new(core: &[&str], peripheral: &[&str]) -> Self {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .map(|p| Regex::new(p).expect("relevance pattern"))
                .collect()
        };
        Self {
            core: compile(core),
            peripheral: compile(peripheral),
        }
    }

    /// Evaluate against lowercased (title + truncated body) text
    pub fn evaluate(&self, text: &str) -> RuleVerdict {
        if self.core.iter().any(|r| r.is_match(text)) {
            RuleVerdict::new(Relevance::Core, CORE_CONFIDENCE)
        } else if self.peripheral.iter().any(|r| r.is_match(text)) {
            RuleVerdict::new(Relevance::Peripheral, PERIPHERAL_CONFIDENCE)
        } else {
            RuleVerdict::new(Relevance::Not, NOT_CONFIDENCE)
        }
    }
}

/// How the optional ML call went, for telemetry and result assembly
pub struct HybridOutcome {
    pub decision: Decision,
    pub rule: RuleVerdict,
    pub response: Option<MlResponse>,
    pub error: Option<MlError>,
    /// ML answered but without a relevance label (contract violation)
    pub nil_result: bool,
}

/// Run the shared rule + ML merge flow
///
/// ML failures and nil results are recorded, not propagated; the decision
/// matrix then runs with ML-absent semantics.
pub async fn run_hybrid(
    ml: Option<&Arc<dyn MlClassifier>>,
    rule: RuleVerdict,
    title: &str,
    body: &str,
    deadline: Option<Instant>,
) -> HybridOutcome {
    let Some(ml) = ml else {
        return HybridOutcome {
            decision: decide(rule, None),
            rule,
            response: None,
            error: None,
            nil_result: false,
        };
    };

    let call = ml.classify(title, body);
    let result = match deadline {
        Some(deadline) => match timeout_at(deadline.into(), call).await {
            Ok(result) => result,
            Err(_) => Err(MlError::timeout()),
        },
        None => call.await,
    };

    match result {
        Ok(response) if response.relevance.trim().is_empty() => HybridOutcome {
            decision: decide(rule, None),
            rule,
            response: Some(response),
            error: None,
            nil_result: true,
        },
        Ok(response) => {
            let verdict = MlVerdict {
                band: Relevance::from_label(&response.relevance),
                confidence: response.relevance_confidence.clamp(0.0, 1.0),
            };
            HybridOutcome {
                decision: decide(rule, Some(verdict)),
                rule,
                response: Some(response),
                error: None,
                nil_result: false,
            }
        }
        Err(error) => HybridOutcome {
            decision: decide(rule, None),
            rule,
            response: None,
            error: Some(error),
            nil_result: false,
        },
    }
}
