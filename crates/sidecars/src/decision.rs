//! Hybrid rule + ML decision core
//!
//! A pure function of (rule label, rule confidence, ML label, ML
//! confidence) shared by every domain sidecar. Rows are evaluated in
//! order; the first that applies wins.
//!
//! | Rule     | ML                  | Outcome    | Confidence | Path          | Review |
//! |----------|---------------------|------------|------------|---------------|--------|
//! | core     | core                | core       | (r+m)/2    | both_agree    | no     |
//! | core     | not                 | core       | r*0.7      | rule_override | yes    |
//! | core     | absent              | core       | r          | rules_only    | no     |
//! | non-core | core and m >= 0.90  | peripheral | m*0.8      | ml_override   | yes    |
//! | periph.  | core                | core       | m          | ml_upgrade    | no     |
//! | any      | fallback            | rule label | r          | default       | no     |

use newsflow_core::{DecisionPath, Relevance};

/// Deterministic rule verdict for one document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleVerdict {
    pub band: Relevance,
    pub confidence: f32,
}

impl RuleVerdict {
    pub fn new(band: Relevance, confidence: f32) -> Self {
        Self { band, confidence }
    }
}

/// ML sidecar verdict, already mapped onto the shared band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MlVerdict {
    pub band: Relevance,
    pub confidence: f32,
}

/// Merged outcome of the decision matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub band: Relevance,
    pub confidence: f32,
    pub path: DecisionPath,
    pub review_required: bool,
}

/// Merge a rule verdict with an optional ML verdict
pub fn decide(rule: RuleVerdict, ml: Option<MlVerdict>) -> Decision {
    let decision = match ml {
        Some(ml) => match (rule.band, ml.band) {
            (Relevance::Core, Relevance::Core) => Decision {
                band: Relevance::Core,
                confidence: (rule.confidence + ml.confidence) / 2.0,
                path: DecisionPath::BothAgree,
                review_required: false,
            },
            (Relevance::Core, Relevance::Not) => Decision {
                band: Relevance::Core,
                confidence: rule.confidence * 0.7,
                path: DecisionPath::RuleOverride,
                review_required: true,
            },
            (rule_band, Relevance::Core)
                if rule_band != Relevance::Core && ml.confidence >= 0.90 =>
            {
                Decision {
                    band: Relevance::Peripheral,
                    confidence: ml.confidence * 0.8,
                    path: DecisionPath::MlOverride,
                    review_required: true,
                }
            }
            (Relevance::Peripheral, Relevance::Core) => Decision {
                band: Relevance::Core,
                confidence: ml.confidence,
                path: DecisionPath::MlUpgrade,
                review_required: false,
            },
            _ => Decision {
                band: rule.band,
                confidence: rule.confidence,
                path: DecisionPath::Default,
                review_required: false,
            },
        },
        None => Decision {
            band: rule.band,
            confidence: rule.confidence,
            path: DecisionPath::RulesOnly,
            review_required: false,
        },
    };

    Decision {
        confidence: decision.confidence.clamp(0.0, 1.0),
        ..decision
    }
}

/// Homepage eligibility for sidecars that surface on the homepage
/// (crime, entertainment)
///
/// A core outcome qualifies when the agreed (or rule-overridden)
/// confidence clears 0.75, or on the rules-only path when the rule
/// verdict alone clears 0.85.
pub fn homepage_eligible(decision: &Decision, rule_confidence: f32) -> bool {
    if decision.band != Relevance::Core {
        return false;
    }
    match decision.path {
        DecisionPath::BothAgree | DecisionPath::RuleOverride => decision.confidence >= 0.75,
        DecisionPath::RulesOnly => rule_confidence >= 0.85,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ml(band: Relevance, confidence: f32) -> Option<MlVerdict> {
        Some(MlVerdict { band, confidence })
    }

    #[test]
    fn test_both_agree() {
        let d = decide(RuleVerdict::new(Relevance::Core, 0.9), ml(Relevance::Core, 0.8));
        assert_eq!(d.band, Relevance::Core);
        assert!((d.confidence - 0.85).abs() < 1e-6);
        assert_eq!(d.path, newsflow_core::DecisionPath::BothAgree);
        assert!(!d.review_required);
    }

    #[test]
    fn test_rule_override() {
        let d = decide(RuleVerdict::new(Relevance::Core, 0.9), ml(Relevance::Not, 0.6));
        assert_eq!(d.band, Relevance::Core);
        assert!((d.confidence - 0.63).abs() < 1e-6);
        assert_eq!(d.path, newsflow_core::DecisionPath::RuleOverride);
        assert!(d.review_required);
    }

    #[test]
    fn test_rules_only() {
        let d = decide(RuleVerdict::new(Relevance::Core, 0.95), None);
        assert_eq!(d.band, Relevance::Core);
        assert_eq!(d.confidence, 0.95);
        assert_eq!(d.path, newsflow_core::DecisionPath::RulesOnly);
        assert!(!d.review_required);
    }

    #[test]
    fn test_ml_override_needs_high_confidence() {
        let d = decide(RuleVerdict::new(Relevance::Not, 0.5), ml(Relevance::Core, 0.95));
        assert_eq!(d.band, Relevance::Peripheral);
        assert!((d.confidence - 0.76).abs() < 1e-6);
        assert_eq!(d.path, newsflow_core::DecisionPath::MlOverride);
        assert!(d.review_required);

        // Below the 0.90 bar the not-relevant rule verdict stands
        let d = decide(RuleVerdict::new(Relevance::Not, 0.5), ml(Relevance::Core, 0.85));
        assert_eq!(d.band, Relevance::Not);
        assert_eq!(d.path, newsflow_core::DecisionPath::Default);
    }

    #[test]
    fn test_ml_override_beats_upgrade_at_high_confidence() {
        // Peripheral rule + confident core ML takes the override row first
        let d = decide(
            RuleVerdict::new(Relevance::Peripheral, 0.7),
            ml(Relevance::Core, 0.95),
        );
        assert_eq!(d.path, newsflow_core::DecisionPath::MlOverride);
        assert_eq!(d.band, Relevance::Peripheral);
    }

    #[test]
    fn test_ml_upgrade() {
        let d = decide(
            RuleVerdict::new(Relevance::Peripheral, 0.7),
            ml(Relevance::Core, 0.8),
        );
        assert_eq!(d.band, Relevance::Core);
        assert_eq!(d.confidence, 0.8);
        assert_eq!(d.path, newsflow_core::DecisionPath::MlUpgrade);
        assert!(!d.review_required);
    }

    #[test]
    fn test_default_fallback() {
        let d = decide(
            RuleVerdict::new(Relevance::Not, 0.5),
            ml(Relevance::Peripheral, 0.9),
        );
        assert_eq!(d.band, Relevance::Not);
        assert_eq!(d.confidence, 0.5);
        assert_eq!(d.path, newsflow_core::DecisionPath::Default);
    }

    #[test]
    fn test_determinism() {
        let rule = RuleVerdict::new(Relevance::Core, 0.9);
        let first = decide(rule, ml(Relevance::Core, 0.8));
        let second = decide(rule, ml(Relevance::Core, 0.8));
        assert_eq!(first, second);
    }

    #[test]
    fn test_homepage_eligibility() {
        let agree = decide(RuleVerdict::new(Relevance::Core, 0.9), ml(Relevance::Core, 0.8));
        assert!(homepage_eligible(&agree, 0.9));

        let weak_agree = decide(RuleVerdict::new(Relevance::Core, 0.6), ml(Relevance::Core, 0.6));
        assert!(!homepage_eligible(&weak_agree, 0.6));

        let rules_only = decide(RuleVerdict::new(Relevance::Core, 0.95), None);
        assert!(homepage_eligible(&rules_only, 0.95));

        let weak_rules_only = decide(RuleVerdict::new(Relevance::Core, 0.8), None);
        assert!(!homepage_eligible(&weak_rules_only, 0.8));

        let upgrade = decide(
            RuleVerdict::new(Relevance::Peripheral, 0.7),
            ml(Relevance::Core, 0.9),
        );
        assert!(!homepage_eligible(&upgrade, 0.7));
    }
}
