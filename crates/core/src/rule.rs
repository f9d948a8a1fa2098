//! Keyword classification rules
//!
//! Rules are plain keyword lists with a score threshold. They are supplied
//! as a value list from configuration and hot-swapped into the rule engine
//! at runtime; there is no embedded pattern DSL.

use serde::{Deserialize, Serialize};

/// What a rule classifies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleType {
    ContentType,
    Topic,
    Quality,
}

/// One keyword rule
///
/// A disabled rule must produce no effect on any classification output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationRule {
    pub id: u64,
    pub name: String,
    pub rule_type: RuleType,
    /// Topic emitted when this rule matches (topic rules)
    #[serde(default)]
    pub topic: String,
    pub keywords: Vec<String>,
    /// Minimum match score (0..=1) for this rule to fire
    pub min_confidence: f32,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Higher priority rules sort first in match output
    #[serde(default)]
    pub priority: i32,
}

fn default_enabled() -> bool {
    true
}

impl ClassificationRule {
    /// Topic name this rule emits: the `topic` field, falling back to the rule name
    pub fn topic_name(&self) -> &str {
        if self.topic.is_empty() {
            &self.name
        } else {
            &self.topic
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enabled_defaults_true() {
        let json = r#"{
            "id": 1,
            "name": "crime",
            "rule_type": "topic",
            "keywords": ["police", "arrest"],
            "min_confidence": 0.4
        }"#;
        let rule: ClassificationRule = serde_json::from_str(json).unwrap();
        assert!(rule.enabled);
        assert_eq!(rule.priority, 0);
        assert_eq!(rule.topic_name(), "crime");
    }

    #[test]
    fn test_topic_name_prefers_topic_field() {
        let rule = ClassificationRule {
            id: 2,
            name: "crime-rule".to_string(),
            rule_type: RuleType::Topic,
            topic: "crime".to_string(),
            keywords: vec![],
            min_confidence: 0.5,
            enabled: true,
            priority: 0,
        };
        assert_eq!(rule.topic_name(), "crime");
    }
}
