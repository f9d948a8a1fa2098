//! Topic classification
//!
//! Matches documents against topic-type keyword rules. The preferred
//! backend routes through the shared rule engine (one automaton pass for
//! every rule); a self-contained token scorer with identical scoring
//! semantics exists for callers that do not hold an engine.
//!
//! Substring matches are forbidden in both backends: keyword `shoot`
//! never matches token `shooting`.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use newsflow_core::{ClassificationRule, RuleType};
use newsflow_rules::RuleEngine;

/// Divisor that saturates the log-TF term, matching the rule engine
const LOG_TF_SCALE: f64 = 2.5;

/// Topics detected for one document
#[derive(Debug, Clone, Default)]
pub struct TopicVerdict {
    /// Unique topics ordered by descending score
    pub topics: Vec<String>,
    pub scores: BTreeMap<String, f32>,
    /// Highest-scoring topic
    pub primary: Option<String>,
}

impl TopicVerdict {
    /// Highest topic score, if any topic matched
    pub fn top_score(&self) -> Option<f32> {
        self.primary.as_ref().and_then(|t| self.scores.get(t)).copied()
    }
}

enum Backend {
    Engine(Arc<RuleEngine>),
    Tokens(Vec<ClassificationRule>),
}

/// Keyword topic classifier
pub struct TopicClassifier {
    backend: Backend,
}

impl TopicClassifier {
    /// Route matching through the shared rule engine (preferred)
    pub fn with_engine(engine: Arc<RuleEngine>) -> Self {
        Self {
            backend: Backend::Engine(engine),
        }
    }

    /// Self-contained token scorer over a fixed rule set
    pub fn with_rules(rules: Vec<ClassificationRule>) -> Self {
        Self {
            backend: Backend::Tokens(
                rules
                    .into_iter()
                    .filter(|r| r.enabled && r.rule_type == RuleType::Topic)
                    .collect(),
            ),
        }
    }

    pub fn classify(&self, title: &str, body: &str) -> TopicVerdict {
        let scored: Vec<(String, f32)> = match &self.backend {
            Backend::Engine(engine) => engine
                .match_document(title, body)
                .into_iter()
                .filter(|m| m.rule_type == RuleType::Topic)
                .map(|m| (m.topic, m.score))
                .collect(),
            Backend::Tokens(rules) => score_tokens(rules, title, body),
        };

        let mut scores: BTreeMap<String, f32> = BTreeMap::new();
        let mut topics: Vec<String> = Vec::new();
        for (topic, score) in scored {
            let entry = scores.entry(topic.clone()).or_insert(score);
            if score > *entry {
                *entry = score;
            }
            if !topics.contains(&topic) {
                topics.push(topic);
            }
        }
        topics.sort_by(|a, b| {
            scores[b]
                .partial_cmp(&scores[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.cmp(b))
        });
        let primary = topics.first().cloned();
        TopicVerdict {
            topics,
            scores,
            primary,
        }
    }
}

/// Exact-token scorer with the rule engine's scoring formula
fn score_tokens(rules: &[ClassificationRule], title: &str, body: &str) -> Vec<(String, f32)> {
    let mut text = String::with_capacity(title.len() + body.len() + 1);
    text.push_str(title);
    text.push(' ');
    text.push_str(body);
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();

    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        *frequencies.entry(*token).or_insert(0) += 1;
    }


    let mut out = Vec::new();
    for rule in rules {
        let mut total_keywords = 0usize;
        let mut total_hits = 0usize;
        let mut unique_matched = 0usize;
        let mut seen = std::collections::HashSet::new();

        for raw in &rule.keywords {
            let keyword = raw.trim().to_lowercase();
            if keyword.is_empty() || !seen.insert(keyword.clone()) {
                continue;
            }
            total_keywords += 1;
            let hits = count_keyword(&tokens, &frequencies, &keyword);
            if hits > 0 {
                total_hits += hits;
                unique_matched += 1;
            }
        }

        if total_keywords == 0 {
            continue;
        }
        let coverage = unique_matched as f64 / total_keywords as f64;
        let log_tf = ((1.0 + total_hits as f64).ln() / LOG_TF_SCALE).min(1.0);
        let score = (0.5 * log_tf + 0.5 * coverage) as f32;
        if score >= rule.min_confidence {
            out.push((rule.topic_name().to_string(), score));
        }
    }
    out
}

/// Count exact-token occurrences; multi-word keywords count as token runs
fn count_keyword(tokens: &[&str], frequencies: &HashMap<&str, usize>, keyword: &str) -> usize {
    let parts: Vec<&str> = keyword
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    match parts.len() {
        0 => 0,
        1 => frequencies.get(parts[0]).copied().unwrap_or(0),
        n => tokens.windows(n).filter(|w| *w == parts.as_slice()).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_rule(id: u64, topic: &str, keywords: &[&str], min_confidence: f32) -> ClassificationRule {
        ClassificationRule {
            id,
            name: format!("{}-rule", topic),
            rule_type: RuleType::Topic,
            topic: topic.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            min_confidence,
            enabled: true,
            priority: 0,
        }
    }

    #[test]
    fn test_token_scorer_log_tf() {
        // S5 through the standalone backend
        let classifier = TopicClassifier::with_rules(vec![topic_rule(
            1,
            "crime",
            &["shooting", "police", "arrest"],
            0.5,
        )]);
        let verdict = classifier.classify("", "shooting shooting police arrest shooting");
        assert_eq!(verdict.topics, vec!["crime"]);
        assert!(verdict.scores["crime"] >= 0.5);
        assert_eq!(verdict.primary.as_deref(), Some("crime"));
    }

    #[test]
    fn test_no_substring_matches() {
        let classifier =
            TopicClassifier::with_rules(vec![topic_rule(1, "guns", &["shoot"], 0.1)]);
        let verdict = classifier.classify("", "a shooting was reported");
        assert!(verdict.topics.is_empty());
        assert!(verdict.top_score().is_none());
    }

    #[test]
    fn test_punctuation_is_token_boundary() {
        let classifier =
            TopicClassifier::with_rules(vec![topic_rule(1, "crime", &["arrest"], 0.1)]);
        let verdict = classifier.classify("", "After the arrest, charges followed: arrest!");
        assert_eq!(verdict.scores["crime"] > 0.0, true);
    }

    #[test]
    fn test_engine_backend_matches_token_backend() {
        let rules = vec![
            topic_rule(1, "crime", &["police", "arrest"], 0.2),
            topic_rule(2, "mining", &["nickel", "ore"], 0.2),
        ];
        let engine = Arc::new(RuleEngine::new(rules.clone()));
        let via_engine = TopicClassifier::with_engine(engine);
        let via_tokens = TopicClassifier::with_rules(rules);

        let title = "Police arrest two at nickel mine";
        let body = "The ore shipment was seized.";
        let a = via_engine.classify(title, body);
        let b = via_tokens.classify(title, body);
        assert_eq!(a.topics.len(), b.topics.len());
        for topic in &a.topics {
            let engine_score = a.scores[topic];
            let token_score = b.scores[topic];
            assert!(
                (engine_score - token_score).abs() < 1e-6,
                "{}: {} vs {}",
                topic,
                engine_score,
                token_score
            );
        }
    }

    #[test]
    fn test_disabled_topic_rule_ignored() {
        let mut disabled = topic_rule(1, "ghost", &["police"], 0.0);
        disabled.enabled = false;
        let classifier = TopicClassifier::with_rules(vec![disabled]);
        let verdict = classifier.classify("Police report", "");
        assert!(verdict.topics.is_empty());
    }

    #[test]
    fn test_topics_ordered_by_score() {
        let classifier = TopicClassifier::with_rules(vec![
            topic_rule(1, "weak", &["police", "ore", "market", "hockey"], 0.1),
            topic_rule(2, "strong", &["police"], 0.1),
        ]);
        let verdict = classifier.classify("", "police police police");
        assert_eq!(verdict.topics[0], "strong");
        assert_eq!(verdict.primary.as_deref(), Some("strong"));
    }
}
