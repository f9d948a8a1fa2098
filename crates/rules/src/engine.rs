//! Aho-Corasick rule matcher with hot reload

use aho_corasick::AhoCorasick;
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};

use newsflow_core::{ClassificationRule, RuleType};

/// Divisor that saturates the log-TF term at ~11 hits
const LOG_TF_SCALE: f64 = 2.5;

/// One rule that met its confidence threshold for a document
#[derive(Debug, Clone)]
pub struct RuleMatch {
    pub rule_id: u64,
    pub rule_name: String,
    pub rule_type: RuleType,
    pub topic: String,
    /// Combined log-TF + coverage score, 0..=1
    pub score: f32,
    pub priority: i32,
    pub total_hits: usize,
    /// Surface forms of the keywords that matched, in first-hit order
    pub matched_keywords: Vec<String>,
}

/// Per-rule matching state derived from one rule set
struct EngineState {
    /// Enabled rules only; disabled rules must have no effect
    rules: Vec<ClassificationRule>,
    /// Normalized keyword count per rule (the K in coverage = unique/K)
    keyword_totals: Vec<usize>,
    /// Normalized unique keywords across all rules
    keywords: Vec<String>,
    /// keywords[i] belongs to these rule indices
    keyword_rules: Vec<Vec<usize>>,
    matcher: Option<AhoCorasick>,
}

impl EngineState {
    fn build(rules: Vec<ClassificationRule>) -> Self {
        let rules: Vec<ClassificationRule> =
            rules.into_iter().filter(|r| r.enabled).collect();

        let mut keywords: Vec<String> = Vec::new();
        let mut keyword_rules: Vec<Vec<usize>> = Vec::new();
        let mut keyword_index: HashMap<String, usize> = HashMap::new();
        let mut keyword_totals = Vec::with_capacity(rules.len());

        for (rule_idx, rule) in rules.iter().enumerate() {
            let mut seen_in_rule = HashSet::new();
            for raw in &rule.keywords {
                let keyword = normalize(raw);
                if keyword.is_empty() || !seen_in_rule.insert(keyword.clone()) {
                    continue;
                }
                let idx = *keyword_index.entry(keyword.clone()).or_insert_with(|| {
                    keywords.push(keyword.clone());
                    keyword_rules.push(Vec::new());
                    keywords.len() - 1
                });
                keyword_rules[idx].push(rule_idx);
            }
            keyword_totals.push(seen_in_rule.len());
        }

        // Patterns are space-padded so matches land on word boundaries:
        // keyword "shoot" must not hit inside "shooting".
        let matcher = if keywords.is_empty() {
            None
        } else {
            let patterns: Vec<String> =
                keywords.iter().map(|k| format!(" {} ", k)).collect();
            match AhoCorasick::new(&patterns) {
                Ok(m) => Some(m),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build keyword automaton");
                    None
                }
            }
        };

        Self {
            rules,
            keyword_totals,
            keywords,
            keyword_rules,
            matcher,
        }
    }
}

/// Keyword rule engine
///
/// One read-write lock guards the rule slice, the keyword index, and the
/// automaton together. Match calls hold the read lock for the duration of
/// one pass; `update_rules` rebuilds the full state beside the old one and
/// swaps it in under the write lock.
pub struct RuleEngine {
    state: RwLock<EngineState>,
}

impl RuleEngine {
    pub fn new(rules: Vec<ClassificationRule>) -> Self {
        Self {
            state: RwLock::new(EngineState::build(rules)),
        }
    }

    /// Replace the full rule set atomically
    pub fn update_rules(&self, rules: Vec<ClassificationRule>) {
        let next = EngineState::build(rules);
        let enabled = next.rules.len();
        let keywords = next.keywords.len();
        *self.state.write() = next;
        tracing::info!(enabled, keywords, "Rule set reloaded");
    }

    /// Number of enabled rules currently loaded
    pub fn rule_count(&self) -> usize {
        self.state.read().rules.len()
    }

    /// Match a document against every enabled rule in one pass
    ///
    /// Returns rules whose score meets their threshold, sorted by priority
    /// (descending) then score (descending). Empty rules or empty text
    /// yield an empty list, never an error.
    pub fn match_document(&self, title: &str, body: &str) -> Vec<RuleMatch> {
        let state = self.state.read();
        let matcher = match &state.matcher {
            Some(m) => m,
            None => return Vec::new(),
        };
        if title.is_empty() && body.is_empty() {
            return Vec::new();
        }

        let mut text = String::with_capacity(title.len() + body.len() + 3);
        text.push(' ');
        push_normalized(&mut text, title);
        text.push(' ');
        push_normalized(&mut text, body);
        text.push(' ');

        struct Accum {
            total_hits: usize,
            unique: HashSet<usize>,
            surfaces: Vec<String>,
        }
        let mut per_rule: HashMap<usize, Accum> = HashMap::new();

        // Overlapping scan: adjacent padded patterns share a separator
        // space, so non-overlapping iteration would drop every other hit.
        for mat in matcher.find_overlapping_iter(&text) {
            let keyword_idx = mat.pattern().as_usize();
            for &rule_idx in &state.keyword_rules[keyword_idx] {
                let accum = per_rule.entry(rule_idx).or_insert_with(|| Accum {
                    total_hits: 0,
                    unique: HashSet::new(),
                    surfaces: Vec::new(),
                });
                accum.total_hits += 1;
                if accum.unique.insert(keyword_idx) {
                    accum.surfaces.push(state.keywords[keyword_idx].clone());
                }
            }
        }

        let mut matches: Vec<RuleMatch> = per_rule
            .into_iter()
            .filter_map(|(rule_idx, accum)| {
                let rule = &state.rules[rule_idx];
                let total_keywords = state.keyword_totals[rule_idx];
                if total_keywords == 0 {
                    return None;
                }
                let coverage = accum.unique.len() as f64 / total_keywords as f64;
                let log_tf =
                    ((1.0 + accum.total_hits as f64).ln() / LOG_TF_SCALE).min(1.0);
                let score = (0.5 * log_tf + 0.5 * coverage) as f32;
                if score < rule.min_confidence {
                    return None;
                }
                Some(RuleMatch {
                    rule_id: rule.id,
                    rule_name: rule.name.clone(),
                    rule_type: rule.rule_type,
                    topic: rule.topic_name().to_string(),
                    score,
                    priority: rule.priority,
                    total_hits: accum.total_hits,
                    matched_keywords: accum.surfaces,
                })
            })
            .collect();

        // rule_id tiebreak keeps output deterministic across runs even
        // on exact score ties
        matches.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then(
                    b.score
                        .partial_cmp(&a.score)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
                .then(a.rule_id.cmp(&b.rule_id))
        });
        matches
    }
}

/// Lowercase and replace every non-alphanumeric run with a single space
fn normalize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    push_normalized(&mut out, input);
    out
}

fn push_normalized(out: &mut String, input: &str) {
    let mut last_was_space = true;
    for ch in input.chars() {
        if ch.is_alphanumeric() {
            for lower in ch.to_lowercase() {
                out.push(lower);
            }
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }
    if last_was_space {
        // Drop the trailing separator; callers pad explicitly
        let trimmed_len = out.trim_end().len();
        out.truncate(trimmed_len);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic_rule(id: u64, name: &str, keywords: &[&str], min_confidence: f32) -> ClassificationRule {
        ClassificationRule {
            id,
            name: name.to_string(),
            rule_type: RuleType::Topic,
            topic: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            min_confidence,
            enabled: true,
            priority: 0,
        }
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Hello, World!"), "hello world");
        assert_eq!(normalize("  spaced -- out  "), "spaced out");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!!"), "");
    }

    #[test]
    fn test_single_keyword_match() {
        let engine = RuleEngine::new(vec![topic_rule(1, "election", &["election"], 0.1)]);
        let matches = engine.match_document("Election news", "nothing else here");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rule_id, 1);
        assert_eq!(matches[0].total_hits, 1);
        assert_eq!(matches[0].matched_keywords, vec!["election"]);
    }

    #[test]
    fn test_no_substring_matches() {
        let engine = RuleEngine::new(vec![topic_rule(1, "shoot", &["shoot"], 0.1)]);
        let matches = engine.match_document("", "the shooting happened downtown");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_repeated_hits_log_tf() {
        // S5: keywords {shooting, police, arrest}, body with 3x shooting + police + arrest
        let engine = RuleEngine::new(vec![topic_rule(
            1,
            "crime",
            &["shooting", "police", "arrest"],
            0.5,
        )]);
        let matches =
            engine.match_document("", "shooting shooting police arrest shooting");
        assert_eq!(matches.len(), 1);
        let m = &matches[0];
        assert_eq!(m.total_hits, 5);
        assert_eq!(m.matched_keywords.len(), 3);
        assert!(m.score >= 0.5, "score = {}", m.score);
    }

    #[test]
    fn test_adjacent_hits_counted() {
        // Adjacent occurrences share the separator space in the padded
        // text; every one must still count.
        let engine = RuleEngine::new(vec![topic_rule(1, "t", &["word"], 0.0)]);
        let matches = engine.match_document("", "word word word word");
        assert_eq!(matches[0].total_hits, 4);
    }

    #[test]
    fn test_multi_word_keyword() {
        let engine = RuleEngine::new(vec![topic_rule(1, "drugs", &["drug bust"], 0.1)]);
        let matches = engine.match_document("Major drug bust in the city", "");
        assert_eq!(matches.len(), 1);

        let none = engine.match_document("drug prices rise after bust", "");
        assert!(none.is_empty());
    }

    #[test]
    fn test_min_confidence_threshold() {
        // One of four keywords, single hit: coverage 0.25, log_tf ~0.277
        // => score ~0.264
        let engine = RuleEngine::new(vec![topic_rule(
            1,
            "broad",
            &["alpha", "beta", "gamma", "delta"],
            0.5,
        )]);
        assert!(engine.match_document("alpha", "").is_empty());

        let engine = RuleEngine::new(vec![topic_rule(
            2,
            "broad",
            &["alpha", "beta", "gamma", "delta"],
            0.2,
        )]);
        assert_eq!(engine.match_document("alpha", "").len(), 1);
    }

    #[test]
    fn test_disabled_rule_has_no_effect() {
        let mut disabled = topic_rule(7, "ghost", &["election"], 0.0);
        disabled.enabled = false;
        let enabled = topic_rule(1, "election", &["election"], 0.1);

        let baseline = RuleEngine::new(vec![enabled.clone()]);
        let with_disabled = RuleEngine::new(vec![enabled, disabled]);

        let a = baseline.match_document("Election news", "");
        let b = with_disabled.match_document("Election news", "");
        assert_eq!(a.len(), b.len());
        assert_eq!(a[0].rule_id, b[0].rule_id);
        assert_eq!(a[0].score, b[0].score);
    }

    #[test]
    fn test_shared_keyword_across_rules() {
        let rules = vec![
            topic_rule(1, "crime", &["police", "arrest"], 0.1),
            topic_rule(2, "safety", &["police", "patrol"], 0.1),
        ];
        let engine = RuleEngine::new(rules);
        let matches = engine.match_document("Police report", "");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_priority_then_score_sort() {
        let mut low = topic_rule(1, "low", &["market"], 0.0);
        low.priority = 1;
        let mut high = topic_rule(2, "high", &["market"], 0.0);
        high.priority = 10;
        let engine = RuleEngine::new(vec![low, high]);
        let matches = engine.match_document("market market", "");
        assert_eq!(matches[0].rule_id, 2);
        assert_eq!(matches[1].rule_id, 1);
    }

    #[test]
    fn test_hot_reload_replaces_rule_set() {
        // S6
        let engine = RuleEngine::new(vec![topic_rule(1, "election", &["election"], 0.1)]);
        assert_eq!(engine.match_document("Election news", "details").len(), 1);

        engine.update_rules(vec![topic_rule(2, "market", &["market"], 0.1)]);
        assert!(engine.match_document("Election news", "details").is_empty());

        let matches = engine.match_document("Market update", "details");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].rule_id, 2);
    }

    #[test]
    fn test_empty_inputs() {
        let engine = RuleEngine::new(vec![]);
        assert!(engine.match_document("anything", "at all").is_empty());

        let engine = RuleEngine::new(vec![topic_rule(1, "t", &["word"], 0.1)]);
        assert!(engine.match_document("", "").is_empty());
    }

    #[test]
    fn test_keyword_longer_than_text() {
        let engine = RuleEngine::new(vec![topic_rule(
            1,
            "t",
            &["a very long keyword phrase indeed"],
            0.0,
        )]);
        assert!(engine.match_document("short", "").is_empty());
    }

    #[test]
    fn test_concurrent_match_and_reload() {
        use std::sync::Arc;
        use std::thread;

        let engine = Arc::new(RuleEngine::new(vec![topic_rule(
            1,
            "election",
            &["election"],
            0.1,
        )]));

        let mut handles = Vec::new();
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for _ in 0..200 {
                    let matches = engine.match_document("Election and market news", "");
                    // Either rule set may be live, but the result must be
                    // internally consistent: at most one rule, id 1 or 2.
                    assert!(matches.len() <= 1);
                    if let Some(m) = matches.first() {
                        assert!(m.rule_id == 1 || m.rule_id == 2);
                        assert_eq!(m.matched_keywords.len(), 1);
                    }
                }
            }));
        }
        for i in 0..2 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for round in 0..50 {
                    if (round + i) % 2 == 0 {
                        engine.update_rules(vec![topic_rule(2, "market", &["market"], 0.1)]);
                    } else {
                        engine.update_rules(vec![topic_rule(
                            1,
                            "election",
                            &["election"],
                            0.1,
                        )]);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }
}
