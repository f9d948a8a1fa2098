//! Crime sidecar
//!
//! Rule layer: title exclusions knock out listings and opinion pieces;
//! positive patterns require both an action term and an authority
//! indicator so fiction and metaphor ("killed it on stage") stay out.
//! The rule verdict then merges with the crime ML sidecar through the
//! shared decision matrix.

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;

use newsflow_core::{CrimeRelevance, CrimeResult, MlClassifier, RawDocument, Relevance};

use crate::common::{run_hybrid, truncate_body};
use crate::decision::{homepage_eligible, RuleVerdict};
use crate::telemetry::{log_ml_call, MlCallRecord, MlOutcome};

/// Title-only exclusions: listings, opinion, lifestyle
static TITLE_EXCLUSIONS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // Job, directory, and weather listings
        r"\b(now hiring|help wanted|job (?:posting|fair|opening)|careers?|business directory|weather (?:forecast|alert|warning|statement)|garage sale|yard sale)\b",
        // Opinion and editorial prefixes
        r"^(?:opinion|editorial|column|letters?(?: to the editor)?)\s*[:|]",
        // First-person opinion markers
        r"\b(i think|i believe|in my view|in my opinion|my take)\b",
        // Lifestyle keywords
        r"\b(renovation|contractor|tournament|recipe|travel guide|lifeline)\b",
        r"\bbest .{1,40} in the .{1,40} area\b",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("crime exclusion pattern"))
    .collect()
});

/// Policing, judicial, and investigative vocabulary. A positive crime
/// verdict needs one of these near an action term, in either order.
static AUTHORITY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(police|rcmp|opp|sq|court|judge|investigation|suspects?|accused|officers?|constable|detectives?|prosecution|charged|arrest(?:ed|s)?|sentenced|convicted|custody|detained|apprehended|wanted|manhunt)\b",
    )
    .expect("authority pattern")
});

/// Justice verbs, used for the criminal_justice type and the
/// peripheral sub-label
static JUSTICE_VERBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(charged|arrested|arraigned|pleads?|pleaded|sentenced|convicted|acquitted|appeals?|appealed|investigation launched|warrant issued|indicted)\b",
    )
    .expect("justice verb pattern")
});

/// Jurisdiction indicators for the peripheral sub-label
static JURISDICTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(court|judge|prosecutors?|crown|district attorney|police|rcmp|opp|fbi|doj|justice department)\b",
    )
    .expect("jurisdiction pattern")
});

/// Non-Canadian markers that downgrade core street crime (original-case
/// title only)
static INTERNATIONAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(Minneapolis|U\.S\.|American|Mexico|European|Israel)\b")
        .expect("international pattern")
});

struct CrimePattern {
    action: Regex,
    /// Extra context the action needs (drug terms need seize/arrest/traffic)
    context: Option<Regex>,
    category: &'static str,
    confidence: f32,
    needs_authority: bool,
}

fn pattern(
    action: &str,
    context: Option<&str>,
    category: &'static str,
    confidence: f32,
    needs_authority: bool,
) -> CrimePattern {
    CrimePattern {
        action: Regex::new(action).expect("crime action pattern"),
        context: context.map(|c| Regex::new(c).expect("crime context pattern")),
        category,
        confidence,
        needs_authority,
    }
}

static CRIME_PATTERNS: Lazy<Vec<CrimePattern>> = Lazy::new(|| {
    vec![
        // Violent crime
        pattern(r"\b(murder|homicide|manslaughter)\b", None, "violent_crime", 0.95, true),
        pattern(
            r"\b(shooting|shot|stabbing|stabbed|robbery|robbed|carjack(?:ing|ed)?|kidnapp?(?:ing|ed)?)\b",
            None,
            "violent_crime",
            0.90,
            true,
        ),
        pattern(r"\bassault(?:ed|ing)?\b", None, "violent_crime", 0.85, true),
        pattern(r"\b(gun|firearm|knife|weapon)\b", None, "violent_crime", 0.85, true),
        // Inherently criminal phrases need no separate authority term
        pattern(r"\bsexual assault\b", None, "violent_crime", 0.90, false),
        pattern(r"\bhostage\b", None, "violent_crime", 0.85, false),
        pattern(r"\bfound dead\b", None, "violent_crime", 0.80, false),
        // Accusation-style charges and court outcomes
        pattern(
            r"\b(charged with|faces? charges|charges laid)\b",
            None,
            "criminal_justice",
            0.85,
            true,
        ),
        pattern(
            r"\b(sentenced to|convicted of|pleaded guilty|found guilty|prison term)\b",
            None,
            "criminal_justice",
            0.85,
            true,
        ),
        // Property crime
        pattern(r"\btheft\b", None, "property_crime", 0.80, true),
        pattern(
            r"\b(burglary|break and enter|break-in)\b",
            None,
            "property_crime",
            0.85,
            false,
        ),
        pattern(r"\barson\b", None, "property_crime", 0.85, false),
        pattern(
            r"\$[\d,]+(?:\s+\w+){0,2}\s+stolen\b",
            None,
            "property_crime",
            0.85,
            false,
        ),
        // Drug crime
        pattern(r"\bdrug bust\b", None, "drug_crime", 0.90, false),
        pattern(
            r"\b(fentanyl|cocaine|heroin|methamphetamine|opioids?)\b",
            Some(r"\b(seiz(?:ed|ure)|arrest(?:ed|s)?|traffick(?:ing|er)|bust)\b"),
            "drug_crime",
            0.90,
            false,
        ),
        // Gang and organized crime
        pattern(
            r"\b(gang shooting|gang violence|street gang)\b",
            None,
            "gang_violence",
            0.85,
            true,
        ),
        pattern(
            r"\b(organized crime|mob boss|mafia|biker gang)\b",
            None,
            "organized_crime",
            0.85,
            true,
        ),
    ]
});

/// Fixed mapping from crime type to site category pages
fn category_pages(crime_types: &[String]) -> Vec<String> {
    let mut pages: Vec<String> = Vec::new();
    for crime_type in crime_types {
        let mapped: &[&str] = match crime_type.as_str() {
            "violent_crime" => &["violent-crime", "crime"],
            "property_crime" => &["property-crime", "crime"],
            "drug_crime" => &["drug-crime", "crime"],
            "gang_violence" => &["gang-violence", "crime"],
            "organized_crime" => &["organized-crime", "crime"],
            "criminal_justice" => &["court-news"],
            "other_crime" => &["crime"],
            _ => &[],
        };
        for page in mapped {
            if !pages.iter().any(|p| p == page) {
                pages.push(page.to_string());
            }
        }
    }
    pages
}

/// Deterministic crime rule verdict
pub struct CrimeRuleVerdict {
    pub verdict: RuleVerdict,
    pub crime_types: Vec<String>,
    /// Title matched an exclusion pattern; skip the ML call
    pub excluded: bool,
}

/// Evaluate the crime rule tables over (title, truncated body)
pub fn evaluate_rules(title: &str, body: &str) -> CrimeRuleVerdict {
    let title_lower = title.to_lowercase();
    if TITLE_EXCLUSIONS.iter().any(|r| r.is_match(&title_lower)) {
        return CrimeRuleVerdict {
            verdict: RuleVerdict::new(Relevance::Not, 0.95),
            crime_types: Vec::new(),
            excluded: true,
        };
    }

    let text = format!("{} {}", title_lower, body.to_lowercase());
    let authority_present = AUTHORITY.is_match(&text);

    let mut crime_types: Vec<String> = Vec::new();
    let mut confidence: f32 = 0.0;
    for pattern in CRIME_PATTERNS.iter() {
        if !pattern.action.is_match(&text) {
            continue;
        }
        if pattern.needs_authority && !authority_present {
            continue;
        }
        if let Some(context) = &pattern.context {
            if !context.is_match(&text) {
                continue;
            }
        }
        if !crime_types.iter().any(|t| t == pattern.category) {
            crime_types.push(pattern.category.to_string());
        }
        confidence = confidence.max(pattern.confidence);
    }

    if crime_types.is_empty() {
        return CrimeRuleVerdict {
            verdict: RuleVerdict::new(Relevance::Not, 0.50),
            crime_types,
            excluded: false,
        };
    }

    let justice = "criminal_justice".to_string();
    if JUSTICE_VERBS.is_match(&text) && !crime_types.contains(&justice) {
        crime_types.push(justice);
    }

    let mut band = Relevance::Core;
    if INTERNATIONAL.is_match(title) {
        band = Relevance::Peripheral;
        confidence *= 0.7;
    }

    CrimeRuleVerdict {
        verdict: RuleVerdict::new(band, confidence),
        crime_types,
        excluded: false,
    }
}

/// Peripheral sub-label: `criminal_justice` when both a jurisdiction
/// indicator and a justice verb appear, else `crime_context`
fn sub_label_for(text: &str) -> &'static str {
    let mut score = 0;
    if JURISDICTION.is_match(text) {
        score += 1;
    }
    if JUSTICE_VERBS.is_match(text) {
        score += 1;
    }
    if score >= 2 {
        "criminal_justice"
    } else {
        "crime_context"
    }
}

/// Crime sidecar: rule tables plus optional ML merge
pub struct CrimeSidecar {
    ml: Option<Arc<dyn MlClassifier>>,
}

impl CrimeSidecar {
    pub fn new(ml: Option<Arc<dyn MlClassifier>>) -> Self {
        Self { ml }
    }

    pub async fn classify(
        &self,
        doc: &RawDocument,
        content_type: &str,
        deadline: Option<Instant>,
    ) -> CrimeResult {
        let started = Instant::now();
        let body = truncate_body(&doc.raw_text);
        let rules = evaluate_rules(&doc.title, body);

        // Excluded titles never reach the ML sidecar
        let ml = if rules.excluded { None } else { self.ml.as_ref() };
        let outcome = run_hybrid(ml, rules.verdict, &doc.title, body, deadline).await;
        let decision = outcome.decision;

        let mut crime_types = rules.crime_types;
        if let Some(response) = &outcome.response {
            for t in response.crime_types.iter().flatten() {
                if !crime_types.contains(t) {
                    crime_types.push(t.clone());
                }
            }
        }

        let sub_label = if decision.band == Relevance::Peripheral {
            let text = format!("{} {}", doc.title.to_lowercase(), body.to_lowercase());
            sub_label_for(&text).to_string()
        } else {
            String::new()
        };

        let relevance = CrimeRelevance::from_band(decision.band);
        let model_version = outcome
            .response
            .as_ref()
            .and_then(|r| r.model_version.clone());
        let ml_confidence = outcome
            .response
            .as_ref()
            .filter(|_| !outcome.nil_result)
            .map(|r| r.relevance_confidence);
        let latency_ms = started.elapsed().as_millis() as u64;

        let result = CrimeResult {
            relevance,
            confidence: decision.confidence,
            category_pages: category_pages(&crime_types),
            crime_types,
            sub_label,
            homepage_eligible: homepage_eligible(&decision, rules.verdict.confidence),
            review_required: decision.review_required,
            model_version,
            decision_path: decision.path,
            ml_confidence,
            processing_time_ms: latency_ms,
        };

        if ml.is_some() {
            let record = MlCallRecord {
                sidecar: "crime",
                content_id: &doc.id,
                content_type,
                source: &doc.source_name,
                title: &doc.title,
                relevance: result.relevance.as_str(),
                final_confidence: result.confidence,
                ml_confidence: result.ml_confidence,
                rule_label: CrimeRelevance::from_band(rules.verdict.band).as_str(),
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
