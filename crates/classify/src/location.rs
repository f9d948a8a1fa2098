//! Geographic location classification
//!
//! Extracts city, province, and country entities from three text zones
//! (headline, lede, body), accumulates zone-weighted scores with a
//! specificity bonus, and declares a winner only when it dominates the
//! runner-up by a clear margin. Publisher location never participates.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use newsflow_core::{LocationResult, LocationSpecificity};

const HEADLINE_WEIGHT: f64 = 3.0;
const LEDE_WEIGHT: f64 = 2.5;
const BODY_WEIGHT: f64 = 1.0;

const CITY_BONUS: f64 = 3.0;
const PROVINCE_BONUS: f64 = 2.0;
const COUNTRY_BONUS: f64 = 1.0;

/// Minimum relative margin the top entity must hold over the runner-up
const DOMINANCE_THRESHOLD: f64 = 0.30;

/// Curated Canadian city table: lowercase city name to province code.
/// Northern Ontario coverage is deliberately dense.
static CITY_PROVINCES: Lazy<Vec<(&'static str, &'static str)>> = Lazy::new(|| {
    vec![
        ("sudbury", "ON"),
        ("greater sudbury", "ON"),
        ("north bay", "ON"),
        ("timmins", "ON"),
        ("thunder bay", "ON"),
        ("sault ste. marie", "ON"),
        ("elliot lake", "ON"),
        ("espanola", "ON"),
        ("kapuskasing", "ON"),
        ("kirkland lake", "ON"),
        ("cochrane", "ON"),
        ("kenora", "ON"),
        ("dryden", "ON"),
        ("parry sound", "ON"),
        ("sturgeon falls", "ON"),
        ("manitoulin", "ON"),
        ("toronto", "ON"),
        ("ottawa", "ON"),
        ("hamilton", "ON"),
        ("london", "ON"),
        ("kingston", "ON"),
        ("windsor", "ON"),
        ("barrie", "ON"),
        ("orillia", "ON"),
        ("peterborough", "ON"),
        ("mississauga", "ON"),
        ("brampton", "ON"),
        ("montreal", "QC"),
        ("quebec city", "QC"),
        ("gatineau", "QC"),
        ("rouyn-noranda", "QC"),
        ("val-d'or", "QC"),
        ("vancouver", "BC"),
        ("victoria", "BC"),
        ("kelowna", "BC"),
        ("calgary", "AB"),
        ("edmonton", "AB"),
        ("fort mcmurray", "AB"),
        ("winnipeg", "MB"),
        ("brandon", "MB"),
        ("regina", "SK"),
        ("saskatoon", "SK"),
        ("halifax", "NS"),
        ("sydney", "NS"),
        ("fredericton", "NB"),
        ("moncton", "NB"),
        ("saint john", "NB"),
        ("charlottetown", "PE"),
        ("st. john's", "NL"),
        ("whitehorse", "YT"),
        ("yellowknife", "NT"),
        ("iqaluit", "NU"),
    ]
});

struct CityPattern {
    regex: Regex,
    name: &'static str,
    province: &'static str,
}

/// Compiled capitalized-form city patterns. Only capitalized mentions
/// count, which keeps common nouns ("london fog") out of the tally.
static CITY_PATTERNS: Lazy<Vec<CityPattern>> = Lazy::new(|| {
    CITY_PROVINCES
        .iter()
        .map(|(name, province)| {
            let capitalized = capitalize_words(name);
            let pattern = format!(r"\b{}\b", regex::escape(&capitalized));
            CityPattern {
                regex: Regex::new(&pattern).expect("city pattern"),
                name,
                province,
            }
        })
        .collect()
});

/// Province full names, word-bounded, on lowercased text. Abbreviations
/// are deliberately excluded ("on", "pe" are everyday words).
static PROVINCE_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bontario\b", "ON"),
        (r"\bquebec\b", "QC"),
        (r"\bbritish columbia\b", "BC"),
        (r"\balberta\b", "AB"),
        (r"\bmanitoba\b", "MB"),
        (r"\bsaskatchewan\b", "SK"),
        (r"\bnova scotia\b", "NS"),
        (r"\bnew brunswick\b", "NB"),
        (r"\bprince edward island\b", "PE"),
        (r"\bnewfoundland\b", "NL"),
        (r"\byukon\b", "YT"),
        (r"\bnorthwest territories\b", "NT"),
        (r"\bnunavut\b", "NU"),
    ]
    .into_iter()
    .map(|(pattern, code)| (Regex::new(pattern).expect("province pattern"), code))
    .collect()
});

static COUNTRY_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\bcanada\b", "canada"),
        (r"\bcanadian\b", "canada"),
        (r"\bunited states\b", "united_states"),
        (r"\bu\.s\.a\.", "united_states"),
        (r"\bu\.s\.", "united_states"),
        (r"\busa\b", "united_states"),
        (r"\bus\b", "united_states"),
        (r"\bamerican\b", "united_states"),
        (r"\bamerica\b", "united_states"),
    ]
    .into_iter()
    .map(|(pattern, code)| (Regex::new(pattern).expect("country pattern"), code))
    .collect()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EntityKind {
    City,
    Province,
    Country,
}

/// Zoned gazetteer location classifier
#[derive(Debug, Default)]
pub struct LocationClassifier;

impl LocationClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, title: &str, body: &str) -> LocationResult {
        let lede = lede_of(body);
        let zones: [(&str, f64); 3] = [
            (title, HEADLINE_WEIGHT),
            (lede, LEDE_WEIGHT),
            (body, BODY_WEIGHT),
        ];

        let mut scores: HashMap<(EntityKind, &'static str), f64> = HashMap::new();
        for (zone, weight) in zones {
            if zone.is_empty() {
                continue;
            }
            accumulate_zone(zone, weight, &mut scores);
        }

        let mut ranked: Vec<((EntityKind, &'static str), f64)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let Some(&((kind, name), first)) = ranked.first() else {
            return LocationResult::unknown(0.0);
        };
        let second = ranked.get(1).map(|&(_, s)| s).unwrap_or(0.0);

        let confidence = if second <= 0.0 {
            0.95
        } else {
            let margin = (first - second) / first;
            if margin < DOMINANCE_THRESHOLD {
                tracing::debug!(
                    winner = name,
                    margin,
                    "Location ambiguous below dominance threshold"
                );
                return LocationResult::unknown(0.5);
            }
            (0.6 + (margin - DOMINANCE_THRESHOLD) / 0.70 * 0.35) as f32
        };

        match kind {
            EntityKind::City => {
                let province = CITY_PROVINCES
                    .iter()
                    .find(|(city, _)| *city == name)
                    .map(|(_, province)| province.to_string());
                LocationResult {
                    city: Some(name.to_string()),
                    province,
                    country: "canada".to_string(),
                    specificity: LocationSpecificity::City,
                    confidence,
                }
            }
            EntityKind::Province => LocationResult {
                city: None,
                province: Some(name.to_string()),
                country: "canada".to_string(),
                specificity: LocationSpecificity::Province,
                confidence,
            },
            EntityKind::Country => LocationResult {
                city: None,
                province: None,
                country: name.to_string(),
                specificity: LocationSpecificity::Country,
                confidence,
            },
        }
    }
}

fn accumulate_zone(zone: &str, weight: f64, scores: &mut HashMap<(EntityKind, &'static str), f64>) {
    for city in CITY_PATTERNS.iter() {
        let hits = city.regex.find_iter(zone).count();
        if hits > 0 {
            *scores.entry((EntityKind::City, city.name)).or_insert(0.0) +=
                weight * CITY_BONUS * hits as f64;
        }
    }

    let lowered = zone.to_lowercase();
    for (regex, code) in PROVINCE_PATTERNS.iter() {
        let hits = regex.find_iter(&lowered).count();
        if hits > 0 {
            *scores.entry((EntityKind::Province, code)).or_insert(0.0) +=
                weight * PROVINCE_BONUS * hits as f64;
        }
    }
    for (regex, code) in COUNTRY_PATTERNS.iter() {
        let hits = regex.find_iter(&lowered).count();
        if hits > 0 {
            *scores.entry((EntityKind::Country, code)).or_insert(0.0) +=
                weight * COUNTRY_BONUS * hits as f64;
        }
    }
}

/// First paragraph of the body, falling back to the first 500 characters
fn lede_of(body: &str) -> &str {
    if let Some(paragraph) = body.split("\n\n").find(|p| !p.trim().is_empty()) {
        return paragraph;
    }
    match body.char_indices().nth(500) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

/// Title-case every whitespace-separated word ("sault ste. marie" ->
/// "Sault Ste. Marie")
fn capitalize_words(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_dominates() {
        // S7
        let classifier = LocationClassifier::new();
        let result = classifier.classify(
            "Sudbury Police arrest suspect in downtown stabbing",
            "A man was taken into custody after the incident.",
        );
        assert_eq!(result.city.as_deref(), Some("sudbury"));
        assert_eq!(result.province.as_deref(), Some("ON"));
        assert_eq!(result.country, "canada");
        assert_eq!(result.specificity, LocationSpecificity::City);
        assert!(result.confidence >= 0.6, "confidence {}", result.confidence);
    }

    #[test]
    fn test_equal_competitors_are_ambiguous() {
        // S8
        let classifier = LocationClassifier::new();
        let result = classifier.classify(
            "Toronto and Montreal split weekend series",
            "Fans in Toronto and Montreal watched the doubleheader.",
        );
        assert_eq!(result.country, "unknown");
        assert_eq!(result.specificity, LocationSpecificity::Unknown);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_no_entities() {
        let classifier = LocationClassifier::new();
        let result = classifier.classify("Quarterly results improve", "Margins were up.");
        assert_eq!(result.country, "unknown");
        assert_eq!(result.confidence, 0.0);
    }

    #[test]
    fn test_lowercase_city_not_counted() {
        // Only capitalized tokens are considered for cities
        let classifier = LocationClassifier::new();
        let result = classifier.classify("new ferry to sudbury planned", "");
        assert_eq!(result.city, None);
    }

    #[test]
    fn test_province_match() {
        let classifier = LocationClassifier::new();
        let result = classifier.classify("Ontario budget lands next week", "");
        assert_eq!(result.province.as_deref(), Some("ON"));
        assert_eq!(result.country, "canada");
        assert_eq!(result.specificity, LocationSpecificity::Province);
    }

    #[test]
    fn test_country_only() {
        let classifier = LocationClassifier::new();
        let result = classifier.classify("U.S. tariffs expand", "The American measures took effect.");
        assert_eq!(result.country, "united_states");
        assert_eq!(result.specificity, LocationSpecificity::Country);
        assert_eq!(result.city, None);
    }

    #[test]
    fn test_multi_word_city() {
        let classifier = LocationClassifier::new();
        let result = classifier.classify("Thunder Bay port sets record", "");
        assert_eq!(result.city.as_deref(), Some("thunder bay"));
        assert_eq!(result.province.as_deref(), Some("ON"));
    }

    #[test]
    fn test_dominant_winner_with_competitor() {
        let classifier = LocationClassifier::new();
        // Sudbury in headline and lede, Toronto once in body
        let result = classifier.classify(
            "Sudbury council approves arena",
            "Sudbury ratepayers spoke for hours.\n\nA Toronto firm designed the plan.",
        );
        assert_eq!(result.city.as_deref(), Some("sudbury"));
        assert!(result.confidence >= 0.6 && result.confidence < 0.95);
    }

    #[test]
    fn test_headline_outweighs_body() {
        let classifier = LocationClassifier::new();
        // Headline city (3.0 * 3) vs a single body-zone mention (1.0 * 3)
        let result = classifier.classify(
            "Timmins mine expands",
            "The company said hiring begins soon.\n\nCrews from Barrie arrived.",
        );
        assert_eq!(result.city.as_deref(), Some("timmins"));
        assert!(result.confidence >= 0.6);
    }
}
