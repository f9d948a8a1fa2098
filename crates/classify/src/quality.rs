//! Quality scoring
//!
//! Four components worth 0..=25 each, summed and clamped to 0..=100. The
//! factor breakdown is kept on the result so editors can see why a
//! document scored the way it did.

use newsflow_core::{QualityFactor, QualityFactors, RawDocument};

/// Word-count thresholds for the quality scorer
#[derive(Debug, Clone)]
pub struct QualityConfig {
    /// Below this word count the word-count component scores zero
    pub min_word_count: u32,
    /// At or above this word count the word-count component maxes out
    pub optimal_word_count: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            min_word_count: 100,
            optimal_word_count: 1000,
        }
    }
}

/// Document quality scorer
#[derive(Debug, Default)]
pub struct QualityScorer {
    config: QualityConfig,
}

impl QualityScorer {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Score a document, returning the 0..=100 total and the breakdown
    pub fn score(&self, doc: &RawDocument) -> (u8, QualityFactors) {
        let factors = QualityFactors {
            word_count: self.word_count_factor(doc),
            metadata_completeness: self.metadata_factor(doc),
            content_richness: self.richness_factor(doc),
            readability: self.readability_factor(doc),
        };
        (factors.total(), factors)
    }

    fn word_count_factor(&self, doc: &RawDocument) -> QualityFactor {
        let wc = doc.word_count;
        let score = if wc < self.config.min_word_count {
            0
        } else if wc < 300 {
            10
        } else if wc < 500 {
            15
        } else if wc < self.config.optimal_word_count {
            20
        } else {
            25
        };
        QualityFactor::new(score)
            .with_detail("above_minimum", wc >= self.config.min_word_count)
            .with_detail("optimal_length", wc >= self.config.optimal_word_count)
    }

    fn metadata_factor(&self, doc: &RawDocument) -> QualityFactor {
        let has_title = !doc.title.is_empty();
        let has_description = doc.has_description();
        let has_published_date = doc.published_date.is_some();
        let has_og_fields = !doc.og_title.is_empty() || !doc.og_image.is_empty();
        let has_keywords = !doc.meta_keywords.is_empty();

        let score = [
            has_title,
            has_description,
            has_published_date,
            has_og_fields,
            has_keywords,
        ]
        .iter()
        .filter(|present| **present)
        .count() as u8
            * 5;

        QualityFactor::new(score)
            .with_detail("has_title", has_title)
            .with_detail("has_description", has_description)
            .with_detail("has_published_date", has_published_date)
            .with_detail("has_og_fields", has_og_fields)
            .with_detail("has_keywords", has_keywords)
    }

    fn richness_factor(&self, doc: &RawDocument) -> QualityFactor {
        let has_og_image = !doc.og_image.is_empty();
        let has_keywords = !doc.meta_keywords.is_empty();
        let has_canonical = !doc.canonical_url.is_empty();
        let has_og_type_and_url = !doc.og_type.is_empty() && !doc.og_url.is_empty();

        let mut score = 0;
        if has_og_image {
            score += 10;
        }
        if has_keywords {
            score += 5;
        }
        if has_canonical {
            score += 5;
        }
        if has_og_type_and_url {
            score += 5;
        }

        QualityFactor::new(score)
            .with_detail("has_og_image", has_og_image)
            .with_detail("has_keywords", has_keywords)
            .with_detail("has_canonical", has_canonical)
            .with_detail("has_og_type_and_url", has_og_type_and_url)
    }

    fn readability_factor(&self, doc: &RawDocument) -> QualityFactor {
        // Placeholder band until a real readability model lands
        let score = if doc.word_count >= 200 {
            20
        } else if doc.word_count >= 100 {
            15
        } else {
            10
        };
        QualityFactor::new(score).with_detail("long_form", doc.word_count >= 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn doc_with_words(count: usize) -> RawDocument {
        RawDocument::new(
            "d1",
            "example",
            "https://example.com/a",
            "Title",
            "word ".repeat(count).trim_end(),
        )
    }

    #[test]
    fn test_word_count_bands() {
        let scorer = QualityScorer::default();
        let cases = [(50, 0), (100, 10), (299, 10), (300, 15), (499, 15), (500, 20), (999, 20), (1000, 25), (5000, 25)];
        for (words, expected) in cases {
            let (_, factors) = scorer.score(&doc_with_words(words));
            assert_eq!(factors.word_count.score, expected, "{} words", words);
        }
    }

    #[test]
    fn test_bare_document_scores_low() {
        let scorer = QualityScorer::default();
        let (total, factors) = scorer.score(&doc_with_words(10));
        // Title only: 5 metadata points; readability floor 10
        assert_eq!(factors.word_count.score, 0);
        assert_eq!(factors.metadata_completeness.score, 5);
        assert_eq!(factors.content_richness.score, 0);
        assert_eq!(factors.readability.score, 10);
        assert_eq!(total, 15);
    }

    #[test]
    fn test_fully_dressed_document_maxes_out() {
        let scorer = QualityScorer::default();
        let mut doc = doc_with_words(1200);
        doc.meta_description = "desc".to_string();
        doc.published_date = Some(Utc::now());
        doc.og_title = "og title".to_string();
        doc.og_image = "https://example.com/img.jpg".to_string();
        doc.og_type = "article".to_string();
        doc.og_url = "https://example.com/a".to_string();
        doc.meta_keywords = "news, sudbury".to_string();
        doc.canonical_url = "https://example.com/a".to_string();

        let (total, factors) = scorer.score(&doc);
        assert_eq!(factors.word_count.score, 25);
        assert_eq!(factors.metadata_completeness.score, 25);
        assert_eq!(factors.content_richness.score, 25);
        assert_eq!(factors.readability.score, 20);
        assert_eq!(total, 95);
    }

    #[test]
    fn test_score_bounded() {
        let scorer = QualityScorer::default();
        for words in [0, 99, 100, 1000, 100_000] {
            let (total, _) = scorer.score(&doc_with_words(words));
            assert!(total <= 100);
        }
    }
}
