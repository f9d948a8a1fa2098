//! Content-type classification
//!
//! Strategies run in a fixed order and the first hit wins:
//! 1. URL exclusions (section indexes, auth pages, pagination, homepages)
//! 2. Open Graph metadata
//! 3. Listing-page content patterns
//! 4. Article heuristics
//! 5. Default (`page`)

use url::Url;

use newsflow_core::{ContentType, RawDocument};

/// Path prefixes that are never articles. A prefix `X` matches exactly
/// `X`, `X/`, and `X/<anything>`.
const EXCLUDED_PREFIXES: &[&str] = &[
    // Account and auth
    "/account",
    "/login",
    "/signin",
    "/signup",
    "/register",
    // Classifieds and advertising
    "/classifieds",
    "/classified",
    "/ads",
    "/advertisements",
    // Directory and submissions
    "/directory",
    "/submit",
    "/submissions",
    // Browsing and navigation
    "/category",
    "/categories",
    "/browse",
    "/listings",
    "/search",
    "/results",
];

/// Section index paths excluded only on exact match; article slugs
/// beneath them fall through to the later strategies.
const SECTION_INDEX_PATHS: &[&str] = &[
    "/news",
    "/articles",
    "/stories",
    "/posts",
    "/blog",
    "/ontario-news",
    "/local-news",
    "/breaking-news",
];

/// Query parameters that flag a paginated listing when numeric
const PAGINATION_PARAMS: &[&str] = &[
    "page",
    "p",
    "pagenum",
    "paged",
    "page_num",
    "page_number",
    "offset",
    "start",
    "from",
];

const READ_MORE_PHRASES: &[&str] = &["read more", "continue reading", "full story"];

const MONTH_PREFIXES: &[&str] = &[
    "jan ", "feb ", "mar ", "apr ", "may ", "jun ", "jul ", "aug ", "sep ", "oct ", "nov ", "dec ",
];

const CANADIAN_DATELINES: &[&str] = &[
    "toronto —",
    "ottawa —",
    "ontario —",
    "vancouver —",
    "montreal —",
    "calgary —",
    "edmonton —",
];

/// Outcome of content-type classification
#[derive(Debug, Clone, PartialEq)]
pub struct TypeVerdict {
    pub content_type: ContentType,
    pub confidence: f32,
    pub method: &'static str,
    pub reason: String,
}

impl TypeVerdict {
    fn new(
        content_type: ContentType,
        confidence: f32,
        method: &'static str,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            content_type,
            confidence,
            method,
            reason: reason.into(),
        }
    }
}

/// Rule-driven content-type classifier
#[derive(Debug, Default)]
pub struct ContentTypeClassifier;

impl ContentTypeClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, doc: &RawDocument) -> TypeVerdict {
        if let Some(verdict) = self.check_url_exclusion(&doc.url) {
            return verdict;
        }
        if let Some(verdict) = self.check_og_type(&doc.og_type) {
            return verdict;
        }
        if let Some(verdict) = self.check_listing_patterns(&doc.raw_text) {
            return verdict;
        }
        if self.looks_like_article(doc) {
            return TypeVerdict::new(
                ContentType::Article,
                0.75,
                "heuristic",
                "word count, title, published date and description present",
            );
        }
        TypeVerdict::new(ContentType::Page, 0.6, "default", "no strategy matched")
    }

    /// Strategy 1: URL exclusion (confidence 0.9)
    fn check_url_exclusion(&self, raw_url: &str) -> Option<TypeVerdict> {
        let parsed = match Url::parse(raw_url) {
            Ok(parsed) => parsed,
            Err(_) => {
                // Unparseable URL: fall back to a substring scan over the
                // same prefix list.
                let lowered = raw_url.to_lowercase();
                let hit = EXCLUDED_PREFIXES.iter().find(|p| lowered.contains(*p))?;
                return Some(TypeVerdict::new(
                    ContentType::Page,
                    0.9,
                    "url_exclusion",
                    format!("unparseable URL contains excluded prefix {}", hit),
                ));
            }
        };

        let path = parsed.path().to_lowercase();

        if path.is_empty() || path == "/" {
            return Some(TypeVerdict::new(
                ContentType::Page,
                0.9,
                "url_exclusion",
                "homepage",
            ));
        }

        for prefix in EXCLUDED_PREFIXES {
            if path == *prefix || path.starts_with(&format!("{}/", prefix)) {
                return Some(TypeVerdict::new(
                    ContentType::Page,
                    0.9,
                    "url_exclusion",
                    format!("excluded path prefix {}", prefix),
                ));
            }
        }

        let trimmed = path.trim_end_matches('/');
        for section in SECTION_INDEX_PATHS {
            if trimmed == *section {
                return Some(TypeVerdict::new(
                    ContentType::Page,
                    0.9,
                    "url_exclusion",
                    format!("section index {}", section),
                ));
            }
        }

        for (key, value) in parsed.query_pairs() {
            let key = key.to_lowercase();
            if key == "returnurl" || key == "redirect" {
                return Some(TypeVerdict::new(
                    ContentType::Page,
                    0.9,
                    "url_exclusion",
                    format!("redirect parameter {}", key),
                ));
            }
            if PAGINATION_PARAMS.contains(&key.as_str()) && value.parse::<u64>().is_ok() {
                return Some(TypeVerdict::new(
                    ContentType::Page,
                    0.9,
                    "url_exclusion",
                    format!("pagination parameter {}={}", key, value),
                ));
            }
        }

        None
    }

    /// Strategy 2: Open Graph type (confidence 1.0)
    ///
    /// `website`, empty, and unknown values all fall through.
    fn check_og_type(&self, og_type: &str) -> Option<TypeVerdict> {
        let og = og_type.trim().to_lowercase();
        if og.is_empty() || og == "website" {
            return None;
        }
        let content_type = if og == "news" || og.contains("article") {
            ContentType::Article
        } else if og.contains("video") {
            ContentType::Video
        } else if og.contains("image") {
            ContentType::Image
        } else {
            return None;
        };
        Some(TypeVerdict::new(
            content_type,
            1.0,
            "og_metadata",
            format!("og:type {}", og),
        ))
    }

    /// Strategy 3: listing-page content patterns (confidence 0.85)
    fn check_listing_patterns(&self, body: &str) -> Option<TypeVerdict> {
        let lowered = body.to_lowercase();

        let read_more: usize = READ_MORE_PHRASES
            .iter()
            .map(|p| count_occurrences(&lowered, p))
            .sum();
        if read_more >= 3 {
            return Some(TypeVerdict::new(
                ContentType::Page,
                0.85,
                "content_pattern",
                format!("{} read-more markers", read_more),
            ));
        }

        let months: usize = MONTH_PREFIXES
            .iter()
            .map(|p| count_occurrences(&lowered, p))
            .sum();
        if months >= 5 {
            return Some(TypeVerdict::new(
                ContentType::Page,
                0.85,
                "content_pattern",
                format!("{} month mentions", months),
            ));
        }

        let datelines: usize = CANADIAN_DATELINES
            .iter()
            .map(|p| count_occurrences(&lowered, p))
            .sum();
        if datelines >= 3 {
            return Some(TypeVerdict::new(
                ContentType::Page,
                0.85,
                "content_pattern",
                format!("{} datelines", datelines),
            ));
        }

        None
    }

    /// Strategy 4: article heuristic (confidence 0.75)
    fn looks_like_article(&self, doc: &RawDocument) -> bool {
        doc.word_count >= 200
            && !doc.title.is_empty()
            && doc.published_date.is_some()
            && doc.has_description()
    }
}

fn count_occurrences(haystack: &str, needle: &str) -> usize {
    haystack.match_indices(needle).count()
}
