//! Default values for classifier tuning parameters
//!
//! Operational defaults only; the live values come from `Settings` and can
//! be overridden per deployment.

/// Quality scoring defaults
pub mod quality {
    /// Below this word count the word-count component scores zero
    pub const MIN_WORD_COUNT: u32 = 100;

    /// At or above this word count the word-count component maxes out
    pub const OPTIMAL_WORD_COUNT: u32 = 1000;
}

/// Source reputation defaults
pub mod reputation {
    /// Score assigned to a source on first sight
    pub const DEFAULT_SCORE: u8 = 50;

    /// Quality scores below this count as spam observations
    pub const SPAM_THRESHOLD: u8 = 30;

    /// Weight of the spam ratio when decaying the reputation score
    pub const DECAY_RATE: f64 = 0.1;

    /// Minimum classified articles before a source can rank as trusted
    pub const MIN_ARTICLES_FOR_TRUST: u64 = 10;
}

/// ML sidecar call defaults
pub mod sidecars {
    /// Per-call timeout for ML sidecar requests (ms)
    pub const REQUEST_TIMEOUT_MS: u64 = 5_000;

    /// Body text is truncated to this many characters before rule
    /// evaluation and ML calls
    pub const BODY_TRUNCATE_CHARS: usize = 500;
}

/// Topic classification defaults
pub mod topics {
    /// Confidence used in the overall score when no topic rule matched
    pub const NO_TOPIC_CONFIDENCE: f32 = 0.3;
}
