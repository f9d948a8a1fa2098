//! Reputation scoring and observation updates

use std::sync::Arc;

use chrono::Utc;

use newsflow_core::{ReputationStore, Result, SourceRank, SourceReputationRecord};

/// Reputation scoring parameters
#[derive(Debug, Clone)]
pub struct ReputationConfig {
    /// Score assigned to a source on first sight
    pub default_score: u8,
    /// Quality scores below this count as spam observations
    pub spam_threshold: u8,
    /// Weight of the spam ratio when decaying the score
    pub decay_rate: f64,
    /// Minimum classified articles before a source can rank trusted
    pub min_articles_for_trust: u64,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            default_score: 50,
            spam_threshold: 30,
            decay_rate: 0.1,
            min_articles_for_trust: 10,
        }
    }
}

/// Source reputation scorer over an external store
///
/// The read-modify-write update is not atomic across workers; under
/// heavy concurrency `total_articles` may drift by a small number. The
/// store contract tolerates this.
pub struct ReputationScorer {
    store: Arc<dyn ReputationStore>,
    config: ReputationConfig,
}

impl ReputationScorer {
    pub fn new(store: Arc<dyn ReputationStore>, config: ReputationConfig) -> Self {
        Self { store, config }
    }

    /// Current (score, category, rank) for a source, creating the record
    /// on first sight
    pub async fn read(&self, source_name: &str) -> Result<(u8, String, SourceRank)> {
        let record = self
            .store
            .get_or_create(source_name, self.config.default_score)
            .await?;
        let rank = self.rank(&record);
        Ok((record.reputation_score, record.category, rank))
    }

    /// Fold one classified article into the source's record
    pub async fn record_observation(
        &self,
        source_name: &str,
        quality_score: u8,
        is_spam: bool,
    ) -> Result<()> {
        let mut record = self
            .store
            .get_or_create(source_name, self.config.default_score)
            .await?;

        record.total_articles += 1;
        if record.total_articles == 1 {
            record.avg_quality = quality_score as f64;
        } else {
            let total = record.total_articles as f64;
            record.avg_quality = (record.avg_quality * (total - 1.0) + quality_score as f64) / total;
        }
        if quality_score < self.config.spam_threshold || is_spam {
            record.spam_count += 1;
        }
        record.reputation_score = self.compute_score(&record);
        record.last_classified_at = Some(Utc::now());

        self.store.update(&record).await
    }

    /// Recompute the 0..=100 reputation score from a record
    pub fn compute_score(&self, record: &SourceReputationRecord) -> u8 {
        if record.total_articles == 0 {
            return self.config.default_score;
        }
        let spam_ratio = record.spam_ratio();
        let mut score = record.avg_quality * (1.0 - spam_ratio * self.config.decay_rate);

        // Trust boost for consistently good, low-spam sources
        if record.total_articles >= self.config.min_articles_for_trust
            && record.avg_quality >= 70.0
            && spam_ratio < 0.05
        {
            score *= 1.1;
        }

        score.clamp(0.0, 100.0) as u8
    }

    /// Rank tier for a record
    pub fn rank(&self, record: &SourceReputationRecord) -> SourceRank {
        let score = record.reputation_score;
        if score >= 75 && record.total_articles >= self.config.min_articles_for_trust {
            SourceRank::Trusted
        } else if score >= 50 {
            SourceRank::Moderate
        } else if score >= 30 {
            SourceRank::Low
        } else {
            SourceRank::Spam
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryReputationStore;

    fn scorer() -> ReputationScorer {
        ReputationScorer::new(
            Arc::new(InMemoryReputationStore::new()),
            ReputationConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_first_sight_defaults() {
        let scorer = scorer();
        let (score, category, rank) = scorer.read("fresh-source").await.unwrap();
        assert_eq!(score, 50);
        assert_eq!(category, "unknown");
        assert_eq!(rank, SourceRank::Moderate);
    }

    #[tokio::test]
    async fn test_rolling_average() {
        let scorer = scorer();
        scorer.record_observation("src", 80, false).await.unwrap();
        scorer.record_observation("src", 60, false).await.unwrap();
        let (score, _, _) = scorer.read("src").await.unwrap();
        // avg 70, no spam, below trust count: score = 70
        assert_eq!(score, 70);
    }

    #[tokio::test]
    async fn test_spam_decay() {
        let scorer = scorer();
        for _ in 0..5 {
            scorer.record_observation("spammy", 80, false).await.unwrap();
        }
        for _ in 0..5 {
            scorer.record_observation("spammy", 10, false).await.unwrap();
        }
        let (score, _, _) = scorer.read("spammy").await.unwrap();
        // avg 45, spam ratio 0.5: 45 * (1 - 0.05) = 42.75 -> 42
        assert_eq!(score, 42);
    }

    #[tokio::test]
    async fn test_trust_boost_and_rank() {
        let scorer = scorer();
        for _ in 0..10 {
            scorer.record_observation("quality", 80, false).await.unwrap();
        }
        let (score, _, rank) = scorer.read("quality").await.unwrap();
        // avg 80, boost 1.1: 88
        assert_eq!(score, 88);
        assert_eq!(rank, SourceRank::Trusted);
    }

    #[tokio::test]
    async fn test_trusted_requires_article_count() {
        // Rank consistency: trusted demands both score and volume
        let scorer = scorer();
        for _ in 0..5 {
            scorer.record_observation("young", 90, false).await.unwrap();
        }
        let (score, _, rank) = scorer.read("young").await.unwrap();
        assert!(score >= 75);
        assert_eq!(rank, SourceRank::Moderate);
    }

    #[tokio::test]
    async fn test_explicit_spam_flag_counts() {
        let scorer = scorer();
        scorer.record_observation("flagged", 80, true).await.unwrap();
        scorer.record_observation("flagged", 80, false).await.unwrap();
        let (score, _, _) = scorer.read("flagged").await.unwrap();
        // avg 80, spam ratio 0.5: 80 * 0.95 = 76
        assert_eq!(score, 76);
    }

    #[tokio::test]
    async fn test_rank_tiers() {
        let scorer = scorer();
        let mut record = SourceReputationRecord::new("x", 50);
        record.total_articles = 20;

        record.reputation_score = 80;
        assert_eq!(scorer.rank(&record), SourceRank::Trusted);
        record.reputation_score = 60;
        assert_eq!(scorer.rank(&record), SourceRank::Moderate);
        record.reputation_score = 35;
        assert_eq!(scorer.rank(&record), SourceRank::Low);
        record.reputation_score = 10;
        assert_eq!(scorer.rank(&record), SourceRank::Spam);
    }
}
