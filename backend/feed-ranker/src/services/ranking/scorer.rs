// ============================================
// Score Engine (相關性打分)
// ============================================
//
// score = w_pref     * [user prefers post.subject]
//       + w_recency  * recency_factor(reference_time, post.timestamp)
//       + w_engage   * (likes + comments + shares)
//       + w_interact * interactions(user, post.author_id)
//
// Pure: no clock reads, no caching, no writes to user or post.

use super::{RankingError, Result};
use crate::models::{Post, User, UserId};
use crate::utils::recency_factor;
use serde::Serialize;
use tracing::debug;

/// Fixed weights for the four relevance signals
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeights {
    /// Bonus when the user is interested in the post's subject
    pub preference: f64,
    /// Multiplier on the recency factor
    pub recency: f64,
    /// Multiplier on total engagement
    pub engagement: f64,
    /// Multiplier on prior interactions with the author
    pub interaction: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            preference: 2.0,
            recency: 3.0,
            engagement: 1.5,
            interaction: 2.5,
        }
    }
}

impl ScoringWeights {
    /// Reject NaN, infinite and negative weights.
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("preference", self.preference),
            ("recency", self.recency),
            ("engagement", self.engagement),
            ("interaction", self.interaction),
        ];

        for (weight, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(RankingError::InvalidWeightConfiguration { weight, value });
            }
        }

        Ok(())
    }
}

/// Weighted contribution of each signal to a post's score
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub preference: f64,
    pub recency: f64,
    pub engagement: f64,
    pub interaction: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.preference + self.recency + self.engagement + self.interaction
    }
}

/// Prior interactions `user` has had with `author_id`; 0 when none are recorded.
pub fn interaction_count(user: &User, author_id: UserId) -> u32 {
    user.interaction_counts
        .get(&author_id)
        .copied()
        .unwrap_or(0)
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScoreEngine {
    weights: ScoringWeights,
}

impl ScoreEngine {
    /// Create an engine after validating `weights`
    pub fn new(weights: ScoringWeights) -> Result<Self> {
        weights.validate()?;
        Ok(Self { weights })
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Relevance of `post` for `user` at `reference_time`
    pub fn score(&self, user: &User, post: &Post, reference_time: i64) -> f64 {
        self.breakdown(user, post, reference_time).total()
    }

    /// Per-signal contributions; `score` is their sum
    pub fn breakdown(&self, user: &User, post: &Post, reference_time: i64) -> ScoreBreakdown {
        let preferred = if user.preferences.is_interested(post.subject) {
            1.0
        } else {
            0.0
        };
        let recency = recency_factor(reference_time, post.timestamp);
        let engagement = post.engagement() as f64;
        let interactions = f64::from(interaction_count(user, post.author_id));

        let breakdown = ScoreBreakdown {
            preference: self.weights.preference * preferred,
            recency: self.weights.recency * recency,
            engagement: self.weights.engagement * engagement,
            interaction: self.weights.interaction * interactions,
        };

        debug!(
            user_id = user.id,
            post_id = post.id,
            preference = breakdown.preference,
            recency = breakdown.recency,
            engagement = breakdown.engagement,
            interaction = breakdown.interaction,
            "Post score computed"
        );

        breakdown
    }
}
