/// Feed Module
///
/// Entry point for a single feed request: resolve the user, rank the post
/// snapshot, attach scores for display.
pub mod assembler;

pub use assembler::FeedAssembler;

use crate::models::{Post, ScoredPost, User, UserId};
use crate::services::ranking::{RankingError, Ranker, Result, ScoreEngine, ScoringWeights};
use tracing::info;

/// Feed Service - Ranker → FeedAssembler for one user
///
/// Holds only weights, so one instance can serve concurrent requests over a
/// shared read-only snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedService {
    ranker: Ranker,
    assembler: FeedAssembler,
}

impl FeedService {
    pub fn new(weights: ScoringWeights) -> Result<Self> {
        Ok(Self::with_engine(ScoreEngine::new(weights)?))
    }

    pub fn with_engine(engine: ScoreEngine) -> Self {
        Self {
            ranker: Ranker::new(engine),
            assembler: FeedAssembler::new(engine),
        }
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    /// Rank `posts` for the user with `user_id`.
    ///
    /// Returns `RankingError::UserNotFound` when no loaded user matches.
    pub fn rank_feed<'a>(
        &self,
        user_id: UserId,
        posts: &'a [Post],
        users: &[User],
        reference_time: i64,
    ) -> Result<Vec<ScoredPost<'a>>> {
        let user = users
            .iter()
            .find(|user| user.id == user_id)
            .ok_or(RankingError::UserNotFound(user_id))?;

        Ok(self.rank_feed_for(user, posts, reference_time))
    }

    /// Rank `posts` for an already resolved user
    pub fn rank_feed_for<'a>(
        &self,
        user: &User,
        posts: &'a [Post],
        reference_time: i64,
    ) -> Vec<ScoredPost<'a>> {
        let ranked = self.ranker.rank(posts, user, reference_time);
        let feed = self.assembler.assemble(&ranked, user, reference_time);

        info!(
            user_id = user.id,
            post_count = feed.len(),
            reference_time = reference_time,
            "Feed ranked"
        );

        feed
    }
}
