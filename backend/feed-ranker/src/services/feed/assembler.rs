use crate::models::{Post, ScoredPost, User};
use crate::services::ranking::ScoreEngine;

/// Feed Assembler - pairs ranked posts with their scores for display
///
/// Scores are recomputed here rather than carried over from the ranker, so
/// the two stay independently testable. Order is preserved as given.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FeedAssembler {
    engine: ScoreEngine,
}

impl FeedAssembler {
    pub fn new(engine: ScoreEngine) -> Self {
        Self { engine }
    }

    pub fn assemble<'a>(
        &self,
        ranked_posts: &[&'a Post],
        user: &User,
        reference_time: i64,
    ) -> Vec<ScoredPost<'a>> {
        ranked_posts
            .iter()
            .map(|&post| ScoredPost::new(post, self.engine.score(user, post, reference_time)))
            .collect()
    }
}
