use super::scorer::ScoreEngine;
use crate::models::{Post, User};
use std::cmp::Ordering;
use tracing::debug;

/// Ranker - orders posts for one user by descending relevance
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Ranker {
    engine: ScoreEngine,
}

impl Ranker {
    pub fn new(engine: ScoreEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &ScoreEngine {
        &self.engine
    }

    /// Order `posts` by descending score, ascending post id on ties.
    ///
    /// Every post is scored exactly once before sorting starts. The input is
    /// left untouched; the result is a new vector of references into it.
    pub fn rank<'a, I>(&self, posts: I, user: &User, reference_time: i64) -> Vec<&'a Post>
    where
        I: IntoIterator<Item = &'a Post>,
    {
        let mut scored: Vec<(&'a Post, f64)> = posts
            .into_iter()
            .map(|post| (post, self.engine.score(user, post, reference_time)))
            .collect();

        // Stable, so duplicate ids with equal scores keep their input order
        scored.sort_by(by_relevance);

        debug!(
            user_id = user.id,
            post_count = scored.len(),
            reference_time = reference_time,
            "Posts ranked"
        );

        scored.into_iter().map(|(post, _)| post).collect()
    }
}

/// Descending score, then ascending id. `total_cmp` keeps this a total order
/// even if a score were ever NaN.
fn by_relevance(a: &(&Post, f64), b: &(&Post, f64)) -> Ordering {
    b.1.total_cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id))
}
