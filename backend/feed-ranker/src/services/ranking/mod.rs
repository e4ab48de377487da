/// Ranking Module
///
/// Scores posts for one user and orders them into a feed.
///
/// # Architecture
/// - **Scoring Layer**: `ScoreEngine`, a pure weighted sum of preference,
///   recency, engagement and interaction signals
/// - **Ordering Layer**: `Ranker`, descending score with ascending post id as
///   the tie-break
///
/// # Workflow
/// 1. Score every candidate once against the caller-supplied reference time
/// 2. Sort by (score desc, id asc) into a new vector of references
/// 3. Hand the order to the feed assembler for display
pub mod ranker;
pub mod scorer;

pub use ranker::Ranker;
pub use scorer::{interaction_count, ScoreBreakdown, ScoreEngine, ScoringWeights};

use crate::models::UserId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RankingError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Invalid weight configuration: {weight} = {value} (must be finite and non-negative)")]
    InvalidWeightConfiguration { weight: &'static str, value: f64 },
}

pub type Result<T> = std::result::Result<T, RankingError>;
