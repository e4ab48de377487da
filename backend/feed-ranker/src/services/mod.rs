pub mod content_classifier;
pub mod feed;
pub mod ranking;

pub use content_classifier::SubjectClassifier;
pub use feed::{FeedAssembler, FeedService};
pub use ranking::{Ranker, RankingError, ScoreEngine, ScoringWeights};
