pub mod config;
pub mod loader;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use models::{Post, ScoredPost, Subject, SubjectPreferences, User};
pub use services::{
    FeedAssembler, FeedService, Ranker, RankingError, ScoreEngine, ScoringWeights,
    SubjectClassifier,
};
