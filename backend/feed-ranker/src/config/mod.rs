use crate::models::Subject;
use crate::services::ranking::{RankingError, ScoringWeights};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

const ENV_PREFIX: &str = "FEED_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read environment: {0}")]
    Env(#[from] envy::Error),

    #[error(transparent)]
    InvalidWeights(#[from] RankingError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub weights: ScoringWeights,
    pub classifier: ClassifierConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierConfig {
    /// Subject for posts whose text matches no keyword
    pub default_subject: Subject,
}

/// Raw `FEED_*` variables
#[derive(Debug, Deserialize)]
struct EnvConfig {
    #[serde(default = "default_weight_pref")]
    weight_pref: f64,
    #[serde(default = "default_weight_recency")]
    weight_recency: f64,
    #[serde(default = "default_weight_engage")]
    weight_engage: f64,
    #[serde(default = "default_weight_interact")]
    weight_interact: f64,
    #[serde(default = "default_subject", deserialize_with = "subject_from_str")]
    default_subject: Subject,
}

fn default_weight_pref() -> f64 {
    ScoringWeights::default().preference
}

fn default_weight_recency() -> f64 {
    ScoringWeights::default().recency
}

fn default_weight_engage() -> f64 {
    ScoringWeights::default().engagement
}

fn default_weight_interact() -> f64 {
    ScoringWeights::default().interaction
}

fn default_subject() -> Subject {
    Subject::News
}

/// Case-insensitive, same as `Subject::from_str`
fn subject_from_str<'de, D>(deserializer: D) -> Result<Subject, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl Config {
    /// Load from `FEED_*` environment variables (and `.env` if present).
    /// Weights are validated before returning.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let raw = envy::prefixed(ENV_PREFIX).from_env::<EnvConfig>()?;
        Self::from_raw(raw)
    }

    /// Same as `from_env` over an explicit variable set
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw = envy::prefixed(ENV_PREFIX).from_iter::<_, EnvConfig>(vars)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: EnvConfig) -> Result<Self, ConfigError> {
        let weights = ScoringWeights {
            preference: raw.weight_pref,
            recency: raw.weight_recency,
            engagement: raw.weight_engage,
            interaction: raw.weight_interact,
        };
        weights.validate()?;

        Ok(Config {
            weights,
            classifier: ClassifierConfig {
                default_subject: raw.default_subject,
            },
        })
    }
}
