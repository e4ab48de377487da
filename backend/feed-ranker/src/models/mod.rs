use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub type UserId = u64;
pub type PostId = u64;

/// Topical category assigned to a post at ingestion.
///
/// The declaration order is the numeric subject code used in post records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Subject {
    Math,
    Science,
    Sports,
    Tech,
    Movies,
    News,
}

impl Subject {
    pub const COUNT: usize = 6;

    pub const ALL: [Subject; Subject::COUNT] = [
        Subject::Math,
        Subject::Science,
        Subject::Sports,
        Subject::Tech,
        Subject::Movies,
        Subject::News,
    ];

    pub fn code(self) -> usize {
        self as usize
    }

    pub fn from_code(code: usize) -> Option<Self> {
        Self::ALL.get(code).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Subject::Math => "Math",
            Subject::Science => "Science",
            Subject::Sports => "Sports",
            Subject::Tech => "Tech",
            Subject::Movies => "Movies",
            Subject::News => "News",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown subject: {0}")]
pub struct UnknownSubject(pub String);

impl FromStr for Subject {
    type Err = UnknownSubject;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|subject| subject.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

/// One interest flag per subject. Subjects never set are "not interested".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectPreferences([bool; Subject::COUNT]);

impl SubjectPreferences {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_subjects(subjects: impl IntoIterator<Item = Subject>) -> Self {
        subjects
            .into_iter()
            .fold(Self::none(), |prefs, subject| prefs.with(subject, true))
    }

    pub fn with(mut self, subject: Subject, interested: bool) -> Self {
        self.0[subject.code()] = interested;
        self
    }

    pub fn is_interested(&self, subject: Subject) -> bool {
        self.0[subject.code()]
    }

    pub fn interested_subjects(&self) -> impl Iterator<Item = Subject> + '_ {
        Subject::ALL
            .into_iter()
            .filter(|subject| self.is_interested(*subject))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: UserId,
    pub preferences: SubjectPreferences,
    /// Prior interactions keyed by author id. Authors never interacted with are absent.
    pub interaction_counts: HashMap<UserId, u32>,
}

impl User {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            preferences: SubjectPreferences::none(),
            interaction_counts: HashMap::new(),
        }
    }

    pub fn with_preferences(mut self, preferences: SubjectPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn with_interactions(mut self, author_id: UserId, count: u32) -> Self {
        self.interaction_counts.insert(author_id, count);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub author_id: UserId,
    pub subject: Subject,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub likes: u32,
    pub comments: u32,
    pub shares: u32,
    pub timestamp: i64,
}

impl Post {
    /// Sum of likes, comments and shares.
    pub fn engagement(&self) -> u64 {
        u64::from(self.likes) + u64::from(self.comments) + u64::from(self.shares)
    }
}

/// A post paired with the relevance score it was ranked under.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoredPost<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    pub score: f64,
}

impl<'a> ScoredPost<'a> {
    pub fn new(post: &'a Post, score: f64) -> Self {
        Self { post, score }
    }

    pub fn post_id(&self) -> PostId {
        self.post.id
    }

    pub fn author_id(&self) -> UserId {
        self.post.author_id
    }

    pub fn subject(&self) -> Subject {
        self.post.subject
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_codes_follow_declaration_order() {
        for (code, subject) in Subject::ALL.iter().enumerate() {
            assert_eq!(subject.code(), code);
            assert_eq!(Subject::from_code(code), Some(*subject));
        }
        assert_eq!(Subject::from_code(Subject::COUNT), None);
    }

    #[test]
    fn test_subject_from_str_ignores_case() {
        assert_eq!("tech".parse::<Subject>(), Ok(Subject::Tech));
        assert_eq!(" MOVIES ".parse::<Subject>(), Ok(Subject::Movies));
        assert!("cooking".parse::<Subject>().is_err());
    }

    #[test]
    fn test_preferences_default_to_not_interested() {
        let prefs = SubjectPreferences::from_subjects([Subject::Tech, Subject::News]);

        assert!(prefs.is_interested(Subject::Tech));
        assert!(prefs.is_interested(Subject::News));
        assert!(!prefs.is_interested(Subject::Math));
        assert_eq!(
            prefs.interested_subjects().collect::<Vec<_>>(),
            vec![Subject::Tech, Subject::News]
        );

        let prefs = prefs.with(Subject::Tech, false);
        assert!(!prefs.is_interested(Subject::Tech));
    }

    #[test]
    fn test_engagement_does_not_overflow() {
        let post = Post {
            id: 1,
            author_id: 1,
            subject: Subject::News,
            text: None,
            likes: u32::MAX,
            comments: u32::MAX,
            shares: u32::MAX,
            timestamp: 0,
        };
        assert_eq!(post.engagement(), 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_scored_post_serializes_flat() {
        let post = Post {
            id: 3,
            author_id: 7,
            subject: Subject::Tech,
            text: None,
            likes: 1,
            comments: 2,
            shares: 3,
            timestamp: 2024,
        };
        let value = serde_json::to_value(ScoredPost::new(&post, 12.5)).unwrap();

        assert_eq!(value["id"], 3);
        assert_eq!(value["author_id"], 7);
        assert_eq!(value["subject"], "tech");
        assert_eq!(value["score"], 12.5);
        assert!(value.get("text").is_none());
    }
}
