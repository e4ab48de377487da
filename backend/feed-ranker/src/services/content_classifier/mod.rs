// ============================================
// Subject Classifier (主題分類器)
// ============================================
//
// Assigns a Subject to free-text posts by keyword matching.
//
// Subjects are tested in declaration order and the first subject with any
// keyword occurring in the lowercased text wins. Matching is by substring, so
// "ai" hits inside "said"; callers wanting word matches should supply longer
// keywords through `with_keywords`.

use crate::models::Subject;
use thiserror::Error;
use tracing::debug;

// ============================================
// Error Types
// ============================================

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClassifierError {
    #[error("Empty keyword for subject {0}")]
    EmptyKeyword(Subject),
}

pub type Result<T> = std::result::Result<T, ClassifierError>;

const DEFAULT_KEYWORDS: [(Subject, [&str; 3]); Subject::COUNT] = [
    (Subject::Math, ["math", "algebra", "calculus"]),
    (Subject::Science, ["science", "physics", "chemistry"]),
    (Subject::Sports, ["sports", "football", "cricket"]),
    (Subject::Tech, ["tech", "ai", "robot"]),
    (Subject::Movies, ["movies", "film", "cinema"]),
    (Subject::News, ["news", "politics", "world"]),
];

// ============================================
// Subject Classifier
// ============================================

#[derive(Debug, Clone, PartialEq)]
pub struct SubjectClassifier {
    /// Lowercased keywords per subject, in match priority order
    keywords: Vec<(Subject, Vec<String>)>,
    /// Subject assigned when nothing matches
    default_subject: Subject,
}

impl Default for SubjectClassifier {
    fn default() -> Self {
        Self::new(Subject::News)
    }
}

impl SubjectClassifier {
    /// Built-in keyword table with a custom fallback subject
    pub fn new(default_subject: Subject) -> Self {
        let keywords = DEFAULT_KEYWORDS
            .iter()
            .map(|(subject, words)| (*subject, words.iter().map(|w| w.to_string()).collect()))
            .collect();

        Self {
            keywords,
            default_subject,
        }
    }

    /// Replace the keyword table. Order of `keywords` is match priority.
    pub fn with_keywords(
        mut self,
        keywords: impl IntoIterator<Item = (Subject, Vec<String>)>,
    ) -> Result<Self> {
        let mut table = Vec::new();
        for (subject, words) in keywords {
            let mut lowered = Vec::with_capacity(words.len());
            for word in words {
                let word = word.trim().to_lowercase();
                if word.is_empty() {
                    return Err(ClassifierError::EmptyKeyword(subject));
                }
                lowered.push(word);
            }
            table.push((subject, lowered));
        }

        self.keywords = table;
        Ok(self)
    }

    pub fn default_subject(&self) -> Subject {
        self.default_subject
    }

    /// First subject whose keywords occur in `text`, if any
    pub fn classify(&self, text: &str) -> Option<Subject> {
        let text = text.to_lowercase();

        self.keywords
            .iter()
            .find(|(_, words)| words.iter().any(|word| text.contains(word.as_str())))
            .map(|(subject, _)| *subject)
    }

    /// Like `classify`, falling back to the default subject
    pub fn classify_or_default(&self, text: &str) -> Subject {
        self.classify(text).unwrap_or_else(|| {
            debug!(
                default_subject = %self.default_subject,
                "No subject keyword matched, using default"
            );
            self.default_subject
        })
    }
}

// ============================================
// Tests
// ============================================
