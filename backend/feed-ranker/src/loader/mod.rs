//! Record loading for users and posts
//!
//! Both files are comma-delimited with one header line. The parsers work on
//! in-memory text; `load_users` / `load_posts` read the file and delegate.
//!
//! users: `user_id, P0..P5, I0..In`: six preference flags in subject order,
//! then interaction counts where the column index is the author id.
//!
//! posts: `post_id, author_id, subject, likes, comments, shares, timestamp`
//! where `subject` is either a numeric subject code or free text to classify.

use crate::models::{Post, PostId, Subject, SubjectPreferences, User, UserId};
use crate::services::content_classifier::SubjectClassifier;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, warn};

const POST_COLUMNS: usize = 7;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing header line")]
    MissingHeader,

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Duplicate user id: {0}")]
    DuplicateUser(UserId),
}

pub type Result<T> = std::result::Result<T, LoaderError>;

fn malformed(line: usize, reason: impl Into<String>) -> LoaderError {
    LoaderError::MalformedRecord {
        line,
        reason: reason.into(),
    }
}

fn parse_field<T: FromStr>(raw: &str, line: usize, field: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| malformed(line, format!("invalid {field}: {raw:?}")))
}

/// Non-negative counter that fits in u32
fn parse_count(raw: &str, line: usize, field: &str) -> Result<u32> {
    let value: i64 = parse_field(raw, line, field)?;
    if value < 0 {
        return Err(malformed(line, format!("negative {field}: {value}")));
    }
    u32::try_from(value).map_err(|_| malformed(line, format!("{field} out of range: {value}")))
}

/// Data lines as (1-based line number, raw line, trimmed fields), header and
/// blank lines removed
fn records(content: &str) -> Result<impl Iterator<Item = (usize, &str, Vec<&str>)>> {
    let mut lines = content.lines().enumerate();
    match lines.next() {
        Some((_, header)) if !header.trim().is_empty() => {}
        _ => return Err(LoaderError::MissingHeader),
    }

    Ok(lines
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line, line.split(',').map(str::trim).collect())))
}

pub fn parse_users(content: &str) -> Result<Vec<User>> {
    let mut users = Vec::new();
    let mut seen = HashSet::new();

    for (line, _, fields) in records(content)? {
        if fields.len() < 1 + Subject::COUNT {
            return Err(malformed(
                line,
                format!(
                    "expected at least {} columns, found {}",
                    1 + Subject::COUNT,
                    fields.len()
                ),
            ));
        }

        let id: UserId = parse_field(fields[0], line, "user_id")?;

        let mut preferences = SubjectPreferences::none();
        for (subject, raw) in Subject::ALL.iter().zip(&fields[1..=Subject::COUNT]) {
            let flag: i64 = parse_field(raw, line, "preference flag")?;
            preferences = preferences.with(*subject, flag != 0);
        }

        let mut interaction_counts = HashMap::new();
        for (author_id, raw) in fields[1 + Subject::COUNT..].iter().enumerate() {
            if raw.is_empty() {
                continue;
            }
            let count = parse_count(raw, line, "interaction count")?;
            if count > 0 {
                interaction_counts.insert(author_id as UserId, count);
            }
        }

        if !seen.insert(id) {
            return Err(LoaderError::DuplicateUser(id));
        }

        users.push(User {
            id,
            preferences,
            interaction_counts,
        });
    }

    Ok(users)
}

pub fn parse_posts(content: &str, classifier: &SubjectClassifier) -> Result<Vec<Post>> {
    let mut posts = Vec::new();
    let mut seen: HashSet<PostId> = HashSet::new();

    for (line, raw_line, fields) in records(content)? {
        if fields.len() < POST_COLUMNS {
            return Err(malformed(
                line,
                format!("expected {POST_COLUMNS} columns, found {}", fields.len()),
            ));
        }

        let id: PostId = parse_field(fields[0], line, "post_id")?;
        let author_id: UserId = parse_field(fields[1], line, "author_id")?;

        // Free text may itself contain commas; the last four columns are fixed
        let counters = &fields[fields.len() - 4..];
        let middle = &fields[2..fields.len() - 4];

        let (subject, text) = match middle {
            [raw] if raw.parse::<i64>().is_ok() => {
                let code: i64 = parse_field(raw, line, "subject code")?;
                let subject = usize::try_from(code)
                    .ok()
                    .and_then(Subject::from_code)
                    .ok_or_else(|| malformed(line, format!("subject code out of range: {code}")))?;
                (subject, None)
            }
            _ => {
                let text = raw_text(raw_line).to_string();
                (classifier.classify_or_default(&text), Some(text))
            }
        };

        let post = Post {
            id,
            author_id,
            subject,
            text,
            likes: parse_count(counters[0], line, "likes")?,
            comments: parse_count(counters[1], line, "comments")?,
            shares: parse_count(counters[2], line, "shares")?,
            timestamp: parse_field(counters[3], line, "timestamp")?,
        };

        if !seen.insert(id) {
            warn!(post_id = id, line = line, "Duplicate post id");
        }

        posts.push(post);
    }

    Ok(posts)
}

/// Text column as written: everything between the second comma and the fourth
/// comma from the end, trimmed only at its ends
fn raw_text(raw_line: &str) -> &str {
    let rest = raw_line.splitn(3, ',').nth(2).unwrap_or_default();
    rest.rsplitn(5, ',').nth(4).unwrap_or_default().trim()
}

async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })
}

pub async fn load_users(path: impl AsRef<Path>) -> Result<Vec<User>> {
    let path = path.as_ref();
    let users = parse_users(&read(path).await?)?;
    info!(path = %path.display(), user_count = users.len(), "Users loaded");
    Ok(users)
}

pub async fn load_posts(
    path: impl AsRef<Path>,
    classifier: &SubjectClassifier,
) -> Result<Vec<Post>> {
    let path = path.as_ref();
    let posts = parse_posts(&read(path).await?, classifier)?;
    info!(path = %path.display(), post_count = posts.len(), "Posts loaded");
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: &str = "\
user_id,P0,P1,P2,P3,P4,P5,I0,I1,I2,I3
1,0,0,0,1,0,0,0,2,0,5
2,1,1,0,0,0,1,0,0,0,0
";

    #[test]
    fn test_parse_users() {
        let users = parse_users(USERS).unwrap();
        assert_eq!(users.len(), 2);

        let u1 = &users[0];
        assert_eq!(u1.id, 1);
        assert!(u1.preferences.is_interested(Subject::Tech));
        assert!(!u1.preferences.is_interested(Subject::Math));
        assert_eq!(u1.interaction_counts.get(&1), Some(&2));
        assert_eq!(u1.interaction_counts.get(&3), Some(&5));
        // zero counts are not stored
        assert!(!u1.interaction_counts.contains_key(&0));

        let u2 = &users[1];
        assert_eq!(
            u2.preferences.interested_subjects().collect::<Vec<_>>(),
            vec![Subject::Math, Subject::Science, Subject::News]
        );
        assert!(u2.interaction_counts.is_empty());
    }

    #[test]
    fn test_parse_users_without_interaction_columns() {
        let users = parse_users("id,p0,p1,p2,p3,p4,p5\n7,0,0,1,0,0,0\n\n").unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].preferences.is_interested(Subject::Sports));
        assert!(users[0].interaction_counts.is_empty());
    }

    #[test]
    fn test_parse_users_rejects_bad_records() {
        let err = parse_users("header\n1,0,0\n").unwrap_err();
        assert!(matches!(err, LoaderError::MalformedRecord { line: 2, .. }));

        let err = parse_users("header\n1,0,0,0,0,0,0,-3\n").unwrap_err();
        match err {
            LoaderError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("negative"));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_users("header\nabc,0,0,0,0,0,0\n").unwrap_err();
        assert!(matches!(err, LoaderError::MalformedRecord { .. }));

        let err = parse_users("header\n1,0,0,0,0,0,0\n1,1,1,1,1,1,1\n").unwrap_err();
        assert!(matches!(err, LoaderError::DuplicateUser(1)));

        assert!(matches!(parse_users(""), Err(LoaderError::MissingHeader)));
    }

    #[test]
    fn test_parse_posts_with_subject_codes() {
        let content = "\
post_id,author_id,subject,likes,comments,shares,timestamp
1,7,3,10,2,1,2024
2,9,5,10,2,1,2024
";
        let posts = parse_posts(content, &SubjectClassifier::default()).unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].subject, Subject::Tech);
        assert_eq!(posts[0].text, None);
        assert_eq!(posts[0].engagement(), 13);
        assert_eq!(posts[1].subject, Subject::News);
        assert_eq!(posts[1].timestamp, 2024);
    }

    #[test]
    fn test_parse_posts_with_text() {
        let content = "\
post_id,author_id,text,likes,comments,shares,timestamp
1,4,Great football match today,5,1,0,2023
2,4,Watched a film, then read about calculus,1,1,1,2020
3,5,hello there,0,0,0,2025
";
        let posts = parse_posts(content, &SubjectClassifier::default()).unwrap();

        assert_eq!(posts[0].subject, Subject::Sports);
        assert_eq!(posts[0].text.as_deref(), Some("Great football match today"));
        // comma inside the text is kept, Math wins by priority
        assert_eq!(
            posts[1].text.as_deref(),
            Some("Watched a film, then read about calculus")
        );
        assert_eq!(posts[1].subject, Subject::Math);
        assert_eq!(posts[1].likes, 1);
        assert_eq!(posts[2].subject, Subject::News);
    }

    #[test]
    fn test_parse_posts_keeps_text_spacing() {
        let content = "h\n1,2,  Watched a film, then  read   calculus ,1,1,1,2020\n";
        let posts = parse_posts(content, &SubjectClassifier::default()).unwrap();

        assert_eq!(
            posts[0].text.as_deref(),
            Some("Watched a film, then  read   calculus")
        );
        assert_eq!(posts[0].likes, 1);
        assert_eq!(posts[0].timestamp, 2020);
    }

    #[test]
    fn test_parse_posts_rejects_bad_records() {
        let classifier = SubjectClassifier::default();

        let err = parse_posts("h\n1,2,3\n", &classifier).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedRecord { line: 2, .. }));

        let err = parse_posts("h\n1,2,9,0,0,0,0\n", &classifier).unwrap_err();
        match err {
            LoaderError::MalformedRecord { reason, .. } => assert!(reason.contains("subject code")),
            other => panic!("unexpected error: {other:?}"),
        }

        let err = parse_posts("h\n1,2,3,-1,0,0,0\n", &classifier).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedRecord { .. }));

        let err = parse_posts("h\n1,2,3,0,0,0,yesterday\n", &classifier).unwrap_err();
        assert!(matches!(err, LoaderError::MalformedRecord { .. }));
    }

    #[test]
    fn test_parse_posts_keeps_duplicate_ids() {
        let posts = parse_posts("h\n1,2,0,0,0,0,0\n1,3,1,0,0,0,0\n", &SubjectClassifier::default())
            .unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[tokio::test]
    async fn test_load_users_from_file() {
        let path = std::env::temp_dir()
            .join(format!("feed-ranker-users-{}.csv", std::process::id()));
        tokio::fs::write(&path, USERS).await.unwrap();

        let users = load_users(&path).await;
        tokio::fs::remove_file(&path).await.ok();

        assert_eq!(users.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_posts("/nonexistent/posts.csv", &SubjectClassifier::default())
            .await
            .unwrap_err();
        match err {
            LoaderError::Io { path, .. } => {
                assert_eq!(path, PathBuf::from("/nonexistent/posts.csv"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
