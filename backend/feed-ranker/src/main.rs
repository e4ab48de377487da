use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use feed_ranker::{loader, Config, FeedService, RankingError, ScoredPost, SubjectClassifier};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(version, about = "Rank a personalized feed for one user")]
struct Args {
    /// Users file
    #[arg(long, env = "FEED_USERS_PATH", default_value = "users_data.csv")]
    users: PathBuf,

    /// Posts file
    #[arg(long, env = "FEED_POSTS_PATH", default_value = "posts_data.csv")]
    posts: PathBuf,

    /// User to build the feed for
    #[arg(long)]
    user_id: u64,

    /// "Current time" that recency is measured against
    #[arg(long, env = "FEED_REFERENCE_TIME", default_value_t = 2025, allow_negative_numbers = true)]
    reference_time: i64,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Show only the top N posts
    #[arg(long)]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, the feed to stdout
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = Config::from_env().context("Failed to load config")?;

    info!(
        users = %args.users.display(),
        posts = %args.posts.display(),
        reference_time = args.reference_time,
        "Starting feed-ranker"
    );

    let classifier = SubjectClassifier::new(config.classifier.default_subject);
    let users = loader::load_users(&args.users)
        .await
        .context("Failed to load users")?;
    let posts = loader::load_posts(&args.posts, &classifier)
        .await
        .context("Failed to load posts")?;

    let service = FeedService::new(config.weights)?;
    let mut feed = match service.rank_feed(args.user_id, &posts, &users, args.reference_time) {
        Ok(feed) => feed,
        Err(RankingError::UserNotFound(user_id)) => {
            eprintln!("User ID {} not found.", user_id);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    if let Some(limit) = args.limit {
        feed.truncate(limit);
    }

    match args.format {
        OutputFormat::Text => print_text(args.user_id, &feed),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&feed)?),
    }

    Ok(())
}

fn print_text(user_id: u64, feed: &[ScoredPost<'_>]) {
    println!("\nFeed for user {} (sorted by relevance score):", user_id);
    for entry in feed {
        let post = entry.post;
        println!(
            "PostID: {} | Author: {} | Subject: {} | Likes: {} | Comments: {} | Shares: {} | Timestamp: {} | Score: {:.2}",
            post.id,
            post.author_id,
            post.subject,
            post.likes,
            post.comments,
            post.shares,
            post.timestamp,
            entry.score
        );
        if let Some(text) = &post.text {
            println!("Text: {}", text);
        }
    }
}
