//! Smokering CLI
//!
//! Command-line client for the platform:
//! - Read the feed and watch for new posts
//! - Post, comment and like
//! - Manage humidors and export the inventory
//! - Write and browse reviews

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use futures_util::future::join_all;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use smokering::auth::{IdentityClient, StaticToken, TokenProvider};
use smokering::client::{ApiClient, ApiError};
use smokering::config::{generate_default_config, Config};
use smokering::feed::{FeedController, FeedFilter, FeedKey, FeedSettings, FeedSort, LoadOutcome};
use smokering::logging::init_logging;
use smokering::models::{
    Cigar, Comment, Humidor, NewCigar, NewHumidor, NewPost, Post, PostUpdate, Review, Strength,
    User,
};
use smokering::review::{format_elapsed, ReviewWizard, WizardStep};

#[derive(Parser)]
#[command(name = "smokering")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Command-line client for the Smokering cigar community")]
#[command(long_about = "Smokering is a social platform for cigar enthusiasts.\nRead the feed, keep your humidor inventory and write reviews from the terminal.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL (default: from config, then http://localhost:8090/api/v1)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token (default: from config or the identity provider session)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Config file (default: ~/.config/smokering/config.toml, ./config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the feed
    Feed {
        /// newest or top
        #[arg(short, long)]
        sort: Option<FeedSort>,
        /// all, following or reviews
        #[arg(long)]
        filter: Option<FeedFilter>,
        /// Number of pages to load
        #[arg(short, long, default_value = "1")]
        pages: u32,
    },

    /// Poll for new posts and announce them
    Watch {
        /// all, following or reviews
        #[arg(long)]
        filter: Option<FeedFilter>,
        /// Seconds between polls (default: from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Create, show, edit or delete a post
    Post {
        #[command(subcommand)]
        action: PostAction,
    },

    /// List, add or delete comments
    Comment {
        #[command(subcommand)]
        action: CommentAction,
    },

    /// Like a post
    Like { post_id: String },

    /// Remove a like
    Unlike { post_id: String },

    /// Manage humidors
    Humidor {
        #[command(subcommand)]
        action: HumidorAction,
    },

    /// Add or remove cigars in a humidor
    Cigar {
        #[command(subcommand)]
        action: CigarAction,
    },

    /// Browse and write reviews
    Review {
        #[command(subcommand)]
        action: ReviewAction,
    },

    /// Upload an image and print its URL
    Upload { path: PathBuf },

    /// Show a profile (default: your own)
    Profile {
        /// User id or username
        user: Option<String>,
    },

    /// Show the identity provider session, or where to sign in
    Session {
        /// Where the provider should send you after signing in
        #[arg(long, default_value = "http://localhost:8084/")]
        callback: String,
    },

    /// Show backend status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum PostAction {
    /// Publish a post
    Create {
        /// Post text
        body: String,
        /// Image file to upload and attach
        #[arg(long)]
        image: Option<PathBuf>,
        /// Review to share with the post
        #[arg(long)]
        review: Option<String>,
    },
    /// Show a post with its comments
    Show { id: String },
    /// Replace the text of your post
    Edit { id: String, body: String },
    /// Delete your post
    Delete { id: String },
}

#[derive(Subcommand)]
pub enum CommentAction {
    List { post_id: String },
    Add { post_id: String, body: String },
    Delete { comment_id: String },
}

#[derive(Subcommand)]
pub enum HumidorAction {
    /// List your humidors
    List,
    /// Show a humidor and its cigars
    Show { id: String },
    /// Create a humidor
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        /// Target relative humidity in percent
        #[arg(long)]
        humidity: Option<u8>,
    },
    /// Delete a humidor and everything in it
    Delete { id: String },
    /// Export inventory as CSV
    Export {
        /// Humidor ids (default: all)
        ids: Vec<String>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CigarAction {
    /// Add cigars to a humidor
    Add {
        humidor_id: String,
        brand: String,
        name: String,
        #[arg(long)]
        vitola: Option<String>,
        /// mild, mild-medium, medium, medium-full, full
        #[arg(long)]
        strength: Option<Strength>,
        #[arg(short, long, default_value = "1")]
        quantity: u32,
        /// Price per cigar in cents
        #[arg(long)]
        price: Option<u32>,
    },
    /// Remove a cigar entry
    Remove { cigar_id: String },
}

#[derive(Subcommand)]
pub enum ReviewAction {
    /// List reviews
    List {
        /// Only reviews by this user id
        #[arg(long)]
        author: Option<String>,
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(short, long, default_value = "10")]
        limit: u32,
    },
    /// Show a review
    Show { id: String },
    /// Write a review
    Create {
        cigar_name: String,
        /// Overall score, 0-100
        rating: u8,
        #[arg(long)]
        vitola: Option<String>,
        /// Draw, 1-5
        #[arg(long)]
        draw: Option<u8>,
        /// Burn, 1-5
        #[arg(long)]
        burn: Option<u8>,
        /// Construction, 1-5
        #[arg(long)]
        construction: Option<u8>,
        /// Flavor notes, comma-separated
        #[arg(long)]
        flavors: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Smoke time in minutes
        #[arg(short, long)]
        minutes: Option<u64>,
    },
    /// Delete your review
    Delete { id: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match Config::load_with_env(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                std::process::exit(1);
            }
        },
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    if let Err(e) = run(cli, config).await {
        eprintln!("Error: {:#}", e);
        if let Some(ApiError::Unavailable) = e.downcast_ref::<ApiError>() {
            eprintln!();
            eprintln!("Make sure the backend is running, for local development:");
            eprintln!("  cargo run --bin smokering-mock");
        }
        std::process::exit(1);
    }
}

/// Pick the token source: explicit token, then config token, then provider session
fn token_provider(cli: &Cli, config: &Config) -> anyhow::Result<Arc<dyn TokenProvider>> {
    if let Some(token) = cli.token.clone().or_else(|| config.identity.token.clone()) {
        return Ok(Arc::new(StaticToken::from_option(Some(token))));
    }
    match &config.identity.issuer_url {
        Some(issuer) => Ok(Arc::new(identity_client(config, issuer)?)),
        None => Ok(Arc::new(StaticToken::anonymous())),
    }
}

fn identity_client(config: &Config, issuer: &str) -> anyhow::Result<IdentityClient> {
    let mut identity = IdentityClient::new(issuer)?;
    if let Some(cookie) = &config.identity.session_cookie {
        identity = identity.with_session_cookie(cookie.clone());
    }
    Ok(identity)
}

async fn run(cli: Cli, mut config: Config) -> anyhow::Result<()> {
    if let Some(url) = &cli.api_url {
        config.api.base_url = url.clone();
    }
    let client = ApiClient::with_tokens(config.client_config(), token_provider(&cli, &config)?)?;
    let format = cli.format;

    match cli.command {
        Commands::Feed {
            sort,
            filter,
            pages,
        } => {
            let mut settings = config.feed_settings();
            settings.key = FeedKey::new(
                sort.unwrap_or(settings.key.sort),
                filter.unwrap_or(settings.key.filter),
            );
            let feed = FeedController::new(Arc::new(client), settings);

            let mut outcome = feed.load_initial().await;
            for _ in 1..pages {
                if !feed.has_more().await {
                    break;
                }
                outcome = feed.on_sentinel(true).await;
            }
            if let LoadOutcome::Failed(message) = outcome {
                bail!("Feed failed to load: {}", message);
            }

            let posts = feed.posts().await;
            print_posts(&posts, format)?;
            if format == OutputFormat::Table && feed.has_more().await {
                println!();
                println!("More posts available (use --pages {})", pages + 1);
            }
        }

        Commands::Watch { filter, interval } => {
            let mut settings = config.feed_settings();
            settings.key = FeedKey::new(FeedSort::Newest, filter.unwrap_or(settings.key.filter));
            if let Some(secs) = interval {
                settings.poll_interval = Duration::from_secs(secs.max(1));
            }
            watch(Arc::new(client), settings).await?;
        }

        Commands::Post { action } => match action {
            PostAction::Create {
                body,
                image,
                review,
            } => {
                let mut post = NewPost::new(body);
                if let Some(path) = image {
                    let uploaded = client.upload_file(&path).await?;
                    post = post.image(uploaded.url);
                }
                if let Some(review_id) = review {
                    post = post.review(review_id);
                }
                let created = client.create_post(&post).await?;
                print_item(&created, format, |p| println!("Posted {}", p.id))?;
            }
            PostAction::Show { id } => {
                let (post, comments) = tokio::try_join!(client.get_post(&id), client.list_comments(&id))?;
                match format {
                    OutputFormat::Table => {
                        print_post_detail(&post);
                        if !comments.is_empty() {
                            println!();
                            print_comments(&comments, format)?;
                        }
                    }
                    _ => print_posts(std::slice::from_ref(&post), format)?,
                }
            }
            PostAction::Edit { id, body } => {
                let update = PostUpdate {
                    body: Some(body),
                    image_url: None,
                };
                let post = client.update_post(&id, &update).await?;
                print_item(&post, format, |p| println!("Updated {}", p.id))?;
            }
            PostAction::Delete { id } => {
                client.delete_post(&id).await?;
                println!("Deleted post {}", id);
            }
        },

        Commands::Comment { action } => match action {
            CommentAction::List { post_id } => {
                let comments = client.list_comments(&post_id).await?;
                print_comments(&comments, format)?;
            }
            CommentAction::Add { post_id, body } => {
                let comment = client.add_comment(&post_id, &body).await?;
                print_item(&comment, format, |c| println!("Commented {}", c.id))?;
            }
            CommentAction::Delete { comment_id } => {
                client.delete_comment(&comment_id).await?;
                println!("Deleted comment {}", comment_id);
            }
        },

        Commands::Like { post_id } => {
            let status = client.like_post(&post_id).await?;
            print_item(&status, format, |s| {
                println!("Liked {} ({} likes)", s.post_id, s.like_count)
            })?;
        }

        Commands::Unlike { post_id } => {
            let status = client.unlike_post(&post_id).await?;
            print_item(&status, format, |s| {
                println!("Unliked {} ({} likes)", s.post_id, s.like_count)
            })?;
        }

        Commands::Humidor { action } => match action {
            HumidorAction::List => {
                let humidors = client.list_humidors().await?;
                print_humidors(&humidors, format)?;
            }
            HumidorAction::Show { id } => {
                let (humidor, cigars) =
                    tokio::try_join!(client.get_humidor(&id), client.list_cigars(&id))?;
                if format == OutputFormat::Table {
                    println!("{} ({})", humidor.name, humidor.id);
                    if let Some(description) = &humidor.description {
                        println!("{}", description);
                    }
                    if let Some(target) = humidor.target_humidity {
                        println!("Target humidity: {}%", target);
                    }
                    println!();
                }
                print_cigars(&cigars, format)?;
            }
            HumidorAction::Create {
                name,
                description,
                humidity,
            } => {
                let humidor = client
                    .create_humidor(&NewHumidor {
                        name,
                        description,
                        target_humidity: humidity,
                    })
                    .await?;
                print_item(&humidor, format, |h| println!("Created humidor {}", h.id))?;
            }
            HumidorAction::Delete { id } => {
                client.delete_humidor(&id).await?;
                println!("Deleted humidor {}", id);
            }
            HumidorAction::Export { ids, output } => {
                let humidors = if ids.is_empty() {
                    client.list_humidors().await?
                } else {
                    let fetched = join_all(ids.iter().map(|id| client.get_humidor(id))).await;
                    fetched.into_iter().collect::<Result<Vec<_>, _>>()?
                };
                let csv = export_inventory(&client, &humidors).await?;

                match output {
                    Some(path) => {
                        std::fs::write(&path, &csv)
                            .with_context(|| format!("Failed to write {:?}", path))?;
                        println!("Exported {} humidors to {:?}", humidors.len(), path);
                    }
                    None => print!("{}", csv),
                }
            }
        },

        Commands::Cigar { action } => match action {
            CigarAction::Add {
                humidor_id,
                brand,
                name,
                vitola,
                strength,
                quantity,
                price,
            } => {
                let cigar = client
                    .add_cigar(
                        &humidor_id,
                        &NewCigar {
                            brand,
                            name,
                            vitola,
                            strength,
                            quantity,
                            price_cents: price,
                            acquired_on: Some(chrono::Local::now().date_naive()),
                            ..Default::default()
                        },
                    )
                    .await?;
                print_item(&cigar, format, |c| println!("Added {} ({})", c.label(), c.id))?;
            }
            CigarAction::Remove { cigar_id } => {
                client.delete_cigar(&cigar_id).await?;
                println!("Removed cigar {}", cigar_id);
            }
        },

        Commands::Review { action } => match action {
            ReviewAction::List {
                author,
                page,
                limit,
            } => {
                let reviews = client.list_reviews(author.as_deref(), page, limit).await?;
                print_reviews(&reviews.data, format)?;
                if format == OutputFormat::Table && reviews.has_more {
                    println!();
                    println!("More reviews on page {}", page + 1);
                }
            }
            ReviewAction::Show { id } => {
                let review = client.get_review(&id).await?;
                match format {
                    OutputFormat::Table => print_review_detail(&review),
                    _ => print_reviews(std::slice::from_ref(&review), format)?,
                }
            }
            ReviewAction::Create {
                cigar_name,
                rating,
                vitola,
                draw,
                burn,
                construction,
                flavors,
                notes,
                minutes,
            } => {
                let mut wizard = ReviewWizard::new();
                wizard.draft.cigar_name = cigar_name;
                wizard.draft.vitola = vitola;
                wizard.draft.draw_rating = draw;
                wizard.draft.burn_rating = burn;
                wizard.draft.construction_rating = construction;
                wizard.draft.rating = Some(rating);
                wizard.draft.notes = notes.unwrap_or_default();
                if let Some(flavors) = flavors {
                    wizard.draft.flavor_notes.first_third = flavors
                        .split(',')
                        .map(|f| f.trim().to_string())
                        .filter(|f| !f.is_empty())
                        .collect();
                }

                let now = Instant::now();
                if let Some(minutes) = minutes {
                    wizard.stopwatch.start_at(now);
                    wizard.stopwatch.pause_at(now + Duration::from_secs(minutes * 60));
                }

                while wizard.step() != WizardStep::Summary {
                    wizard.next()?;
                }
                let review = client.create_review(&wizard.finish_at(now)?).await?;
                print_item(&review, format, |r| {
                    println!("Reviewed {} ({}/100) as {}", r.cigar_name, r.rating, r.id)
                })?;
            }
            ReviewAction::Delete { id } => {
                client.delete_review(&id).await?;
                println!("Deleted review {}", id);
            }
        },

        Commands::Upload { path } => {
            let uploaded = client.upload_file(&path).await?;
            print_item(&uploaded, format, |u| println!("{}", u.url))?;
        }

        Commands::Profile { user } => {
            let profile = match user {
                Some(id) => client.user(&id).await?,
                None => client.profile().await?,
            };
            print_item(&profile, format, print_profile)?;
        }

        Commands::Session { callback } => {
            let Some(issuer) = config.identity.issuer_url.clone() else {
                bail!("No identity provider configured (set identity.issuer_url or SMOKERING_ISSUER_URL)");
            };
            let identity = identity_client(&config, &issuer)?;
            match identity.session().await? {
                Some(session) => print_item(&session, format, |s| {
                    println!(
                        "Signed in as {}",
                        s.user.name.as_deref().or(s.user.email.as_deref()).unwrap_or("unknown")
                    );
                    println!("Token expires {}", s.expires.format("%Y-%m-%d %H:%M UTC"));
                })?,
                None => {
                    println!("Not signed in.");
                    println!("Sign in at: {}", identity.sign_in_url(&callback));
                }
            }
        }

        Commands::Status => {
            let health = client.health().await?;
            println!("Smokering v{}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("API: {}", client.config().base_url);
            println!("Status: {}", health.status);
            if let Some(version) = &health.version {
                println!("Backend version: {}", version);
            }
            if let Some(uptime) = health.uptime_seconds {
                println!("Uptime: {}", format_duration(uptime));
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Print the newest posts, then announce new ones until Ctrl+C
async fn watch(client: Arc<ApiClient>, settings: FeedSettings) -> anyhow::Result<()> {
    let feed = FeedController::new(client, settings);
    if let LoadOutcome::Failed(message) = feed.load_initial().await {
        bail!("Feed failed to load: {}", message);
    }
    print_posts(&feed.posts().await, OutputFormat::Table)?;

    println!();
    println!(
        "Watching {} for new posts every {}s (Ctrl+C to stop)",
        settings.key,
        settings.poll_interval.as_secs()
    );

    let mut new_posts = feed.subscribe();
    feed.start_polling().await;

    loop {
        tokio::select! {
            changed = new_posts.changed() => {
                if changed.is_err() {
                    break;
                }
                if !*new_posts.borrow_and_update() {
                    continue;
                }

                let seen = feed.posts().await.first().map(|p| p.created_at);
                feed.refresh().await;
                let fresh: Vec<Post> = feed
                    .posts()
                    .await
                    .into_iter()
                    .take_while(|p| seen.map_or(true, |t| p.created_at > t))
                    .collect();

                println!();
                println!("{} new post(s):", fresh.len());
                print_posts(&fresh, OutputFormat::Table)?;
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    feed.stop_polling().await;
    Ok(())
}

/// One CSV row per cigar, across all given humidors
async fn export_inventory(client: &ApiClient, humidors: &[Humidor]) -> anyhow::Result<String> {
    #[derive(Serialize)]
    struct Row<'a> {
        humidor: &'a str,
        brand: &'a str,
        name: &'a str,
        vitola: &'a str,
        strength: String,
        quantity: u32,
        price_cents: Option<u32>,
        acquired_on: String,
        notes: &'a str,
    }

    let listings = join_all(humidors.iter().map(|h| client.list_cigars(&h.id))).await;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for (humidor, cigars) in humidors.iter().zip(listings) {
        for cigar in cigars? {
            writer.serialize(Row {
                humidor: &humidor.name,
                brand: &cigar.brand,
                name: &cigar.name,
                vitola: cigar.vitola.as_deref().unwrap_or(""),
                strength: cigar.strength.map(|s| s.to_string()).unwrap_or_default(),
                quantity: cigar.quantity,
                price_cents: cigar.price_cents,
                acquired_on: cigar.acquired_on.map(|d| d.to_string()).unwrap_or_default(),
                notes: cigar.notes.as_deref().unwrap_or(""),
            })?;
        }
    }

    let bytes = writer.into_inner().context("Failed to finish CSV output")?;
    Ok(String::from_utf8(bytes)?)
}

/// JSON for json and csv formats, `table` otherwise
fn print_item<T: Serialize>(
    item: &T,
    format: OutputFormat,
    table: impl FnOnce(&T),
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => table(item),
        OutputFormat::Json | OutputFormat::Csv => {
            println!("{}", serde_json::to_string_pretty(item)?)
        }
    }
    Ok(())
}

fn write_csv<R: Serialize>(rows: impl IntoIterator<Item = R>) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn truncate(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("");
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

fn print_posts(posts: &[Post], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(posts)?),
        OutputFormat::Csv => {
            #[derive(Serialize)]
            struct Row<'a> {
                id: &'a str,
                author: &'a str,
                created_at: String,
                likes: u32,
                comments: u32,
                review_id: &'a str,
                body: &'a str,
            }
            write_csv(posts.iter().map(|p| Row {
                id: &p.id,
                author: &p.author.username,
                created_at: p.created_at.to_rfc3339(),
                likes: p.like_count,
                comments: p.comment_count,
                review_id: p.review_id.as_deref().unwrap_or(""),
                body: &p.body,
            }))?;
        }
        OutputFormat::Table => {
            if posts.is_empty() {
                println!("No posts yet.");
                return Ok(());
            }
            println!(
                "{:<8} {:<16} {:<17} {:>5} {:>5}  {}",
                "ID", "Author", "Posted", "Likes", "Cmts", "Text"
            );
            println!("{}", "-".repeat(96));
            for post in posts {
                let liked = if post.liked_by_me { "*" } else { " " };
                let review = if post.review_id.is_some() { "[review] " } else { "" };
                println!(
                    "{:<8} {:<16} {:<17} {:>4}{} {:>5}  {}{}",
                    post.id,
                    truncate(post.author.shown_name(), 16),
                    post.created_at.format("%Y-%m-%d %H:%M"),
                    post.like_count,
                    liked,
                    post.comment_count,
                    review,
                    truncate(&post.body, 40)
                );
            }
        }
    }
    Ok(())
}

fn print_post_detail(post: &Post) {
    println!("{} ({})", post.author.shown_name(), post.created_at.format("%Y-%m-%d %H:%M"));
    println!();
    println!("{}", post.body);
    if let Some(url) = &post.image_url {
        println!("Image: {}", url);
    }
    if let Some(review_id) = &post.review_id {
        println!("Review: {}", review_id);
    }
    println!();
    println!(
        "{} likes{}, {} comments",
        post.like_count,
        if post.liked_by_me { " (including you)" } else { "" },
        post.comment_count
    );
}

fn print_comments(comments: &[Comment], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(comments)?),
        OutputFormat::Csv => {
            #[derive(Serialize)]
            struct Row<'a> {
                id: &'a str,
                post_id: &'a str,
                author: &'a str,
                created_at: String,
                body: &'a str,
            }
            write_csv(comments.iter().map(|c| Row {
                id: &c.id,
                post_id: &c.post_id,
                author: &c.author.username,
                created_at: c.created_at.to_rfc3339(),
                body: &c.body,
            }))?;
        }
        OutputFormat::Table => {
            if comments.is_empty() {
                println!("No comments.");
            }
            for comment in comments {
                println!(
                    "[{}] {} ({}): {}",
                    comment.id,
                    comment.author.shown_name(),
                    comment.created_at.format("%Y-%m-%d %H:%M"),
                    comment.body
                );
            }
        }
    }
    Ok(())
}

fn print_humidors(humidors: &[Humidor], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(humidors)?),
        OutputFormat::Csv => write_csv(humidors)?,
        OutputFormat::Table => {
            if humidors.is_empty() {
                println!("No humidors yet.");
                println!();
                println!("Create one with:");
                println!("  smokering humidor create \"Desktop humidor\" --humidity 69");
                return Ok(());
            }
            println!("{:<8} {:<28} {:>8} {:>8}", "ID", "Name", "Cigars", "Target");
            println!("{}", "-".repeat(56));
            for humidor in humidors {
                println!(
                    "{:<8} {:<28} {:>8} {:>8}",
                    humidor.id,
                    truncate(&humidor.name, 28),
                    humidor.cigar_count,
                    humidor
                        .target_humidity
                        .map(|h| format!("{}%", h))
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }
    }
    Ok(())
}

fn print_cigars(cigars: &[Cigar], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(cigars)?),
        OutputFormat::Csv => write_csv(cigars.iter().map(|c| {
            (
                c.id.as_str(),
                c.brand.as_str(),
                c.name.as_str(),
                c.vitola.as_deref().unwrap_or(""),
                c.quantity,
            )
        }))?,
        OutputFormat::Table => {
            if cigars.is_empty() {
                println!("Empty humidor.");
                return Ok(());
            }
            println!("{:<8} {:<44} {:<12} {:>4} {:>8}", "ID", "Cigar", "Strength", "Qty", "Price");
            println!("{}", "-".repeat(80));
            for cigar in cigars {
                println!(
                    "{:<8} {:<44} {:<12} {:>4} {:>8}",
                    cigar.id,
                    truncate(&cigar.label(), 44),
                    cigar.strength.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
                    cigar.quantity,
                    cigar
                        .price_cents
                        .map(|p| format!("${}.{:02}", p / 100, p % 100))
                        .unwrap_or_else(|| "-".to_string())
                );
            }
        }
    }
    Ok(())
}

fn print_reviews(reviews: &[Review], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(reviews)?),
        OutputFormat::Csv => {
            #[derive(Serialize)]
            struct Row<'a> {
                id: &'a str,
                author: &'a str,
                cigar: &'a str,
                vitola: &'a str,
                rating: u8,
                smoke_minutes: Option<u64>,
                created_at: String,
            }
            write_csv(reviews.iter().map(|r| Row {
                id: &r.id,
                author: &r.author.username,
                cigar: &r.cigar_name,
                vitola: r.vitola.as_deref().unwrap_or(""),
                rating: r.rating,
                smoke_minutes: r.smoke_duration_secs.map(|s| s / 60),
                created_at: r.created_at.to_rfc3339(),
            }))?;
        }
        OutputFormat::Table => {
            if reviews.is_empty() {
                println!("No reviews.");
                return Ok(());
            }
            println!("{:<8} {:<36} {:>6} {:<16} {}", "ID", "Cigar", "Score", "Author", "Date");
            println!("{}", "-".repeat(80));
            for review in reviews {
                println!(
                    "{:<8} {:<36} {:>6} {:<16} {}",
                    review.id,
                    truncate(&review.cigar_name, 36),
                    review.rating,
                    truncate(review.author.shown_name(), 16),
                    review.created_at.format("%Y-%m-%d")
                );
            }
        }
    }
    Ok(())
}

fn print_review_detail(review: &Review) {
    match &review.vitola {
        Some(vitola) => println!("{} ({})", review.cigar_name, vitola),
        None => println!("{}", review.cigar_name),
    }
    println!(
        "{}/100 by {} on {}",
        review.rating,
        review.author.shown_name(),
        review.created_at.format("%Y-%m-%d")
    );

    let details: Vec<String> = [
        ("Draw", review.draw_rating),
        ("Burn", review.burn_rating),
        ("Construction", review.construction_rating),
    ]
    .iter()
    .filter_map(|(label, value)| value.map(|v| format!("{} {}/5", label, v)))
    .collect();
    if !details.is_empty() {
        println!("{}", details.join(", "));
    }
    if let Some(secs) = review.smoke_duration_secs {
        println!("Smoke time: {}", format_elapsed(Duration::from_secs(secs)));
    }

    let notes = &review.flavor_notes;
    for (third, flavors) in [
        ("First third", &notes.first_third),
        ("Second third", &notes.second_third),
        ("Final third", &notes.final_third),
    ] {
        if !flavors.is_empty() {
            println!("{}: {}", third, flavors.join(", "));
        }
    }
    if let Some(text) = &review.notes {
        println!();
        println!("{}", text);
    }
}

fn print_profile(user: &User) {
    println!("{} (@{})", user.shown_name(), user.username);
    if let Some(bio) = &user.bio {
        println!("{}", bio);
    }
    if let Some(location) = &user.location {
        println!("{}", location);
    }
    println!();
    println!(
        "{} posts, {} followers, {} following",
        user.post_count, user.follower_count, user.following_count
    );
    println!("Joined {}", user.joined_at.format("%B %Y"));
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
