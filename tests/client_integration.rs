//! End-to-end checks of the REST client, the identity session and the feed
//! controller against the in-memory stand-in backend.

use std::sync::Arc;
use std::time::Instant;

use smokering::auth::{IdentityClient, StaticToken, TokenProvider};
use smokering::client::{ApiClient, ApiError, ClientConfig};
use smokering::feed::{
    FeedController, FeedFilter, FeedKey, FeedSettings, FeedSort, LoadOutcome, PollOutcome,
};
use smokering::mock::state::{DEV_TOKEN, SESSION_COOKIE};
use smokering::mock::{self, MockState};
use smokering::models::{NewCigar, NewHumidor, NewPost, PostUpdate, Strength};
use smokering::review::{ReviewWizard, WizardStep};

async fn backend() -> String {
    let addr = mock::spawn(MockState::seeded()).await.unwrap();
    format!("http://{}", addr)
}

fn client(root: &str, token: Option<&str>) -> ApiClient {
    let tokens = Arc::new(StaticToken::from_option(token.map(str::to_string)));
    ApiClient::with_tokens(ClientConfig::new(format!("{}/api/v1", root)), tokens).unwrap()
}

#[tokio::test]
async fn test_health_and_profile() {
    let root = backend().await;
    let ash = client(&root, Some(DEV_TOKEN));

    let health = ash.health().await.unwrap();
    assert_eq!(health.status, "ok");

    let me = ash.profile().await.unwrap();
    assert_eq!(me.username, "ash");
    assert!(me.post_count > 0);

    let mike = ash.user("maduro_mike").await.unwrap();
    assert_eq!(mike.id, "u2");
}

#[tokio::test]
async fn test_error_mapping() {
    let root = backend().await;
    let anonymous = client(&root, None);
    let ash = client(&root, Some(DEV_TOKEN));

    assert!(matches!(anonymous.profile().await, Err(ApiError::Unauthorized(_))));
    assert!(matches!(ash.get_post("nope").await, Err(ApiError::NotFound(_))));

    // the newest seeded post belongs to someone else
    let key = FeedKey::default();
    let newest = ash.feed_page(&key, 1, 1).await.unwrap().data.remove(0);
    assert_ne!(newest.author.id, "u1");
    let err = ash
        .update_post(
            &newest.id,
            &PostUpdate {
                body: Some("hijacked".to_string()),
                image_url: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));

    let err = ash.create_post(&NewPost::new("   ")).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_feed_pages_and_latest() {
    let root = backend().await;
    let ash = client(&root, Some(DEV_TOKEN));
    let key = FeedKey::new(FeedSort::Newest, FeedFilter::All);

    let first = ash.feed_page(&key, 1, 10).await.unwrap();
    assert_eq!(first.len(), 10);
    assert!(first.has_more);
    assert!(first.data.windows(2).all(|w| w[0].created_at > w[1].created_at));

    let last = ash.feed_page(&key, 3, 10).await.unwrap();
    assert_eq!(last.len(), 10);
    assert!(!last.has_more);

    let latest = ash.latest_post(FeedFilter::All).await.unwrap().unwrap();
    assert_eq!(latest.id, first.data[0].id);

    let reviews = ash
        .feed_page(&FeedKey::new(FeedSort::Newest, FeedFilter::Reviews), 1, 50)
        .await
        .unwrap();
    assert!(!reviews.is_empty());
    assert!(reviews.data.iter().all(|p| p.review_id.is_some()));
}

#[tokio::test]
async fn test_posts_comments_and_likes() {
    let root = backend().await;
    let ash = client(&root, Some(DEV_TOKEN));
    let mike = client(&root, Some("mike-token"));

    let post = ash.create_post(&NewPost::new("  First Padron of the year  ")).await.unwrap();
    assert_eq!(post.body, "First Padron of the year");
    assert_eq!(post.author.username, "ash");

    let liked = mike.like_post(&post.id).await.unwrap();
    assert!(liked.liked);
    assert_eq!(liked.like_count, 1);
    // liking twice changes nothing
    assert_eq!(mike.like_post(&post.id).await.unwrap().like_count, 1);

    let comment = mike.add_comment(&post.id, "Enjoy it").await.unwrap();
    let comments = ash.list_comments(&post.id).await.unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].id, comment.id);

    let seen_by_mike = mike.get_post(&post.id).await.unwrap();
    assert!(seen_by_mike.liked_by_me);
    assert_eq!(seen_by_mike.comment_count, 1);

    let unliked = mike.unlike_post(&post.id).await.unwrap();
    assert!(!unliked.liked);
    assert_eq!(unliked.like_count, 0);

    // post author may remove comments on their post
    ash.delete_comment(&comment.id).await.unwrap();
    assert!(ash.list_comments(&post.id).await.unwrap().is_empty());

    ash.delete_post(&post.id).await.unwrap();
    assert!(matches!(ash.get_post(&post.id).await, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_humidor_inventory() {
    let root = backend().await;
    let ash = client(&root, Some(DEV_TOKEN));
    let mike = client(&root, Some("mike-token"));

    let humidors = ash.list_humidors().await.unwrap();
    assert_eq!(humidors.len(), 1);
    assert!(humidors[0].cigar_count > 0);

    let humidor = ash
        .create_humidor(&NewHumidor {
            name: "Tupperdor".to_string(),
            description: None,
            target_humidity: Some(65),
        })
        .await
        .unwrap();

    let cigar = ash
        .add_cigar(
            &humidor.id,
            &NewCigar {
                brand: "Oliva".to_string(),
                name: "Serie V".to_string(),
                strength: Some(Strength::Full),
                quantity: 5,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cigar.humidor_id, humidor.id);
    assert_eq!(ash.get_humidor(&humidor.id).await.unwrap().cigar_count, 5);

    // other users cannot see it
    assert!(matches!(mike.get_humidor(&humidor.id).await, Err(ApiError::NotFound(_))));

    ash.delete_cigar(&cigar.id).await.unwrap();
    assert!(ash.list_cigars(&humidor.id).await.unwrap().is_empty());

    ash.delete_humidor(&humidor.id).await.unwrap();
    assert_eq!(ash.list_humidors().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_review_from_wizard() {
    let root = backend().await;
    let ash = client(&root, Some(DEV_TOKEN));

    let mut wizard = ReviewWizard::new();
    wizard.draft.cigar_name = "Arturo Fuente Hemingway".to_string();
    wizard.draft.draw_rating = Some(5);
    wizard.draft.rating = Some(93);

    let start = Instant::now();
    wizard.stopwatch.start_at(start);
    while wizard.step() != WizardStep::Summary {
        wizard.next().unwrap();
    }
    let payload = wizard
        .finish_at(start + std::time::Duration::from_secs(2700))
        .unwrap();

    let review = ash.create_review(&payload).await.unwrap();
    assert_eq!(review.rating, 93);
    assert_eq!(review.smoke_duration_secs, Some(2700));
    assert_eq!(review.author.username, "ash");

    let mine = ash.list_reviews(Some("u1"), 1, 50).await.unwrap();
    assert_eq!(mine.data[0].id, review.id);
    assert!(mine.data.iter().all(|r| r.author.id == "u1"));

    let shared = ash
        .create_post(&NewPost::new("Wrote this one up").review(review.id.clone()))
        .await
        .unwrap();
    assert_eq!(shared.review_id.as_deref(), Some(review.id.as_str()));

    ash.delete_review(&review.id).await.unwrap();
    assert!(ash.get_post(&shared.id).await.unwrap().review_id.is_none());
}

#[tokio::test]
async fn test_upload_round_trip() {
    let root = backend().await;
    let ash = client(&root, Some(DEV_TOKEN));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("band.png");
    std::fs::write(&path, b"\x89PNG\r\n\x1a\nnot really").unwrap();

    let uploaded = ash.upload_file(&path).await.unwrap();
    assert!(uploaded.url.starts_with("/api/v1/uploads/"));

    let text = dir.path().join("notes.txt");
    std::fs::write(&text, b"hello").unwrap();
    assert_eq!(ash.upload_file(&text).await.unwrap_err().status(), Some(415));
}

#[tokio::test]
async fn test_identity_session() {
    let root = backend().await;

    let signed_out = IdentityClient::new(&root).unwrap();
    assert!(signed_out.session().await.unwrap().is_none());
    assert_eq!(signed_out.access_token().await.unwrap(), None);

    let signed_in = IdentityClient::new(&root)
        .unwrap()
        .with_session_cookie(format!("{}={}", SESSION_COOKIE, DEV_TOKEN));
    let session = signed_in.session().await.unwrap().unwrap();
    assert_eq!(session.access_token, DEV_TOKEN);
    assert_eq!(session.user.id.as_deref(), Some("u1"));

    // the session token authenticates API calls
    let api = ApiClient::with_tokens(
        ClientConfig::new(format!("{}/api/v1", root)),
        Arc::new(signed_in),
    )
    .unwrap();
    assert_eq!(api.profile().await.unwrap().username, "ash");
}

#[tokio::test]
async fn test_feed_controller_against_backend() {
    let root = backend().await;
    let ash = Arc::new(client(&root, Some(DEV_TOKEN)));
    let mike = client(&root, Some("mike-token"));

    let feed = FeedController::new(Arc::clone(&ash), FeedSettings::default());
    assert!(matches!(feed.load_initial().await, LoadOutcome::Loaded { items: 10, .. }));
    assert!(matches!(feed.on_sentinel(true).await, LoadOutcome::Loaded { page: 2, .. }));
    assert_eq!(feed.posts().await.len(), 20);

    assert_eq!(feed.poll_once().await, PollOutcome::Unchanged);
    assert!(!feed.has_new());

    let fresh = mike.create_post(&NewPost::new("Just lit a Liga 9")).await.unwrap();
    assert_eq!(feed.poll_once().await, PollOutcome::NewPost(fresh.id.clone()));
    assert!(feed.has_new());
    // nothing merged until the user asks for it
    assert_ne!(feed.posts().await[0].id, fresh.id);

    feed.refresh().await;
    assert!(!feed.has_new());
    assert_eq!(feed.posts().await[0].id, fresh.id);

    let status = feed.toggle_like(&fresh.id).await.unwrap();
    assert!(status.liked);
    assert!(feed.posts().await[0].liked_by_me);
    let status = feed.toggle_like(&fresh.id).await.unwrap();
    assert!(!status.liked);
    assert_eq!(feed.posts().await[0].like_count, 0);

    // a refresh makes the newest post the baseline
    let mine = feed.create_post(&NewPost::new("Me too")).await.unwrap();
    feed.refresh().await;
    assert_eq!(feed.posts().await[0].id, mine.id);
    assert_eq!(feed.poll_once().await, PollOutcome::Unchanged);
}
