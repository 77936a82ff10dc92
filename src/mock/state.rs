//! Stand-in backend state
//!
//! Everything lives in one in-memory `Store` behind a `RwLock`. Post
//! counters and `liked_by_me` are derived per request from the comment and
//! like tables rather than stored on the post.

use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tokio::sync::RwLock;

use super::error::{MockError, MockResult};
use crate::models::{
    Cigar, Comment, FlavorNotes, Humidor, Post, Review, Strength, User, UserSummary,
};

/// Bearer token of the seeded user `ash`
pub const DEV_TOKEN: &str = "dev-token";

/// Cookie the identity endpoint reads the session token from
pub const SESSION_COOKIE: &str = "smokering.session";

/// How long an identity session stays valid
pub const SESSION_TTL_HOURS: i64 = 12;

/// Uploaded image bytes
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct Store {
    pub users: Vec<User>,
    /// Bearer token to user id
    pub sessions: HashMap<String, String>,
    /// (follower, followee)
    pub follows: HashSet<(String, String)>,
    /// Newest first
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    /// (post id, user id)
    pub likes: HashSet<(String, String)>,
    pub humidors: Vec<Humidor>,
    pub cigars: Vec<Cigar>,
    /// Newest first
    pub reviews: Vec<Review>,
    pub uploads: HashMap<String, Upload>,
    next_id: u64,
}

impl Store {
    /// Fresh id with a readable prefix, e.g. `p31`
    pub fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}{}", prefix, self.next_id)
    }

    pub fn user(&self, id: &str) -> MockResult<&User> {
        self.users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| MockError::NotFound(format!("User {} not found", id)))
    }

    pub fn summary(&self, id: &str) -> MockResult<UserSummary> {
        self.user(id).map(User::summary)
    }

    /// User id behind the request's bearer token, if any
    pub fn viewer(&self, headers: &HeaderMap) -> Option<String> {
        let token = bearer_token(headers)?;
        self.sessions.get(token).cloned()
    }

    /// Like `viewer`, but a missing or unknown token is a 401
    pub fn require_viewer(&self, headers: &HeaderMap) -> MockResult<String> {
        self.viewer(headers).ok_or(MockError::Unauthorized)
    }

    pub fn post(&self, id: &str) -> MockResult<&Post> {
        self.posts
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| MockError::NotFound(format!("Post {} not found", id)))
    }

    /// Post with counters filled in for `viewer`
    pub fn render_post(&self, post: &Post, viewer: Option<&str>) -> Post {
        let mut post = post.clone();
        post.like_count = self.likes.iter().filter(|(p, _)| *p == post.id).count() as u32;
        post.comment_count = self.comments.iter().filter(|c| c.post_id == post.id).count() as u32;
        post.liked_by_me = viewer
            .map(|v| self.likes.contains(&(post.id.clone(), v.to_string())))
            .unwrap_or(false);
        post
    }

    pub fn humidor(&self, id: &str) -> MockResult<&Humidor> {
        self.humidors
            .iter()
            .find(|h| h.id == id)
            .ok_or_else(|| MockError::NotFound(format!("Humidor {} not found", id)))
    }

    /// Humidor owned by `viewer`; someone else's is reported as missing
    pub fn owned_humidor(&self, id: &str, viewer: &str) -> MockResult<&Humidor> {
        let humidor = self.humidor(id)?;
        if humidor.owner_id != viewer {
            return Err(MockError::NotFound(format!("Humidor {} not found", id)));
        }
        Ok(humidor)
    }

    pub fn render_humidor(&self, humidor: &Humidor) -> Humidor {
        let mut humidor = humidor.clone();
        humidor.cigar_count = self
            .cigars
            .iter()
            .filter(|c| c.humidor_id == humidor.id)
            .map(|c| c.quantity)
            .sum();
        humidor
    }

    pub fn review(&self, id: &str) -> MockResult<&Review> {
        self.reviews
            .iter()
            .find(|r| r.id == id)
            .ok_or_else(|| MockError::NotFound(format!("Review {} not found", id)))
    }
}

/// Token from an `Authorization: Bearer ...` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Value of a named cookie from the `Cookie` header
pub fn cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(header::COOKIE)?
        .to_str()
        .ok()?
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Shared state for all stand-in handlers
pub struct MockState {
    pub store: RwLock<Store>,
    pub start_time: Instant,
}

impl MockState {
    pub fn new(store: Store) -> Self {
        Self {
            store: RwLock::new(store),
            start_time: Instant::now(),
        }
    }

    /// No users, no content
    pub fn empty() -> Self {
        Self::new(Store::default())
    }

    /// Three users and a few weeks of activity
    pub fn seeded() -> Self {
        Self::new(seed())
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 18, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

fn user(id: &str, username: &str, display_name: &str, bio: &str, days: i64) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        display_name: Some(display_name.to_string()),
        avatar_url: None,
        bio: Some(bio.to_string()),
        location: None,
        joined_at: base_time() - Duration::days(days),
        follower_count: 0,
        following_count: 0,
        post_count: 0,
    }
}

const SEED_CIGARS: &[(&str, &str, &str)] = &[
    ("Padron", "1964 Anniversary", "Torpedo"),
    ("Arturo Fuente", "Hemingway", "Short Story"),
    ("Oliva", "Serie V Melanio", "Figurado"),
    ("My Father", "Le Bijou 1922", "Toro"),
    ("Davidoff", "Winston Churchill", "Robusto"),
    ("Drew Estate", "Liga Privada No. 9", "Corona Doble"),
];

const SEED_BODIES: &[&str] = &[
    "Cut, toast, light. Cedar right away.",
    "Anyone else rest their boxes for a few months before lighting up?",
    "Humidor finally holding 69% after re-seasoning.",
    "Burn went canoe in the second third, touched it up once.",
    "Porch weather is back.",
    "Picked up a fiver at the local lounge today.",
    "Paired with an espresso, highly recommend.",
    "Retrohale on this one is all pepper.",
];

fn seed() -> Store {
    let mut store = Store::default();
    let base = base_time();

    store.users = vec![
        user("u1", "ash", "Ash Carter", "Maduro wrappers and long evenings.", 400),
        user("u2", "maduro_mike", "Mike R.", "Box-pressed everything.", 300),
        user("u3", "cedar_sam", "Sam", "Lounge regular, amateur blender.", 120),
    ];
    store.sessions.insert(DEV_TOKEN.to_string(), "u1".to_string());
    store.sessions.insert("mike-token".to_string(), "u2".to_string());
    store.sessions.insert("sam-token".to_string(), "u3".to_string());
    store.follows.insert(("u1".to_string(), "u2".to_string()));
    store.follows.insert(("u2".to_string(), "u1".to_string()));
    store.follows.insert(("u3".to_string(), "u1".to_string()));

    // reviews, oldest first then reversed
    for (i, (brand, name, vitola)) in SEED_CIGARS.iter().enumerate() {
        let author_id = store.users[i % 3].id.clone();
        let author = store.users[i % 3].summary();
        let id = store.next_id("r");
        store.reviews.push(Review {
            id,
            author,
            cigar_id: None,
            cigar_name: format!("{} {}", brand, name),
            vitola: Some(vitola.to_string()),
            rating: 84 + (i as u8 * 3) % 14,
            draw_rating: Some(4),
            burn_rating: Some(3 + (i as u8 % 3)),
            construction_rating: Some(4),
            flavor_notes: FlavorNotes {
                first_third: vec!["cedar".to_string(), "pepper".to_string()],
                second_third: vec!["cocoa".to_string()],
                final_third: vec!["leather".to_string(), "espresso".to_string()],
            },
            notes: Some(format!("Smoked by {} on the porch.", author_id)),
            smoke_duration_secs: Some(3600 + i as u64 * 600),
            image_url: None,
            created_at: base + Duration::days(i as i64 * 3),
        });
    }

    // thirty posts, one every eighteen hours; every fifth shares a review
    for n in 0..30i64 {
        let author = store.users[(n % 3) as usize].summary();
        let review_id = (n % 5 == 4)
            .then(|| store.reviews.get((n / 5) as usize).map(|r| r.id.clone()))
            .flatten();
        let id = store.next_id("p");
        store.posts.push(Post {
            id,
            author,
            body: SEED_BODIES[n as usize % SEED_BODIES.len()].to_string(),
            image_url: None,
            review_id,
            like_count: 0,
            comment_count: 0,
            liked_by_me: false,
            created_at: base + Duration::hours(n * 18),
            updated_at: None,
        });
    }
    store.posts.reverse();
    store.reviews.reverse();

    // a little engagement on the older posts
    let engagement: Vec<(String, String)> = store
        .posts
        .iter()
        .skip(5)
        .take(12)
        .map(|p| (p.id.clone(), p.author.id.clone()))
        .collect();
    for (i, (post_id, author_id)) in engagement.into_iter().enumerate() {
        for user in ["u1", "u2", "u3"].iter().take(i % 3 + 1) {
            if *user != author_id {
                store.likes.insert((post_id.clone(), user.to_string()));
            }
        }
        if i % 4 == 0 {
            let commenter = if author_id == "u2" { "u3" } else { "u2" };
            let comment_author = store.users.iter().find(|u| u.id == commenter).map(User::summary);
            if let Some(author) = comment_author {
                let id = store.next_id("c");
                store.comments.push(Comment {
                    id,
                    post_id,
                    author,
                    body: "Great pick, that one is on my list.".to_string(),
                    created_at: base + Duration::days(30),
                });
            }
        }
    }

    let humidor_id = store.next_id("h");
    store.humidors.push(Humidor {
        id: humidor_id.clone(),
        owner_id: "u1".to_string(),
        name: "Desktop humidor".to_string(),
        description: Some("Spanish cedar, 75 count".to_string()),
        target_humidity: Some(69),
        cigar_count: 0,
        created_at: base - Duration::days(200),
    });
    let strengths = [
        Strength::Full,
        Strength::Medium,
        Strength::MediumFull,
        Strength::Full,
        Strength::Mild,
        Strength::Full,
    ];
    for (i, (brand, name, vitola)) in SEED_CIGARS.iter().enumerate().take(4) {
        let id = store.next_id("g");
        store.cigars.push(Cigar {
            id,
            humidor_id: humidor_id.clone(),
            brand: brand.to_string(),
            name: name.to_string(),
            vitola: Some(vitola.to_string()),
            wrapper: None,
            origin: Some("Nicaragua".to_string()),
            strength: Some(strengths[i]),
            quantity: (i as u32 % 3) + 1,
            price_cents: Some(1200 + i as u32 * 350),
            acquired_on: NaiveDate::from_ymd_opt(2024, 1, 10 + i as u32),
            notes: None,
            image_url: None,
        });
    }

    let travel_id = store.next_id("h");
    store.humidors.push(Humidor {
        id: travel_id,
        owner_id: "u2".to_string(),
        name: "Travel case".to_string(),
        description: None,
        target_humidity: Some(65),
        cigar_count: 0,
        created_at: base - Duration::days(90),
    });

    store
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_seed_is_newest_first() {
        let store = seed();
        assert_eq!(store.posts.len(), 30);
        assert!(store
            .posts
            .windows(2)
            .all(|w| w[0].created_at > w[1].created_at));
        assert!(store.posts.iter().any(|p| p.review_id.is_some()));
        assert!(store.reviews.windows(2).all(|w| w[0].created_at > w[1].created_at));
    }

    #[test]
    fn test_viewer_from_bearer_token() {
        let store = seed();
        let mut headers = HeaderMap::new();
        assert_eq!(store.viewer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer dev-token"));
        assert_eq!(store.viewer(&headers).as_deref(), Some("u1"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer nope"));
        assert!(matches!(store.require_viewer(&headers), Err(MockError::Unauthorized)));
    }

    #[test]
    fn test_cookie_lookup() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; smokering.session=dev-token"),
        );
        assert_eq!(cookie(&headers, SESSION_COOKIE), Some("dev-token"));
        assert_eq!(cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_render_post_counts_for_viewer() {
        let mut store = seed();
        let post = store.posts[0].clone();
        store.likes.insert((post.id.clone(), "u3".to_string()));

        let seen_by_u3 = store.render_post(&post, Some("u3"));
        assert_eq!(seen_by_u3.like_count, 1);
        assert!(seen_by_u3.liked_by_me);
        assert!(!store.render_post(&post, None).liked_by_me);
    }

    #[test]
    fn test_cigar_count_sums_quantities() {
        let store = seed();
        let humidor = store.render_humidor(&store.humidors[0]);
        let expected: u32 = store.cigars.iter().map(|c| c.quantity).sum();
        assert_eq!(humidor.cigar_count, expected);
    }
}
