//! Platform records
//!
//! Plain server-defined records passed through unchanged. The client holds no
//! authoritative state and derives nothing from these beyond display.
//!
//! - `User` / `UserSummary`: profiles and post authors
//! - `Post`, `Comment`, `LikeStatus`: the social feed
//! - `Humidor`, `Cigar`: inventory
//! - `Review`: tasting reviews
//! - `Page` / `Envelope`: response wrappers

mod humidor;
mod page;
mod post;
mod review;
mod user;

pub use humidor::{Cigar, CigarUpdate, Humidor, HumidorUpdate, NewCigar, NewHumidor, Strength};
pub use page::{Envelope, ErrorBody, ErrorEnvelope, Page, UploadedImage};
pub use post::{Comment, CommentUpdate, LikeStatus, NewComment, NewPost, Post, PostUpdate};
pub use review::{FlavorNotes, NewReview, Review, ReviewUpdate};
pub use user::{User, UserSummary};
