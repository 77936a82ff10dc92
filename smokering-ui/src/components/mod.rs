//! UI Components
//!
//! Reusable Leptos components shared by the pages.

pub mod comment_list;
pub mod image_upload;
pub mod like_button;
pub mod loading;
pub mod nav;
pub mod post_card;
pub mod sentinel;
pub mod stopwatch;
pub mod toast;

pub use comment_list::CommentList;
pub use image_upload::ImageUpload;
pub use like_button::LikeButton;
pub use loading::{ListSkeleton, Loading};
pub use nav::Nav;
pub use post_card::PostCard;
pub use sentinel::Sentinel;
pub use stopwatch::StopwatchPanel;
pub use toast::Toast;
