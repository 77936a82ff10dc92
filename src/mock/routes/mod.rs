//! Stand-in backend route handlers

pub mod feed;
pub mod health;
pub mod humidors;
pub mod posts;
pub mod profile;
pub mod reviews;
pub mod session;
