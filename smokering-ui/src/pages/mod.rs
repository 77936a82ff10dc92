//! Pages
//!
//! Top-level page components for each route.

pub mod feed;
pub mod humidor_detail;
pub mod humidors;
pub mod post_detail;
pub mod profile;
pub mod review_wizard;
pub mod reviews;
pub mod settings;

pub use feed::Feed;
pub use humidor_detail::HumidorDetail;
pub use humidors::Humidors;
pub use post_detail::PostDetail;
pub use profile::{MyProfile, UserProfile};
pub use review_wizard::ReviewWizard;
pub use reviews::Reviews;
pub use settings::Settings;
