//! Campaign creative engine for the Bria image-generation API.
//!
//! The crate turns a product/context description into a structured prompt
//! document, fans it out across lighting/angle variants or target markets,
//! and renders each variant through the Bria API while keeping one master
//! seed per batch for visual consistency. The wizard UI that drives these
//! workflows lives outside this crate and owns the session lifecycle.

pub mod bria;
pub mod campaign;
pub mod config;
pub mod prompt;
pub mod utils;

pub use bria::{derive_from_reference, derive_from_text, generate_image, DeriveError, ImageRef};
pub use campaign::types::{
    new_master_seed, CampaignSession, Candidate, LocalizedResult, LocationDirective, MatrixBatch,
};
pub use campaign::workflows::{run_localization, run_matrix, run_style_clone};
pub use config::{Config, CONFIG};
pub use prompt::markets::CityBackgrounds;
pub use prompt::structure::PromptStructure;
