mod client;
pub mod derive;
pub mod generate;

pub use client::{DeriveError, ImageRef, PLACEHOLDER_IMAGE_URL};
pub use derive::{derive_from_reference, derive_from_text};
pub use generate::generate_image;
