pub mod markets;
pub mod mutate;
pub mod structure;

pub use markets::CityBackgrounds;
pub use mutate::{with_instruction, with_lighting_and_angle, with_location};
pub use structure::PromptStructure;
