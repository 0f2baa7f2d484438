pub mod types;
pub mod workflows;

pub use types::{
    new_master_seed, CampaignSession, Candidate, LocalizedResult, LocationDirective, MatrixBatch,
};
pub use workflows::{run_localization, run_matrix, run_style_clone};
