use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bria::ImageRef;
use crate::prompt::structure::PromptStructure;

pub const SEED_MIN: u32 = 1;
pub const SEED_MAX: u32 = 1_000_000;

/// Draws the master seed for one top-level generation step. The same value
/// is threaded through every variant of the batch, and stored for reuse in
/// localization, so the remote generator stays visually consistent.
pub fn new_master_seed() -> u32 {
    rand::thread_rng().gen_range(SEED_MIN..=SEED_MAX)
}

/// One generated image together with the structure and seed that produced it.
/// Immutable once built; the selected winner seeds the localization step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub image: ImageRef,
    pub structure: PromptStructure,
    pub seed: u32,
    pub label: String,
}

/// One target market plus the user's free-text instruction for it. Input
/// order is presentation order; repeated locations are rendered again, not
/// deduplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationDirective {
    pub location: String,
    pub instruction: String,
}

impl LocationDirective {
    pub fn new(location: impl Into<String>, instruction: impl Into<String>) -> Self {
        LocationDirective {
            location: location.into(),
            instruction: instruction.into(),
        }
    }
}

/// Terminal output of the localization workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedResult {
    pub location: String,
    pub instruction: String,
    pub image: ImageRef,
}

/// Step-1 output: rows are lighting options, columns are angle options, in
/// the order the caller supplied them. A style-clone run is a 1x1 batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixBatch {
    pub grid: Vec<Vec<Candidate>>,
    pub master_seed: u32,
}

impl MatrixBatch {
    pub fn candidate(&self, row: usize, col: usize) -> Option<&Candidate> {
        self.grid.get(row)?.get(col)
    }

    pub fn len(&self) -> usize {
        self.grid.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Explicit session state for one wizard run. The presentation layer owns
/// one of these, feeds workflow outputs into it, and may serialize it to
/// survive a page reload; nothing in this crate holds session state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignSession {
    pub matrix: Option<MatrixBatch>,
    pub winner: Option<Candidate>,
    pub localized: Vec<LocalizedResult>,
}

impl CampaignSession {
    /// Stores a fresh step-1 batch, dropping any winner or localization
    /// output from a previous run.
    pub fn record_matrix(&mut self, batch: MatrixBatch) {
        self.winner = None;
        self.localized.clear();
        self.matrix = Some(batch);
    }

    /// The seed of the current batch; reused verbatim for localization,
    /// never regenerated.
    pub fn master_seed(&self) -> Option<u32> {
        self.matrix.as_ref().map(|batch| batch.master_seed)
    }

    pub fn select_winner(&mut self, row: usize, col: usize) -> Option<&Candidate> {
        let candidate = self.matrix.as_ref()?.candidate(row, col)?.clone();
        self.winner = Some(candidate);
        self.winner.as_ref()
    }

    pub fn record_localized(&mut self, results: Vec<LocalizedResult>) {
        self.localized = results;
    }

    pub fn reset(&mut self) {
        *self = CampaignSession::default();
    }
}
