//! The three campaign workflows. Remote calls are awaited strictly one at a
//! time, so batch latency is linear in the variant count; every variant works
//! on its own cloned structure, which keeps a future concurrent fan-out a
//! collection problem rather than a synchronization one.

use tracing::{info, warn};

use crate::bria::{derive_from_reference, derive_from_text, generate_image, DeriveError};
use crate::bria::derive::compose_reference_prompt;
use crate::campaign::types::{
    new_master_seed, Candidate, LocalizedResult, LocationDirective, MatrixBatch,
};
use crate::config::Config;
use crate::prompt::markets::CityBackgrounds;
use crate::prompt::mutate::{with_instruction, with_lighting_and_angle, with_location};
use crate::prompt::structure::PromptStructure;
use crate::utils::timing::WorkflowTimer;

pub const STYLE_CLONE_LABEL: &str = "Style Cloned";

/// Clones the style of a reference image into a single candidate. If the
/// extraction endpoint fails, the workflow degrades to text derivation with
/// the same product/context rather than aborting.
pub async fn run_style_clone(
    config: &Config,
    product: &str,
    context: &str,
    reference_image: &[u8],
) -> Result<MatrixBatch, DeriveError> {
    let mut timer = WorkflowTimer::start("style_clone");
    let result = style_clone_inner(config, product, context, reference_image).await;
    match &result {
        Ok(batch) => timer.complete(batch.len()),
        Err(err) => timer.fail(&err.to_string()),
    }
    result
}

async fn style_clone_inner(
    config: &Config,
    product: &str,
    context: &str,
    reference_image: &[u8],
) -> Result<MatrixBatch, DeriveError> {
    let master_seed = new_master_seed();
    let combined = compose_reference_prompt(product, context);

    let base = match derive_from_reference(config, reference_image, &combined).await {
        Ok(structure) => structure,
        Err(err) => {
            warn!("Reference extraction failed, falling back to text derivation: {err}");
            derive_from_text(config, product, context).await?
        }
    };

    let image = generate_image(config, &base, Some(master_seed)).await;
    let candidate = Candidate {
        image,
        structure: base,
        seed: master_seed,
        label: STYLE_CLONE_LABEL.to_string(),
    };

    Ok(MatrixBatch {
        grid: vec![vec![candidate]],
        master_seed,
    })
}

/// Explores the lighting x angle cartesian product from one shared base
/// structure, row-major: one row per lighting option, one column per angle
/// option. All cells share the master seed and the same base ancestor.
pub async fn run_matrix(
    config: &Config,
    product: &str,
    context: &str,
    lighting_opts: &[String],
    angle_opts: &[String],
) -> Result<MatrixBatch, DeriveError> {
    let mut timer = WorkflowTimer::start("matrix");
    let result = matrix_inner(config, product, context, lighting_opts, angle_opts).await;
    match &result {
        Ok(batch) => timer.complete(batch.len()),
        Err(err) => timer.fail(&err.to_string()),
    }
    result
}

async fn matrix_inner(
    config: &Config,
    product: &str,
    context: &str,
    lighting_opts: &[String],
    angle_opts: &[String],
) -> Result<MatrixBatch, DeriveError> {
    let master_seed = new_master_seed();
    let base = derive_from_text(config, product, context).await?;
    info!(
        "Matrix run: {} lighting x {} angle variants, seed={}",
        lighting_opts.len(),
        angle_opts.len(),
        master_seed
    );

    let mut grid = Vec::with_capacity(lighting_opts.len());
    for lighting in lighting_opts {
        let mut row = Vec::with_capacity(angle_opts.len());
        for angle in angle_opts {
            let variant = with_lighting_and_angle(&base, lighting, angle);
            let image = generate_image(config, &variant, Some(master_seed)).await;
            row.push(Candidate {
                image,
                structure: variant,
                seed: master_seed,
                label: format!("{lighting}\n{angle}"),
            });
        }
        grid.push(row);
    }

    Ok(MatrixBatch { grid, master_seed })
}

/// Fans the winning structure out across target markets, in directive order.
/// The location mutation runs before the instruction mutation so an anime
/// instruction is evaluated after the studio-to-outdoor rewrite. Every render
/// reuses the winner's seed; generation failures substitute placeholders, so
/// this workflow itself cannot fail.
pub async fn run_localization(
    config: &Config,
    winning_structure: &PromptStructure,
    seed: u32,
    directives: &[LocationDirective],
    backgrounds: &CityBackgrounds,
) -> Vec<LocalizedResult> {
    let mut timer = WorkflowTimer::start("localization");

    let mut results = Vec::with_capacity(directives.len());
    for directive in directives {
        let localized = with_location(winning_structure, &directive.location, backgrounds);
        let localized = with_instruction(&localized, &directive.instruction);
        let image = generate_image(config, &localized, Some(seed)).await;
        results.push(LocalizedResult {
            location: directive.location.clone(),
            instruction: directive.instruction.clone(),
            image,
        });
    }

    timer.complete(results.len());
    results
}
