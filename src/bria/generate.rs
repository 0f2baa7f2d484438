use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::warn;

use crate::config::Config;
use crate::prompt::structure::PromptStructure;
use crate::utils::timing::log_api_timing;

use super::client::{post_json, ImageGenerateResponse, ImageRef};

/// Renders one structure through the Bria image endpoint. Never fails: any
/// transport or parsing problem substitutes the placeholder reference so the
/// rest of the batch still runs, with each variant failing independently.
pub async fn generate_image(
    config: &Config,
    structure: &PromptStructure,
    seed: Option<u32>,
) -> ImageRef {
    let metadata = json!({ "seed": seed });
    let result = log_api_timing("bria", "generate_image", Some(metadata), || {
        try_generate(config, structure, seed)
    })
    .await;

    match result {
        Ok(image) => image,
        Err(err) => {
            warn!("Bria image generation failed, substituting placeholder: {err:#}");
            ImageRef::placeholder()
        }
    }
}

async fn try_generate(
    config: &Config,
    structure: &PromptStructure,
    seed: Option<u32>,
) -> Result<ImageRef> {
    // The API takes the structured prompt as a JSON-encoded string, not as a
    // nested object.
    let transport = serde_json::to_string(structure)?;
    let mut payload = json!({
        "structured_prompt": transport,
        "aspect_ratio": config.bria_aspect_ratio,
        "sync": true
    });
    if let Some(seed) = seed.filter(|value| *value != 0) {
        if let Some(map) = payload.as_object_mut() {
            map.insert("seed".to_string(), json!(seed));
        }
    }

    let response: ImageGenerateResponse = post_json(config, "/image/generate", &payload).await?;
    let url = response
        .result
        .and_then(|result| result.image_url)
        .ok_or_else(|| anyhow!("response is missing result.image_url"))?;

    Ok(ImageRef(url))
}
