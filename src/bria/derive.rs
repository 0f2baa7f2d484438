use base64::{engine::general_purpose, Engine as _};
use serde_json::json;

use crate::config::Config;
use crate::prompt::structure::PromptStructure;
use crate::utils::timing::log_api_timing;

use super::client::{post_json, DeriveError, StructuredPromptResponse};

// Appended to every text derivation. Keeps motion subjects from rendering
// mirrored or in ambiguous poses.
const TEXT_PROMPT_SUFFIX: &str = "side profile facing right, dynamic motion, detailed";

pub fn compose_text_prompt(product: &str, context: &str) -> String {
    format!("{product}. {context}, {TEXT_PROMPT_SUFFIX}")
}

pub fn compose_reference_prompt(product: &str, context: &str) -> String {
    format!("{product}. {context}")
}

async fn request_structured_prompt(
    config: &Config,
    payload: serde_json::Value,
) -> Result<PromptStructure, DeriveError> {
    let response: StructuredPromptResponse =
        post_json(config, "/structured_prompt/generate", &payload)
            .await
            .map_err(|err| DeriveError(err.to_string()))?;

    let raw = response
        .result
        .and_then(|result| result.structured_prompt)
        .ok_or_else(|| DeriveError("response is missing result.structured_prompt".to_string()))?;

    PromptStructure::from_json_str(&raw)
        .map_err(|err| DeriveError(format!("structured prompt is not valid JSON: {err}")))
}

/// Extracts a structured prompt from a reference image plus the combined
/// product/context text. Any failure is returned to the caller, which is
/// expected to fall back to [`derive_from_text`] with the same inputs.
pub async fn derive_from_reference(
    config: &Config,
    image_bytes: &[u8],
    combined_prompt: &str,
) -> Result<PromptStructure, DeriveError> {
    let encoded = general_purpose::STANDARD.encode(image_bytes);
    let payload = json!({
        "image_file": encoded,
        "prompt": combined_prompt,
        "sync": true
    });

    log_api_timing("bria", "derive_from_reference", None, || {
        request_structured_prompt(config, payload)
    })
    .await
}

/// Synthesizes a structured prompt from the product and context text. This is
/// the derivation of last resort: an error here has no further fallback and
/// propagates to the presentation layer.
pub async fn derive_from_text(
    config: &Config,
    product: &str,
    context: &str,
) -> Result<PromptStructure, DeriveError> {
    let payload = json!({
        "prompt": compose_text_prompt(product, context),
        "sync": true
    });

    log_api_timing("bria", "derive_from_text", None, || {
        request_structured_prompt(config, payload)
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_prompt_carries_pose_suffix() {
        let prompt = compose_text_prompt("A white sneaker", "a person running with a dog");
        assert_eq!(
            prompt,
            "A white sneaker. a person running with a dog, side profile facing right, dynamic motion, detailed"
        );
    }

    #[test]
    fn reference_prompt_has_no_suffix() {
        let prompt = compose_reference_prompt("A white sneaker", "a person running");
        assert_eq!(prompt, "A white sneaker. a person running");
    }
}
