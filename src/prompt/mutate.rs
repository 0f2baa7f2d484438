//! Pure transformations over [`PromptStructure`]. Every function clones its
//! input and returns the edited clone; the caller's document is never touched.

use serde_json::Value;

use crate::prompt::markets::CityBackgrounds;
use crate::prompt::structure::{Background, PromptStructure};

pub const STUDIO_BACKGROUND: &str = "clean solid studio background";
pub const ANIME_MEDIUM: &str = "anime illustration, 2D cell shaded";
pub const ANIME_ART_STYLE: &str = "anime";

/// Sets the lighting conditions and camera angle for one matrix cell. Studio
/// lighting does not mix with arbitrary backdrops, so any studio variant also
/// gets the whole background section replaced with a clean studio phrase.
pub fn with_lighting_and_angle(
    base: &PromptStructure,
    lighting: &str,
    angle: &str,
) -> PromptStructure {
    let mut next = base.clone();
    next.lighting_mut().conditions = Some(lighting.to_string());
    next.photographic_characteristics_mut().camera_angle = Some(angle.to_string());

    if lighting.to_ascii_lowercase().contains("studio") {
        next.background = Some(Background {
            description: Some(STUDIO_BACKGROUND.to_string()),
            ..Default::default()
        });
    }

    next
}

/// Re-homes a winning structure to a target market. Every string value in the
/// document that mentions "studio" is rewritten to say "outdoor" first, since
/// the winner may have been produced under studio-lighting assumptions that
/// would fight the new environment. The background is then forced to the
/// market's canned phrase (or a generic outdoor template) and any
/// reference-image binding is dropped.
pub fn with_location(
    base: &PromptStructure,
    location: &str,
    backgrounds: &CityBackgrounds,
) -> PromptStructure {
    let mut next = base.clone();
    rewrite_studio_mentions(&mut next);

    let background = next.background_mut();
    background.description = Some(backgrounds.describe(location));
    background.source_image = None;

    next
}

/// Blends a free-text market instruction into the aesthetics section. Anime
/// requests are special-cased with fixed medium/style values because mood
/// blending alone does not reliably pull the remote model into anime output;
/// anything else is appended to the mood, comma-joined, never replacing what
/// is already there.
pub fn with_instruction(base: &PromptStructure, instruction: &str) -> PromptStructure {
    if instruction.trim().is_empty() {
        return base.clone();
    }

    let mut next = base.clone();
    let aesthetics = next.aesthetics_mut();

    if instruction.to_lowercase().contains("anime") {
        aesthetics.medium = Some(ANIME_MEDIUM.to_string());
        aesthetics.art_style = Some(ANIME_ART_STYLE.to_string());
    } else {
        let current = aesthetics.mood_atmosphere.take().unwrap_or_default();
        aesthetics.mood_atmosphere = Some(format!("{current}, {instruction}"));
    }

    next
}

/// Walks every string value in the document (keys are left alone) and maps
/// case-insensitive "studio" occurrences to "outdoor", keeping a leading
/// capital: "Studio" becomes "Outdoor", "studio" becomes "outdoor".
fn rewrite_studio_mentions(structure: &mut PromptStructure) {
    if let Some(lighting) = structure.lighting.as_mut() {
        rewrite_field(&mut lighting.conditions);
        rewrite_map(&mut lighting.extra);
    }
    if let Some(photo) = structure.photographic_characteristics.as_mut() {
        rewrite_field(&mut photo.camera_angle);
        rewrite_map(&mut photo.extra);
    }
    if let Some(background) = structure.background.as_mut() {
        rewrite_field(&mut background.description);
        if let Some(source_image) = background.source_image.as_mut() {
            rewrite_value(source_image);
        }
        rewrite_map(&mut background.extra);
    }
    if let Some(aesthetics) = structure.aesthetics.as_mut() {
        rewrite_field(&mut aesthetics.medium);
        rewrite_field(&mut aesthetics.art_style);
        rewrite_field(&mut aesthetics.mood_atmosphere);
        rewrite_map(&mut aesthetics.extra);
    }
    rewrite_map(&mut structure.extra);
}

fn rewrite_field(field: &mut Option<String>) {
    if let Some(text) = field.as_mut() {
        if let Some(replaced) = replace_studio_tokens(text) {
            *text = replaced;
        }
    }
}

fn rewrite_map(map: &mut serde_json::Map<String, Value>) {
    for value in map.values_mut() {
        rewrite_value(value);
    }
}

fn rewrite_value(value: &mut Value) {
    match value {
        Value::String(text) => {
            if let Some(replaced) = replace_studio_tokens(text) {
                *text = replaced;
            }
        }
        Value::Array(items) => {
            for item in items {
                rewrite_value(item);
            }
        }
        Value::Object(map) => rewrite_map(map),
        _ => {}
    }
}

fn replace_studio_tokens(input: &str) -> Option<String> {
    // "studio" is ASCII, so byte offsets into the lowered copy are valid
    // offsets into the original.
    let lowered = input.to_ascii_lowercase();
    if !lowered.contains("studio") {
        return None;
    }

    let mut out = String::with_capacity(input.len() + 8);
    let mut cursor = 0;
    while let Some(found) = lowered[cursor..].find("studio") {
        let start = cursor + found;
        out.push_str(&input[cursor..start]);
        if input[start..].starts_with(|c: char| c.is_ascii_uppercase()) {
            out.push_str("Outdoor");
        } else {
            out.push_str("outdoor");
        }
        cursor = start + "studio".len();
    }
    out.push_str(&input[cursor..]);
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_structure() -> PromptStructure {
        PromptStructure::from_json_str(
            &json!({
                "lighting": { "conditions": "Studio Softbox" },
                "background": {
                    "description": "plain studio backdrop",
                    "source_image": "inspiration.png"
                },
                "aesthetics": { "mood_atmosphere": "calm" },
                "subject": { "setting": "inside a photo Studio", "pose": "mid stride" }
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn mutations_never_touch_the_input() {
        let base = sample_structure();
        let before = base.clone();

        let _ = with_lighting_and_angle(&base, "studio_softbox", "eye_level");
        let _ = with_location(&base, "Tokyo, Japan", &CityBackgrounds::default());
        let _ = with_instruction(&base, "add falling snow");

        assert_eq!(base, before);
    }

    #[test]
    fn studio_lighting_forces_clean_background() {
        let base = sample_structure();
        let variant = with_lighting_and_angle(&base, "Studio_Softbox", "low_angle");

        let background = variant.background.unwrap();
        assert_eq!(background.description.as_deref(), Some(STUDIO_BACKGROUND));
        assert!(background.source_image.is_none());
        assert_eq!(
            variant.lighting.unwrap().conditions.as_deref(),
            Some("Studio_Softbox")
        );
        assert_eq!(
            variant
                .photographic_characteristics
                .unwrap()
                .camera_angle
                .as_deref(),
            Some("low_angle")
        );
    }

    #[test]
    fn non_studio_lighting_keeps_background() {
        let base = sample_structure();
        let variant = with_lighting_and_angle(&base, "neon_cyberpunk", "eye_level");
        assert_eq!(
            variant.background.unwrap().description.as_deref(),
            Some("plain studio backdrop")
        );
    }

    #[test]
    fn location_rewrites_studio_mentions_everywhere() {
        let base = sample_structure();
        let localized = with_location(&base, "Paris, France", &CityBackgrounds::default());

        assert_eq!(
            localized.lighting.unwrap().conditions.as_deref(),
            Some("Outdoor Softbox")
        );
        assert_eq!(
            localized.extra["subject"]["setting"],
            json!("inside a photo Outdoor")
        );
    }

    #[test]
    fn location_forces_market_background_and_drops_source_image() {
        let base = sample_structure();
        let localized = with_location(&base, "Tokyo, Japan", &CityBackgrounds::default());

        let background = localized.background.unwrap();
        assert_eq!(
            background.description.as_deref(),
            Some("neon lit Shinjuku street at night, wet pavement, crowd")
        );
        assert!(background.source_image.is_none());
    }

    #[test]
    fn unknown_location_gets_templated_background() {
        let base = sample_structure();
        let localized = with_location(&base, "Lagos, Nigeria", &CityBackgrounds::default());
        assert_eq!(
            localized.background.unwrap().description.as_deref(),
            Some("outdoor scenery in Lagos, Nigeria")
        );
    }

    #[test]
    fn blank_instruction_is_a_no_op() {
        let base = sample_structure();
        assert_eq!(with_instruction(&base, ""), base);
        assert_eq!(with_instruction(&base, "   \n"), base);
    }

    #[test]
    fn anime_instruction_forces_fixed_style() {
        let base = sample_structure();
        let styled = with_instruction(&base, "make it ANIME please");

        let aesthetics = styled.aesthetics.unwrap();
        assert_eq!(aesthetics.medium.as_deref(), Some(ANIME_MEDIUM));
        assert_eq!(aesthetics.art_style.as_deref(), Some(ANIME_ART_STYLE));
        // Mood is left as it was.
        assert_eq!(aesthetics.mood_atmosphere.as_deref(), Some("calm"));
    }

    #[test]
    fn instructions_accumulate_in_mood() {
        let base = sample_structure();
        let once = with_instruction(&base, "add cherry blossoms");
        let twice = with_instruction(&once, "golden hour glow");

        assert_eq!(
            twice.aesthetics.unwrap().mood_atmosphere.as_deref(),
            Some("calm, add cherry blossoms, golden hour glow")
        );
    }

    #[test]
    fn instruction_creates_aesthetics_when_missing() {
        let base = PromptStructure::default();
        let styled = with_instruction(&base, "moody rain");
        assert_eq!(
            styled.aesthetics.unwrap().mood_atmosphere.as_deref(),
            Some(", moody rain")
        );
    }

    #[test]
    fn token_replacement_preserves_capitalization() {
        assert_eq!(
            replace_studio_tokens("Studio shot in a studio"),
            Some("Outdoor shot in a outdoor".to_string())
        );
        assert_eq!(
            replace_studio_tokens("STUDIO lighting"),
            Some("Outdoor lighting".to_string())
        );
        assert_eq!(replace_studio_tokens("outdoor scene"), None);
    }
}
