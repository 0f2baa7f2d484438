use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One fully specified visual recipe for one image, as exchanged with the
/// Bria structured-prompt endpoints. The sections this crate actually edits
/// are typed; everything else the service returns is carried verbatim in the
/// flattened extras so a round-trip through the document is lossless.
///
/// The document is self-contained: cloning one never shares state with
/// another, and every mutation in [`crate::prompt::mutate`] works on a clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PromptStructure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighting: Option<Lighting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photographic_characteristics: Option<PhotographicCharacteristics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Background>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aesthetics: Option<Aesthetics>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lighting {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhotographicCharacteristics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera_angle: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_image: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aesthetics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub art_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_atmosphere: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PromptStructure {
    pub fn from_json_str(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    // Sections are created on first write, never implicitly on read.

    pub fn lighting_mut(&mut self) -> &mut Lighting {
        self.lighting.get_or_insert_with(Default::default)
    }

    pub fn photographic_characteristics_mut(&mut self) -> &mut PhotographicCharacteristics {
        self.photographic_characteristics
            .get_or_insert_with(Default::default)
    }

    pub fn background_mut(&mut self) -> &mut Background {
        self.background.get_or_insert_with(Default::default)
    }

    pub fn aesthetics_mut(&mut self) -> &mut Aesthetics {
        self.aesthetics.get_or_insert_with(Default::default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_keeps_unknown_sections() {
        let raw = json!({
            "lighting": { "conditions": "natural_sunlight", "intensity": "soft" },
            "subject": { "core": "a white sneaker", "pose": "mid stride" },
            "negative_prompt": "blurry, text"
        })
        .to_string();

        let parsed = PromptStructure::from_json_str(&raw).unwrap();
        assert_eq!(
            parsed.lighting.as_ref().unwrap().conditions.as_deref(),
            Some("natural_sunlight")
        );
        assert!(parsed.extra.contains_key("subject"));
        assert!(parsed.extra.contains_key("negative_prompt"));

        let serialized = serde_json::to_value(&parsed).unwrap();
        assert_eq!(serialized["lighting"]["intensity"], json!("soft"));
        assert_eq!(serialized["subject"]["pose"], json!("mid stride"));
    }

    #[test]
    fn sections_are_created_on_first_write() {
        let mut structure = PromptStructure::default();
        assert!(structure.background.is_none());

        structure.background_mut().description = Some("clean backdrop".to_string());
        assert_eq!(
            structure.background.unwrap().description.as_deref(),
            Some("clean backdrop")
        );
    }

    #[test]
    fn absent_fields_stay_absent_when_serialized() {
        let structure = PromptStructure::default();
        let serialized = serde_json::to_value(&structure).unwrap();
        assert_eq!(serialized, json!({}));
    }
}
