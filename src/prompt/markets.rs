use std::collections::HashMap;

/// Canned background phrases for the named target markets. Unknown markets
/// fall back to a generic templated description, so the set is extendable
/// without touching the localization workflow.
#[derive(Debug, Clone)]
pub struct CityBackgrounds {
    entries: HashMap<String, String>,
}

impl Default for CityBackgrounds {
    fn default() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            "Tokyo, Japan".to_string(),
            "neon lit Shinjuku street at night, wet pavement, crowd".to_string(),
        );
        entries.insert(
            "Paris, France".to_string(),
            "sunny Parisian boulevard with Eiffel tower view".to_string(),
        );
        entries.insert(
            "New York, USA".to_string(),
            "busy Manhattan street with yellow cabs".to_string(),
        );
        entries.insert(
            "Mars Colony".to_string(),
            "red dusty martian landscape".to_string(),
        );
        CityBackgrounds { entries }
    }
}

impl CityBackgrounds {
    pub fn insert(&mut self, location: impl Into<String>, background: impl Into<String>) {
        self.entries.insert(location.into(), background.into());
    }

    pub fn describe(&self, location: &str) -> String {
        self.entries
            .get(location)
            .cloned()
            .unwrap_or_else(|| format!("outdoor scenery in {location}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_market_uses_canned_phrase() {
        let backgrounds = CityBackgrounds::default();
        assert_eq!(
            backgrounds.describe("Tokyo, Japan"),
            "neon lit Shinjuku street at night, wet pavement, crowd"
        );
    }

    #[test]
    fn unknown_market_uses_template() {
        let backgrounds = CityBackgrounds::default();
        assert_eq!(
            backgrounds.describe("Reykjavik, Iceland"),
            "outdoor scenery in Reykjavik, Iceland"
        );
    }

    #[test]
    fn markets_can_be_extended() {
        let mut backgrounds = CityBackgrounds::default();
        backgrounds.insert("Berlin, Germany", "graffiti wall along the Spree at dusk");
        assert_eq!(
            backgrounds.describe("Berlin, Germany"),
            "graffiti wall along the Spree at dusk"
        );
    }
}
