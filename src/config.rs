use std::env;

use once_cell::sync::Lazy;

#[derive(Debug, Clone)]
pub struct Config {
    pub bria_api_token: String,
    pub bria_base_url: String,
    pub bria_aspect_ratio: String,
    pub bria_request_timeout_secs: u64,
    pub log_level: String,
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::load);

fn env_string(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn normalize_base_url(value: String) -> String {
    value.trim().trim_end_matches('/').to_string()
}

impl Config {
    /// Reads configuration from the process environment. A missing API token
    /// is not rejected here; it surfaces as remote-call failures instead.
    pub fn load() -> Self {
        let _ = dotenvy::dotenv();

        Config {
            bria_api_token: env_string("BRIA_API_TOKEN", ""),
            bria_base_url: normalize_base_url(env_string(
                "BRIA_BASE_URL",
                "https://engine.prod.bria-api.com/v2",
            )),
            bria_aspect_ratio: env_string("BRIA_ASPECT_RATIO", "16:9"),
            bria_request_timeout_secs: env_u64("BRIA_REQUEST_TIMEOUT_SECS", 90),
            log_level: env_string("LOG_LEVEL", "info").to_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let normalized = normalize_base_url("https://engine.prod.bria-api.com/v2/".to_string());
        assert_eq!(normalized, "https://engine.prod.bria-api.com/v2");
    }
}
