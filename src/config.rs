//! Runtime configuration for the client core.

use serde::Deserialize;

/// Default analysis service root.
const DEFAULT_BASE_URL: &str = "https://drm-et6t.onrender.com";

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default maximum prompt length in characters, matching the input cap the
/// app applies before submitting.
const DEFAULT_MAX_PROMPT_CHARS: usize = 1000;

/// Configuration for the remote client and orchestrator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root URL of the analysis service.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum accepted prompt length in characters.
    pub max_prompt_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
        }
    }
}

impl Config {
    /// Build a config from defaults with `ONEIRO_*` environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("ONEIRO_BASE_URL") {
            if !url.trim().is_empty() {
                config.base_url = url;
            }
        }
        if let Ok(secs) = std::env::var("ONEIRO_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.request_timeout_secs = secs;
            }
        }
        if let Ok(max) = std::env::var("ONEIRO_MAX_PROMPT_CHARS") {
            if let Ok(max) = max.parse() {
                config.max_prompt_chars = max;
            }
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.max_prompt_chars, 1000);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"base_url":"http://localhost:9000"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost:9000");
        assert_eq!(config.max_prompt_chars, DEFAULT_MAX_PROMPT_CHARS);
    }
}
