use anyhow::{bail, Context, Result};

const DEFAULT_MODELS: &str = "gemini-1.5-flash,gemini-1.5-pro";
const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_FALLBACK_PERCENTAGE: u8 = 75;

/// Application configuration loaded from environment variables.
/// Startup fails if `GOOGLE_API_KEY` is missing or a value does not parse.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_api_base: String,
    /// Tried in order until one returns a non-empty answer.
    pub gemini_models: Vec<String>,
    pub fallback_match_percentage: u8,
    pub max_upload_bytes: usize,
    pub startup_connectivity_check: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let gemini_models = parse_model_list(&optional_env("GEMINI_MODELS", DEFAULT_MODELS))?;

        let fallback_match_percentage = optional_env(
            "FALLBACK_MATCH_PERCENTAGE",
            &DEFAULT_FALLBACK_PERCENTAGE.to_string(),
        )
        .parse::<u8>()
        .context("FALLBACK_MATCH_PERCENTAGE must be an integer between 0 and 100")?;
        if fallback_match_percentage > 100 {
            bail!("FALLBACK_MATCH_PERCENTAGE must be between 0 and 100, got {fallback_match_percentage}");
        }

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_api_base: optional_env("GEMINI_API_BASE", DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            gemini_models,
            fallback_match_percentage,
            max_upload_bytes: optional_env(
                "MAX_UPLOAD_BYTES",
                &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
            )
            .parse::<usize>()
            .context("MAX_UPLOAD_BYTES must be a positive integer")?,
            startup_connectivity_check: parse_flag(&optional_env(
                "STARTUP_CONNECTIVITY_CHECK",
                "true",
            ))?,
            port: optional_env("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn optional_env(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Splits a comma-separated model list, ignoring blank entries.
fn parse_model_list(raw: &str) -> Result<Vec<String>> {
    let models: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(String::from)
        .collect();
    if models.is_empty() {
        bail!("GEMINI_MODELS must name at least one model");
    }
    Ok(models)
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean flag, got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_list_keeps_order_and_skips_blanks() {
        let models = parse_model_list(" gemini-1.5-flash, ,gemini-1.5-pro ,").unwrap();
        assert_eq!(models, vec!["gemini-1.5-flash", "gemini-1.5-pro"]);
    }

    #[test]
    fn test_empty_model_list_is_rejected() {
        assert!(parse_model_list(" , ").is_err());
    }

    #[test]
    fn test_default_model_list_parses() {
        assert_eq!(parse_model_list(DEFAULT_MODELS).unwrap().len(), 2);
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
