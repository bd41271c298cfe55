use anyhow::{Context, Result};

pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Process configuration, read once at startup.
///
/// A missing `OPENAI_API_KEY` is not a startup failure: the server still boots
/// and every generation request answers with a configuration error instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_api_base: String,
    pub openai_model: String,
    pub strict_output: bool,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let openai_api_key = lookup("OPENAI_API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        let openai_api_base = lookup("OPENAI_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let openai_model = lookup("OPENAI_MODEL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());
        let strict_output = match lookup("SHORTS_STRICT_OUTPUT") {
            Some(v) => parse_flag(&v)
                .with_context(|| format!("SHORTS_STRICT_OUTPUT must be a boolean, got '{v}'"))?,
            None => false,
        };
        let port = match lookup("PORT") {
            Some(v) => v
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a valid port number, got '{v}'"))?,
            None => 8080,
        };

        Ok(Config { openai_api_key, openai_api_base, openai_model, strict_output, port })
    }

    /// First few characters of the key, for startup logging.
    pub fn masked_api_key(&self) -> String {
        match &self.openai_api_key {
            Some(key) => format!("{}...", key.chars().take(6).collect::<String>()),
            None => "<unset>".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
