use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; invalid values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// TrueType/OpenType file registered at startup. Unset → built-in metric table.
    pub font_path: Option<String>,
    pub font_family: String,
    pub fetch_timeout_secs: u64,
    pub max_concurrent_renders: usize,
    /// Overlay image used when a request names none.
    pub default_overlay_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_concurrent_renders = parse_env("MAX_CONCURRENT_RENDERS", 4usize)?;
        if max_concurrent_renders == 0 {
            anyhow::bail!("MAX_CONCURRENT_RENDERS must be at least 1");
        }

        Ok(Config {
            port: parse_env("PORT", 8080u16)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            font_path: optional_env("FONT_PATH"),
            font_family: optional_env("FONT_FAMILY").unwrap_or_else(|| "Inter".to_string()),
            fetch_timeout_secs: parse_env("FETCH_TIMEOUT_SECS", 15u64)?,
            max_concurrent_renders,
            default_overlay_url: optional_env("DEFAULT_OVERLAY_URL"),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has invalid value '{raw}'")),
    }
}
