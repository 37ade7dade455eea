use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::vision::google::{DEFAULT_LABEL_RESULTS, DEFAULT_VISION_API_URL};
use crate::vision::rate_limiter::RateLimiter;

/// Posts analyzed per batch unless CORDOBA_IMAGE_CAP says otherwise.
pub const DEFAULT_IMAGE_CAP: usize = 25;

/// Origin the dashboard front end is served from during development.
pub const DEFAULT_ALLOWED_ORIGIN: &str = "https://localhost:3000";

/// Central configuration loaded from environment variables.
///
/// Secrets come from env vars only. The .env file is loaded automatically at
/// startup via dotenvy.
#[derive(Clone)]
pub struct Config {
    pub google_api_key: String,
    /// Cloud Vision `images:annotate` endpoint.
    pub vision_api_url: String,
    /// Maximum number of posts analyzed per batch (prefix of the feed).
    pub image_cap: usize,
    /// LABEL_DETECTION maxResults sent with every request.
    pub label_results: u32,
    /// Optional client-side cap on Vision requests per second.
    pub vision_qps: Option<f64>,
    /// CORS origin allowed to call the web API.
    pub allowed_origin: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except the API key, which is only checked
    /// by `require_vision` so `--help`-level commands work without it.
    pub fn load() -> Result<Self> {
        Ok(Self {
            google_api_key: env::var("GOOGLE_CLOUD_API_KEY").unwrap_or_default(),
            vision_api_url: env::var("VISION_API_URL")
                .unwrap_or_else(|_| DEFAULT_VISION_API_URL.to_string()),
            image_cap: parse_var("CORDOBA_IMAGE_CAP")?.unwrap_or(DEFAULT_IMAGE_CAP),
            label_results: parse_var("CORDOBA_LABEL_RESULTS")?.unwrap_or(DEFAULT_LABEL_RESULTS),
            vision_qps: parse_var("CORDOBA_VISION_QPS")?,
            allowed_origin: env::var("CORDOBA_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGIN.to_string()),
        })
    }

    /// Check that the Cloud Vision API key is configured.
    /// Call this before any operation that annotates images.
    pub fn require_vision(&self) -> Result<()> {
        if self.google_api_key.is_empty() {
            anyhow::bail!(
                "GOOGLE_CLOUD_API_KEY not set. Add it to your .env file.\n\
                 The key needs access to the Cloud Vision API.\n\
                 See .env.example for the optional variables."
            );
        }
        Ok(())
    }

    /// Build the optional Vision rate limiter from CORDOBA_VISION_QPS.
    pub fn rate_limiter(&self) -> Result<Option<RateLimiter>> {
        self.vision_qps
            .map(RateLimiter::new)
            .transpose()
            .context("Invalid CORDOBA_VISION_QPS")
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = if self.google_api_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("Config")
            .field("google_api_key", &key)
            .field("vision_api_url", &self.vision_api_url)
            .field("image_cap", &self.image_cap)
            .field("label_results", &self.label_results)
            .field("vision_qps", &self.vision_qps)
            .field("allowed_origin", &self.allowed_origin)
            .finish()
    }
}

/// Parse an optional env var, failing with the variable's name if it is set
/// but malformed.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} must be a number, got {raw:?}")),
        _ => Ok(None),
    }
}
