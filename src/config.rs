//! Process-wide configuration.
//!
//! All environment lookups happen here, once, at startup. The resulting
//! [`Config`] is immutable and passed explicitly to whatever needs it.

use std::env;
use std::time::Duration;

use crate::error::{CleanupError, Result};

pub const DEFAULT_CMA_URL: &str = "https://api.contentful.com";
pub const DEFAULT_CDA_URL: &str = "https://cdn.contentful.com";
pub const DEFAULT_ENVIRONMENT: &str = "master";
pub const DEFAULT_LOCALE: &str = "en-US";

/// Settings for one Contentful API (management or delivery).
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `https://api.contentful.com`.
    pub base_url: String,
    /// Bearer token. May be empty; the API will reject the request.
    pub token: String,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Request pacing used to stay under the API's per-second rate limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after every `every` items in the orphan scan.
    pub every: usize,
    /// Length of the pause.
    pub pause: Duration,
    /// Wait before retrying a rate-limited lookup.
    pub backoff: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            every: 7,
            pause: Duration::from_secs(1),
            backoff: Duration::from_secs(1),
        }
    }
}

impl Pacing {
    /// Pacing without any sleeping.
    pub fn none() -> Self {
        Self {
            every: 7,
            pause: Duration::ZERO,
            backoff: Duration::ZERO,
        }
    }
}

/// Immutable configuration for a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Content Management API (assets, users).
    pub management: ApiConfig,
    /// Content Delivery API (entry link lookups).
    pub delivery: ApiConfig,
    pub space_id: String,
    pub environment_id: String,
    /// Locale used to read localized asset fields.
    pub locale: String,
    /// Page size sent as `limit`; `None` uses the server default.
    pub page_size: Option<u32>,
    pub pacing: Pacing,
}

impl Config {
    /// Create a configuration for the given space with default URLs.
    pub fn new(space_id: &str, cma_token: &str, cda_token: &str) -> Self {
        Self {
            management: ApiConfig {
                base_url: DEFAULT_CMA_URL.to_string(),
                token: cma_token.to_string(),
            },
            delivery: ApiConfig {
                base_url: DEFAULT_CDA_URL.to_string(),
                token: cda_token.to_string(),
            },
            space_id: space_id.to_string(),
            environment_id: DEFAULT_ENVIRONMENT.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            page_size: None,
            pacing: Pacing::default(),
        }
    }

    /// Point both APIs at the same base URL (useful against a mock server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.management.base_url = base_url.to_string();
        self.delivery.base_url = base_url.to_string();
        self
    }

    #[must_use]
    pub fn with_environment(mut self, environment_id: &str) -> Self {
        self.environment_id = environment_id.to_string();
        self
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    #[must_use]
    pub fn with_pacing(mut self, pacing: Pacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `CONTENTFUL_PAGE_SIZE` is set but not a positive
    /// integer.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Missing ids and tokens are not rejected here; requests go out as-is
    /// and the API's rejection surfaces as a fetch failure.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let cma_token = var("CONTENTFUL_CMA_TOKEN").unwrap_or_default();
        let cda_token = var("CONTENTFUL_CDA_TOKEN").unwrap_or_default();
        let space_id = var("CONTENTFUL_SPACE_ID").unwrap_or_default();

        for (key, value) in [
            ("CONTENTFUL_CMA_TOKEN", &cma_token),
            ("CONTENTFUL_CDA_TOKEN", &cda_token),
            ("CONTENTFUL_SPACE_ID", &space_id),
        ] {
            if value.is_empty() {
                tracing::warn!("{key} is not set; requests will likely be rejected");
            }
        }

        let page_size = match var("CONTENTFUL_PAGE_SIZE") {
            Some(raw) => Some(parse_page_size(&raw)?),
            None => None,
        };

        Ok(Self {
            management: ApiConfig {
                base_url: var("CONTENTFUL_BASE_URL_CMA")
                    .unwrap_or_else(|| DEFAULT_CMA_URL.to_string()),
                token: cma_token,
            },
            delivery: ApiConfig {
                base_url: var("CONTENTFUL_BASE_URL_CDA")
                    .unwrap_or_else(|| DEFAULT_CDA_URL.to_string()),
                token: cda_token,
            },
            space_id,
            environment_id: var("CONTENTFUL_ENVIRONMENT_ID")
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            locale: var("CONTENTFUL_LOCALE").unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            page_size,
            pacing: Pacing::default(),
        })
    }
}

fn parse_page_size(raw: &str) -> Result<u32> {
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(CleanupError::InvalidArgument(format!(
            "CONTENTFUL_PAGE_SIZE must be a positive integer, got '{raw}'"
        ))),
    }
}
