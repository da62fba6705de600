//! Contentful API client.
//!
//! Low-level HTTP client that handles authentication and raw requests.
//! Record-specific operations are implemented via traits on model types.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::Serialize;
use url::Url;

use crate::config::{ApiConfig, Config};
use crate::error::{CleanupError, Result};

const USER_AGENT: &str = concat!("contentful-cleanup/", env!("CARGO_PKG_VERSION"));

/// Header carrying the remaining per-second request budget.
pub const RATE_LIMIT_SECOND_REMAINING: &str = "x-contentful-ratelimit-second-remaining";
/// Header carrying the seconds until the rate budget resets.
pub const RATE_LIMIT_RESET: &str = "x-contentful-ratelimit-reset";

/// Low-level client for one Contentful API.
///
/// A run uses two of these: one for the Content Management API and one for
/// the Content Delivery API. Each is scoped to a space and environment.
///
/// This struct is cheaply cloneable; clones reference the same underlying
/// connection pool.
///
/// # Example
///
/// ```no_run
/// use contentful_cleanup::{Config, ContentfulClient};
///
/// # fn example() -> contentful_cleanup::Result<()> {
/// let config = Config::from_env()?;
/// let management = ContentfulClient::management(&config)?;
/// let delivery = ContentfulClient::delivery(&config)?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ContentfulClient {
    http: Client,
    base_url: Arc<Url>,
    token: String,
    space_id: String,
    environment_id: String,
}

impl std::fmt::Debug for ContentfulClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentfulClient")
            .field("base_url", &self.base_url.as_str())
            .field("space_id", &self.space_id)
            .field("environment_id", &self.environment_id)
            .finish_non_exhaustive()
    }
}

impl ContentfulClient {
    /// Client for the Content Management API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn management(config: &Config) -> Result<Self> {
        Self::for_api(&config.management, config)
    }

    /// Client for the Content Delivery API described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn delivery(config: &Config) -> Result<Self> {
        Self::for_api(&config.delivery, config)
    }

    fn for_api(api: &ApiConfig, config: &Config) -> Result<Self> {
        Self::new(
            &api.token,
            &api.base_url,
            &config.space_id,
            &config.environment_id,
        )
    }

    /// Create a new client.
    ///
    /// # Arguments
    ///
    /// * `token` - Bearer token for this API
    /// * `base_url` - Base URL (e.g., `https://api.contentful.com`)
    /// * `space_id` - Contentful space
    /// * `environment_id` - Environment within the space
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str, space_id: &str, environment_id: &str) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(CleanupError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            token: token.to_string(),
            space_id: space_id.to_string(),
            environment_id: environment_id.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Relative path of a resource scoped to the space.
    pub fn space_path(&self, resource: &str) -> String {
        format!("spaces/{}/{}", urlencoding::encode(&self.space_id), resource)
    }

    /// Relative path of a resource scoped to the space and environment.
    pub fn environment_path(&self, resource: &str) -> String {
        format!(
            "spaces/{}/environments/{}/{}",
            urlencoding::encode(&self.space_id),
            urlencoding::encode(&self.environment_id),
            resource
        )
    }

    /// Make a GET request with query parameters.
    #[tracing::instrument(skip(self, query))]
    pub async fn get_with_query<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(CleanupError::HttpError)?;

        Self::check_response(response).await
    }

    /// Check response status and convert errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        // Handle rate limiting
        let headers = response.headers();
        let quota_exhausted = headers
            .get(RATE_LIMIT_SECOND_REMAINING)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            == Some(0);
        if status.as_u16() == 429 || quota_exhausted {
            let reset = headers
                .get(RATE_LIMIT_RESET)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            tracing::debug!(%status, "rate limit exhausted");
            return Err(CleanupError::RateLimited { reset_secs: reset });
        }

        let message = Self::extract_error_message(response, status).await;
        Err(CleanupError::FetchFailed {
            status: Some(status.as_u16()),
            message,
        })
    }

    /// Extract error message from a failed response.
    async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
        let body = match response.text().await {
            Ok(b) if !b.trim().is_empty() => b,
            _ => return format!("HTTP {status}"),
        };

        // Contentful errors look like {"sys":{"id":"NotFound"},"message":"..."}
        if let Ok(json) = serde_json::from_str::<serde_json::Value>(&body) {
            if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
                return msg.to_string();
            }
            if let Some(id) = json.pointer("/sys/id").and_then(|m| m.as_str()) {
                return id.to_string();
            }
        }

        body
    }
}
