//! Entry lookups: how many entries reference a given asset.

use std::time::Duration;

use serde::de::IgnoredAny;
use serde::Serialize;

use crate::client::ContentfulClient;
use crate::error::{CleanupError, Result};
use crate::pagination::Page;

/// Query parameters for the `links_to_asset` entry search.
#[derive(Debug, Clone, Serialize)]
pub struct LinkedEntryQuery<'a> {
    /// Only entries referencing this asset.
    pub links_to_asset: &'a str,
    /// Only `total` is read, so one item per page is enough.
    pub limit: u32,
}

impl<'a> LinkedEntryQuery<'a> {
    pub fn new(asset_id: &'a str) -> Self {
        Self {
            links_to_asset: asset_id,
            limit: 1,
        }
    }
}

/// Count the entries that link to `asset_id`.
///
/// Issues one delivery API search and returns its `total`. If the API
/// reports the per-second rate budget as exhausted, waits `backoff` and
/// retries the same lookup once, returning the retry's result.
///
/// # Errors
///
/// - [`CleanupError::InvalidArgument`] if `asset_id` is empty
/// - [`CleanupError::FetchFailed`] if the lookup fails, including a retry
///   that is rate limited again
#[tracing::instrument(skip(client, backoff))]
pub async fn count_links(
    client: &ContentfulClient,
    asset_id: &str,
    backoff: Duration,
) -> Result<u64> {
    if asset_id.trim().is_empty() {
        return Err(CleanupError::InvalidArgument(
            "asset ID must not be empty".to_string(),
        ));
    }

    match fetch_link_total(client, asset_id).await {
        Err(e) if e.is_rate_limited() => {
            tracing::warn!(asset_id, ?backoff, "Rate limited, retrying once");
            tokio::time::sleep(backoff).await;

            fetch_link_total(client, asset_id)
                .await
                .map_err(|e| match e {
                    CleanupError::RateLimited { .. } => CleanupError::FetchFailed {
                        status: Some(429),
                        message: format!(
                            "rate limit still exhausted after retrying links for asset '{asset_id}'"
                        ),
                    },
                    other => other,
                })
        }
        result => result,
    }
}

/// Returns true if no entry links to `asset_id`.
///
/// # Errors
///
/// Same as [`count_links`].
pub async fn is_orphaned(
    client: &ContentfulClient,
    asset_id: &str,
    backoff: Duration,
) -> Result<bool> {
    Ok(count_links(client, asset_id, backoff).await? == 0)
}

async fn fetch_link_total(client: &ContentfulClient, asset_id: &str) -> Result<u64> {
    let path = client.environment_path("entries");
    let response = client
        .get_with_query(&path, &LinkedEntryQuery::new(asset_id))
        .await?;
    let page: Page<IgnoredAny> = response.json().await.map_err(CleanupError::HttpError)?;
    Ok(page.total)
}
