//! List trait for fetching collections of records.

use async_trait::async_trait;

use crate::client::ContentfulClient;
use crate::error::Result;
use crate::pagination::{fetch_all, Collection, Page};
use crate::progress::Progress;

/// Order applied to every listing so pages stay stable across calls.
pub const CREATION_ORDER: &str = "sys.createdAt";

/// List records with `skip`/`limit` pagination.
///
/// Implement this trait for record types served by a Contentful collection
/// endpoint.
///
/// # Example
///
/// ```ignore
/// use contentful_cleanup::{Asset, AssetQuery, ContentfulClient, List, NoProgress};
///
/// let client = ContentfulClient::management(&config)?;
///
/// // Fetch a single page
/// let page = Asset::list_page(&client, &AssetQuery::default(), 0).await?;
///
/// // Fetch every page
/// let assets = Asset::list_all(&client, &AssetQuery::default(), &mut NoProgress).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Query parameters for filtering and page size.
    type Query: Default + Send + Sync;

    /// Fetch the page starting at `skip`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be decoded.
    async fn list_page(client: &ContentfulClient, query: &Self::Query, skip: u64)
        -> Result<Page<Self>>;

    /// Fetch every page and gather the items into one [`Collection`].
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_all<P>(
        client: &ContentfulClient,
        query: &Self::Query,
        progress: &mut P,
    ) -> Result<Collection<Self>>
    where
        P: Progress + ?Sized,
    {
        fetch_all(|skip| Self::list_page(client, query, skip), progress).await
    }
}
