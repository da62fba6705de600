//! Pagination over Contentful's `skip`/`limit` collection endpoints.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::{CleanupError, Result};
use crate::progress::Progress;

/// One page of results from a Contentful collection endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct Page<T> {
    /// Total number of items across all pages.
    #[serde(default)]
    pub total: u64,
    /// Maximum number of items per page, as applied by the server.
    #[serde(default)]
    pub limit: u64,
    /// Offset of the first item on this page.
    #[serde(default)]
    pub skip: u64,
    /// The items on this page.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Page<T> {
    /// Create a new page.
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, limit: u64, skip: u64) -> Self {
        Self {
            total,
            limit,
            skip,
            items,
        }
    }

    /// Number of pages needed to cover `total` at this page's `limit`.
    #[must_use]
    pub fn page_count(&self) -> u64 {
        if self.limit == 0 {
            0
        } else {
            self.total.div_ceil(self.limit)
        }
    }

    /// Returns true if this page has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Every item of a paginated endpoint, gathered into one sequence.
///
/// This is also the on-disk format of the asset dump.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>", serialize = "T: Serialize"))]
pub struct Collection<T> {
    /// Total reported by the first page.
    #[serde(default)]
    pub total: u64,
    /// Page size reported by the first page.
    #[serde(default)]
    pub limit: u64,
    /// All items, in page order.
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

impl<T> Collection<T> {
    /// Returns the number of items collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> From<Page<T>> for Collection<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            total: page.total,
            limit: page.limit,
            items: page.items,
        }
    }
}

/// Query parameters shared by paginated requests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaginationParams {
    /// Number of items to skip.
    pub skip: u64,
    /// Number of items per page; server default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl PaginationParams {
    /// Pagination params for the page starting at `skip`.
    #[must_use]
    pub fn at(skip: u64, limit: Option<u32>) -> Self {
        Self { skip, limit }
    }
}

/// Fetch every page of a collection.
///
/// `fetch_page` is called with `skip = 0` first. The `total` and `limit` of
/// that page decide how many calls follow: exactly `ceil(total / limit)`
/// calls are made in all, with `skip` advancing by `limit` each time.
/// `total` is not re-checked on later pages.
///
/// Any failed call aborts the whole fetch; no partial result is returned.
///
/// `progress` is started with the page count once the first page arrives and
/// advanced once per page.
///
/// # Errors
///
/// Returns the first error produced by `fetch_page` as
/// [`CleanupError::FetchFailed`]. A rate-limited page fails with status 429;
/// transport and decoding errors keep their text as the message.
pub async fn fetch_all<T, F, Fut, P>(mut fetch_page: F, progress: &mut P) -> Result<Collection<T>>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
    P: Progress + ?Sized,
{
    let first = fetch_page(0).await.map_err(CleanupError::into_fetch_failed)?;

    let page_count = first.page_count();
    if first.limit == 0 && first.total > 0 {
        tracing::warn!(
            total = first.total,
            "Server reported a page limit of 0, using the first page only"
        );
    }
    tracing::debug!(
        total = first.total,
        limit = first.limit,
        page_count,
        "Fetched first page"
    );

    progress.start(page_count.max(1));
    progress.advance();

    let limit = first.limit;
    let mut collection = Collection::from(first);

    for page_number in 1..page_count {
        let skip = page_number * limit;
        let page = fetch_page(skip)
            .await
            .map_err(CleanupError::into_fetch_failed)?;
        tracing::trace!(skip, items = page.items.len(), "Fetched page");
        collection.items.extend(page.items);
        progress.advance();
    }

    progress.finish();

    Ok(collection)
}
