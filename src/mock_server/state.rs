//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Contentful API server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{Asset, User};

/// Page size used when a request does not send `limit`.
pub const DEFAULT_PAGE_LIMIT: u64 = 100;
/// Largest `limit` Contentful accepts.
pub const MAX_PAGE_LIMIT: u64 = 1000;

/// A request the server received, for asserting on call patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Resource name: "assets", "entries" or "users".
    pub resource: String,
    pub skip: u64,
    /// `links_to_asset` for entry lookups.
    pub links_to_asset: Option<String>,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug)]
pub struct MockState {
    /// Space served; requests for other spaces get 404.
    pub space_id: String,

    /// Assets in upload order.
    pub assets: Vec<Asset>,

    /// Entry IDs linking to each asset, keyed by asset ID.
    pub links: HashMap<String, Vec<String>>,

    /// Members of the space.
    pub users: Vec<User>,

    /// Page size applied when a request sends no `limit`.
    pub page_limit: u64,

    /// Number of upcoming entry lookups to answer with a rate-limit error.
    pub rate_limited_lookups: u32,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// Every listing request served, in arrival order.
    pub requests: Vec<RecordedRequest>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            space_id: "mock-space".to_string(),
            assets: Vec::new(),
            links: HashMap::new(),
            users: Vec::new(),
            page_limit: DEFAULT_PAGE_LIMIT,
            rate_limited_lookups: 0,
            required_token: None,
            requests: Vec::new(),
        }
    }
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add an asset to the state.
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Record that `entry_id` links to `asset_id`.
    pub fn with_link(mut self, asset_id: &str, entry_id: &str) -> Self {
        self.links
            .entry(asset_id.to_string())
            .or_default()
            .push(entry_id.to_string());
        self
    }

    /// Add a user to the state.
    pub fn with_user(mut self, user: User) -> Self {
        self.users.push(user);
        self
    }

    /// Serve pages of `limit` items when the client does not choose.
    pub fn with_page_limit(mut self, limit: u64) -> Self {
        self.page_limit = limit;
        self
    }

    /// Rate limit the next `count` entry lookups.
    pub fn with_rate_limited_lookups(mut self, count: u32) -> Self {
        self.rate_limited_lookups = count;
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// Whether a request carrying `authorization` may proceed.
    pub fn is_authorized(&self, authorization: Option<&str>) -> bool {
        match &self.required_token {
            Some(token) => authorization == Some(format!("Bearer {token}").as_str()),
            None => true,
        }
    }

    /// Assets sorted for `order` (`sys.createdAt` or `-sys.createdAt`).
    ///
    /// Any other order keeps upload order.
    pub fn sorted_assets(&self, order: Option<&str>) -> Vec<&Asset> {
        let mut assets: Vec<&Asset> = self.assets.iter().collect();
        match order {
            Some("sys.createdAt") => assets.sort_by_key(|a| a.sys.created()),
            Some("-sys.createdAt") => {
                assets.sort_by_key(|a| std::cmp::Reverse(a.sys.created()));
            }
            _ => {}
        }
        assets
    }

    /// Entry IDs linking to `asset_id`.
    pub fn links_to(&self, asset_id: &str) -> &[String] {
        self.links.get(asset_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Consume one pending rate-limit rejection, if any.
    pub fn take_rate_limit(&mut self) -> bool {
        if self.rate_limited_lookups > 0 {
            self.rate_limited_lookups -= 1;
            true
        } else {
            false
        }
    }

    /// Requests made against `resource`.
    pub fn requests_for(&self, resource: &str) -> Vec<&RecordedRequest> {
        self.requests
            .iter()
            .filter(|r| r.resource == resource)
            .collect()
    }

    /// Effective page size for a requested `limit`.
    pub fn page_size(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.page_limit)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}
