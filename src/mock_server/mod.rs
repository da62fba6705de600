//! Mock Contentful API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! Contentful listing endpoints for integration and end-to-end testing.
//! Unlike wiremock which mocks at the HTTP level per-test, this server keeps
//! state across requests: it paginates real data, answers link lookups, and
//! can be told to rate limit the next few requests.
//!
//! # Example
//!
//! ```ignore
//! use contentful_cleanup::mock_server::MockServer;
//! use contentful_cleanup::{Asset, AssetQuery, ContentfulClient, List, NoProgress};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = ContentfulClient::new("test-token", server.url(), "space", "master").unwrap();
//!
//!     // Server comes with default fixtures
//!     let assets = Asset::list_all(&client, &AssetQuery::default(), &mut NoProgress).await.unwrap();
//!     assert!(!assets.is_empty());
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
