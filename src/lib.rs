//! Contentful asset cleanup library.
//!
//! Enumerates the assets of a Contentful space, counts the entries linking
//! to each one, and reports the results as a JSON dump or a CSV table. The
//! same lookups flag "orphaned" assets that no entry references.
//!
//! # Quick Start
//!
//! ```no_run
//! use contentful_cleanup::{count_links, Asset, AssetQuery, Config, ContentfulClient, List, NoProgress};
//!
//! #[tokio::main]
//! async fn main() -> contentful_cleanup::Result<()> {
//!     let config = Config::from_env()?;
//!     let management = ContentfulClient::management(&config)?;
//!     let delivery = ContentfulClient::delivery(&config)?;
//!
//!     // Every asset, across all pages
//!     let assets = Asset::list_all(&management, &AssetQuery::default(), &mut NoProgress).await?;
//!     println!("Found {} assets", assets.len());
//!
//!     // Entries linking to the first one
//!     if let Some(asset) = assets.items.first() {
//!         let links = count_links(&delivery, asset.id(), config.pacing.backoff).await?;
//!         println!("{} is linked from {} entries", asset.id(), links);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`fetch_all`] drives any `skip`-based page fetch to completion and
//!   gathers a [`Collection`].
//! - [`List`] is implemented by [`Asset`] and [`User`] on top of it.
//! - [`count_links`] asks the delivery API how many entries reference an
//!   asset, retrying once when rate limited.
//! - [`csv::CsvTable`] assembles the CSV reports.
//! - [`commands`] wires these into the three CLI commands.
//!
//! # Configuration
//!
//! [`Config::from_env`] reads `CONTENTFUL_SPACE_ID`,
//! `CONTENTFUL_ENVIRONMENT_ID`, `CONTENTFUL_CMA_TOKEN`,
//! `CONTENTFUL_CDA_TOKEN`, `CONTENTFUL_BASE_URL_CMA`,
//! `CONTENTFUL_BASE_URL_CDA`, `CONTENTFUL_LOCALE` and
//! `CONTENTFUL_PAGE_SIZE`.

mod client;
mod config;
mod error;
mod models;
mod pagination;
mod progress;
mod traits;

pub mod cli;
pub mod commands;
pub mod csv;
pub mod output;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{ContentfulClient, RATE_LIMIT_RESET, RATE_LIMIT_SECOND_REMAINING};
pub use config::{ApiConfig, Config, Pacing};
pub use error::{CleanupError, Result};
pub use pagination::{fetch_all, Collection, Page, PaginationParams};
pub use progress::{ConsoleProgress, NoProgress, Progress, ProgressMode};

// Re-export traits
pub use traits::{List, CREATION_ORDER};

// Re-export models
pub use models::{
    // Asset types
    Asset,
    AssetFields,
    AssetFile,
    AssetQuery,
    AssetRow,
    Link,
    LinkSys,
    Localized,
    Sys,
    // User types
    User,
    UserDirectory,
    UserQuery,
    UNKNOWN_USER,
    // Entry lookups
    LinkedEntryQuery,
};

// Re-export convenience functions
pub use models::{count_links, is_orphaned};
