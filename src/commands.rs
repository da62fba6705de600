//! Command flows behind the CLI.
//!
//! Each command fetches what it needs through [`Contentful`], builds its
//! output in memory and writes it in one go. Everything runs sequentially:
//! one request at a time, in asset order.

use std::path::{Path, PathBuf};

use crate::client::ContentfulClient;
use crate::config::Config;
use crate::csv::{Cell, CsvTable};
use crate::error::{CleanupError, Result};
use crate::models::{count_links, Asset, AssetQuery, User, UserDirectory, UserQuery};
use crate::pagination::Collection;
use crate::progress::{Progress, ProgressMode};
use crate::traits::List;

pub const COL_ASSET_ID: &str = "Asset ID";
pub const COL_ASSET_TITLE: &str = "Asset Title";
pub const COL_FILENAME: &str = "Filename";
pub const COL_CONTENT_TYPE: &str = "Content Type";
pub const COL_PUBLISHED_AT: &str = "Published At";
pub const COL_UPDATED_AT: &str = "Updated At";
pub const COL_CREATED_AT: &str = "Created At";
pub const COL_LINKED_ENTRIES: &str = "Count of Linked Entries";
pub const COL_AUTHOR: &str = "Author";

/// Both API clients plus the configuration they were built from.
#[derive(Debug, Clone)]
pub struct Contentful {
    pub management: ContentfulClient,
    pub delivery: ContentfulClient,
    pub config: Config,
    pub progress: ProgressMode,
}

impl Contentful {
    /// Build the management and delivery clients for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if either base URL is invalid.
    pub fn new(config: Config, progress: ProgressMode) -> Result<Self> {
        Ok(Self {
            management: ContentfulClient::management(&config)?,
            delivery: ContentfulClient::delivery(&config)?,
            config,
            progress,
        })
    }

    /// Fetch every asset in the environment, oldest first.
    pub async fn fetch_assets(&self) -> Result<Collection<Asset>> {
        let query = AssetQuery::with_limit(self.config.page_size);
        let mut bar = self.progress.bar("Fetching assets");
        Asset::list_all(&self.management, &query, bar.as_mut()).await
    }

    /// Fetch every user in the space.
    pub async fn fetch_users(&self) -> Result<UserDirectory> {
        let query = UserQuery {
            limit: self.config.page_size,
            ..Default::default()
        };
        let mut bar = self.progress.bar("Fetching users");
        let users = User::list_all(&self.management, &query, bar.as_mut()).await?;
        Ok(UserDirectory::from(users))
    }

    /// Build the asset details table, one row per asset.
    ///
    /// With a user directory, an `Author` column names each asset's creator.
    pub async fn asset_details(
        &self,
        assets: &[Asset],
        users: Option<&UserDirectory>,
    ) -> Result<CsvTable> {
        let mut table = details_table(users.is_some())?;
        let locale = &self.config.locale;

        let mut bar = self.progress.bar("Counting linked entries");
        bar.start(assets.len() as u64);

        for asset in assets {
            let links = count_links(&self.delivery, asset.id(), self.config.pacing.backoff).await?;
            let row = asset.row(locale);

            let mut cells = vec![
                Cell::new(COL_ASSET_ID, row.id),
                Cell::new(COL_ASSET_TITLE, row.title),
                Cell::new(COL_FILENAME, row.file_name),
                Cell::new(COL_CONTENT_TYPE, row.content_type),
                Cell::new(COL_PUBLISHED_AT, row.published_at),
                Cell::new(COL_UPDATED_AT, row.updated_at),
                Cell::new(COL_CREATED_AT, row.created_at),
                Cell::new(COL_LINKED_ENTRIES, links),
            ];
            if let Some(users) = users {
                cells.push(Cell::new(COL_AUTHOR, users.name_of(row.created_by.as_deref())));
            }

            table.add_row(cells);
            bar.advance();
        }

        bar.finish();
        Ok(table)
    }

    /// Return the assets no entry links to, in input order.
    ///
    /// Pauses for `pacing.pause` after every `pacing.every` assets to stay
    /// under the delivery API's rate limit.
    pub async fn orphaned_assets<'a>(&self, assets: &'a [Asset]) -> Result<Vec<&'a Asset>> {
        let pacing = self.config.pacing;
        let mut orphans = Vec::new();

        let mut bar = self.progress.bar("Scanning for orphans");
        bar.start(assets.len() as u64);

        for (index, asset) in assets.iter().enumerate() {
            if count_links(&self.delivery, asset.id(), pacing.backoff).await? == 0 {
                tracing::debug!(asset_id = asset.id(), "Asset is orphaned");
                orphans.push(asset);
            }
            bar.advance();

            if pause_due(index + 1, assets.len(), pacing.every) {
                tokio::time::sleep(pacing.pause).await;
            }
        }

        bar.finish();
        Ok(orphans)
    }
}

/// True when a pacing pause belongs after `processed` of `total` items.
///
/// No pause follows the last item.
pub fn pause_due(processed: usize, total: usize, every: usize) -> bool {
    every > 0 && processed % every == 0 && processed < total
}

/// Empty details table with the report's columns.
pub fn details_table(with_author: bool) -> Result<CsvTable> {
    let mut table = CsvTable::new();
    for (order, name) in [
        COL_ASSET_ID,
        COL_ASSET_TITLE,
        COL_FILENAME,
        COL_CONTENT_TYPE,
        COL_PUBLISHED_AT,
        COL_UPDATED_AT,
        COL_CREATED_AT,
        COL_LINKED_ENTRIES,
    ]
    .into_iter()
    .enumerate()
    {
        table.add_column(name, order as u32)?;
    }
    if with_author {
        table.add_column(COL_AUTHOR, 8)?;
    }
    Ok(table)
}

/// Single-column table of orphaned asset IDs.
pub fn orphan_table(orphans: &[&Asset]) -> Result<CsvTable> {
    let mut table = CsvTable::new();
    table.add_column(COL_ASSET_ID, 0)?;
    for asset in orphans {
        table.add_row([Cell::new(COL_ASSET_ID, asset.id())]);
    }
    Ok(table)
}

/// The first `max` assets, or all of them when `max` is unset.
///
/// # Errors
///
/// Returns [`CleanupError::InvalidArgument`] if `max` is zero.
pub fn limit_assets(assets: &[Asset], max: Option<usize>) -> Result<&[Asset]> {
    match max {
        Some(0) => Err(CleanupError::InvalidArgument(
            "--max must be greater than zero".to_string(),
        )),
        Some(n) => Ok(&assets[..n.min(assets.len())]),
        None => Ok(assets),
    }
}

/// Read an asset dump written by `get-assets`.
pub async fn read_collection(path: &Path) -> Result<Collection<Asset>> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| CleanupError::file_io(path, e))?;
    Ok(serde_json::from_slice(&data)?)
}

/// Write `contents` to `path`, replacing any existing file.
pub async fn write_output(path: &Path, contents: &str) -> Result<()> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| CleanupError::file_io(path, e))?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "Wrote output");
    Ok(())
}

/// Options for `get-asset-details`.
#[derive(Debug, Clone, Default)]
pub struct DetailsOptions {
    pub output_file: PathBuf,
    /// Asset dump to read; assets are fetched live when unset.
    pub input_file: Option<PathBuf>,
    pub max: Option<usize>,
    /// Add the `Author` column.
    pub author: bool,
}

/// Options for `find-orphaned-assets`.
#[derive(Debug, Clone, Default)]
pub struct OrphanOptions {
    pub output_file: PathBuf,
    pub input_file: Option<PathBuf>,
    pub max: Option<usize>,
}

/// `get-assets`: dump every asset as JSON. Returns the fetched collection.
pub async fn get_assets(cf: &Contentful, output_file: &Path) -> Result<Collection<Asset>> {
    let assets = cf.fetch_assets().await?;
    tracing::info!(count = assets.len(), total = assets.total, "Fetched assets");

    let json = serde_json::to_string_pretty(&assets)?;
    write_output(output_file, &json).await?;
    Ok(assets)
}

/// `get-asset-details`: write the details CSV. Returns the table written.
pub async fn get_asset_details(cf: &Contentful, options: &DetailsOptions) -> Result<CsvTable> {
    let assets = load_assets(cf, options.input_file.as_deref()).await?;
    let selected = limit_assets(&assets.items, options.max)?;

    let users = if options.author {
        Some(cf.fetch_users().await?)
    } else {
        None
    };

    let table = cf.asset_details(selected, users.as_ref()).await?;
    write_output(&options.output_file, &table.render()).await?;
    Ok(table)
}

/// `find-orphaned-assets`: write the orphan CSV. Returns the orphans.
pub async fn find_orphaned_assets(cf: &Contentful, options: &OrphanOptions) -> Result<Vec<Asset>> {
    let assets = load_assets(cf, options.input_file.as_deref()).await?;
    let selected = limit_assets(&assets.items, options.max)?;

    let orphans = cf.orphaned_assets(selected).await?;
    tracing::info!(
        scanned = selected.len(),
        orphaned = orphans.len(),
        "Orphan scan complete"
    );

    write_output(&options.output_file, &orphan_table(&orphans)?.render()).await?;
    Ok(orphans.into_iter().cloned().collect())
}

async fn load_assets(cf: &Contentful, input_file: Option<&Path>) -> Result<Collection<Asset>> {
    match input_file {
        Some(path) => {
            let assets = read_collection(path).await?;
            tracing::info!(path = %path.display(), count = assets.len(), "Loaded assets");
            Ok(assets)
        }
        None => cf.fetch_assets().await,
    }
}
