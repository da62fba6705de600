//! Asset model and trait implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::client::ContentfulClient;
use crate::error::{CleanupError, Result};
use crate::pagination::{Page, PaginationParams};
use crate::traits::{List, CREATION_ORDER};

/// Field values keyed by locale code (e.g. `en-US`).
pub type Localized<T> = BTreeMap<String, T>;

/// A Contentful asset.
///
/// Assets are uploaded media files plus metadata. Only the fields used in
/// reports are typed; anything else the API returns is carried in `extra`
/// so a dump written from this model keeps it. Values are stored as sent:
/// serializing an asset reproduces the API's JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Asset {
    /// System metadata.
    #[serde(default)]
    pub sys: Sys,

    /// Localized content fields.
    #[serde(default, skip_serializing_if = "AssetFields::is_empty")]
    pub fields: AssetFields,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// System metadata shared by Contentful records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sys {
    /// Record ID.
    #[serde(default)]
    pub id: String,

    /// Record type (e.g., "Asset", "User").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub record_type: Option<String>,

    /// Timestamps keep the API's text; see [`Sys::created`] for a parsed value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,

    /// User who created the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<Link>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Sys {
    /// Creation time, if present and RFC 3339.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }
}

/// A link to another record, as in `{"sys": {"type": "Link", "id": "..."}}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Link {
    pub sys: LinkSys,
}

/// The `sys` block of a link.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkSys {
    #[serde(default)]
    pub id: String,

    /// Always "Link".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    /// Type of the linked record (e.g., "User").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_type: Option<String>,
}

/// Content fields of an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssetFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Localized<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Localized<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Localized<AssetFile>>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl AssetFields {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.file.is_none()
            && self.extra.is_empty()
    }
}

/// File metadata for one locale of an asset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Asset {
    /// Get the asset ID.
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// Title in `locale`, if set.
    pub fn title(&self, locale: &str) -> Option<&str> {
        self.fields
            .title
            .as_ref()
            .and_then(|t| t.get(locale))
            .map(String::as_str)
    }

    /// File metadata in `locale`, if set.
    pub fn file(&self, locale: &str) -> Option<&AssetFile> {
        self.fields.file.as_ref().and_then(|f| f.get(locale))
    }

    /// ID of the user who created this asset.
    pub fn created_by(&self) -> Option<&str> {
        self.sys
            .created_by
            .as_ref()
            .map(|l| l.sys.id.as_str())
            .filter(|id| !id.is_empty())
    }

    /// Flatten the asset into report columns for `locale`.
    pub fn row(&self, locale: &str) -> AssetRow {
        let file = self.file(locale);
        AssetRow {
            id: self.sys.id.clone(),
            title: self.title(locale).unwrap_or_default().to_string(),
            file_name: file
                .and_then(|f| f.file_name.clone())
                .unwrap_or_default(),
            content_type: file
                .and_then(|f| f.content_type.clone())
                .unwrap_or_default(),
            published_at: format_timestamp(self.sys.published_at.as_deref()),
            updated_at: format_timestamp(self.sys.updated_at.as_deref()),
            created_at: format_timestamp(self.sys.created_at.as_deref()),
            created_by: self.created_by().map(str::to_string),
        }
    }
}

/// An asset's report columns with every missing value defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetRow {
    pub id: String,
    pub title: String,
    pub file_name: String,
    pub content_type: String,
    pub published_at: String,
    pub updated_at: String,
    pub created_at: String,
    pub created_by: Option<String>,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// Render a timestamp the way the API does (`2023-01-02T03:04:05.000Z`).
///
/// Text that is not RFC 3339 is passed through unchanged.
fn format_timestamp(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => parse_timestamp(raw)
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_else(|| raw.to_string()),
        None => String::new(),
    }
}

/// Query parameters for listing assets.
#[derive(Debug, Clone, Serialize)]
pub struct AssetQuery {
    /// Sort order; must stay the same across a paginated fetch.
    pub order: String,

    /// Page size; server default when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for AssetQuery {
    fn default() -> Self {
        Self {
            order: CREATION_ORDER.to_string(),
            limit: None,
        }
    }
}

impl AssetQuery {
    /// Query with an explicit page size.
    pub fn with_limit(limit: Option<u32>) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }
}

#[async_trait]
impl List for Asset {
    type Query = AssetQuery;

    #[tracing::instrument(skip(client))]
    async fn list_page(
        client: &ContentfulClient,
        query: &Self::Query,
        skip: u64,
    ) -> Result<Page<Self>> {
        #[derive(Serialize)]
        struct RequestParams<'a> {
            order: &'a str,
            #[serde(flatten)]
            page: PaginationParams,
        }

        let params = RequestParams {
            order: &query.order,
            page: PaginationParams::at(skip, query.limit),
        };

        let path = client.environment_path("assets");
        let response = client.get_with_query(&path, &params).await?;
        let page: Page<Asset> = response.json().await.map_err(CleanupError::HttpError)?;
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_asset() -> Asset {
        serde_json::from_value(serde_json::json!({
            "metadata": { "tags": [] },
            "sys": {
                "id": "asset-1",
                "type": "Asset",
                "createdAt": "2023-01-02T03:04:05.000Z",
                "updatedAt": "2023-02-03T04:05:06.789Z",
                "publishedAt": "2023-02-03T04:05:07.000Z",
                "version": 7,
                "createdBy": { "sys": { "type": "Link", "linkType": "User", "id": "user-1" } }
            },
            "fields": {
                "title": { "en-US": "Hero, large" },
                "file": {
                    "en-US": {
                        "fileName": "hero.png",
                        "contentType": "image/png",
                        "url": "//images.ctfassets.net/hero.png",
                        "details": { "size": 1024 }
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_asset_deserialize() {
        let asset = sample_asset();
        assert_eq!(asset.id(), "asset-1");
        assert_eq!(asset.title("en-US"), Some("Hero, large"));
        assert_eq!(asset.created_by(), Some("user-1"));
        let file = asset.file("en-US").unwrap();
        assert_eq!(file.file_name.as_deref(), Some("hero.png"));
        assert!(file.extra.contains_key("details"));
    }

    #[test]
    fn test_unknown_fields_survive_round_trip() {
        let asset = sample_asset();
        let value = serde_json::to_value(&asset).unwrap();
        assert_eq!(value["metadata"]["tags"], serde_json::json!([]));
        assert_eq!(value["sys"]["version"], 7);
        assert_eq!(value["fields"]["file"]["en-US"]["details"]["size"], 1024);
    }

    #[test]
    fn test_row_projection() {
        let row = sample_asset().row("en-US");
        assert_eq!(
            row,
            AssetRow {
                id: "asset-1".to_string(),
                title: "Hero, large".to_string(),
                file_name: "hero.png".to_string(),
                content_type: "image/png".to_string(),
                published_at: "2023-02-03T04:05:07.000Z".to_string(),
                updated_at: "2023-02-03T04:05:06.789Z".to_string(),
                created_at: "2023-01-02T03:04:05.000Z".to_string(),
                created_by: Some("user-1".to_string()),
            }
        );
    }

    #[test]
    fn test_row_projection_defaults() {
        let asset: Asset = serde_json::from_value(serde_json::json!({
            "sys": { "id": "bare" }
        }))
        .unwrap();

        let row = asset.row("en-US");
        assert_eq!(row.id, "bare");
        assert!(row.title.is_empty());
        assert!(row.file_name.is_empty());
        assert!(row.content_type.is_empty());
        assert!(row.published_at.is_empty());
        assert_eq!(row.created_by, None);
    }

    #[test]
    fn test_reserializing_keeps_api_json() {
        let raw = serde_json::json!({
            "sys": {
                "id": "a",
                "createdAt": "2024-03-01T10:00:00.000Z",
                "updatedAt": "2024-03-01T10:00:00.000Z"
            }
        });

        let asset: Asset = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&asset).unwrap(), raw);

        let full = sample_asset();
        let again: Asset = serde_json::from_value(serde_json::to_value(&full).unwrap()).unwrap();
        assert_eq!(
            serde_json::to_value(&again).unwrap(),
            serde_json::to_value(&full).unwrap()
        );
    }

    #[test]
    fn test_non_rfc3339_timestamp_loads_and_passes_through() {
        let asset: Asset = serde_json::from_value(serde_json::json!({
            "sys": { "id": "a", "createdAt": "2024-03-01", "updatedAt": "2024-03-01T10:00:00Z" }
        }))
        .unwrap();

        assert_eq!(asset.sys.created(), None);
        let row = asset.row("en-US");
        assert_eq!(row.created_at, "2024-03-01");
        assert_eq!(row.updated_at, "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn test_row_projection_other_locale() {
        let row = sample_asset().row("de-DE");
        assert!(row.title.is_empty());
        assert!(row.file_name.is_empty());
        assert_eq!(row.id, "asset-1");
    }

    #[test]
    fn test_asset_query_default_orders_by_creation() {
        let query = AssetQuery::default();
        let serialized = serde_qs::to_string(&query).expect("Failed to serialize query");
        assert_eq!(serialized, "order=sys.createdAt");

        let query = AssetQuery::with_limit(Some(50));
        let serialized = serde_qs::to_string(&query).expect("Failed to serialize query");
        assert!(serialized.contains("limit=50"));
    }
}
