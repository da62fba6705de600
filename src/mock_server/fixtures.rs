//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use chrono::{Duration, SecondsFormat, TimeZone, Utc};

use crate::{Asset, User};

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Asset Fixtures
    // =========================================================================

    /// Create an asset with only an ID.
    pub fn minimal_asset(id: &str) -> Asset {
        let value = serde_json::json!({
            "sys": { "id": id, "type": "Asset" }
        });
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Create a published asset uploaded `day` days after 2024-01-01.
    pub fn asset(
        id: &str,
        title: &str,
        file_name: &str,
        content_type: &str,
        day: i64,
        created_by: Option<&str>,
    ) -> Asset {
        let base = Utc
            .with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
            .single()
            .unwrap_or_default();
        let created = base + Duration::days(day);
        let updated = created + Duration::hours(2);
        let created = created.to_rfc3339_opts(SecondsFormat::Millis, true);
        let updated = updated.to_rfc3339_opts(SecondsFormat::Millis, true);

        let mut sys = serde_json::json!({
            "id": id,
            "type": "Asset",
            "version": 3,
            "createdAt": created,
            "updatedAt": updated,
            "publishedAt": updated,
        });
        if let Some(user_id) = created_by {
            sys["createdBy"] = serde_json::json!({
                "sys": { "type": "Link", "linkType": "User", "id": user_id }
            });
        }

        let value = serde_json::json!({
            "metadata": { "tags": [] },
            "sys": sys,
            "fields": {
                "title": { "en-US": title },
                "file": {
                    "en-US": {
                        "fileName": file_name,
                        "contentType": content_type,
                        "url": format!("//assets.ctfassets.net/mock-space/{id}/{file_name}"),
                        "details": { "size": 2048 }
                    }
                }
            }
        });
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Create `count` image assets named `asset-1` .. `asset-N`.
    pub fn numbered_assets(count: usize) -> Vec<Asset> {
        (1..=count)
            .map(|n| {
                Self::asset(
                    &format!("asset-{n}"),
                    &format!("Asset {n}"),
                    &format!("asset-{n}.jpg"),
                    "image/jpeg",
                    n as i64,
                    None,
                )
            })
            .collect()
    }

    // =========================================================================
    // User Fixtures
    // =========================================================================

    /// Create a user with a full name.
    pub fn user(id: &str, first_name: &str, last_name: &str) -> User {
        let value = serde_json::json!({
            "sys": { "id": id, "type": "User" },
            "firstName": first_name,
            "lastName": last_name,
            "email": format!("{}@example.com", first_name.to_lowercase()),
        });
        serde_json::from_value(value).unwrap_or_default()
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// A small space with linked and orphaned assets.
    ///
    /// - `hero-image`: 2 linking entries, by Ada
    /// - `logo`: 1 linking entry, by Grace
    /// - `old-banner`: orphaned, by Ada
    /// - `price-list`: orphaned, creator no longer in the space
    /// - `favicon`: 3 linking entries, no creator
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario {
            assets: vec![
                Self::asset(
                    "hero-image",
                    "Hero, homepage",
                    "hero.png",
                    "image/png",
                    0,
                    Some("user-ada"),
                ),
                Self::asset(
                    "logo",
                    "Logo",
                    "logo.svg",
                    "image/svg+xml",
                    1,
                    Some("user-grace"),
                ),
                Self::asset(
                    "old-banner",
                    "Old banner",
                    "banner.jpg",
                    "image/jpeg",
                    2,
                    Some("user-ada"),
                ),
                Self::asset(
                    "price-list",
                    "Price list 2023",
                    "prices.pdf",
                    "application/pdf",
                    3,
                    Some("user-gone"),
                ),
                Self::asset("favicon", "Favicon", "favicon.ico", "image/x-icon", 4, None),
            ],
            links: vec![
                ("hero-image", "entry-home"),
                ("hero-image", "entry-about"),
                ("logo", "entry-layout"),
                ("favicon", "entry-layout"),
                ("favicon", "entry-home"),
                ("favicon", "entry-about"),
            ],
            users: vec![
                Self::user("user-ada", "Ada", "Lovelace"),
                Self::user("user-grace", "Grace", "Hopper"),
            ],
        }
    }
}

/// A complete test scenario with related data.
pub struct DefaultScenario {
    pub assets: Vec<Asset>,
    /// `(asset ID, entry ID)` pairs.
    pub links: Vec<(&'static str, &'static str)>,
    pub users: Vec<User>,
}
