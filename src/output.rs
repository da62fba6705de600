//! Terminal output for command results.
//!
//! Report files are CSV or JSON; what goes to stdout is a short
//! human-readable summary built with `tabled`.

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Asset;

/// One orphaned asset as shown in the terminal.
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct OrphanRow {
    #[tabled(rename = "Asset ID")]
    pub id: String,
    #[tabled(rename = "Title")]
    pub title: String,
    #[tabled(rename = "Filename")]
    pub file_name: String,
    #[tabled(rename = "Created At")]
    pub created_at: String,
}

impl OrphanRow {
    pub fn from_asset(asset: &Asset, locale: &str) -> Self {
        let row = asset.row(locale);
        Self {
            id: row.id,
            title: row.title,
            file_name: row.file_name,
            created_at: row.created_at,
        }
    }
}

/// Table of orphaned assets, or a one-line note when there are none.
pub fn orphan_summary(orphans: &[Asset], locale: &str) -> String {
    if orphans.is_empty() {
        return "No orphaned assets found".to_string();
    }

    let rows: Vec<OrphanRow> = orphans
        .iter()
        .map(|a| OrphanRow::from_asset(a, locale))
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::sharp());
    format!("{table}\n{} orphaned assets", orphans.len())
}
