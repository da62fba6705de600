//! User model and the name directory used by the author column.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::ContentfulClient;
use crate::error::{CleanupError, Result};
use crate::models::asset::Sys;
use crate::pagination::{Collection, Page, PaginationParams};
use crate::traits::{List, CREATION_ORDER};

/// Name shown when a user cannot be resolved.
pub const UNKNOWN_USER: &str = "N/A";

/// A member of the Contentful space.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub sys: Sys,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Get the user ID.
    pub fn id(&self) -> &str {
        &self.sys.id
    }

    /// Human-readable name: first and last name, else email, else `N/A`.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            return name;
        }

        self.email
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_USER)
            .to_string()
    }
}

/// Query parameters for listing users.
#[derive(Debug, Clone, Serialize)]
pub struct UserQuery {
    pub order: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            order: CREATION_ORDER.to_string(),
            limit: None,
        }
    }
}

#[async_trait]
impl List for User {
    type Query = UserQuery;

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

        let path = client.space_path("users");
        let response = client.get_with_query(&path, &params).await?;
        let page: Page<User> = response.json().await.map_err(CleanupError::HttpError)?;
        Ok(page)
    }
}

/// Every user of a space, for resolving `createdBy` links to names.
///
/// Lookups scan the list in order; the directory is small and built once
/// per report.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<User>,
}

impl UserDirectory {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }

    /// Display name of the user with `id`, or `N/A` when unknown.
    pub fn name_of(&self, id: Option<&str>) -> String {
        id.and_then(|id| self.users.iter().find(|u| u.id() == id))
            .map(User::display_name)
            .unwrap_or_else(|| UNKNOWN_USER.to_string())
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl From<Collection<User>> for UserDirectory {
    fn from(collection: Collection<User>) -> Self {
        Self::new(collection.items)
    }
}
