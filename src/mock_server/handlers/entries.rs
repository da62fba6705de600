//! Entry endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::{check_request, error_response, rate_limited_response, ArrayResponse};
use crate::mock_server::state::{MockState, RecordedRequest};

/// Query parameters for searching entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListEntriesQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub links_to_asset: Option<String>,
}

/// GET /spaces/{space}/environments/{environment}/entries
///
/// Only `links_to_asset` searches are supported.
pub async fn list_entries(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((space, _environment)): Path<(String, String)>,
    Query(query): Query<ListEntriesQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if let Some(rejection) = check_request(&state, &headers, &space) {
        return rejection;
    }

    let skip = query.skip.unwrap_or(0);
    state.requests.push(RecordedRequest {
        resource: "entries".to_string(),
        skip,
        links_to_asset: query.links_to_asset.clone(),
    });

    if state.take_rate_limit() {
        return rate_limited_response();
    }

    let Some(asset_id) = query.links_to_asset.filter(|id| !id.is_empty()) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "InvalidQuery",
            "The query you sent was invalid. Probably a filter or ordering specification is not applicable to the type of one of the fields.",
        );
    };

    let limit = state.page_size(query.limit);
    let entries: Vec<serde_json::Value> = state
        .links_to(&asset_id)
        .iter()
        .map(|id| serde_json::json!({ "sys": { "id": id, "type": "Entry" }, "fields": {} }))
        .collect();

    (StatusCode::OK, Json(ArrayResponse::paginate(entries, skip, limit))).into_response()
}
