//! Asset endpoint handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tokio::sync::RwLock;

use super::{check_request, ArrayResponse, ListQuery};
use crate::mock_server::state::{MockState, RecordedRequest};
use crate::Asset;

/// GET /spaces/{space}/environments/{environment}/assets
pub async fn list_assets(
    State(state): State<Arc<RwLock<MockState>>>,
    Path((space, _environment)): Path<(String, String)>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let mut state = state.write().await;

    if let Some(rejection) = check_request(&state, &headers, &space) {
        return rejection;
    }

    let skip = query.skip.unwrap_or(0);
    let limit = state.page_size(query.limit);
    state.requests.push(RecordedRequest {
        resource: "assets".to_string(),
        skip,
        links_to_asset: None,
    });

    let assets: Vec<Asset> = state
        .sorted_assets(query.order.as_deref())
        .into_iter()
        .cloned()
        .collect();

    (StatusCode::OK, Json(ArrayResponse::paginate(assets, skip, limit))).into_response()
}
