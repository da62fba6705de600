//! User endpoint handlers.

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
use crate::User;

/// GET /spaces/{space}/users
pub async fn list_users(
    State(state): State<Arc<RwLock<MockState>>>,
    Path(space): Path<String>,
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
        resource: "users".to_string(),
        skip,
        links_to_asset: None,
    });

    let users: Vec<User> = state.users.clone();
    (StatusCode::OK, Json(ArrayResponse::paginate(users, skip, limit))).into_response()
}
