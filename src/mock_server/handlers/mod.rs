//! HTTP request handlers for the mock server.

pub mod assets;
pub mod entries;
pub mod users;

pub use assets::*;
pub use entries::*;
pub use users::*;

use axum::{
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::mock_server::state::MockState;
use crate::{RATE_LIMIT_RESET, RATE_LIMIT_SECOND_REMAINING};

/// Pagination query shared by the listing endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
    pub order: Option<String>,
}

/// Contentful's collection envelope.
#[derive(Debug, Serialize)]
pub struct ArrayResponse<T> {
    pub sys: ArraySys,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
pub struct ArraySys {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl<T: Serialize> ArrayResponse<T> {
    /// Slice `all` into the page selected by `skip` and `limit`.
    pub fn paginate(all: Vec<T>, skip: u64, limit: u64) -> Self {
        let total = all.len() as u64;
        let items = all
            .into_iter()
            .skip(skip as usize)
            .take(limit as usize)
            .collect();
        Self {
            sys: ArraySys { kind: "Array" },
            total,
            skip,
            limit,
            items,
        }
    }
}

/// Contentful-style error body.
pub fn error_response(status: StatusCode, id: &str, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({
            "sys": { "type": "Error", "id": id },
            "message": message
        })),
    )
        .into_response()
}

/// Reject requests for another space or without the required token.
pub fn check_request(state: &MockState, headers: &HeaderMap, space: &str) -> Option<Response> {
    let authorization = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    if !state.is_authorized(authorization) {
        return Some(error_response(
            StatusCode::UNAUTHORIZED,
            "AccessTokenInvalid",
            "The access token you sent could not be found or is invalid.",
        ));
    }

    if space != state.space_id {
        return Some(error_response(
            StatusCode::NOT_FOUND,
            "NotFound",
            "The resource could not be found.",
        ));
    }

    None
}

/// 429 with the headers Contentful sends when the second budget is spent.
pub fn rate_limited_response() -> Response {
    let mut response = error_response(
        StatusCode::TOO_MANY_REQUESTS,
        "RateLimitExceeded",
        "You have exceeded the rate limit of the Organization this Space belongs to.",
    );
    let headers = response.headers_mut();
    headers.insert(RATE_LIMIT_SECOND_REMAINING, HeaderValue::from_static("0"));
    headers.insert(RATE_LIMIT_RESET, HeaderValue::from_static("1"));
    response
}
