use axum::{
    http::{
        header,
        HeaderValue,
        StatusCode,
    },
    response::{
        IntoResponse,
        Response,
    },
    Json,
};
use log::warn;
use serde::Serialize;

use crate::api::ErrorBody;

/// Freshness window for definitions, examples and dictionary results.
pub const CACHE_SHORT_SECS: u64 = 43_200;
/// Freshness window for decompositions and everything else.
pub const CACHE_LONG_SECS: u64 = 86_400;
pub const STALE_WHILE_REVALIDATE_SECS: u64 = 604_800;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed query parameter.
    InvalidInput(String),
    /// The dictionary engine failed; `code` names the operation.
    Upstream { code: &'static str, message: String },
}

impl ApiError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }

    pub fn upstream(code: &'static str, message: impl ToString) -> Self {
        ApiError::Upstream { code, message: message.to_string() }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::InvalidInput(error) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody { error, message: None })).into_response()
            }
            ApiError::Upstream { code, message } => {
                warn!("{}: {}", code, message);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody { error: code.to_string(), message: Some(message) }),
                )
                    .into_response()
            }
        }
    }
}

pub fn cache_control(seconds: u64) -> String {
    format!("s-maxage={}, stale-while-revalidate={}", seconds, STALE_WHILE_REVALIDATE_SECS)
}

/// A 200 JSON response advertising the given freshness window.
pub fn cached_json<T: Serialize>(seconds: u64, body: T) -> Response {
    ([(header::CACHE_CONTROL, cache_control(seconds))], Json(body)).into_response()
}

pub async fn add_cors_headers(mut response: Response) -> Response {
    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static("GET, OPTIONS"));
    headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("Content-Type"));
    response
}

pub async fn preflight() -> StatusCode {
    StatusCode::OK
}

pub async fn method_not_allowed() -> Response {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorBody { error: "Method Not Allowed".to_string(), message: None }),
    )
        .into_response()
}

pub async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorBody { error: "Not Found".to_string(), message: None }))
        .into_response()
}
