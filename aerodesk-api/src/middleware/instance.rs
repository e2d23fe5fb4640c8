use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::state::InstanceId;

pub const INSTANCE_HEADER: &str = "x-instance-id";

/// Stamps every response with the process id and `Cache-Control: no-store`.
///
/// Method mismatches come out of the router with an empty body; they get the
/// same JSON shape as every other error here.
pub async fn stamp_instance(
    State(instance): State<InstanceId>,
    req: Request,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;

    if response.status() == StatusCode::METHOD_NOT_ALLOWED
        && response.headers().get(header::CONTENT_TYPE).is_none()
    {
        let allow = response.headers().get(header::ALLOW).cloned();
        response = method_not_allowed_body().into_response();
        if let Some(allow) = allow {
            response.headers_mut().insert(header::ALLOW, allow);
        }
    }

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(instance.as_str()) {
        headers.insert(INSTANCE_HEADER, value);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "message": "resource not found" })),
    )
}

pub fn method_not_allowed_body() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(json!({ "message": "method not allowed" })),
    )
}
