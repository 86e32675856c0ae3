//! Health check and the browser front end.

use axum::{http::StatusCode, response::Html};

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "status",
    responses(
        (status = 200, description = "Health check passed")
    )
)]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Upload form, script editor and result view.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
