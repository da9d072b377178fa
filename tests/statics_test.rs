mod common;

use axum::{
    body::Body,
    http::{
        header::{CACHE_CONTROL, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
};
use partnerhub::router;
use tower::ServiceExt;

fn app() -> axum::Router {
    router(common::test_state())
}

async fn get(app: axum::Router, uri: &str) -> axum::response::Response {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .expect("request build should succeed");
    app.oneshot(req).await.expect("router should respond")
}

#[tokio::test]
async fn embedded_stylesheet_is_served_with_css_content_type() {
    let resp = get(app(), "/static/index.css").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("text/css"),
    );
    assert_eq!(
        resp.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("max-age=3600, must-revalidate"),
    );
}

#[tokio::test]
async fn embedded_icon_is_served_with_svg_content_type() {
    let resp = get(app(), "/static/img/icon.svg").await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
        Some("image/svg+xml"),
    );
}

#[tokio::test]
async fn unknown_static_paths_are_not_found() {
    let resp = get(app(), "/static/missing.css").await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
