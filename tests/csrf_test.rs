mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use partnerhub::{names, router};
use tower::ServiceExt;

fn app() -> axum::Router {
    router(common::test_state())
}

#[tokio::test]
async fn state_changing_requests_without_the_htmx_header_are_rejected() {
    let app = app();

    let cases = [
        (Method::POST, names::LOGIN_URL),
        (Method::POST, names::LOGOUT_URL),
        (Method::POST, names::DEALS_URL),
        (Method::POST, names::TICKETS_URL),
        (Method::POST, "/admin/deals/abc/status"),
    ];

    for (method, uri) in cases {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("email=a%40b.c&password=pw"))
            .expect("request build should succeed");
        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(
            resp.status(),
            StatusCode::FORBIDDEN,
            "expected FORBIDDEN for {uri}",
        );
    }
}

#[tokio::test]
async fn reads_pass_the_csrf_check_without_the_htmx_header() {
    let app = app();

    let req = Request::builder()
        .method(Method::GET)
        .uri(names::LOGIN_URL)
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = app.oneshot(req).await.expect("router should respond");

    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn htmx_posts_pass_the_csrf_check() {
    let app = app();

    // No session either, so the request reaches the guard and redirects
    // instead of being rejected by the middleware.
    let req = Request::builder()
        .method(Method::POST)
        .uri(names::DEALS_URL)
        .header("HX-Request", "true")
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = app.oneshot(req).await.expect("router should respond");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
}
