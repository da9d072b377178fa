mod common;

use axum::{
    body::Body,
    http::{header::LOCATION, Method, Request, StatusCode},
};
use partnerhub::{names, router};
use tower::ServiceExt;

fn app() -> axum::Router {
    router(common::test_state())
}

fn assert_login_redirect(resp: &axum::response::Response, uri: &str) {
    assert_eq!(
        resp.status(),
        StatusCode::SEE_OTHER,
        "expected a login redirect for {uri}",
    );
    assert_eq!(
        resp.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some(names::LOGIN_URL),
        "expected Location {} for {uri}",
        names::LOGIN_URL,
    );
    assert_eq!(
        resp.headers().get("HX-Redirect").and_then(|v| v.to_str().ok()),
        Some(names::LOGIN_URL),
        "expected HX-Redirect {} for {uri}",
        names::LOGIN_URL,
    );
}

#[tokio::test]
async fn partner_pages_redirect_to_login_without_a_session() {
    let app = app();

    let uris = [
        names::DEALS_URL,
        names::NEW_DEAL_URL,
        names::TICKETS_URL,
        names::NEW_TICKET_URL,
        names::KB_URL,
        names::MDF_URL,
        names::NEW_MDF_URL,
        names::TRAINING_URL,
        names::MY_CERTIFICATES_URL,
        names::ACCOUNT_URL,
    ];

    for uri in uris {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request build should succeed");
        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_login_redirect(&resp, uri);
    }
}

#[tokio::test]
async fn admin_pages_redirect_to_login_without_a_session() {
    let app = app();

    let uris = [
        names::ADMIN_URL,
        names::ADMIN_DEALS_URL,
        names::ADMIN_TICKETS_URL,
        names::ADMIN_ARTICLES_URL,
        names::ADMIN_MDF_URL,
        names::ADMIN_PARTNERS_URL,
        names::ADMIN_COURSES_URL,
    ];

    for uri in uris {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request build should succeed");
        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_login_redirect(&resp, uri);
    }
}

#[tokio::test]
async fn htmx_posts_redirect_to_login_without_a_session() {
    let app = app();

    // Session guards run before the form is read, so no body is needed.
    let uris = [
        names::DEALS_URL,
        names::TICKETS_URL,
        names::MDF_URL,
        names::NEW_ADMIN_ARTICLE_URL,
    ];

    for uri in uris {
        let req = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("HX-Request", "true")
            .body(Body::empty())
            .expect("request build should succeed");
        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_login_redirect(&resp, uri);
    }
}

#[tokio::test]
async fn signed_out_visitors_land_on_the_login_page() {
    let app = app();

    let req = Request::builder()
        .method(Method::GET)
        .uri("/")
        .body(Body::empty())
        .expect("request build should succeed");
    let resp = app.oneshot(req).await.expect("router should respond");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some(names::LOGIN_URL),
    );
}

#[tokio::test]
async fn login_and_register_pages_render_without_a_session() {
    let app = app();

    for uri in [names::LOGIN_URL, names::REGISTER_URL] {
        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request build should succeed");
        let resp = app
            .clone()
            .oneshot(req)
            .await
            .expect("router should respond");

        assert_eq!(resp.status(), StatusCode::OK, "expected OK for {uri}");
    }
}
