pub mod db;
pub mod extractors;
pub mod handlers;
pub mod models;
pub mod names;
pub mod rejections;
pub mod services;
pub mod statics;
pub mod storage;
pub mod utils;
pub mod views;

use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use services::auth::AuthService;
use services::progress::ProgressService;
use storage::DiskStore;

#[derive(Clone)]
pub struct AppState {
    pub db: db::Db,
    pub auth: AuthService,
    pub progress: ProgressService,
    pub storage: DiskStore,
    pub secure_cookies: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(handlers::homepage::routes())
        .merge(handlers::deals::routes())
        .merge(handlers::tickets::routes())
        .merge(handlers::articles::routes())
        .merge(handlers::mdf::routes())
        .merge(handlers::learn::routes())
        .merge(handlers::account::routes())
        .merge(handlers::admin::routes())
        .layer(middleware::from_fn(csrf_check))
        .nest("/static", statics::routes())
        .nest(names::MEDIA_URL, storage::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn csrf_check(
    req: axum::http::Request<axum::body::Body>,
    next: middleware::Next,
) -> axum::response::Response {
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;

    let state_changing = [Method::POST, Method::PUT, Method::PATCH, Method::DELETE];

    if state_changing.contains(req.method()) {
        let has_hx_request = req
            .headers()
            .get("HX-Request")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == "true");

        if !has_hx_request {
            return (StatusCode::FORBIDDEN, "CSRF check failed").into_response();
        }
    }

    next.run(req).await
}
