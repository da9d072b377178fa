use axum::{
    http::{header::LOCATION, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{names, views};

/// Application-level request failure. Store errors never reach the browser:
/// handlers log the underlying report via [`ResultExt`] and send a generic
/// message instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppError {
    /// No valid session: send the visitor to the login page.
    Unauthorized,
    Forbidden,
    /// A row lookup missed: send the visitor back to the owning list page.
    NotFound(&'static str),
    Input(&'static str),
    Internal(&'static str),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => {
                let mut headers = HeaderMap::new();
                headers.insert(LOCATION, HeaderValue::from_static(names::LOGIN_URL));
                headers.insert("HX-Redirect", HeaderValue::from_static(names::LOGIN_URL));
                (StatusCode::SEE_OTHER, headers, "").into_response()
            }
            AppError::Forbidden => error_page(
                StatusCode::FORBIDDEN,
                "Forbidden",
                "You do not have access to this page.",
            ),
            AppError::NotFound(list_url) => {
                let mut headers = HeaderMap::new();
                headers.insert(LOCATION, HeaderValue::from_static(list_url));
                headers.insert("HX-Redirect", HeaderValue::from_static(list_url));
                (StatusCode::SEE_OTHER, headers, "").into_response()
            }
            AppError::Input(msg) => error_page(StatusCode::BAD_REQUEST, "Invalid Request", msg),
            AppError::Internal(msg) => {
                error_page(StatusCode::INTERNAL_SERVER_ERROR, "Something Went Wrong", msg)
            }
        }
    }
}

fn error_page(code: StatusCode, title: &str, message: &str) -> Response {
    let body = views::page(
        title,
        html! {
            h1 { (title) }
            p { (message) " Please try again." }
            p { a href="/" { "Back to dashboard" } }
        },
    );
    (code, body).into_response()
}

/// Converts service/database errors into [`AppError`]s, logging the report
/// so the user-facing message can stay generic.
pub trait ResultExt<T> {
    fn reject(self, msg: &'static str) -> Result<T, AppError>;
    fn reject_input(self, msg: &'static str) -> Result<T, AppError>;
}

impl<T, E: Into<color_eyre::Report>> ResultExt<T> for Result<T, E> {
    fn reject(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            let report = e.into();
            tracing::error!("{msg}: {report:?}");
            AppError::Internal(msg)
        })
    }

    fn reject_input(self, msg: &'static str) -> Result<T, AppError> {
        self.map_err(|e| {
            let report = e.into();
            tracing::warn!("{msg}: {report:?}");
            AppError::Input(msg)
        })
    }
}
