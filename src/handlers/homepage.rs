use axum::{
    extract::{Form, State},
    http::{header::SET_COOKIE, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect},
    routing::{get, post},
    Router,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::{
    extractors::IsHtmx,
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::homepage as homepage_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(homepage))
        .route("/register", get(register_page).post(register_post))
        .route("/login", get(login_page).post(login_post))
        .route("/logout", post(logout_post))
}

async fn homepage(
    State(state): State<AppState>,
    jar: CookieJar,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<axum::response::Response, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        if let Ok(Some(user)) = state.db.get_user_by_session(&session_id).await {
            let Some(org_id) = user.org_id else {
                // Admin accounts have no organization; their home is the queue view.
                return Ok(Redirect::to(names::ADMIN_URL).into_response());
            };

            let org = state
                .db
                .organization(org_id)
                .await
                .reject("could not load organization")?;
            let counts = state
                .db
                .org_dashboard_counts(org_id, user.id)
                .await
                .reject("could not load dashboard counts")?;
            let mut recent_deals = state
                .db
                .deals_for_org(org_id)
                .await
                .reject("could not load deals")?;
            recent_deals.truncate(5);

            return Ok(views::render(
                is_htmx,
                "Dashboard",
                Some(&user),
                homepage_views::dashboard(&user, &org.name, &org.tier, counts, recent_deals),
            )
            .into_response());
        }
    }

    Ok(Redirect::to(names::LOGIN_URL).into_response())
}

async fn login_page(IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Log In",
        None,
        homepage_views::login(homepage_views::LoginState::NoError),
    )
}

async fn register_page(IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Register",
        None,
        homepage_views::register(homepage_views::RegisterState::NoError),
    )
}

#[derive(Deserialize)]
struct RegisterPost {
    org_name: String,
    email: String,
    display_name: String,
    password: String,
}

async fn register_post(
    State(state): State<AppState>,
    Form(body): Form<RegisterPost>,
) -> Result<axum::response::Response, AppError> {
    use crate::services::auth::RegisterOutcome;

    let outcome = state
        .auth
        .register(&body.org_name, &body.email, &body.password, &body.display_name)
        .await
        .reject("registration failed")?;

    match outcome {
        RegisterOutcome::LoggedIn(session_token) => {
            let cookie = utils::cookie(
                names::USER_SESSION_COOKIE_NAME,
                &session_token,
                state.secure_cookies,
            )
            .reject("could not build session cookie")?;
            // The browser follows a 303 before htmx can see it, so navigation
            // to the dashboard goes through HX-Redirect on a plain 200.
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            headers.insert("HX-Redirect", HeaderValue::from_static("/"));
            Ok((headers, "").into_response())
        }
        RegisterOutcome::EmptyFields => Ok(views::titled(
            "Register",
            homepage_views::register(homepage_views::RegisterState::EmptyFields),
        )
        .into_response()),
        RegisterOutcome::EmailTaken => Ok(views::titled(
            "Register",
            homepage_views::register(homepage_views::RegisterState::EmailTaken),
        )
        .into_response()),
        RegisterOutcome::WeakPassword => Ok(views::titled(
            "Register",
            homepage_views::register(homepage_views::RegisterState::WeakPassword),
        )
        .into_response()),
    }
}

#[derive(Deserialize)]
struct LoginPost {
    email: String,
    password: String,
}

async fn login_post(
    State(state): State<AppState>,
    Form(body): Form<LoginPost>,
) -> Result<axum::response::Response, AppError> {
    use crate::services::auth::LoginOutcome;

    let outcome = state
        .auth
        .login(&body.email, &body.password)
        .await
        .reject("login failed")?;

    match outcome {
        LoginOutcome::Success(session_token) => {
            let cookie = utils::cookie(
                names::USER_SESSION_COOKIE_NAME,
                &session_token,
                state.secure_cookies,
            )
            .reject("could not build session cookie")?;
            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);
            headers.insert("HX-Redirect", HeaderValue::from_static("/"));
            Ok((headers, "").into_response())
        }
        LoginOutcome::InvalidCredentials => Ok(views::titled(
            "Log In",
            homepage_views::login(homepage_views::LoginState::IncorrectPassword),
        )
        .into_response()),
    }
}

async fn logout_post(
    jar: CookieJar,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(session_id) = jar
        .get(names::USER_SESSION_COOKIE_NAME)
        .map(|c| c.value().to_string())
    {
        let _ = state.auth.logout(&session_id).await;
    }

    let clear = utils::clear_cookie(names::USER_SESSION_COOKIE_NAME, state.secure_cookies)
        .reject("could not build clear-session cookie")?;
    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, clear);
    headers.insert("HX-Redirect", HeaderValue::from_static(names::LOGIN_URL));

    Ok((headers, ""))
}
