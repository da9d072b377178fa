use axum::{
    extract::{Form, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    db::models::Organization,
    extractors::{AuthGuard, IsHtmx},
    rejections::{AppError, ResultExt},
    views, AppState,
};

use crate::views::account as account_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/account", get(account_page))
        .route("/account/profile", post(update_profile_post))
        .route("/change-password", post(change_password_post))
}

async fn load_org(
    state: &AppState,
    org_id: Option<i64>,
) -> Result<Option<Organization>, AppError> {
    match org_id {
        Some(org_id) => {
            let org = state
                .db
                .organization(org_id)
                .await
                .reject("could not load organization")?;
            Ok(Some(org))
        }
        None => Ok(None),
    }
}

async fn account_page(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let org = load_org(&state, user.org_id).await?;

    Ok(views::render(
        is_htmx,
        "Account",
        Some(&user),
        account_views::account_page(
            &user,
            org.as_ref(),
            account_views::ProfileState::NoError,
            account_views::ChangePasswordState::NoError,
        ),
    ))
}

#[derive(Deserialize)]
struct UpdateProfilePost {
    display_name: String,
}

async fn update_profile_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(body): Form<UpdateProfilePost>,
) -> Result<axum::response::Response, AppError> {
    use crate::services::auth::UpdateProfileOutcome;

    let outcome = state
        .auth
        .update_profile(user.id, &body.display_name)
        .await
        .reject("could not update profile")?;

    let org = load_org(&state, user.org_id).await?;

    let (user, profile_state) = match outcome {
        UpdateProfileOutcome::Success => {
            let mut user = user;
            user.display_name = body.display_name.trim().to_string();
            (user, account_views::ProfileState::Saved)
        }
        UpdateProfileOutcome::EmptyName => (user, account_views::ProfileState::EmptyName),
    };

    Ok(views::titled(
        "Account",
        account_views::account_page(
            &user,
            org.as_ref(),
            profile_state,
            account_views::ChangePasswordState::NoError,
        ),
    )
    .into_response())
}

#[derive(Deserialize)]
struct ChangePasswordPost {
    current_password: String,
    new_password: String,
}

async fn change_password_post(
    AuthGuard(user): AuthGuard,
    State(state): State<AppState>,
    Form(body): Form<ChangePasswordPost>,
) -> Result<axum::response::Response, AppError> {
    use crate::services::auth::ChangePasswordOutcome;

    let outcome = state
        .auth
        .change_password(user.id, &body.current_password, &body.new_password)
        .await
        .reject("could not change password")?;

    let pw_state = match outcome {
        ChangePasswordOutcome::Success => account_views::ChangePasswordState::Success,
        ChangePasswordOutcome::EmptyFields => account_views::ChangePasswordState::EmptyFields,
        ChangePasswordOutcome::WeakPassword => account_views::ChangePasswordState::WeakPassword,
        ChangePasswordOutcome::IncorrectPassword => {
            account_views::ChangePasswordState::IncorrectPassword
        }
    };

    let org = load_org(&state, user.org_id).await?;

    Ok(views::titled(
        "Account",
        account_views::account_page(
            &user,
            org.as_ref(),
            account_views::ProfileState::NoError,
            pw_state,
        ),
    )
    .into_response())
}
