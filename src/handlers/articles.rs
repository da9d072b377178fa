use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};

use crate::{
    extractors::{IsHtmx, PartnerGuard},
    models::Tier,
    names,
    rejections::{AppError, ResultExt},
    views, AppState,
};

use crate::views::articles as article_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/kb", get(list_page))
        .route("/kb/{slug}", get(article_page))
}

async fn org_tier(state: &AppState, org_id: i64) -> Result<Tier, AppError> {
    let org = state
        .db
        .organization(org_id)
        .await
        .reject("could not load organization")?;
    Ok(Tier::parse(&org.tier))
}

async fn list_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let tier = org_tier(&state, guard.org_id).await?;
    let articles = state
        .db
        .articles_for_tiers(&tier.visible_tiers())
        .await
        .reject("could not load articles")?;

    Ok(views::render(
        is_htmx,
        "Knowledge Base",
        Some(&guard.user),
        article_views::list(&articles, tier.label()),
    ))
}

async fn article_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(slug): Path<String>,
) -> Result<maud::Markup, AppError> {
    let article = state
        .db
        .article_by_slug(&slug)
        .await
        .reject("could not load article")?
        .ok_or(AppError::NotFound(names::KB_URL))?;

    // Unpublished or above-tier articles do not exist as far as partners know.
    let tier = org_tier(&state, guard.org_id).await?;
    if !article.published || Tier::parse(&article.min_tier) > tier {
        return Err(AppError::NotFound(names::KB_URL));
    }

    Ok(views::render(
        is_htmx,
        &article.title,
        Some(&guard.user),
        article_views::article(&article),
    ))
}
