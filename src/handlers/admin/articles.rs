use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use maud::Markup;
use serde::Deserialize;

use crate::{
    db::models::Article,
    extractors::{AdminGuard, IsHtmx},
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::admin::articles::{self as article_views, ArticleFormState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/articles", get(list_page))
        .route("/admin/articles/new", get(new_page).post(create_post))
        .route("/admin/articles/{id}", get(edit_page).post(update_post))
        .route("/admin/articles/{id}/delete", post(delete_post))
}

async fn list_fragment(state: &AppState) -> Result<Markup, AppError> {
    let articles = state
        .db
        .all_articles()
        .await
        .reject("could not load articles")?;
    Ok(article_views::list(&articles))
}

async fn list_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    let body = list_fragment(&state).await?;
    Ok(views::render(is_htmx, "Knowledge base", Some(&user), body))
}

async fn new_page(
    AdminGuard(user): AdminGuard,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    Ok(views::render(
        is_htmx,
        "New article",
        Some(&user),
        article_views::form(ArticleFormState::NoError, None),
    ))
}

async fn load_article(state: &AppState, id: i64) -> Result<Article, AppError> {
    state
        .db
        .article_by_id(id)
        .await
        .reject("could not load article")?
        .ok_or(AppError::NotFound(names::ADMIN_ARTICLES_URL))
}

async fn edit_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(id): Path<i64>,
) -> Result<Markup, AppError> {
    let article = load_article(&state, id).await?;

    Ok(views::render(
        is_htmx,
        &article.title,
        Some(&user),
        article_views::form(ArticleFormState::NoError, Some(&article)),
    ))
}

#[derive(Deserialize)]
struct ArticlePost {
    title: String,
    category: String,
    min_tier: String,
    body: String,
    /// Checkbox: present when ticked, absent otherwise.
    #[serde(default)]
    published: Option<String>,
}

async fn create_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Form(body): Form<ArticlePost>,
) -> Result<axum::response::Response, AppError> {
    if !names::TIERS.contains(&body.min_tier.as_str()) {
        return Err(AppError::Input("unknown tier"));
    }

    let title = body.title.trim();
    let category = body.category.trim();
    let text = body.body.trim();
    let slug = utils::slugify(title);

    if title.is_empty() || text.is_empty() || slug.is_empty() {
        return Ok(views::titled(
            "New article",
            article_views::form(ArticleFormState::EmptyFields, None),
        )
        .into_response());
    }

    let taken = state
        .db
        .article_slug_exists(&slug)
        .await
        .reject("could not check slug")?;
    if taken {
        return Ok(views::titled(
            "New article",
            article_views::form(ArticleFormState::SlugTaken, None),
        )
        .into_response());
    }

    let id = state
        .db
        .create_article(&slug, title, text, category, &body.min_tier)
        .await
        .reject("could not create article")?;

    let article = load_article(&state, id).await?;

    // Swap the address bar from /new to the created article's edit URL.
    let mut headers = HeaderMap::new();
    headers.insert(
        "HX-Replace-Url",
        HeaderValue::from_str(&names::admin_article_url(id))
            .reject("could not build replace-url header")?,
    );

    Ok((
        headers,
        views::titled(
            &article.title,
            article_views::form(ArticleFormState::NoError, Some(&article)),
        ),
    )
        .into_response())
}

async fn update_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(body): Form<ArticlePost>,
) -> Result<Markup, AppError> {
    let article = load_article(&state, id).await?;

    if !names::TIERS.contains(&body.min_tier.as_str()) {
        return Err(AppError::Input("unknown tier"));
    }

    let title = body.title.trim();
    let category = body.category.trim();
    let text = body.body.trim();

    if title.is_empty() || text.is_empty() {
        return Ok(views::titled(
            &article.title,
            article_views::form(ArticleFormState::EmptyFields, Some(&article)),
        ));
    }

    state
        .db
        .update_article(
            id,
            title,
            text,
            category,
            &body.min_tier,
            body.published.is_some(),
        )
        .await
        .reject("could not update article")?;

    let article = load_article(&state, id).await?;
    Ok(views::titled(
        &article.title,
        article_views::form(ArticleFormState::NoError, Some(&article)),
    ))
}

async fn delete_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Markup, AppError> {
    state
        .db
        .delete_article(id)
        .await
        .reject("could not delete article")?;

    let body = list_fragment(&state).await?;
    Ok(views::titled("Knowledge base", body))
}
