use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::{
    db::mdf::NewMdfRequest,
    extractors::{IsHtmx, PartnerGuard},
    models, names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::mdf as mdf_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/mdf", get(list_page).post(create_post))
        .route("/mdf/new", get(new_page))
        .route("/mdf/{public_id}", get(detail_page))
}

async fn list_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let requests = state
        .db
        .mdf_requests_for_org(guard.org_id)
        .await
        .reject("could not load MDF requests")?;

    Ok(views::render(
        is_htmx,
        "MDF",
        Some(&guard.user),
        mdf_views::list(&requests),
    ))
}

async fn new_page(guard: PartnerGuard, IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Request funds",
        Some(&guard.user),
        mdf_views::new_request(mdf_views::MdfFormState::NoError),
    )
}

async fn detail_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(public_id): Path<String>,
) -> Result<maud::Markup, AppError> {
    let request = state
        .db
        .mdf_request_for_org(&public_id, guard.org_id)
        .await
        .reject("could not load MDF request")?
        .ok_or(AppError::NotFound(names::MDF_URL))?;

    Ok(views::render(
        is_htmx,
        "MDF request",
        Some(&guard.user),
        mdf_views::detail(&request),
    ))
}

#[derive(Deserialize)]
struct MdfPost {
    campaign_name: String,
    description: String,
    amount: String,
    #[serde(default)]
    roi_metrics: String,
}

fn invalid(msg: &'static str) -> axum::response::Response {
    views::titled(
        "Request funds",
        mdf_views::new_request(mdf_views::MdfFormState::Invalid(msg)),
    )
    .into_response()
}

async fn create_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Form(body): Form<MdfPost>,
) -> Result<axum::response::Response, AppError> {
    let campaign_name = body.campaign_name.trim();
    let description = body.description.trim();

    if campaign_name.is_empty() || description.is_empty() {
        return Ok(invalid("Campaign name and description are required."));
    }
    let Some(amount_cents) = utils::parse_amount_cents(&body.amount).filter(|c| *c > 0) else {
        return Ok(invalid(
            "Enter a positive amount as dollars and cents, like 5000.00.",
        ));
    };

    let public_id = state
        .db
        .create_mdf_request(NewMdfRequest {
            org_id: guard.org_id,
            requested_by: guard.user.id,
            campaign_name: campaign_name.to_string(),
            description: description.to_string(),
            amount_cents,
            roi_metrics: models::parse_roi_metrics(&body.roi_metrics),
        })
        .await
        .reject("could not create MDF request")?;

    let request = state
        .db
        .mdf_request_for_org(&public_id, guard.org_id)
        .await
        .reject("could not load MDF request")?
        .ok_or(AppError::NotFound(names::MDF_URL))?;

    // Swap the address bar from /new to the submitted request's URL.
    let mut headers = HeaderMap::new();
    headers.insert(
        "HX-Replace-Url",
        HeaderValue::from_str(&names::mdf_url(&public_id))
            .reject("could not build replace-url header")?,
    );

    Ok((headers, views::titled("MDF request", mdf_views::detail(&request))).into_response())
}
