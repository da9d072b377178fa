use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    db::deal::NewDeal,
    extractors::{IsHtmx, PartnerGuard},
    names,
    rejections::{AppError, ResultExt},
    utils, views, AppState,
};

use crate::views::deals as deal_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list_page).post(create_post))
        .route("/deals/new", get(new_page))
        .route("/deals/{public_id}", get(detail_page).post(update_post))
}

async fn list_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let deals = state
        .db
        .deals_for_org(guard.org_id)
        .await
        .reject("could not load deals")?;

    Ok(views::render(
        is_htmx,
        "Deals",
        Some(&guard.user),
        deal_views::list(&deals),
    ))
}

async fn new_page(guard: PartnerGuard, IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Register a deal",
        Some(&guard.user),
        deal_views::new_deal(deal_views::DealFormState::NoError),
    )
}

async fn detail_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(public_id): Path<String>,
) -> Result<maud::Markup, AppError> {
    let deal = state
        .db
        .deal_for_org(&public_id, guard.org_id)
        .await
        .reject("could not load deal")?
        .ok_or(AppError::NotFound(names::DEALS_URL))?;

    Ok(views::render(
        is_htmx,
        "Deal",
        Some(&guard.user),
        deal_views::detail(&deal),
    ))
}

#[derive(Deserialize)]
struct DealPost {
    customer_name: String,
    customer_email: String,
    amount: String,
    stage: String,
    expected_close: String,
    #[serde(default)]
    notes: String,
}

struct ParsedDeal {
    customer_name: String,
    customer_email: String,
    amount_cents: i64,
    stage: String,
    expected_close: NaiveDate,
    notes: String,
}

fn parse_deal_post(body: DealPost) -> Result<ParsedDeal, &'static str> {
    let customer_name = body.customer_name.trim().to_string();
    let customer_email = body.customer_email.trim().to_string();
    if customer_name.is_empty() || customer_email.is_empty() {
        return Err("Customer name and email are required.");
    }

    let Some(amount_cents) = utils::parse_amount_cents(&body.amount) else {
        return Err("Enter the amount as dollars and cents, like 25000.00.");
    };
    if amount_cents <= 0 {
        return Err("The amount must be positive.");
    }

    if !names::DEAL_STAGES.contains(&body.stage.as_str()) {
        return Err("Pick a stage from the list.");
    }

    let Ok(expected_close) = NaiveDate::parse_from_str(&body.expected_close, "%Y-%m-%d") else {
        return Err("Enter the expected close date as YYYY-MM-DD.");
    };

    Ok(ParsedDeal {
        customer_name,
        customer_email,
        amount_cents,
        stage: body.stage,
        expected_close,
        notes: body.notes.trim().to_string(),
    })
}

async fn create_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Form(body): Form<DealPost>,
) -> Result<axum::response::Response, AppError> {
    let parsed = match parse_deal_post(body) {
        Ok(parsed) => parsed,
        Err(msg) => {
            return Ok(views::titled(
                "Register a deal",
                deal_views::new_deal(deal_views::DealFormState::Invalid(msg)),
            )
            .into_response())
        }
    };

    let public_id = state
        .db
        .create_deal(NewDeal {
            org_id: guard.org_id,
            registered_by: guard.user.id,
            customer_name: parsed.customer_name,
            customer_email: parsed.customer_email,
            amount_cents: parsed.amount_cents,
            stage: parsed.stage,
            expected_close: parsed.expected_close,
            notes: parsed.notes,
        })
        .await
        .reject("could not register deal")?;

    let deal = state
        .db
        .deal_for_org(&public_id, guard.org_id)
        .await
        .reject("could not load deal")?
        .ok_or(AppError::NotFound(names::DEALS_URL))?;

    // Swap the address bar from /new to the registered deal's URL.
    let mut headers = HeaderMap::new();
    headers.insert(
        "HX-Replace-Url",
        HeaderValue::from_str(&names::deal_url(&public_id))
            .reject("could not build replace-url header")?,
    );

    Ok((headers, views::titled("Deal", deal_views::detail(&deal))).into_response())
}

async fn update_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Form(body): Form<DealPost>,
) -> Result<axum::response::Response, AppError> {
    let deal = state
        .db
        .deal_for_org(&public_id, guard.org_id)
        .await
        .reject("could not load deal")?
        .ok_or(AppError::NotFound(names::DEALS_URL))?;

    if deal.status != "pending" {
        return Err(AppError::Input("only pending deals can be edited"));
    }

    let parsed = match parse_deal_post(body) {
        Ok(parsed) => parsed,
        Err(msg) => {
            return Ok(views::titled(
                "Deal",
                deal_views::form(deal_views::DealFormState::Invalid(msg), Some(&deal)),
            )
            .into_response())
        }
    };

    let updated = state
        .db
        .update_pending_deal(
            &public_id,
            guard.org_id,
            &parsed.customer_name,
            &parsed.customer_email,
            parsed.amount_cents,
            &parsed.stage,
            parsed.expected_close,
            &parsed.notes,
        )
        .await
        .reject("could not update deal")?;

    if !updated {
        // Review finished between page load and submit.
        return Err(AppError::Input("only pending deals can be edited"));
    }

    let deal = state
        .db
        .deal_for_org(&public_id, guard.org_id)
        .await
        .reject("could not load deal")?
        .ok_or(AppError::NotFound(names::DEALS_URL))?;

    Ok(views::titled("Deal", deal_views::detail(&deal)).into_response())
}
