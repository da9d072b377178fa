mod articles;
mod courses;

use std::collections::HashMap;

use axum::{
    extract::{Form, Path, State},
    routing::{get, post},
    Router,
};
use maud::Markup;
use serde::Deserialize;

use crate::{
    db::models::Ticket,
    extractors::{AdminGuard, IsHtmx},
    names,
    rejections::{AppError, ResultExt},
    views, AppState,
};

use crate::views::{admin as admin_views, tickets as ticket_views};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard_page))
        .route("/admin/deals", get(deal_queue_page))
        .route("/admin/deals/{public_id}/status", post(deal_status_post))
        .route("/admin/tickets", get(ticket_queue_page))
        .route("/admin/tickets/{public_id}", get(ticket_detail_page))
        .route("/admin/tickets/{public_id}/reply", post(ticket_reply_post))
        .route("/admin/tickets/{public_id}/close", post(ticket_close_post))
        .route("/admin/mdf", get(mdf_queue_page))
        .route(
            "/admin/mdf/{public_id}/decide",
            get(mdf_decide_page).post(mdf_decide_post),
        )
        .route("/admin/partners", get(partners_page))
        .route("/admin/partners/{org_id}/tier", post(partner_tier_post))
        .merge(articles::routes())
        .merge(courses::routes())
}

/// Org id to display name, for queue tables that list several partners.
async fn org_names(state: &AppState) -> Result<HashMap<i64, String>, AppError> {
    let orgs = state
        .db
        .organizations()
        .await
        .reject("could not load organizations")?;
    Ok(orgs.into_iter().map(|org| (org.id, org.name)).collect())
}

async fn dashboard_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    let counts = state
        .db
        .admin_queue_counts()
        .await
        .reject("could not load queue counts")?;

    Ok(views::render(
        is_htmx,
        "Admin",
        Some(&user),
        admin_views::dashboard(&counts),
    ))
}

// ---------------------------------------------------------------------------
// Deal review
// ---------------------------------------------------------------------------

async fn deal_queue_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    let deals = state
        .db
        .pending_deals()
        .await
        .reject("could not load deals")?;
    let orgs = org_names(&state).await?;

    Ok(views::render(
        is_htmx,
        "Deal review",
        Some(&user),
        admin_views::deal_queue(&deals, &orgs),
    ))
}

#[derive(Deserialize)]
struct DecisionPost {
    status: String,
    #[serde(default)]
    note: String,
}

async fn deal_status_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Form(body): Form<DecisionPost>,
) -> Result<Markup, AppError> {
    if body.status != "approved" && body.status != "rejected" {
        return Err(AppError::Input("unknown decision"));
    }

    let decided = state
        .db
        .set_deal_status(&public_id, &body.status)
        .await
        .reject("could not update deal")?;
    if !decided {
        return Err(AppError::NotFound(names::ADMIN_DEALS_URL));
    }

    let deals = state
        .db
        .pending_deals()
        .await
        .reject("could not load deals")?;
    let orgs = org_names(&state).await?;

    Ok(views::titled(
        "Deal review",
        admin_views::deal_queue(&deals, &orgs),
    ))
}

// ---------------------------------------------------------------------------
// Support queue
// ---------------------------------------------------------------------------

async fn ticket_queue_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    let tickets = state
        .db
        .open_tickets()
        .await
        .reject("could not load tickets")?;
    let orgs = org_names(&state).await?;

    Ok(views::render(
        is_htmx,
        "Support queue",
        Some(&user),
        admin_views::ticket_queue(&tickets, &orgs),
    ))
}

async fn load_ticket(state: &AppState, public_id: &str) -> Result<Ticket, AppError> {
    state
        .db
        .ticket_by_public_id(public_id)
        .await
        .reject("could not load ticket")?
        .ok_or(AppError::NotFound(names::ADMIN_TICKETS_URL))
}

async fn ticket_fragment(state: &AppState, ticket: &Ticket) -> Result<Markup, AppError> {
    let replies = state
        .db
        .ticket_replies(ticket.id)
        .await
        .reject("could not load replies")?;

    Ok(ticket_views::detail(
        ticket,
        &replies,
        &names::admin_ticket_reply_url(&ticket.public_id),
        Some(&names::admin_ticket_close_url(&ticket.public_id)),
    ))
}

async fn ticket_detail_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(public_id): Path<String>,
) -> Result<Markup, AppError> {
    let ticket = load_ticket(&state, &public_id).await?;
    let body = ticket_fragment(&state, &ticket).await?;

    Ok(views::render(is_htmx, &ticket.subject, Some(&user), body))
}

#[derive(Deserialize)]
struct ReplyPost {
    body: String,
}

async fn ticket_reply_post(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Form(body): Form<ReplyPost>,
) -> Result<Markup, AppError> {
    let ticket = load_ticket(&state, &public_id).await?;
    if ticket.status == "closed" {
        return Err(AppError::Input("this ticket is closed"));
    }

    let reply = body.body.trim();
    if !reply.is_empty() {
        state
            .db
            .add_ticket_reply(ticket.id, user.id, reply, true)
            .await
            .reject("could not add reply")?;
    }

    let ticket = load_ticket(&state, &public_id).await?;
    let body = ticket_fragment(&state, &ticket).await?;
    Ok(views::titled(&ticket.subject, body))
}

async fn ticket_close_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<Markup, AppError> {
    let ticket = load_ticket(&state, &public_id).await?;
    state
        .db
        .close_ticket(ticket.id)
        .await
        .reject("could not close ticket")?;

    let ticket = load_ticket(&state, &public_id).await?;
    let body = ticket_fragment(&state, &ticket).await?;
    Ok(views::titled(&ticket.subject, body))
}

// ---------------------------------------------------------------------------
// MDF review
// ---------------------------------------------------------------------------

async fn mdf_queue_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    let requests = state
        .db
        .pending_mdf_requests()
        .await
        .reject("could not load mdf requests")?;
    let orgs = org_names(&state).await?;

    Ok(views::render(
        is_htmx,
        "MDF requests",
        Some(&user),
        admin_views::mdf_queue(&requests, &orgs),
    ))
}

async fn mdf_decide_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(public_id): Path<String>,
) -> Result<Markup, AppError> {
    let request = state
        .db
        .mdf_request_by_public_id(&public_id)
        .await
        .reject("could not load mdf request")?
        .ok_or(AppError::NotFound(names::ADMIN_MDF_URL))?;
    let org = state
        .db
        .organization(request.org_id)
        .await
        .reject("could not load organization")?;

    Ok(views::render(
        is_htmx,
        &request.campaign_name,
        Some(&user),
        admin_views::mdf_decision(&request, &org.name),
    ))
}

async fn mdf_decide_post(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Form(body): Form<DecisionPost>,
) -> Result<Markup, AppError> {
    if body.status != "approved" && body.status != "rejected" {
        return Err(AppError::Input("unknown decision"));
    }

    let note = body.note.trim();
    let note = (!note.is_empty()).then_some(note);

    let decided = state
        .db
        .decide_mdf_request(&public_id, &body.status, user.id, note)
        .await
        .reject("could not decide mdf request")?;
    if !decided {
        return Err(AppError::Input("this request has already been decided"));
    }

    let requests = state
        .db
        .pending_mdf_requests()
        .await
        .reject("could not load mdf requests")?;
    let orgs = org_names(&state).await?;

    Ok(views::titled(
        "MDF requests",
        admin_views::mdf_queue(&requests, &orgs),
    ))
}

// ---------------------------------------------------------------------------
// Partner tiers
// ---------------------------------------------------------------------------

async fn partners_page(
    AdminGuard(user): AdminGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<Markup, AppError> {
    let orgs = state
        .db
        .organizations()
        .await
        .reject("could not load organizations")?;

    Ok(views::render(
        is_htmx,
        "Partners",
        Some(&user),
        admin_views::partners(&orgs),
    ))
}

#[derive(Deserialize)]
struct TierPost {
    tier: String,
}

async fn partner_tier_post(
    AdminGuard(_user): AdminGuard,
    State(state): State<AppState>,
    Path(org_id): Path<i64>,
    Form(body): Form<TierPost>,
) -> Result<Markup, AppError> {
    if !names::TIERS.contains(&body.tier.as_str()) {
        return Err(AppError::Input("unknown tier"));
    }

    state
        .db
        .set_org_tier(org_id, &body.tier)
        .await
        .reject("could not update tier")?;

    let orgs = state
        .db
        .organizations()
        .await
        .reject("could not load organizations")?;
    Ok(views::titled("Partners", admin_views::partners(&orgs)))
}
