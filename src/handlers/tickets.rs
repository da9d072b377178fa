use axum::{
    extract::{Form, Path, State},
    http::{HeaderMap, HeaderValue},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::Deserialize;

use crate::{
    db::models::Ticket,
    extractors::{IsHtmx, PartnerGuard},
    names,
    rejections::{AppError, ResultExt},
    views, AppState,
};

use crate::views::tickets as ticket_views;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tickets", get(list_page).post(create_post))
        .route("/tickets/new", get(new_page))
        .route("/tickets/{public_id}", get(detail_page))
        .route("/tickets/{public_id}/reply", post(reply_post))
        .route("/tickets/{public_id}/close", post(close_post))
}

async fn list_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
) -> Result<maud::Markup, AppError> {
    let tickets = state
        .db
        .tickets_for_org(guard.org_id)
        .await
        .reject("could not load tickets")?;

    Ok(views::render(
        is_htmx,
        "Support",
        Some(&guard.user),
        ticket_views::list(&tickets),
    ))
}

async fn new_page(guard: PartnerGuard, IsHtmx(is_htmx): IsHtmx) -> maud::Markup {
    views::render(
        is_htmx,
        "Open a ticket",
        Some(&guard.user),
        ticket_views::new_ticket(ticket_views::TicketFormState::NoError),
    )
}

async fn load_ticket(
    state: &AppState,
    public_id: &str,
    org_id: i64,
) -> Result<Ticket, AppError> {
    state
        .db
        .ticket_for_org(public_id, org_id)
        .await
        .reject("could not load ticket")?
        .ok_or(AppError::NotFound(names::TICKETS_URL))
}

async fn detail_fragment(state: &AppState, ticket: &Ticket) -> Result<maud::Markup, AppError> {
    let replies = state
        .db
        .ticket_replies(ticket.id)
        .await
        .reject("could not load replies")?;

    Ok(ticket_views::detail(
        ticket,
        &replies,
        &names::ticket_reply_url(&ticket.public_id),
        Some(&names::ticket_close_url(&ticket.public_id)),
    ))
}

async fn detail_page(
    guard: PartnerGuard,
    State(state): State<AppState>,
    IsHtmx(is_htmx): IsHtmx,
    Path(public_id): Path<String>,
) -> Result<maud::Markup, AppError> {
    let ticket = load_ticket(&state, &public_id, guard.org_id).await?;
    let body = detail_fragment(&state, &ticket).await?;

    Ok(views::render(is_htmx, "Ticket", Some(&guard.user), body))
}

#[derive(Deserialize)]
struct TicketPost {
    subject: String,
    body: String,
    priority: String,
}

async fn create_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Form(body): Form<TicketPost>,
) -> Result<axum::response::Response, AppError> {
    let subject = body.subject.trim();
    let text = body.body.trim();

    let error = if subject.is_empty() || text.is_empty() {
        Some("Subject and description are required.")
    } else if !names::TICKET_PRIORITIES.contains(&body.priority.as_str()) {
        Some("Pick a priority from the list.")
    } else {
        None
    };
    if let Some(msg) = error {
        return Ok(views::titled(
            "Open a ticket",
            ticket_views::new_ticket(ticket_views::TicketFormState::Invalid(msg)),
        )
        .into_response());
    }

    let public_id = state
        .db
        .open_ticket(guard.org_id, guard.user.id, subject, text, &body.priority)
        .await
        .reject("could not open ticket")?;

    let ticket = load_ticket(&state, &public_id, guard.org_id).await?;
    let body = detail_fragment(&state, &ticket).await?;

    // Swap the address bar from /new to the opened ticket's URL.
    let mut headers = HeaderMap::new();
    headers.insert(
        "HX-Replace-Url",
        HeaderValue::from_str(&names::ticket_url(&public_id))
            .reject("could not build replace-url header")?,
    );

    Ok((headers, views::titled("Ticket", body)).into_response())
}

#[derive(Deserialize)]
struct ReplyPost {
    body: String,
}

async fn reply_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
    Form(body): Form<ReplyPost>,
) -> Result<axum::response::Response, AppError> {
    let ticket = load_ticket(&state, &public_id, guard.org_id).await?;

    if ticket.status == "closed" {
        return Err(AppError::Input("this ticket is closed"));
    }

    let text = body.body.trim();
    if !text.is_empty() {
        state
            .db
            .add_ticket_reply(ticket.id, guard.user.id, text, false)
            .await
            .reject("could not add reply")?;
    }

    let ticket = load_ticket(&state, &public_id, guard.org_id).await?;
    let body = detail_fragment(&state, &ticket).await?;

    Ok(views::titled("Ticket", body).into_response())
}

async fn close_post(
    guard: PartnerGuard,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> Result<axum::response::Response, AppError> {
    let ticket = load_ticket(&state, &public_id, guard.org_id).await?;

    state
        .db
        .close_ticket(ticket.id)
        .await
        .reject("could not close ticket")?;

    let ticket = load_ticket(&state, &public_id, guard.org_id).await?;
    let body = detail_fragment(&state, &ticket).await?;

    Ok(views::titled("Ticket", body).into_response())
}
