use maud::{html, Markup};

use crate::db::models::Deal;
use crate::views::components;
use crate::{names, utils};

pub enum DealFormState {
    NoError,
    Invalid(&'static str),
}

pub fn list(deals: &[Deal]) -> Markup {
    html! {
        header."page-header" {
            h1 { "Deal registrations" }
            (components::nav_link(names::NEW_DEAL_URL, html! { button { "Register deal" } }))
        }
        @if deals.is_empty() {
            (components::empty_state("No deals registered yet."))
        } @else {
            (deal_table(deals))
        }
    }
}

pub fn deal_table(deals: &[Deal]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Customer" }
                    th { "Amount" }
                    th { "Stage" }
                    th { "Status" }
                    th { "Expected close" }
                    th {}
                }
            }
            tbody {
                @for deal in deals {
                    tr {
                        td { (deal.customer_name) }
                        td { (utils::format_cents(deal.amount_cents)) }
                        td { (deal.stage.replace('_', " ")) }
                        td { (components::status_badge(&deal.status)) }
                        td { (components::date(deal.expected_close)) }
                        td { (components::nav_link(&names::deal_url(&deal.public_id), html! { "View" })) }
                    }
                }
            }
        }
    }
}

pub fn detail(deal: &Deal) -> Markup {
    html! {
        header."page-header" {
            h1 { (deal.customer_name) }
            (components::status_badge(&deal.status))
        }
        p."secondary" { "Registered " (components::datetime(deal.created_at)) }

        dl {
            dt { "Customer email" }
            dd { (deal.customer_email) }
            dt { "Amount" }
            dd { (utils::format_cents(deal.amount_cents)) }
            dt { "Stage" }
            dd { (deal.stage.replace('_', " ")) }
            dt { "Expected close" }
            dd { (components::date(deal.expected_close)) }
            @if !deal.notes.is_empty() {
                dt { "Notes" }
                dd { (deal.notes) }
            }
        }

        @if deal.status == "pending" {
            h2 { "Edit registration" }
            p."secondary" { "You can edit a registration while it is pending review." }
            (form(DealFormState::NoError, Some(deal)))
        }

        p { (components::nav_link(names::DEALS_URL, html! { "Back to deals" })) }
    }
}

pub fn new_deal(state: DealFormState) -> Markup {
    html! {
        h1 { "Register a deal" }
        p { "Registered deals are reviewed by our partner team before approval." }
        (form(state, None))
    }
}

pub fn form(state: DealFormState, existing: Option<&Deal>) -> Markup {
    let post_url = match existing {
        Some(deal) => names::deal_url(&deal.public_id),
        None => names::DEALS_URL.to_string(),
    };

    html! {
        article style="max-width: 40rem;" {
            @if let DealFormState::Invalid(msg) = state {
                (components::error_banner(msg))
            }
            form hx-post=(post_url) hx-target="main" {
                label {
                    "Customer name"
                    input name="customer_name"
                          type="text"
                          required="true"
                          value=[existing.map(|d| &d.customer_name)]
                          aria-label="Customer name";
                }
                label {
                    "Customer email"
                    input name="customer_email"
                          type="email"
                          required="true"
                          value=[existing.map(|d| &d.customer_email)]
                          aria-label="Customer email";
                }
                label {
                    "Deal amount (USD)"
                    input name="amount"
                          type="text"
                          inputmode="decimal"
                          required="true"
                          placeholder="25000.00"
                          value=[existing.map(|d| utils::format_amount_input(d.amount_cents))]
                          aria-label="Deal amount";
                }
                label {
                    "Stage"
                    select name="stage" aria-label="Stage" {
                        @for stage in names::DEAL_STAGES {
                            option value=(stage)
                                   selected[existing.is_some_and(|d| d.stage == *stage)] {
                                (stage.replace('_', " "))
                            }
                        }
                    }
                }
                label {
                    "Expected close date"
                    input name="expected_close"
                          type="date"
                          required="true"
                          value=[existing.map(|d| d.expected_close.format("%Y-%m-%d").to_string())]
                          aria-label="Expected close date";
                }
                label {
                    "Notes"
                    textarea name="notes" rows="4" aria-label="Notes" {
                        @if let Some(deal) = existing { (deal.notes) }
                    }
                }
                button type="submit" {
                    @if existing.is_some() { "Save changes" } @else { "Register deal" }
                }
            }
        }
    }
}
