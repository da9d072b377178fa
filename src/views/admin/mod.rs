pub mod articles;
pub mod courses;

use std::collections::HashMap;

use crate::{
    db::models::{AdminQueueCounts, Deal, MdfRequest, Organization, Ticket},
    names, utils,
    views::{components, mdf as mdf_views},
};
use maud::{html, Markup};

pub fn dashboard(counts: &AdminQueueCounts) -> Markup {
    html! {
        h1 { "Admin" }
        div class="stat-grid" {
            (stat_card(counts.pending_deals, "Deals awaiting review", names::ADMIN_DEALS_URL))
            (stat_card(counts.open_tickets, "Tickets in queue", names::ADMIN_TICKETS_URL))
            (stat_card(counts.pending_mdf, "MDF requests pending", names::ADMIN_MDF_URL))
            (stat_card(counts.courses, "Courses", names::ADMIN_COURSES_URL))
        }
        article style="width: fit-content;" {
            h4 { "Manage" }
            ul {
                li { (components::nav_link(names::ADMIN_ARTICLES_URL, html! { "Knowledge base articles" })) }
                li { (components::nav_link(names::ADMIN_COURSES_URL, html! { "Training courses" })) }
                li { (components::nav_link(names::ADMIN_PARTNERS_URL, html! { "Partner tiers" })) }
            }
        }
    }
}

fn stat_card(count: i64, label: &str, href: &str) -> Markup {
    html! {
        article class="stat-card" {
            a hx-get=(href)
              hx-push-url="true"
              hx-target="main"
              href="#" {
                h2 { (count) }
                p { (label) }
            }
        }
    }
}

pub fn deal_queue(deals: &[Deal], org_names: &HashMap<i64, String>) -> Markup {
    html! {
        h1 { "Deal review" }
        @if deals.is_empty() {
            (components::empty_state("No deals are waiting for review."))
        } @else {
            table {
                thead { tr {
                    th { "Partner" }
                    th { "Customer" }
                    th { "Amount" }
                    th { "Stage" }
                    th { "Registered" }
                    th { "Decision" }
                } }
                tbody {
                    @for deal in deals {
                        tr {
                            td { (org_name(org_names, deal.org_id)) }
                            td {
                                (deal.customer_name)
                                br;
                                small { (deal.customer_email) }
                            }
                            td { (utils::format_cents(deal.amount_cents)) }
                            td { (components::status_badge(&deal.stage)) }
                            td { (components::datetime(deal.created_at)) }
                            td style="white-space: nowrap;" {
                                (decision_buttons(&names::admin_deal_status_url(&deal.public_id)))
                            }
                        }
                    }
                }
            }
        }
    }
}

fn org_name(org_names: &HashMap<i64, String>, org_id: i64) -> &str {
    org_names.get(&org_id).map(String::as_str).unwrap_or("-")
}

/// Approve/reject pair posting `status` to the given url.
fn decision_buttons(url: &str) -> Markup {
    html! {
        form hx-post=(url)
             hx-target="main"
             hx-swap="innerHTML"
             style="display: inline;" {
            input type="hidden" name="status" value="approved";
            button type="submit"
                   style="width:fit-content;padding:0.25rem 0.5rem;font-size:0.8rem;margin-right:0.25rem;" {
                "Approve"
            }
        }
        form hx-post=(url)
             hx-target="main"
             hx-swap="innerHTML"
             style="display: inline;" {
            input type="hidden" name="status" value="rejected";
            button type="submit"
                   style="width:fit-content;padding:0.25rem 0.5rem;font-size:0.8rem;background-color:#dc3545;color:white;" {
                "Reject"
            }
        }
    }
}

pub fn ticket_queue(tickets: &[Ticket], org_names: &HashMap<i64, String>) -> Markup {
    html! {
        h1 { "Support queue" }
        @if tickets.is_empty() {
            (components::empty_state("The queue is clear."))
        } @else {
            table {
                thead { tr {
                    th { "Partner" }
                    th { "Subject" }
                    th { "Priority" }
                    th { "Status" }
                    th { "Updated" }
                } }
                tbody {
                    @for ticket in tickets {
                        tr {
                            td { (org_name(org_names, ticket.org_id)) }
                            td {
                                a hx-get=(names::admin_ticket_url(&ticket.public_id))
                                  hx-push-url="true"
                                  hx-target="main"
                                  href="#" { (ticket.subject) }
                            }
                            td { (components::status_badge(&ticket.priority)) }
                            td { (components::status_badge(&ticket.status)) }
                            td { (components::datetime(ticket.updated_at)) }
                        }
                    }
                }
            }
        }
    }
}

pub fn mdf_queue(requests: &[MdfRequest], org_names: &HashMap<i64, String>) -> Markup {
    html! {
        h1 { "MDF requests" }
        @if requests.is_empty() {
            (components::empty_state("No requests are waiting for a decision."))
        } @else {
            table {
                thead { tr {
                    th { "Partner" }
                    th { "Campaign" }
                    th { "Amount" }
                    th { "Requested" }
                    th { "" }
                } }
                tbody {
                    @for request in requests {
                        tr {
                            td { (org_name(org_names, request.org_id)) }
                            td { (request.campaign_name) }
                            td { (utils::format_cents(request.amount_cents)) }
                            td { (components::datetime(request.created_at)) }
                            td {
                                a hx-get=(names::admin_mdf_decide_url(&request.public_id))
                                  hx-push-url="true"
                                  hx-target="main"
                                  href="#" { "Review" }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn mdf_decision(request: &MdfRequest, org_name: &str) -> Markup {
    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::ADMIN_MDF_URL)
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to MDF requests" }
        }
        h1 { (request.campaign_name) }
        dl {
            dt { "Partner" }
            dd { (org_name) }
            dt { "Amount" }
            dd { (utils::format_cents(request.amount_cents)) }
            dt { "Requested" }
            dd { (components::datetime(request.created_at)) }
            dt { "Description" }
            dd { (request.description) }
        }

        (mdf_views::roi_metrics(&request.roi_metrics.0))

        article style="width: fit-content;" {
            form hx-post=(names::admin_mdf_decide_url(&request.public_id))
                 hx-target="main"
                 hx-disabled-elt="find input, find button, find textarea"
                 hx-swap="innerHTML" {
                label {
                    "Decision note"
                    textarea name="note"
                             rows="3"
                             placeholder="Optional note shown to the partner"
                             aria-label="Decision note" {}
                }
                div style="display: flex; gap: 0.5rem;" {
                    button type="submit" name="status" value="approved"
                           style="width: fit-content;" {
                        "Approve"
                    }
                    button type="submit" name="status" value="rejected"
                           style="width: fit-content; background-color: #dc3545; color: white;" {
                        "Reject"
                    }
                }
            }
        }
    }
}

pub fn partners(orgs: &[Organization]) -> Markup {
    html! {
        h1 { "Partners" }
        @if orgs.is_empty() {
            (components::empty_state("No partner organizations have registered yet."))
        } @else {
            table {
                thead { tr {
                    th { "Organization" }
                    th { "Tier" }
                    th { "" }
                } }
                tbody {
                    @for org in orgs {
                        tr {
                            td { (org.name) }
                            td { (components::status_badge(&org.tier)) }
                            td {
                                form hx-post=(names::admin_partner_tier_url(org.id))
                                     hx-target="main"
                                     hx-swap="innerHTML"
                                     style="display: flex; gap: 0.5rem; margin-bottom: 0;" {
                                    select name="tier" aria-label="Tier" {
                                        @for tier in names::TIERS {
                                            option value=(tier) selected[org.tier == *tier] { (tier) }
                                        }
                                    }
                                    button type="submit"
                                           style="width:fit-content;padding:0.25rem 0.5rem;font-size:0.8rem;" {
                                        "Set"
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
