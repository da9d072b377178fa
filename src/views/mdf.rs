use maud::{html, Markup};

use crate::db::models::MdfRequest;
use crate::views::components;
use crate::{names, utils};

pub enum MdfFormState {
    NoError,
    Invalid(&'static str),
}

pub fn list(requests: &[MdfRequest]) -> Markup {
    html! {
        header."page-header" {
            h1 { "Marketing development funds" }
            (components::nav_link(names::NEW_MDF_URL, html! { button { "Request funds" } }))
        }
        @if requests.is_empty() {
            (components::empty_state("No fund requests yet."))
        } @else {
            table {
                thead {
                    tr {
                        th { "Campaign" }
                        th { "Amount" }
                        th { "Status" }
                        th { "Requested" }
                        th {}
                    }
                }
                tbody {
                    @for request in requests {
                        tr {
                            td { (request.campaign_name) }
                            td { (utils::format_cents(request.amount_cents)) }
                            td { (components::status_badge(&request.status)) }
                            td { (components::datetime(request.created_at)) }
                            td { (components::nav_link(&names::mdf_url(&request.public_id), html! { "View" })) }
                        }
                    }
                }
            }
        }
    }
}

pub fn new_request(state: MdfFormState) -> Markup {
    html! {
        h1 { "Request marketing funds" }
        article style="max-width: 40rem;" {
            @if let MdfFormState::Invalid(msg) = state {
                (components::error_banner(msg))
            }
            form hx-post=(names::MDF_URL) hx-target="main" {
                label {
                    "Campaign name"
                    input name="campaign_name" type="text" required="true" aria-label="Campaign name";
                }
                label {
                    "Description"
                    textarea name="description" rows="4" required="true" aria-label="Description" {}
                }
                label {
                    "Requested amount (USD)"
                    input name="amount"
                          type="text"
                          inputmode="decimal"
                          required="true"
                          placeholder="5000.00"
                          aria-label="Requested amount";
                }
                label {
                    "Expected ROI"
                    textarea name="roi_metrics"
                             rows="4"
                             placeholder="leads: 50\nmeetings: 12"
                             aria-label="Expected ROI" {}
                    small { "One metric per line, as name: value." }
                }
                button type="submit" { "Submit request" }
            }
        }
    }
}

pub fn detail(request: &MdfRequest) -> Markup {
    html! {
        header."page-header" {
            h1 { (request.campaign_name) }
            (components::status_badge(&request.status))
        }
        p."secondary" { "Requested " (components::datetime(request.created_at)) }

        dl {
            dt { "Amount" }
            dd { (utils::format_cents(request.amount_cents)) }
            dt { "Description" }
            dd { (request.description) }
        }

        (roi_metrics(&request.roi_metrics.0))

        @if let Some(note) = &request.decision_note {
            section {
                h2 { "Decision note" }
                p { (note) }
            }
        }

        p { (components::nav_link(names::MDF_URL, html! { "Back to fund requests" })) }
    }
}

/// The metrics blob is writer-shaped JSON; render objects as a list and
/// anything else verbatim.
pub fn roi_metrics(metrics: &serde_json::Value) -> Markup {
    html! {
        @if let Some(entries) = metrics.as_object() {
            @if !entries.is_empty() {
                section {
                    h2 { "Expected ROI" }
                    dl {
                        @for (name, value) in entries {
                            dt { (name) }
                            dd { (value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string())) }
                        }
                    }
                }
            }
        } @else if !metrics.is_null() {
            section {
                h2 { "Expected ROI" }
                pre { (metrics.to_string()) }
            }
        }
    }
}
