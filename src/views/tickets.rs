use maud::{html, Markup};

use crate::db::models::{Ticket, TicketReply};
use crate::names;
use crate::views::components;

pub enum TicketFormState {
    NoError,
    Invalid(&'static str),
}

pub fn list(tickets: &[Ticket]) -> Markup {
    html! {
        header."page-header" {
            h1 { "Support tickets" }
            (components::nav_link(names::NEW_TICKET_URL, html! { button { "Open ticket" } }))
        }
        @if tickets.is_empty() {
            (components::empty_state("No tickets yet."))
        } @else {
            (ticket_table(tickets))
        }
    }
}

pub fn ticket_table(tickets: &[Ticket]) -> Markup {
    html! {
        table {
            thead {
                tr {
                    th { "Subject" }
                    th { "Priority" }
                    th { "Status" }
                    th { "Updated" }
                    th {}
                }
            }
            tbody {
                @for ticket in tickets {
                    tr {
                        td { (ticket.subject) }
                        td { (ticket.priority) }
                        td { (components::status_badge(&ticket.status)) }
                        td { (components::datetime(ticket.updated_at)) }
                        td { (components::nav_link(&names::ticket_url(&ticket.public_id), html! { "View" })) }
                    }
                }
            }
        }
    }
}

pub fn new_ticket(state: TicketFormState) -> Markup {
    html! {
        h1 { "Open a support ticket" }
        article style="max-width: 40rem;" {
            @if let TicketFormState::Invalid(msg) = state {
                (components::error_banner(msg))
            }
            form hx-post=(names::TICKETS_URL) hx-target="main" {
                label {
                    "Subject"
                    input name="subject" type="text" required="true" aria-label="Subject";
                }
                label {
                    "Priority"
                    select name="priority" aria-label="Priority" {
                        @for priority in names::TICKET_PRIORITIES {
                            option value=(priority) selected[*priority == "normal"] { (priority) }
                        }
                    }
                }
                label {
                    "Describe the problem"
                    textarea name="body" rows="6" required="true" aria-label="Describe the problem" {}
                }
                button type="submit" { "Open ticket" }
            }
        }
    }
}

pub fn detail(ticket: &Ticket, replies: &[TicketReply], reply_url: &str, close_url: Option<&str>) -> Markup {
    html! {
        header."page-header" {
            h1 { (ticket.subject) }
            (components::status_badge(&ticket.status))
        }
        p."secondary" {
            "Priority " (ticket.priority)
            " \u{00b7} opened " (components::datetime(ticket.created_at))
        }

        article."ticket-body" { (ticket.body) }

        section {
            h2 { "Replies" }
            @if replies.is_empty() {
                (components::empty_state("No replies yet."))
            }
            @for reply in replies {
                article."reply" {
                    header {
                        strong { (reply.author_name) }
                        @if reply.author_is_admin { " (support)" }
                        span."secondary" { " \u{00b7} " (components::datetime(reply.created_at)) }
                    }
                    p { (reply.body) }
                }
            }
        }

        @if ticket.status != "closed" {
            section {
                h2 { "Add a reply" }
                form hx-post=(reply_url) hx-target="main" {
                    textarea name="body" rows="4" required="true" aria-label="Reply" {}
                    button type="submit" { "Reply" }
                }
                @if let Some(close_url) = close_url {
                    form hx-post=(close_url) hx-target="main" {
                        button type="submit" class="secondary outline" { "Close ticket" }
                    }
                }
            }
        }
    }
}
