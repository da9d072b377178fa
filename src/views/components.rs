use chrono::{DateTime, NaiveDate, Utc};
use maud::{html, Markup};

/// htmx navigation link with href fallback + hx-get for in-page swap.
pub fn nav_link(href: &str, body: Markup) -> Markup {
    html! {
        a href=(href)
          hx-get=(href)
          hx-target="main"
          hx-push-url="true"
          hx-swap="innerHTML" {
            (body)
        }
    }
}

/// Colored pill for a status-like value. Styling keyed off `data-status`.
pub fn status_badge(status: &str) -> Markup {
    html! {
        span."badge" data-status=(status) { (status.replace('_', " ")) }
    }
}

pub fn error_banner(message: &str) -> Markup {
    html! {
        p."error-banner" role="alert" { (message) }
    }
}

pub fn empty_state(message: &str) -> Markup {
    html! {
        p."secondary" { em { (message) } }
    }
}

pub fn date(d: NaiveDate) -> Markup {
    html! { (d.format("%Y-%m-%d")) }
}

pub fn datetime(ts: DateTime<Utc>) -> Markup {
    html! { (ts.format("%Y-%m-%d %H:%M")) }
}
