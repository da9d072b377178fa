use maud::{html, Markup, DOCTYPE};

use crate::db::models::AuthUser;
use crate::views::components;
use crate::{names, utils};

fn css() -> Markup {
    html! {
        link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
        link rel="stylesheet" href="/static/index.css";
    }
}

fn js() -> Markup {
    html! {
        script src="https://unpkg.com/htmx.org@2.0.4/dist/htmx.min.js" {}
        script src="https://unpkg.com/htmx-ext-json-enc@2.0.1/json-enc.js" {}
    }
}

fn icon() -> Markup {
    html! {
        link rel="icon" href="/static/img/icon.svg" type="image/svg+xml" {}
    }
}

fn header(user: Option<&AuthUser>) -> Markup {
    html! {
        header {
            nav {
                ul {
                    li."secondary" {
                        a href="/" {
                            strong { "PartnerHub" }
                        }
                    }
                }
                @match user {
                    Some(user) => {
                        ul {
                            @if user.is_admin {
                                li { (components::nav_link(names::ADMIN_URL, html! { "Admin" })) }
                            } @else {
                                li { (components::nav_link(names::DEALS_URL, html! { "Deals" })) }
                                li { (components::nav_link(names::TICKETS_URL, html! { "Tickets" })) }
                                li { (components::nav_link(names::KB_URL, html! { "Knowledge Base" })) }
                                li { (components::nav_link(names::MDF_URL, html! { "MDF" })) }
                                li { (components::nav_link(names::TRAINING_URL, html! { "Training" })) }
                            }
                            li { (components::nav_link(names::ACCOUNT_URL, html! { (user.display_name) })) }
                            li {
                                a href="#" hx-post=(names::LOGOUT_URL) { "Log out" }
                            }
                        }
                    }
                    None => {
                        ul {
                            li."secondary" { (utils::VERSION) }
                        }
                    }
                }
            }
        }
    }
}

fn main(body: Markup) -> Markup {
    html! {
        main { (body) }
    }
}

fn shell(title: &str, user: Option<&AuthUser>, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        head {
            meta charset="utf-8";
            meta name="viewport" content="width=device-width, initial-scale=1";
            meta name="color-scheme" content="light dark";

            (css())
            (js())
            (icon())

            title { (format!("{title} - PartnerHub")) }
        }

        body."container" {
            (header(user))
            (main(body))
        }
    }
}

pub fn page(title: &str, body: Markup) -> Markup {
    shell(title, None, body)
}

pub fn titled(title: &str, body: Markup) -> Markup {
    html! {
        title { (title) " - PartnerHub" }
        (body)
    }
}

/// Full page on a normal request, fragment swap on an htmx request.
pub fn render(is_htmx: bool, title: &str, user: Option<&AuthUser>, body: Markup) -> Markup {
    if is_htmx {
        titled(title, body)
    } else {
        shell(title, user, body)
    }
}
