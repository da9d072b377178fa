use maud::{html, Markup};

use crate::db::models::{AuthUser, DashboardCounts, Deal};
use crate::views::components;
use crate::{names, views::deals as deal_views};

pub enum LoginState {
    NoError,
    IncorrectPassword,
}

pub enum RegisterState {
    NoError,
    EmptyFields,
    EmailTaken,
    WeakPassword,
}

pub fn login(state: LoginState) -> Markup {
    html! {
        h1 { "Welcome back" }
        p { "Sign in to your partner account." }
        article style="width: fit-content;" {
            form hx-post=(names::LOGIN_URL) hx-target="main" {
                label {
                    "Email"
                    input name="email"
                          type="email"
                          autocomplete="email"
                          required="true"
                          placeholder="Email"
                          aria-label="Email";
                }
                @match state {
                    LoginState::NoError => {
                        label {
                            "Password"
                            input name="password"
                                  type="password"
                                  autocomplete="current-password"
                                  required="true"
                                  placeholder="Password"
                                  aria-label="Password";
                        }
                    },
                    LoginState::IncorrectPassword => {
                        label {
                            "Password"
                            input name="password"
                                  type="password"
                                  autocomplete="current-password"
                                  required="true"
                                  placeholder="Password"
                                  aria-invalid="true"
                                  aria-label="Password";
                            small { "Incorrect email or password." }
                        }
                    }
                }
                button type="submit" { "Log in" }
            }
        }
        p {
            "New partner? "
            (components::nav_link(names::REGISTER_URL, html! { "Register your organization" }))
        }
    }
}

pub fn register(state: RegisterState) -> Markup {
    let error_msg = match state {
        RegisterState::NoError => None,
        RegisterState::EmptyFields => Some("All fields are required."),
        RegisterState::EmailTaken => Some("That email is already registered."),
        RegisterState::WeakPassword => Some("Password must be at least 8 characters."),
    };

    html! {
        h1 { "Become a partner" }
        p { "Register your organization to access deals, support, and training." }
        article style="width: fit-content;" {
            form hx-post=(names::REGISTER_URL) hx-target="main" {
                label {
                    "Organization name"
                    input name="org_name"
                          type="text"
                          autocomplete="organization"
                          required="true"
                          placeholder="Organization name"
                          aria-label="Organization name";
                }
                label {
                    "Email"
                    input name="email"
                          type="email"
                          autocomplete="email"
                          required="true"
                          placeholder="Email"
                          aria-label="Email";
                }
                label {
                    "Your name"
                    input name="display_name"
                          type="text"
                          autocomplete="name"
                          required="true"
                          placeholder="Your name"
                          aria-label="Your name";
                }
                label {
                    "Password"
                    @if let Some(msg) = error_msg {
                        input name="password"
                              type="password"
                              autocomplete="new-password"
                              required="true"
                              placeholder="Password"
                              aria-invalid="true"
                              aria-label="Password";
                        small { (msg) }
                    } @else {
                        input name="password"
                              type="password"
                              autocomplete="new-password"
                              required="true"
                              placeholder="Password"
                              aria-label="Password";
                    }
                }
                button type="submit" { "Register" }
            }
        }
        p {
            "Already registered? "
            (components::nav_link(names::LOGIN_URL, html! { "Log in" }))
        }
    }
}

pub fn dashboard(
    user: &AuthUser,
    org_name: &str,
    tier: &str,
    counts: DashboardCounts,
    recent_deals: Vec<Deal>,
) -> Markup {
    html! {
        h1 { "Welcome back, " (user.display_name) }
        p."secondary" { (org_name) " \u{00b7} " (tier) " tier" }

        div."stat-grid" {
            (stat_card(names::DEALS_URL, counts.open_deals, "Open deals"))
            (stat_card(names::TICKETS_URL, counts.open_tickets, "Open tickets"))
            (stat_card(names::MDF_URL, counts.pending_mdf, "Pending MDF requests"))
            (stat_card(names::TRAINING_URL, counts.courses_in_progress, "Courses in progress"))
        }

        section {
            h2 { "Recent deals" }
            @if recent_deals.is_empty() {
                (components::empty_state("No deals registered yet."))
                p { (components::nav_link(names::NEW_DEAL_URL, html! { "Register your first deal" })) }
            } @else {
                (deal_views::deal_table(&recent_deals))
            }
        }
    }
}

fn stat_card(href: &str, count: i64, label: &str) -> Markup {
    html! {
        article."stat-card" {
            (components::nav_link(href, html! {
                span."stat-count" { (count) }
                span."stat-label" { (label) }
            }))
        }
    }
}
