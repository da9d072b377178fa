use crate::{
    db::models::{AuthUser, Organization},
    names,
};
use maud::{html, Markup};

pub enum ProfileState {
    NoError,
    EmptyName,
    Saved,
}

pub enum ChangePasswordState {
    NoError,
    IncorrectPassword,
    EmptyFields,
    WeakPassword,
    Success,
}

pub fn account_page(
    user: &AuthUser,
    org: Option<&Organization>,
    profile: ProfileState,
    password: ChangePasswordState,
) -> Markup {
    let (profile_error, profile_saved) = match profile {
        ProfileState::NoError => (None, false),
        ProfileState::EmptyName => (Some("Display name cannot be empty."), false),
        ProfileState::Saved => (None, true),
    };
    let (password_error, password_changed) = match password {
        ChangePasswordState::NoError => (None, false),
        ChangePasswordState::IncorrectPassword => (Some("Current password is incorrect."), false),
        ChangePasswordState::EmptyFields => (Some("Please fill in both fields."), false),
        ChangePasswordState::WeakPassword => {
            (Some("New password must be at least 8 characters."), false)
        }
        ChangePasswordState::Success => (None, true),
    };

    html! {
        h1 { "Account" }

        article style="width: fit-content;" {
            label {
                "Email"
                input type="email" value=(user.email) disabled="true";
            }
            @if let Some(org) = org {
                label {
                    "Organization"
                    input type="text" value=(format!("{} ({} tier)", org.name, org.tier)) disabled="true";
                }
            }
            form hx-post=(names::UPDATE_PROFILE_URL)
                 hx-target="main"
                 hx-disabled-elt="find input, find button"
                 hx-swap="innerHTML" {
                label {
                    "Display name"
                    @if let Some(msg) = profile_error {
                        input name="display_name"
                              type="text"
                              required="true"
                              value=(user.display_name)
                              aria-invalid="true"
                              aria-label="Display name";
                        small { (msg) }
                    } @else {
                        input name="display_name"
                              type="text"
                              required="true"
                              value=(user.display_name)
                              aria-label="Display name";
                    }
                }
                button type="submit" { "Save" }
            }
            @if profile_saved {
                p style="color: var(--pico-ins-color);" { "Profile updated." }
            }
        }

        h2 { "Change password" }

        @if password_changed {
            p style="color: var(--pico-ins-color);" { "Password changed." }
        }

        article style="width: fit-content;" {
            form hx-post=(names::CHANGE_PASSWORD_URL)
                 hx-target="main"
                 hx-disabled-elt="find input, find button"
                 hx-swap="innerHTML" {
                label {
                    "Current password"
                    @if let Some(msg) = password_error {
                        input name="current_password"
                              type="password"
                              autocomplete="current-password"
                              required="true"
                              placeholder="Current password"
                              aria-invalid="true"
                              aria-label="Current password";
                        small { (msg) }
                    } @else {
                        input name="current_password"
                              type="password"
                              autocomplete="current-password"
                              required="true"
                              placeholder="Current password"
                              aria-label="Current password";
                    }
                }
                label {
                    "New password"
                    input name="new_password"
                          type="password"
                          autocomplete="new-password"
                          required="true"
                          placeholder="New password"
                          aria-label="New password";
                }
                button type="submit" { "Change password" }
            }
        }
    }
}
