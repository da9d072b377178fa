use axum::http::HeaderValue;
use color_eyre::Result;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const SESSION_MAX_AGE_SECS: u32 = 30 * 24 * 3600;

pub fn cookie(name: &str, value: &str, secure: bool) -> Result<HeaderValue> {
    let secure_attr = if secure { "; Secure" } else { "" };
    let cookie = format!(
        "{name}={value}; HttpOnly; Max-Age={SESSION_MAX_AGE_SECS}; Path=/; SameSite=Lax{secure_attr}"
    );
    Ok(HeaderValue::from_str(&cookie)?)
}

pub fn clear_cookie(name: &str, secure: bool) -> Result<HeaderValue> {
    let secure_attr = if secure { "; Secure" } else { "" };
    let cookie = format!("{name}=; HttpOnly; Max-Age=0; Path=/; SameSite=Lax{secure_attr}");
    Ok(HeaderValue::from_str(&cookie)?)
}

/// Parse a user-entered dollar amount ("1499.99") into cents.
/// Returns `None` for malformed, negative or zero amounts.
pub fn parse_amount_cents(input: &str) -> Option<i64> {
    let input = input.trim().trim_start_matches('$');
    if input.is_empty() {
        return None;
    }
    let value: f64 = input.parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value > 1e13 {
        return None;
    }
    Some((value * 100.0).round() as i64)
}

pub fn format_cents(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, (cents % 100).abs())
}

/// Plain decimal form for pre-filling an amount input, no currency sign.
pub fn format_amount_input(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}

/// Video length as m:ss for display next to lesson titles.
pub fn format_duration(seconds: i32) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Turn a title into a URL slug: lowercase alphanumerics joined by single hyphens.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_hyphen = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_amount_accepts_plain_and_dollar_prefixed() {
        assert_eq!(parse_amount_cents("1499.99"), Some(149999));
        assert_eq!(parse_amount_cents("$250"), Some(25000));
        assert_eq!(parse_amount_cents(" 10.5 "), Some(1050));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert_eq!(parse_amount_cents(""), None);
        assert_eq!(parse_amount_cents("abc"), None);
        assert_eq!(parse_amount_cents("-5"), None);
        assert_eq!(parse_amount_cents("0"), None);
        assert_eq!(parse_amount_cents("NaN"), None);
    }

    #[test]
    fn format_cents_renders_two_decimals() {
        assert_eq!(format_cents(149999), "$1499.99");
        assert_eq!(format_cents(25000), "$250.00");
        assert_eq!(format_cents(5), "$0.05");
    }

    #[test]
    fn amount_input_round_trips_through_parse() {
        assert_eq!(parse_amount_cents(&format_amount_input(149999)), Some(149999));
        assert_eq!(format_amount_input(25000), "250.00");
    }

    #[test]
    fn duration_is_minutes_and_padded_seconds() {
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(450), "7:30");
        assert_eq!(format_duration(3600), "60:00");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Getting Started with MDF"), "getting-started-with-mdf");
        assert_eq!(slugify("  Q4 -- Playbook!  "), "q4-playbook");
        assert_eq!(slugify("___"), "");
    }
}
