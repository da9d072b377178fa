use crate::db::models::Certificate;
use maud::{html, Markup, DOCTYPE};

/// Standalone shareable page, no app chrome. Everything on it comes verbatim
/// from the stored certificate row.
pub fn document(cert: &Certificate) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/@picocss/pico@2/css/pico.min.css";
                link rel="stylesheet" href="/static/index.css";
                title { "Certificate " (cert.certificate_no) " - PartnerHub" }
            }
            body."container" {
                main {
                    article class="certificate" style="max-width: 640px; margin: 3rem auto; padding: 3rem; text-align: center; border: 4px double #1a5276;" {
                        p style="letter-spacing: 0.2em; text-transform: uppercase; color: #666; font-size: 0.8rem;" {
                            "PartnerHub Partner Training"
                        }
                        h1 style="margin-bottom: 2rem;" { "Certificate of Completion" }
                        p { "This certifies that" }
                        h2 { (cert.partner_name) }
                        p { "has successfully completed the course" }
                        h3 { (cert.course_title) }
                        p {
                            "on " strong { (cert.completed_on.format("%B %-d, %Y")) }
                        }
                        footer style="margin-top: 3rem;" {
                            p { code { (cert.certificate_no) } }
                            p {
                                small style="color: #666;" {
                                    "Issued " (cert.issued_at.format("%Y-%m-%d %H:%M UTC"))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
