use maud::{html, Markup};

use crate::db::models::Article;
use crate::names;
use crate::views::components;

pub fn list(articles: &[Article], tier_label: &str) -> Markup {
    // Articles arrive ordered by category; regroup for display.
    let mut categories: Vec<(&str, Vec<&Article>)> = Vec::new();
    for article in articles {
        match categories.last_mut() {
            Some((category, group)) if *category == article.category => group.push(article),
            _ => categories.push((&article.category, vec![article])),
        }
    }

    html! {
        h1 { "Knowledge base" }
        p."secondary" { "Showing articles available to your " (tier_label) " tier." }

        @if articles.is_empty() {
            (components::empty_state("No articles published yet."))
        }
        @for (category, group) in &categories {
            section {
                h2 { (category) }
                ul {
                    @for article in group {
                        li {
                            (components::nav_link(&names::article_url(&article.slug), html! { (article.title) }))
                        }
                    }
                }
            }
        }
    }
}

pub fn article(article: &Article) -> Markup {
    html! {
        h1 { (article.title) }
        p."secondary" {
            (article.category)
            " \u{00b7} updated " (components::datetime(article.updated_at))
        }
        @for paragraph in article.body.split("\n\n") {
            p { (paragraph) }
        }
        p { (components::nav_link(names::KB_URL, html! { "Back to knowledge base" })) }
    }
}
