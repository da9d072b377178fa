use crate::{
    db::models::Article,
    names,
    views::components,
};
use maud::{html, Markup};

pub enum ArticleFormState {
    NoError,
    EmptyFields,
    SlugTaken,
}

pub fn list(articles: &[Article]) -> Markup {
    html! {
        h1 { "Knowledge base" }
        p {
            button hx-get=(names::NEW_ADMIN_ARTICLE_URL)
                   hx-push-url="true"
                   hx-target="main"
                   style="width: fit-content;" {
                "New article"
            }
        }
        @if articles.is_empty() {
            (components::empty_state("No articles yet."))
        } @else {
            table {
                thead { tr {
                    th { "Title" }
                    th { "Category" }
                    th { "Minimum tier" }
                    th { "Published" }
                    th { "Updated" }
                    th { "" }
                } }
                tbody {
                    @for article in articles {
                        tr {
                            td {
                                a hx-get=(names::admin_article_url(article.id))
                                  hx-push-url="true"
                                  hx-target="main"
                                  href="#" { (article.title) }
                            }
                            td { (article.category) }
                            td { (components::status_badge(&article.min_tier)) }
                            td {
                                @if article.published { "Yes" } @else { "Draft" }
                            }
                            td { (components::datetime(article.updated_at)) }
                            td {
                                button hx-post=(names::admin_article_delete_url(article.id))
                                       hx-target="main"
                                       hx-swap="innerHTML"
                                       hx-confirm="Delete this article?"
                                       style="width:fit-content;padding:0.25rem 0.5rem;font-size:0.8rem;background-color:#dc3545;color:white;" {
                                    "Delete"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn form(state: ArticleFormState, existing: Option<&Article>) -> Markup {
    let error_msg = match state {
        ArticleFormState::NoError => None,
        ArticleFormState::EmptyFields => Some("Title and body are required."),
        ArticleFormState::SlugTaken => {
            Some("An article with this title already exists. Pick a different title.")
        }
    };
    let post_url = match existing {
        Some(article) => names::admin_article_url(article.id),
        None => names::NEW_ADMIN_ARTICLE_URL.to_string(),
    };

    html! {
        p style="margin-bottom: 0.5rem; font-size: 0.9rem;" {
            a hx-get=(names::ADMIN_ARTICLES_URL)
              hx-push-url="true"
              hx-target="main"
              href="#" { "Back to articles" }
        }
        @match existing {
            Some(article) => {
                h1 { "Edit: " (article.title) }
            }
            None => {
                h1 { "New article" }
            }
        }

        @if let Some(msg) = error_msg {
            (components::error_banner(msg))
        }

        article {
            form hx-post=(post_url)
                 hx-target="main"
                 hx-disabled-elt="find input, find button, find textarea, find select"
                 hx-swap="innerHTML" {
                label {
                    "Title"
                    input name="title"
                          type="text"
                          required="true"
                          value=[existing.map(|a| a.title.as_str())]
                          aria-label="Title";
                }
                @if let Some(article) = existing {
                    label {
                        "Slug"
                        input type="text" value=(article.slug) disabled="true";
                    }
                }
                label {
                    "Category"
                    input name="category"
                          type="text"
                          required="true"
                          placeholder="Sales, Product, Integrations..."
                          value=[existing.map(|a| a.category.as_str())]
                          aria-label="Category";
                }
                label {
                    "Minimum tier"
                    select name="min_tier" aria-label="Minimum tier" {
                        @for tier in names::TIERS {
                            option value=(tier)
                                   selected[existing.is_some_and(|a| a.min_tier == *tier)] {
                                (tier)
                            }
                        }
                    }
                    small { "Partners at this tier and above can read the article." }
                }
                label {
                    "Body"
                    textarea name="body"
                             rows="14"
                             required="true"
                             aria-label="Body" {
                        @if let Some(article) = existing { (article.body) }
                    }
                }
                @if existing.is_some() {
                    label {
                        input name="published"
                              type="checkbox"
                              value="true"
                              checked[existing.is_some_and(|a| a.published)];
                        "Published"
                    }
                }
                button type="submit" { "Save" }
            }
        }
    }
}
