//! HTML rendering port.
//!
//! Produces the markup the blog pages expect: article cards in the list or
//! preview container, a single-article view, notices, and pagination
//! controls. Every piece of article text goes through [`escape_html`]; the
//! only unescaped values are slugs, which validation restricts to
//! `[A-Za-z0-9_-]`.

use url::Url;

use crate::util::{deep_link, escape_attr, escape_html};

use super::messages;
use super::{Card, ListView, Notice, Pagination, RenderPort, ScrollTarget};

/// Collects rendered markup for the feed container and pagination controls.
#[derive(Debug, Clone, Default)]
pub struct HtmlPort {
    site: Option<Url>,
    container: String,
    pagination: Option<String>,
}

impl HtmlPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use absolute deep links rooted at `site` instead of `blog.html?slug=`.
    pub fn with_site(site: Url) -> Self {
        Self {
            site: Some(site),
            ..Self::default()
        }
    }

    /// Markup for the feed container (list, preview or single view).
    pub fn container_html(&self) -> &str {
        &self.container
    }

    /// Markup for the pagination element; `None` when controls are hidden.
    pub fn pagination_html(&self) -> Option<&str> {
        self.pagination.as_deref()
    }

    /// Container markup followed by the pagination controls, for output
    /// without a page template.
    pub fn fragments(&self) -> String {
        match &self.pagination {
            Some(pagination) => format!(
                "{}<nav id=\"pagination\">\n{}</nav>\n",
                self.container, pagination
            ),
            None => self.container.clone(),
        }
    }

    fn link(&self, slug: &str) -> String {
        match &self.site {
            Some(site) => deep_link(site, slug).to_string(),
            None => {
                let encoded: String = url::form_urlencoded::byte_serialize(slug.as_bytes()).collect();
                format!("blog.html?slug={}", encoded)
            }
        }
    }

    fn back_link(&self) -> String {
        match &self.site {
            Some(site) => site
                .join("blog.html")
                .map(|u| u.to_string())
                .unwrap_or_else(|_| "blog.html".to_string()),
            None => "blog.html".to_string(),
        }
    }

    /// Address of list page `n`, read back by `render --page`.
    fn page_link(&self, n: usize) -> String {
        let mut link = match &self.site {
            Some(site) => site
                .join("blog.html")
                .unwrap_or_else(|_| site.clone()),
            None => return format!("blog.html?page={}", n),
        };
        link.query_pairs_mut()
            .clear()
            .append_pair("page", &n.to_string());
        link.to_string()
    }

    /// One pagination control. A disabled control has no address.
    fn page_control(&self, id: &str, target: usize, enabled: bool, label: &str) -> String {
        if enabled {
            format!(
                "<a id=\"{id}\" class=\"page-btn\" data-page=\"{target}\" href=\"{}\">{label}</a>\n",
                escape_attr(&self.page_link(target))
            )
        } else {
            format!(
                "<a id=\"{id}\" class=\"page-btn\" data-page=\"{target}\" aria-disabled=\"true\">{label}</a>\n"
            )
        }
    }

    fn card_html(&self, card: &Card<'_>, accordion: bool) -> String {
        let article = card.article;
        let slug = article.slug.as_str();
        let title = escape_html(&article.title);
        let summary = card
            .summary
            .as_text()
            .unwrap_or(messages::SUMMARY_UNAVAILABLE);

        let mut html = format!(
            "<article class=\"blog-article\" id=\"article-{slug}\" data-slug=\"{slug}\" data-expanded=\"{expanded}\">\n",
            expanded = card.expanded
        );

        if accordion {
            html.push_str(&format!(
                "  <h3 class=\"article-title\"><button type=\"button\" class=\"accordion-toggle\" aria-expanded=\"{}\" aria-controls=\"content-{slug}\"><span class=\"accordion-indicator\">{}</span> {}</button></h3>\n",
                card.expanded,
                card.indicator(),
                title
            ));
        } else {
            html.push_str(&format!("  <h3 class=\"article-title\">{}</h3>\n", title));
        }

        if let Some(date) = article.date.as_deref().filter(|d| !d.is_empty()) {
            html.push_str(&format!(
                "  <div class=\"article-meta\"><span class=\"article-date\">{}</span></div>\n",
                escape_html(date)
            ));
        }

        let hidden = |hide: bool| if hide { " hidden" } else { "" };
        html.push_str(&format!(
            "  <div class=\"article-summary\"{}>{}</div>\n",
            hidden(accordion && card.expanded),
            escape_html(summary)
        ));

        if accordion {
            let content = article.content().unwrap_or(summary);
            html.push_str(&format!(
                "  <div class=\"article-content\" id=\"content-{slug}\"{}>{}</div>\n",
                hidden(!card.expanded),
                escape_html(content)
            ));
            if card.expanded {
                html.push_str(&format!(
                    "  <button type=\"button\" class=\"accordion-collapse\">{}</button>\n",
                    messages::SHOW_LESS
                ));
            }
        }

        html.push_str(&format!(
            "  <a href=\"{}\" class=\"article-link\">{}</a>\n</article>\n",
            escape_attr(&self.link(slug)),
            messages::READ_MORE
        ));
        html
    }
}

/// Scroll a card below the fixed header once the page has loaded.
fn scroll_script(target: &ScrollTarget<'_>) -> String {
    format!(
        "<script>(function(){{var el=document.getElementById(\"article-{}\");if(el){{window.scrollTo({{top:el.getBoundingClientRect().top+window.pageYOffset-{},behavior:\"smooth\"}});}}}})();</script>\n",
        target.slug, target.header_offset
    )
}

impl RenderPort for HtmlPort {
    fn render_list(&mut self, list: &ListView<'_>) {
        let mut html = String::new();
        for card in &list.cards {
            html.push_str(&self.card_html(card, list.accordion));
        }
        if let Some(target) = &list.scroll_to {
            html.push_str(&scroll_script(target));
        }
        self.container = html;
    }

    fn render_single(&mut self, card: &Card<'_>) {
        let article = card.article;
        let mut html = format!(
            "<article class=\"blog-full\" data-slug=\"{}\">\n  <h2>{}</h2>\n",
            article.slug,
            escape_html(&article.title)
        );
        if let Some(date) = article.date.as_deref().filter(|d| !d.is_empty()) {
            html.push_str(&format!("  <div class=\"meta\">{}</div>\n", escape_html(date)));
        }
        let body = article
            .content()
            .or_else(|| card.summary.as_text())
            .unwrap_or(messages::SUMMARY_UNAVAILABLE);
        html.push_str(&format!(
            "  <div class=\"content\">{}</div>\n  <p><a href=\"{}\" class=\"back-link\">{}</a></p>\n</article>\n",
            escape_html(body),
            escape_attr(&self.back_link()),
            messages::BACK_TO_LIST
        ));
        self.container = html;
    }

    fn render_notice(&mut self, notice: &Notice<'_>) {
        self.container = match notice {
            Notice::Loading => format!("<div class=\"loading\">{}</div>\n", messages::LOADING),
            Notice::NoArticles => {
                format!("<p class=\"no-articles\">{}</p>\n", messages::NO_ARTICLES)
            }
            // Retrying reloads the list page, which fetches again
            Notice::LoadFailed { .. } => format!(
                "<div class=\"error-message\">\n  <p>{}</p>\n  <a href=\"{}\" class=\"retry-btn\" data-action=\"retry\" role=\"button\">{}</a>\n</div>\n",
                messages::LOAD_FAILED,
                escape_attr(&self.back_link()),
                messages::RETRY
            ),
            Notice::NotFound { slug } => format!(
                "<p class=\"error-message\">{}</p>\n",
                escape_html(&messages::not_found(slug))
            ),
        };
    }

    fn render_pagination(&mut self, pagination: Option<&Pagination>) {
        self.pagination = pagination.filter(|p| p.is_visible()).map(|p| {
            format!(
                "{}<span id=\"page-info\">{}</span>\n{}",
                self.page_control(
                    "prev-btn",
                    p.current.saturating_sub(1).max(1),
                    p.has_previous(),
                    messages::PREVIOUS
                ),
                messages::page_info(p.current, p.total),
                self.page_control(
                    "next-btn",
                    (p.current + 1).min(p.total),
                    p.has_next(),
                    messages::NEXT
                ),
            )
        });
    }
}
