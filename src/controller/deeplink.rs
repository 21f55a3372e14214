use serde::Deserialize;
use url::Url;

use crate::feed::{is_slug_char, Article, MAX_SLUG_LENGTH};

/// Query parameter carrying the deep-link slug.
pub const SLUG_PARAM: &str = "slug";

/// How a resolved deep link is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeepLinkMode {
    /// Expand the article in place within the list and scroll to it.
    #[default]
    Expand,
    /// Show only that article, with a link back to the list.
    Single,
}

/// Sanitize a raw slug parameter.
///
/// Every character outside `[A-Za-z0-9_-]` is stripped. An empty result, or
/// one longer than [`MAX_SLUG_LENGTH`], means "no slug given".
pub fn sanitize_slug(raw: &str) -> Option<String> {
    let cleaned: String = raw.chars().filter(|c| is_slug_char(*c)).collect();
    if cleaned.is_empty() || cleaned.len() > MAX_SLUG_LENGTH {
        return None;
    }
    Some(cleaned)
}

/// Extract and sanitize the `slug` query parameter of an address.
pub fn slug_from_url(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == SLUG_PARAM)
        .and_then(|(_, value)| sanitize_slug(&value))
}

/// Find the article with exactly this slug (case-sensitive).
///
/// Returns its index in `all` alongside the article.
pub fn resolve<'a>(all: &'a [Article], slug: &str) -> Option<(usize, &'a Article)> {
    all.iter().enumerate().find(|(_, a)| a.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(slug: &str) -> Article {
        Article {
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            content: None,
            summary: None,
            date: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_sanitize_strips_foreign_characters() {
        assert_eq!(sanitize_slug("mon-article_2").as_deref(), Some("mon-article_2"));
        assert_eq!(
            sanitize_slug("<script>alert(1)</script>").as_deref(),
            Some("scriptalert1script")
        );
        assert_eq!(sanitize_slug("a b/c").as_deref(), Some("abc"));
    }

    #[test]
    fn test_sanitize_empty_means_none() {
        assert_eq!(sanitize_slug(""), None);
        assert_eq!(sanitize_slug("!!!"), None);
    }

    #[test]
    fn test_sanitize_length_cap() {
        assert!(sanitize_slug(&"a".repeat(MAX_SLUG_LENGTH)).is_some());
        assert_eq!(sanitize_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)), None);
    }

    #[test]
    fn test_slug_from_url() {
        let url = Url::parse("https://example.com/blog.html?slug=hello-world&x=1").unwrap();
        assert_eq!(slug_from_url(&url).as_deref(), Some("hello-world"));

        let url = Url::parse("https://example.com/blog.html").unwrap();
        assert_eq!(slug_from_url(&url), None);

        let url = Url::parse("https://example.com/blog.html?slug=%3Cb%3Eok").unwrap();
        assert_eq!(slug_from_url(&url).as_deref(), Some("bok"));
    }

    #[test]
    fn test_resolve_exact_case_sensitive() {
        let all = vec![article("alpha"), article("beta")];
        let (idx, found) = resolve(&all, "beta").unwrap();
        assert_eq!(idx, 1);
        assert_eq!(found.slug, "beta");
        assert!(resolve(&all, "Beta").is_none());
        assert!(resolve(&all, "bet").is_none());
    }
}
