use serde_json::{Map, Value};
use thiserror::Error;

/// Maximum slug length accepted from an address bar.
pub const MAX_SLUG_LENGTH: usize = 100;

/// A validated blog article.
///
/// `title` and `slug` are guaranteed non-empty and the slug only contains
/// ASCII letters, digits, `-` and `_`. Everything else is optional and
/// display-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub slug: String,
    pub content: Option<String>,
    pub summary: Option<String>,
    /// Display text only; never parsed or used for ordering.
    pub date: Option<String>,
    pub tags: Vec<String>,
}

/// Reasons a raw record is rejected at load time.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidArticle {
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("missing or empty title")]
    MissingTitle,
    #[error("missing or empty slug")]
    MissingSlug,
    #[error("slug contains characters outside [A-Za-z0-9_-]")]
    MalformedSlug,
}

/// Returns true for characters allowed in a slug.
#[inline]
pub fn is_slug_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Returns true if `slug` is non-empty and made only of slug characters.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(is_slug_char)
}

impl Article {
    /// Build an article from one element of the API response.
    ///
    /// Optional fields with the wrong JSON type are treated as absent, and
    /// non-string tag entries are skipped: only `title` and `slug` decide
    /// validity.
    pub fn from_json(value: Value) -> Result<Self, InvalidArticle> {
        let Value::Object(mut fields) = value else {
            return Err(InvalidArticle::NotAnObject);
        };

        let title = take_text(&mut fields, "title")
            .filter(|t| !t.is_empty())
            .ok_or(InvalidArticle::MissingTitle)?;
        let slug = take_text(&mut fields, "slug")
            .filter(|s| !s.is_empty())
            .ok_or(InvalidArticle::MissingSlug)?;
        if !is_valid_slug(&slug) {
            return Err(InvalidArticle::MalformedSlug);
        }

        let tags = match fields.remove("tags") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        Ok(Self {
            title,
            slug,
            content: take_text(&mut fields, "content"),
            summary: take_text(&mut fields, "summary"),
            date: take_text(&mut fields, "date"),
            tags,
        })
    }

    /// Returns the content if present and non-empty.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

fn take_text(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.remove(key) {
        Some(Value::String(s)) => Some(s),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_record() {
        let article = Article::from_json(json!({
            "title": "Premier article",
            "slug": "premier-article",
            "content": "Corps",
            "summary": "Résumé",
            "date": "2024-03-01",
            "tags": ["rust", "web"]
        }))
        .unwrap();

        assert_eq!(article.title, "Premier article");
        assert_eq!(article.slug, "premier-article");
        assert_eq!(article.content.as_deref(), Some("Corps"));
        assert_eq!(article.summary.as_deref(), Some("Résumé"));
        assert_eq!(article.date.as_deref(), Some("2024-03-01"));
        assert_eq!(article.tags, vec!["rust", "web"]);
    }

    #[test]
    fn test_minimal_record() {
        let article = Article::from_json(json!({"title": "T", "slug": "t"})).unwrap();
        assert!(article.content.is_none());
        assert!(article.summary.is_none());
        assert!(article.tags.is_empty());
    }

    #[test]
    fn test_missing_or_empty_title_rejected() {
        assert_eq!(
            Article::from_json(json!({"slug": "s"})),
            Err(InvalidArticle::MissingTitle)
        );
        assert_eq!(
            Article::from_json(json!({"title": "", "slug": "s"})),
            Err(InvalidArticle::MissingTitle)
        );
        assert_eq!(
            Article::from_json(json!({"title": 42, "slug": "s"})),
            Err(InvalidArticle::MissingTitle)
        );
    }

    #[test]
    fn test_missing_slug_rejected() {
        assert_eq!(
            Article::from_json(json!({"title": "T", "slug": ""})),
            Err(InvalidArticle::MissingSlug)
        );
    }

    #[test]
    fn test_malformed_slug_rejected() {
        assert_eq!(
            Article::from_json(json!({"title": "T", "slug": "a b"})),
            Err(InvalidArticle::MalformedSlug)
        );
        assert_eq!(
            Article::from_json(json!({"title": "T", "slug": "<script>"})),
            Err(InvalidArticle::MalformedSlug)
        );
    }

    #[test]
    fn test_non_object_rejected() {
        assert_eq!(
            Article::from_json(json!("just a string")),
            Err(InvalidArticle::NotAnObject)
        );
    }

    #[test]
    fn test_wrong_typed_optional_fields_ignored() {
        let article = Article::from_json(json!({
            "title": "T",
            "slug": "t",
            "date": 20240301,
            "content": null,
            "tags": ["ok", 3, null, "fine"]
        }))
        .unwrap();
        assert!(article.date.is_none());
        assert!(article.content.is_none());
        assert_eq!(article.tags, vec!["ok", "fine"]);
    }

    #[test]
    fn test_slug_rules() {
        assert!(is_valid_slug("abc-DEF_123"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("é"));
        assert!(!is_valid_slug("a/b"));
    }
}
