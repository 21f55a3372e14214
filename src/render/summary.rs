use std::borrow::Cow;

use crate::feed::Article;
use crate::util::excerpt;

/// Literal summary values the API emits when a summary is missing.
pub const SUMMARY_SENTINELS: [&str; 2] = ["undefined", "null"];

/// Default excerpt length, in characters.
pub const DEFAULT_EXCERPT_CHARS: usize = 200;

/// Short text shown on a collapsed card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Summary<'a> {
    /// The article's own summary
    Provided(&'a str),
    /// A prefix of the content, with `...` when cut
    Excerpt(Cow<'a, str>),
    /// Neither summary nor content; hosts show a placeholder
    Unavailable,
}

impl Summary<'_> {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Provided(s) => Some(*s),
            Self::Excerpt(s) => Some(s.as_ref()),
            Self::Unavailable => None,
        }
    }
}

/// Pick the summary for a card.
///
/// Uses `summary` when present, non-blank and not a sentinel; otherwise the
/// first `excerpt_chars` characters of `content`; otherwise
/// [`Summary::Unavailable`].
pub fn summarize(article: &Article, excerpt_chars: usize) -> Summary<'_> {
    if let Some(summary) = article.summary.as_deref() {
        let trimmed = summary.trim();
        if !trimmed.is_empty() && !SUMMARY_SENTINELS.iter().any(|s| *s == trimmed) {
            return Summary::Provided(summary);
        }
    }

    match article.content() {
        Some(content) => Summary::Excerpt(excerpt(content, excerpt_chars)),
        None => Summary::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(summary: Option<&str>, content: Option<&str>) -> Article {
        Article {
            title: "T".to_string(),
            slug: "t".to_string(),
            content: content.map(str::to_string),
            summary: summary.map(str::to_string),
            date: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_provided_summary_wins() {
        let a = article(Some("Court résumé"), Some("Long contenu"));
        assert_eq!(summarize(&a, 200), Summary::Provided("Court résumé"));
    }

    #[test]
    fn test_sentinel_and_blank_fall_back_to_content() {
        for s in ["undefined", "null", "   ", ""] {
            let a = article(Some(s), Some("Contenu"));
            assert_eq!(summarize(&a, 200).as_text(), Some("Contenu"));
        }
    }

    #[test]
    fn test_long_content_is_cut_with_suffix() {
        let content = "x".repeat(250);
        let a = article(None, Some(&content));
        let text = summarize(&a, 200).as_text().unwrap().to_string();
        assert_eq!(text.len(), 203);
        assert!(text.ends_with("..."));
    }

    #[test]
    fn test_nothing_available() {
        assert_eq!(summarize(&article(None, None), 200), Summary::Unavailable);
        assert_eq!(summarize(&article(None, Some("")), 200), Summary::Unavailable);
    }
}
