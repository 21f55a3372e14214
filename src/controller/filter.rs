use crate::feed::Article;
use crate::util::MAX_SEARCH_QUERY_LENGTH;

/// Tag value that disables tag filtering.
pub const ALL_TAGS: &str = "all";

/// The active tag + search predicate.
///
/// Search text is stored trimmed and lowercased, so matching never
/// re-normalizes the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    tag: String,
    search: String,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            tag: ALL_TAGS.to_string(),
            search: String::new(),
        }
    }
}

impl Filter {
    pub fn new(tag: &str, search: &str) -> Self {
        let mut filter = Self::default();
        filter.set_tag(tag);
        filter.set_search(search);
        filter
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// An empty tag is treated as `"all"`.
    pub fn set_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        self.tag = if tag.is_empty() {
            ALL_TAGS.to_string()
        } else {
            tag.to_string()
        };
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search
            .trim()
            .chars()
            .take(MAX_SEARCH_QUERY_LENGTH)
            .collect::<String>()
            .to_lowercase();
    }

    pub fn is_active(&self) -> bool {
        self.tag != ALL_TAGS || !self.search.is_empty()
    }

    /// Tag passes on `"all"` or when any article tag contains the filter text.
    fn matches_tag(&self, article: &Article) -> bool {
        self.tag == ALL_TAGS || article.tags.iter().any(|t| t.contains(self.tag.as_str()))
    }

    /// Search passes when empty, or when title, content or summary contains
    /// the query case-insensitively.
    fn matches_search(&self, article: &Article) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.as_str();
        let hit = |text: Option<&str>| text.is_some_and(|t| t.to_lowercase().contains(needle));

        hit(Some(article.title.as_str()))
            || hit(article.content.as_deref())
            || hit(article.summary.as_deref())
    }

    pub fn matches(&self, article: &Article) -> bool {
        self.matches_tag(article) && self.matches_search(article)
    }

    /// Indices into `all` of the matching articles, in original order.
    pub fn matching_indices(&self, all: &[Article]) -> Vec<usize> {
        all.iter()
            .enumerate()
            .filter(|(_, a)| self.matches(a))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Apply `filter` to `all`, preserving relative order.
pub fn apply_filter<'a>(all: &'a [Article], filter: &Filter) -> Vec<&'a Article> {
    all.iter().filter(|a| filter.matches(a)).collect()
}
