//! The article feed controller.
//!
//! [`FeedController`] owns the feed state (validated articles, active filter,
//! page cursor, accordion and deep-link state) and renders it through a
//! [`RenderPort`]. Filtering and pagination are pure functions in
//! [`filter`] and [`paginate`]; the controller only sequences them.
//!
//! Loading is split so the controller stays synchronous: the host calls
//! [`FeedController::begin_load`], awaits a [`Fetcher`](crate::feed::Fetcher),
//! and hands the result to [`FeedController::finish_load`]. A failed load
//! never escapes to the host; it becomes an error notice with a retry
//! affordance and an empty working set.

pub mod accordion;
pub mod deeplink;
pub mod filter;
pub mod mode;
pub mod paginate;

use std::num::NonZeroUsize;

use crate::feed::{Article, FetchError, ParseResult};
use crate::render::{
    summarize, Card, ListView, Notice, RenderPort, ScrollTarget, DEFAULT_EXCERPT_CHARS,
};

use accordion::Accordion;
use deeplink::{resolve, DeepLinkMode};
use filter::Filter;
use mode::PageMode;
use paginate::{page, total_pages, Pagination};

/// Presentation settings, usually derived from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSettings {
    pub page_size: NonZeroUsize,
    /// Length of content excerpts used when an article has no summary
    pub excerpt_chars: usize,
    pub deep_link_mode: DeepLinkMode,
    /// Fixed header height to clear when scrolling to a deep-linked card
    pub header_offset: u32,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            page_size: NonZeroUsize::new(12).unwrap_or(NonZeroUsize::MIN),
            excerpt_chars: DEFAULT_EXCERPT_CHARS,
            deep_link_mode: DeepLinkMode::Expand,
            header_offset: 80,
        }
    }
}

/// Where the article list is in its load lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Deep-link outcome that overrides the normal list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DeepLinkView {
    Off,
    Single(String),
    NotFound(String),
}

impl DeepLinkView {
    fn slug(&self) -> Option<&str> {
        match self {
            Self::Off => None,
            Self::Single(slug) | Self::NotFound(slug) => Some(slug.as_str()),
        }
    }
}

/// Mutable feed state. `filtered` holds indices into `all`, so it is a
/// subsequence of `all` by construction.
#[derive(Debug, Default)]
struct FeedState {
    all: Vec<Article>,
    filtered: Vec<usize>,
    current_page: usize,
    filter: Filter,
}

impl FeedState {
    fn refilter(&mut self) {
        self.filtered = self.filter.matching_indices(&self.all);
        self.current_page = 1;
    }
}

/// Single owner of the feed state for one page or terminal session.
#[derive(Debug)]
pub struct FeedController {
    settings: FeedSettings,
    mode: PageMode,
    state: FeedState,
    status: LoadStatus,
    accordion: Accordion,
    pending_slug: Option<String>,
    deep_link: DeepLinkView,
    scroll_to: Option<String>,
}

impl FeedController {
    pub fn new(settings: FeedSettings, mode: PageMode) -> Self {
        Self {
            settings,
            mode,
            state: FeedState {
                current_page: 1,
                ..FeedState::default()
            },
            status: LoadStatus::Idle,
            accordion: Accordion::default(),
            pending_slug: None,
            deep_link: DeepLinkView::Off,
            scroll_to: None,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    pub fn settings(&self) -> &FeedSettings {
        &self.settings
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn filter(&self) -> &Filter {
        &self.state.filter
    }

    pub fn accordion(&self) -> &Accordion {
        &self.accordion
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    /// Every validated article, in response order.
    pub fn articles(&self) -> &[Article] {
        &self.state.all
    }

    /// Articles passing the active filter, in original order.
    pub fn filtered(&self) -> impl Iterator<Item = &Article> + '_ {
        self.state.filtered.iter().map(|&i| &self.state.all[i])
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.state.filtered.len(), self.settings.page_size)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.state.current_page, self.total_pages())
    }

    /// Articles on the current page.
    pub fn page_articles(&self) -> Vec<&Article> {
        page(&self.state.filtered, self.settings.page_size, self.state.current_page)
            .iter()
            .map(|&i| &self.state.all[i])
            .collect()
    }

    /// Distinct tags in order of first appearance.
    pub fn tags(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tag in self.state.all.iter().flat_map(|a| a.tags.iter()) {
            if !seen.contains(&tag.as_str()) {
                seen.push(tag);
            }
        }
        seen
    }

    /// True while a deep link replaces the list (single view or not found).
    pub fn is_deep_link_view(&self) -> bool {
        self.deep_link != DeepLinkView::Off
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Mark a load as started. Returns false when one is already in flight,
    /// in which case the caller must not start another fetch.
    pub fn begin_load(&mut self) -> bool {
        if self.mode == PageMode::None {
            tracing::debug!("No feed container on this page, skipping load");
            return false;
        }
        if self.status == LoadStatus::Loading {
            tracing::debug!("Load already in flight, ignoring request");
            return false;
        }
        self.status = LoadStatus::Loading;
        true
    }

    /// Install the result of a fetch.
    ///
    /// On success the working set is replaced, the filter re-applied and any
    /// pending deep link resolved against the new articles. A deep-link view
    /// open during a reload is resolved again the same way. On failure the
    /// working set is emptied and the deep link is kept for the next attempt.
    pub fn finish_load(&mut self, result: Result<ParseResult, FetchError>) {
        if let Some(slug) = self.deep_link.slug() {
            self.pending_slug.get_or_insert_with(|| slug.to_string());
        }
        self.deep_link = DeepLinkView::Off;

        match result {
            Ok(parsed) => {
                self.state.all = parsed.articles;
                self.state.refilter();
                self.status = LoadStatus::Loaded;
                if let Some(slug) = self.pending_slug.take() {
                    self.apply_deep_link(slug);
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load articles");
                self.state.all.clear();
                self.state.filtered.clear();
                self.state.current_page = 1;
                self.status = LoadStatus::Failed(e.to_string());
            }
        }
    }

    // ------------------------------------------------------------------
    // Deep links
    // ------------------------------------------------------------------

    /// Request a deep link to `slug` (already sanitized).
    ///
    /// Applied immediately when articles are loaded, otherwise on the next
    /// successful load. Ignored outside list mode.
    pub fn open_deep_link(&mut self, slug: String) {
        if self.mode != PageMode::List {
            return;
        }
        if self.status == LoadStatus::Loaded {
            self.apply_deep_link(slug);
        } else {
            self.pending_slug = Some(slug);
        }
    }

    fn apply_deep_link(&mut self, slug: String) {
        let Some((index, _)) = resolve(&self.state.all, &slug) else {
            tracing::info!(slug = %slug, "Deep-linked article not found");
            self.deep_link = DeepLinkView::NotFound(slug);
            return;
        };

        match self.settings.deep_link_mode {
            DeepLinkMode::Single => {
                self.deep_link = DeepLinkView::Single(slug);
            }
            DeepLinkMode::Expand => {
                self.state.filter = Filter::default();
                self.state.refilter();
                // With no filter active, filtered == 0..all.len()
                self.state.current_page = index / self.settings.page_size.get() + 1;
                self.accordion.expand(&slug);
                self.deep_link = DeepLinkView::Off;
                self.scroll_to = Some(slug);
            }
        }
    }

    /// Leave the single-article or not-found view.
    pub fn back_to_list(&mut self) {
        self.deep_link = DeepLinkView::Off;
        self.scroll_to = None;
    }

    // ------------------------------------------------------------------
    // Filter, pagination and accordion actions
    // ------------------------------------------------------------------

    pub fn set_tag(&mut self, tag: &str) {
        self.state.filter.set_tag(tag);
        self.after_filter_change();
    }

    pub fn set_search(&mut self, search: &str) {
        self.state.filter.set_search(search);
        self.after_filter_change();
    }

    pub fn set_filter(&mut self, tag: &str, search: &str) {
        self.state.filter = Filter::new(tag, search);
        self.after_filter_change();
    }

    fn after_filter_change(&mut self) {
        self.state.refilter();
        self.back_to_list();
        tracing::debug!(
            tag = %self.state.filter.tag(),
            search = %self.state.filter.search(),
            matches = self.state.filtered.len(),
            "Filter applied"
        );
    }

    /// Move to page `n`, clamped to `1..=total_pages`.
    pub fn go_to_page(&mut self, n: usize) {
        self.state.current_page = n.clamp(1, self.total_pages());
        self.scroll_to = None;
    }

    /// Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.pagination().has_next() {
            return false;
        }
        self.go_to_page(self.state.current_page + 1);
        true
    }

    /// Returns false when already on the first page.
    pub fn previous_page(&mut self) -> bool {
        if !self.pagination().has_previous() {
            return false;
        }
        self.go_to_page(self.state.current_page - 1);
        true
    }

    /// Toggle the accordion on `slug`. Returns true if it is now expanded.
    pub fn toggle(&mut self, slug: &str) -> bool {
        self.scroll_to = None;
        self.accordion.toggle(slug)
    }

    // ------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------

    fn card<'a>(&'a self, article: &'a Article, expanded: bool) -> Card<'a> {
        Card {
            article,
            summary: summarize(article, self.settings.excerpt_chars),
            expanded,
        }
    }

    /// Render the current state through `port`.
    ///
    /// Always replaces the container content and updates (or hides) the
    /// pagination controls. A page with no feed container renders nothing.
    pub fn render(&self, port: &mut impl RenderPort) {
        let count = match self.mode {
            PageMode::None => return,
            PageMode::Preview { count } => Some(count.get()),
            PageMode::List => None,
        };

        match &self.status {
            LoadStatus::Idle | LoadStatus::Loading => {
                port.render_notice(&Notice::Loading);
                port.render_pagination(None);
                return;
            }
            LoadStatus::Failed(reason) => {
                port.render_notice(&Notice::LoadFailed {
                    reason: reason.clone(),
                });
                port.render_pagination(None);
                return;
            }
            LoadStatus::Loaded => {}
        }

        if let Some(count) = count {
            self.render_preview(port, count);
            return;
        }

        match &self.deep_link {
            DeepLinkView::NotFound(slug) => {
                port.render_notice(&Notice::NotFound {
                    slug: slug.as_str(),
                });
                port.render_pagination(None);
            }
            DeepLinkView::Single(slug) => {
                match resolve(&self.state.all, slug) {
                    Some((_, article)) => port.render_single(&self.card(article, true)),
                    None => port.render_notice(&Notice::NotFound {
                        slug: slug.as_str(),
                    }),
                }
                port.render_pagination(None);
            }
            DeepLinkView::Off => self.render_list(port),
        }
    }

    fn render_preview(&self, port: &mut impl RenderPort, count: usize) {
        if self.state.all.is_empty() {
            port.render_notice(&Notice::NoArticles);
        } else {
            let cards = self
                .state
                .all
                .iter()
                .take(count)
                .map(|a| self.card(a, false))
                .collect();
            port.render_list(&ListView {
                cards,
                accordion: false,
                scroll_to: None,
            });
        }
        port.render_pagination(None);
    }

    fn render_list(&self, port: &mut impl RenderPort) {
        let articles = self.page_articles();
        if articles.is_empty() {
            port.render_notice(&Notice::NoArticles);
            port.render_pagination(None);
            return;
        }

        let cards = articles
            .into_iter()
            .map(|a| self.card(a, self.accordion.is_expanded(&a.slug)))
            .collect();
        let scroll_to = self.scroll_to.as_deref().map(|slug| ScrollTarget {
            slug,
            header_offset: self.settings.header_offset,
        });

        port.render_list(&ListView {
            cards,
            accordion: true,
            scroll_to,
        });

        let pagination = self.pagination();
        port.render_pagination(pagination.is_visible().then_some(&pagination));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Records what the controller rendered, in a host-independent form.
    #[derive(Default)]
    struct Recorder {
        body: Vec<String>,
        notice: Option<String>,
        single: Option<String>,
        pagination: Option<Pagination>,
        expanded: Vec<String>,
        scroll: Option<(String, u32)>,
    }

    impl RenderPort for Recorder {
        fn render_list(&mut self, list: &ListView<'_>) {
            self.notice = None;
            self.single = None;
            self.body = list.cards.iter().map(|c| c.article.slug.clone()).collect();
            self.expanded = list
                .cards
                .iter()
                .filter(|c| c.expanded)
                .map(|c| c.article.slug.clone())
                .collect();
            self.scroll = list
                .scroll_to
                .map(|t| (t.slug.to_string(), t.header_offset));
        }

        fn render_single(&mut self, card: &Card<'_>) {
            self.body.clear();
            self.notice = None;
            self.single = Some(card.article.slug.clone());
        }

        fn render_notice(&mut self, notice: &Notice<'_>) {
            self.body.clear();
            self.single = None;
            self.notice = Some(format!("{:?}", notice));
        }

        fn render_pagination(&mut self, pagination: Option<&Pagination>) {
            self.pagination = pagination.copied();
        }
    }

    fn article(i: usize, tags: &[&str]) -> Article {
        Article {
            title: format!("Article {i}"),
            slug: format!("a{i}"),
            content: Some(format!("Contenu {i}")),
            summary: None,
            date: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn loaded(n: usize, settings: FeedSettings) -> FeedController {
        let mut c = FeedController::new(settings, PageMode::List);
        assert!(c.begin_load());
        c.finish_load(Ok(ParseResult {
            articles: (0..n).map(|i| article(i, &[])).collect(),
            skipped: 0,
        }));
        c
    }

    fn render(c: &FeedController) -> Recorder {
        let mut r = Recorder::default();
        c.render(&mut r);
        r
    }

    #[test]
    fn test_thirteen_articles_two_pages() {
        let mut c = loaded(13, FeedSettings::default());

        let r = render(&c);
        assert_eq!(r.body.len(), 12);
        let p = r.pagination.unwrap();
        assert_eq!((p.current, p.total), (1, 2));
        assert!(!p.has_previous());

        assert!(c.next_page());
        let r = render(&c);
        assert_eq!(r.body, vec!["a12"]);
        assert!(!r.pagination.unwrap().has_next());
        assert!(!c.next_page());
    }

    #[test]
    fn test_zero_articles_shows_no_articles_and_hides_pagination() {
        let c = loaded(0, FeedSettings::default());
        let r = render(&c);
        assert_eq!(r.notice.as_deref(), Some("NoArticles"));
        assert!(r.pagination.is_none());
    }

    #[test]
    fn test_before_load_shows_loading() {
        let c = FeedController::new(FeedSettings::default(), PageMode::List);
        assert_eq!(render(&c).notice.as_deref(), Some("Loading"));
    }

    #[test]
    fn test_failed_load_empties_feed_and_offers_retry() {
        let mut c = loaded(3, FeedSettings::default());
        assert!(c.begin_load());
        c.finish_load(Err(FetchError::HttpStatus(503)));

        assert!(c.articles().is_empty());
        assert!(matches!(c.status(), LoadStatus::Failed(_)));
        let r = render(&c);
        assert!(r.notice.unwrap().starts_with("LoadFailed"));
        assert!(r.pagination.is_none());

        // Retry is allowed after a failure
        assert!(c.begin_load());
    }

    #[test]
    fn test_second_load_refused_while_in_flight() {
        let mut c = FeedController::new(FeedSettings::default(), PageMode::List);
        assert!(c.begin_load());
        assert!(!c.begin_load());
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut c = loaded(30, FeedSettings::default());
        c.go_to_page(3);
        assert_eq!(c.current_page(), 3);
        c.set_search("article");
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn test_go_to_page_clamps() {
        let mut c = loaded(13, FeedSettings::default());
        c.go_to_page(99);
        assert_eq!(c.current_page(), 2);
        c.go_to_page(0);
        assert_eq!(c.current_page(), 1);
    }

    #[test]
    fn test_tag_filter_substring() {
        let mut c = FeedController::new(FeedSettings::default(), PageMode::List);
        c.begin_load();
        c.finish_load(Ok(ParseResult {
            articles: vec![article(0, &["rust-lang"]), article(1, &["web"])],
            skipped: 0,
        }));
        c.set_tag("rust");
        assert_eq!(render(&c).body, vec!["a0"]);
        assert_eq!(c.tags(), vec!["rust-lang", "web"]);
    }

    #[test]
    fn test_accordion_one_open_at_a_time() {
        let mut c = loaded(3, FeedSettings::default());
        assert!(c.toggle("a0"));
        assert!(c.toggle("a2"));
        assert_eq!(render(&c).expanded, vec!["a2"]);
        assert!(!c.toggle("a2"));
        assert!(render(&c).expanded.is_empty());
    }

    #[test]
    fn test_deep_link_expand_moves_to_page_and_scrolls() {
        let mut c = FeedController::new(FeedSettings::default(), PageMode::List);
        c.open_deep_link("a20".to_string());
        c.begin_load();
        c.finish_load(Ok(ParseResult {
            articles: (0..30).map(|i| article(i, &[])).collect(),
            skipped: 0,
        }));

        assert_eq!(c.current_page(), 2);
        let r = render(&c);
        assert_eq!(r.expanded, vec!["a20"]);
        assert_eq!(r.scroll, Some(("a20".to_string(), 80)));

        // Scrolling is a one-shot request
        c.toggle("a21");
        assert_eq!(render(&c).scroll, None);
    }

    #[test]
    fn test_deep_link_expand_clears_filter() {
        let mut c = loaded(5, FeedSettings::default());
        c.set_search("zzz");
        c.open_deep_link("a3".to_string());
        assert!(!c.filter().is_active());
        assert_eq!(render(&c).expanded, vec!["a3"]);
    }

    #[test]
    fn test_deep_link_single_mode() {
        let settings = FeedSettings {
            deep_link_mode: DeepLinkMode::Single,
            ..FeedSettings::default()
        };
        let mut c = loaded(5, settings);
        c.open_deep_link("a4".to_string());
        let r = render(&c);
        assert_eq!(r.single.as_deref(), Some("a4"));
        assert!(r.body.is_empty());
        assert!(r.pagination.is_none());

        c.back_to_list();
        assert_eq!(render(&c).body.len(), 5);
    }

    fn reload(c: &mut FeedController, slugs: &[usize]) {
        assert!(c.begin_load());
        c.finish_load(Ok(ParseResult {
            articles: slugs.iter().map(|&i| article(i, &[])).collect(),
            skipped: 0,
        }));
    }

    fn single_mode() -> FeedSettings {
        FeedSettings {
            deep_link_mode: DeepLinkMode::Single,
            ..FeedSettings::default()
        }
    }

    #[test]
    fn test_single_view_survives_shorter_reload() {
        let mut c = loaded(5, single_mode());
        c.open_deep_link("a4".to_string());
        reload(&mut c, &[0, 1]);

        let r = render(&c);
        assert!(r.single.is_none());
        assert_eq!(r.notice.as_deref(), Some(r#"NotFound { slug: "a4" }"#));
    }

    #[test]
    fn test_single_view_follows_slug_after_reorder() {
        let mut c = loaded(3, single_mode());
        c.open_deep_link("a1".to_string());
        reload(&mut c, &[9, 8, 1]);

        assert_eq!(render(&c).single.as_deref(), Some("a1"));
    }

    #[test]
    fn test_not_found_resolves_after_reload() {
        let mut c = loaded(2, single_mode());
        c.open_deep_link("a7".to_string());
        assert!(render(&c).notice.unwrap().starts_with("NotFound"));

        reload(&mut c, &[5, 6, 7]);
        assert_eq!(render(&c).single.as_deref(), Some("a7"));
    }

    #[test]
    fn test_deep_link_kept_across_failed_reload() {
        let mut c = loaded(3, single_mode());
        c.open_deep_link("a2".to_string());
        assert!(c.begin_load());
        c.finish_load(Err(FetchError::HttpStatus(503)));
        assert!(!c.is_deep_link_view());

        reload(&mut c, &[0, 1, 2]);
        assert_eq!(render(&c).single.as_deref(), Some("a2"));
    }

    #[test]
    fn test_back_to_list_is_not_undone_by_reload() {
        let mut c = loaded(3, single_mode());
        c.open_deep_link("a2".to_string());
        c.back_to_list();
        reload(&mut c, &[0, 1, 2]);
        assert!(!c.is_deep_link_view());
        assert_eq!(render(&c).body.len(), 3);
    }

    #[test]
    fn test_deep_link_not_found_renders_no_article() {
        let mut c = loaded(5, FeedSettings::default());
        c.open_deep_link("absent".to_string());
        let r = render(&c);
        assert_eq!(r.notice.as_deref(), Some(r#"NotFound { slug: "absent" }"#));
        assert!(r.body.is_empty());
        assert!(r.single.is_none());
    }

    #[test]
    fn test_preview_mode_first_three_without_pagination() {
        let mut c = FeedController::new(
            FeedSettings::default(),
            PageMode::Preview {
                count: NonZeroUsize::new(3).unwrap(),
            },
        );
        c.begin_load();
        c.finish_load(Ok(ParseResult {
            articles: (0..20).map(|i| article(i, &[])).collect(),
            skipped: 0,
        }));
        let r = render(&c);
        assert_eq!(r.body, vec!["a0", "a1", "a2"]);
        assert!(r.pagination.is_none());
    }

    #[test]
    fn test_mode_none_renders_nothing_and_skips_load() {
        let mut c = FeedController::new(FeedSettings::default(), PageMode::None);
        assert!(!c.begin_load());
        let r = render(&c);
        assert!(r.notice.is_none());
        assert!(r.body.is_empty());
    }
}
