use std::borrow::Cow;
use std::sync::Arc;

use blogfeed::controller::paginate::Pagination;
use blogfeed::controller::{FeedController, LoadStatus};
use blogfeed::feed::{FetchError, Fetcher, ParseResult};
use blogfeed::render::{messages, Card, ListView, Notice, RenderPort};
use blogfeed::util::{deep_link, strip_control_chars};
use tokio::sync::mpsc;
use tokio::time::Instant;
use url::Url;

// ============================================================================
// Event Types
// ============================================================================

/// Events sent from background tasks to the main loop.
#[derive(Debug)]
pub enum AppEvent {
    /// The article fetch finished.
    ArticlesLoaded(Result<ParseResult, FetchError>),
}

// ============================================================================
// Terminal Render Port
// ============================================================================

/// One article card, with terminal-safe text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub slug: String,
    pub title: String,
    pub date: Option<String>,
    pub tags: Vec<String>,
    /// Summary line(s), or the placeholder when none is available
    pub summary: String,
    /// Full content, present when the card is expanded
    pub body: Option<String>,
    pub indicator: Option<char>,
}

impl CardView {
    fn from_card(card: &Card<'_>, accordion: bool) -> Self {
        let article = card.article;
        let clean = |s: &str| strip_control_chars(s).into_owned();
        let summary = card
            .summary
            .as_text()
            .unwrap_or(messages::SUMMARY_UNAVAILABLE);
        let body = card
            .expanded
            .then(|| article.content().unwrap_or(summary))
            .map(clean);

        Self {
            slug: article.slug.clone(),
            title: clean(&article.title),
            date: article.date.as_deref().map(clean),
            tags: article.tags.iter().map(|t| clean(t)).collect(),
            summary: clean(summary),
            body,
            indicator: accordion.then(|| card.indicator()),
        }
    }
}

/// What the main panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Notice { text: String, retry: bool },
    List { cards: Vec<CardView> },
    Single(CardView),
}

impl Default for Body {
    fn default() -> Self {
        Self::Notice {
            text: messages::LOADING.to_string(),
            retry: false,
        }
    }
}

/// Snapshot of the last controller render, owned so it outlives the borrow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Screen {
    pub body: Body,
    pub pagination: Option<Pagination>,
    /// Card the controller asked to bring into view
    pub scroll_to: Option<String>,
}

impl RenderPort for Screen {
    fn render_list(&mut self, list: &ListView<'_>) {
        self.body = Body::List {
            cards: list
                .cards
                .iter()
                .map(|c| CardView::from_card(c, list.accordion))
                .collect(),
        };
        self.scroll_to = list.scroll_to.map(|t| t.slug.to_string());
    }

    fn render_single(&mut self, card: &Card<'_>) {
        self.body = Body::Single(CardView::from_card(card, false));
        self.scroll_to = None;
    }

    fn render_notice(&mut self, notice: &Notice<'_>) {
        let (text, retry) = match notice {
            Notice::Loading => (messages::LOADING.to_string(), false),
            Notice::NoArticles => (messages::NO_ARTICLES.to_string(), false),
            Notice::LoadFailed { .. } => (messages::LOAD_FAILED.to_string(), true),
            Notice::NotFound { slug } => (messages::not_found(slug), false),
        };
        self.body = Body::Notice { text, retry };
        self.scroll_to = None;
    }

    fn render_pagination(&mut self, pagination: Option<&Pagination>) {
        self.pagination = pagination.copied();
    }
}

// ============================================================================
// Application State
// ============================================================================

pub struct App {
    pub controller: FeedController,
    fetcher: Arc<Fetcher>,
    /// Site root deep links are built from
    site: Url,
    pub screen: Screen,
    /// Selected card on the current page
    pub selected: usize,
    pub search_mode: bool,
    pub search_input: String,
    pub status_message: Option<(Cow<'static, str>, Instant)>,
    pub needs_redraw: bool,
}

impl App {
    pub fn new(controller: FeedController, fetcher: Fetcher, site: Option<Url>) -> Self {
        let site = site
            .or_else(|| fetcher.endpoint().join("/").ok())
            .unwrap_or_else(|| fetcher.endpoint().clone());
        let mut app = Self {
            controller,
            fetcher: Arc::new(fetcher),
            site,
            screen: Screen::default(),
            selected: 0,
            search_mode: false,
            search_input: String::new(),
            status_message: None,
            needs_redraw: true,
        };
        app.refresh_screen();
        app
    }

    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed().as_secs() >= 3 {
                self.status_message = None;
                return true;
            }
        }
        false
    }

    /// Re-render the controller into the screen snapshot and fix up the
    /// selection.
    pub fn refresh_screen(&mut self) {
        let mut screen = Screen::default();
        self.controller.render(&mut screen);

        if let (Some(slug), Body::List { cards }) = (&screen.scroll_to, &screen.body) {
            if let Some(index) = cards.iter().position(|c| &c.slug == slug) {
                self.selected = index;
            }
        }
        self.selected = self.selected.min(self.card_count(&screen).saturating_sub(1));
        self.screen = screen;
        self.needs_redraw = true;
    }

    fn card_count(&self, screen: &Screen) -> usize {
        match &screen.body {
            Body::List { cards } => cards.len(),
            _ => 0,
        }
    }

    pub fn selected_card(&self) -> Option<&CardView> {
        match &self.screen.body {
            Body::List { cards } => cards.get(self.selected),
            Body::Single(card) => Some(card),
            Body::Notice { .. } => None,
        }
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Spawn the article fetch unless one is already in flight.
    pub fn start_load(&mut self, event_tx: &mpsc::Sender<AppEvent>) {
        if !self.controller.begin_load() {
            return;
        }
        self.refresh_screen();

        let fetcher = Arc::clone(&self.fetcher);
        let tx = event_tx.clone();
        tracing::debug!(endpoint = %fetcher.endpoint(), "Spawning article fetch");

        tokio::spawn(async move {
            let result = fetcher.fetch_articles().await;
            if let Err(e) = tx.send(AppEvent::ArticlesLoaded(result)).await {
                tracing::warn!(error = %e, "Failed to send fetch result (receiver dropped)");
            }
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::ArticlesLoaded(result) => {
                let skipped = result.as_ref().map(|r| r.skipped).unwrap_or(0);
                self.controller.finish_load(result);
                self.selected = 0;
                if matches!(self.controller.status(), LoadStatus::Failed(_)) {
                    self.set_status("[r] pour réessayer");
                } else if skipped > 0 {
                    self.set_status(format!("{} article(s) invalide(s) ignoré(s)", skipped));
                }
                self.refresh_screen();
            }
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn nav_down(&mut self) {
        let count = self.card_count(&self.screen);
        if self.selected + 1 < count {
            self.selected += 1;
        }
    }

    pub fn nav_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn toggle_selected(&mut self) {
        let Some(slug) = self.selected_card().map(|c| c.slug.clone()) else {
            return;
        };
        if matches!(self.screen.body, Body::Single(_)) {
            return;
        }
        self.controller.toggle(&slug);
        self.refresh_screen();
    }

    pub fn next_page(&mut self) {
        if self.controller.next_page() {
            self.selected = 0;
            self.refresh_screen();
        }
    }

    pub fn previous_page(&mut self) {
        if self.controller.previous_page() {
            self.selected = 0;
            self.refresh_screen();
        }
    }

    /// Leave a single or not-found deep-link view.
    pub fn back(&mut self) -> bool {
        if !self.controller.is_deep_link_view() {
            return false;
        }
        self.controller.back_to_list();
        self.selected = 0;
        self.refresh_screen();
        true
    }

    // ------------------------------------------------------------------
    // Filters
    // ------------------------------------------------------------------

    /// Advance the tag filter: all, then each tag in order of appearance.
    pub fn cycle_tag(&mut self) {
        let next = {
            let tags = self.controller.tags();
            let current = self.controller.filter().tag();
            match tags.iter().position(|t| *t == current) {
                Some(i) if i + 1 < tags.len() => tags[i + 1].to_string(),
                Some(_) => String::new(),
                None => tags.first().map(|t| t.to_string()).unwrap_or_default(),
            }
        };
        self.controller.set_tag(&next);
        self.selected = 0;
        self.refresh_screen();
        let label = if next.is_empty() { "all" } else { next.as_str() };
        self.set_status(format!("Tag : {}", label));
    }

    pub fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_input = self.controller.filter().search().to_string();
    }

    pub fn apply_search(&mut self) {
        self.search_mode = false;
        let query = std::mem::take(&mut self.search_input);
        self.controller.set_search(&query);
        self.selected = 0;
        self.refresh_screen();
    }

    pub fn cancel_search(&mut self) {
        self.search_mode = false;
        self.search_input.clear();
    }

    /// Deep-link address of the selected article.
    pub fn selected_link(&self) -> Option<Url> {
        self.selected_card().map(|c| deep_link(&self.site, &c.slug))
    }
}
