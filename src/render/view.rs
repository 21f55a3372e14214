use crate::controller::accordion::indicator;
use crate::feed::Article;

use super::summary::Summary;

/// One article as presented in a list or single view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card<'a> {
    pub article: &'a Article,
    pub summary: Summary<'a>,
    /// Full content block shown instead of the summary block
    pub expanded: bool,
}

impl Card<'_> {
    pub fn indicator(&self) -> char {
        indicator(self.expanded)
    }
}

/// Request to bring a card into view below a fixed page header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollTarget<'a> {
    pub slug: &'a str,
    pub header_offset: u32,
}

/// The current page of cards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView<'a> {
    pub cards: Vec<Card<'a>>,
    /// Cards can be expanded in place (list mode; off for the home preview)
    pub accordion: bool,
    pub scroll_to: Option<ScrollTarget<'a>>,
}

/// Static messages that replace the container content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice<'a> {
    Loading,
    /// Nothing to show after validation or filtering
    NoArticles,
    /// The fetch failed; carries a retry affordance
    LoadFailed { reason: String },
    /// Deep link named an article that is not in the feed
    NotFound { slug: &'a str },
}
