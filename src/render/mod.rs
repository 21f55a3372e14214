//! Rendering port and the views the controller renders through it.
//!
//! The controller never touches a page or terminal directly. It builds views
//! ([`ListView`], [`Card`], [`Notice`], [`Pagination`]) and hands them to a
//! [`RenderPort`]. Each host implements the port and owns escaping for its
//! medium:
//!
//! - [`html::HtmlPort`] escapes text as HTML entities and produces markup
//! - the terminal browser strips control characters and draws with ratatui
//!
//! Every render call replaces the previous content of its target entirely.

pub mod html;
pub mod messages;
mod summary;
mod view;

pub use summary::{summarize, Summary, DEFAULT_EXCERPT_CHARS, SUMMARY_SENTINELS};
pub use view::{Card, ListView, Notice, ScrollTarget};

pub use crate::controller::paginate::Pagination;

/// Host-side sink for feed views.
pub trait RenderPort {
    /// Replace the container with a page of cards.
    fn render_list(&mut self, list: &ListView<'_>);

    /// Replace the container with one article and a link back to the list.
    fn render_single(&mut self, card: &Card<'_>);

    /// Replace the container with a static message.
    fn render_notice(&mut self, notice: &Notice<'_>);

    /// Update the pagination controls; `None` hides them.
    fn render_pagination(&mut self, pagination: Option<&Pagination>);
}
