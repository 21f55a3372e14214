/// Indicator glyph for a collapsed card.
pub const COLLAPSED_GLYPH: char = '+';
/// Indicator glyph for an expanded card.
pub const EXPANDED_GLYPH: char = '−';

/// Inline expand/collapse state: at most one article is open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accordion {
    expanded: Option<String>,
}

impl Accordion {
    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn is_expanded(&self, slug: &str) -> bool {
        self.expanded.as_deref() == Some(slug)
    }

    /// Open `slug`, closing whichever article was open.
    pub fn expand(&mut self, slug: &str) {
        self.expanded = Some(slug.to_string());
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    /// Toggle `slug`. Returns true if it is now expanded.
    pub fn toggle(&mut self, slug: &str) -> bool {
        if self.is_expanded(slug) {
            self.collapse();
            false
        } else {
            self.expand(slug);
            true
        }
    }
}

/// Glyph shown next to a card title.
pub fn indicator(expanded: bool) -> char {
    if expanded {
        EXPANDED_GLYPH
    } else {
        COLLAPSED_GLYPH
    }
}
