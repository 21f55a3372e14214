use std::num::NonZeroUsize;

/// Element id of the full article list container.
pub const LIST_CONTAINER_ID: &str = "blog-articles";
/// Element id of the home page preview container.
pub const PREVIEW_CONTAINER_ID: &str = "home-articles";
/// Element id of the pagination controls.
pub const PAGINATION_ID: &str = "pagination";

/// Capability check a host answers once at start-up.
pub trait Host {
    /// Returns true if the page has an element with this id.
    fn has_element(&self, id: &str) -> bool;
}

/// Which feed presentation this page supports.
///
/// Selected once from host capabilities; never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    /// Full list with filters, pagination, accordion and deep links.
    List,
    /// Home page preview of the first `count` articles.
    Preview { count: NonZeroUsize },
    /// Nothing to render on this page.
    None,
}

impl PageMode {
    /// List mode wins when both containers exist.
    pub fn select(host: &impl Host, preview_count: NonZeroUsize) -> Self {
        if host.has_element(LIST_CONTAINER_ID) {
            Self::List
        } else if host.has_element(PREVIEW_CONTAINER_ID) {
            Self::Preview {
                count: preview_count,
            }
        } else {
            Self::None
        }
    }

    /// Id of the container this mode renders into.
    pub fn container_id(&self) -> Option<&'static str> {
        match self {
            Self::List => Some(LIST_CONTAINER_ID),
            Self::Preview { .. } => Some(PREVIEW_CONTAINER_ID),
            Self::None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ids(&'static [&'static str]);

    impl Host for Ids {
        fn has_element(&self, id: &str) -> bool {
            self.0.iter().any(|known| *known == id)
        }
    }

    fn three() -> NonZeroUsize {
        NonZeroUsize::new(3).unwrap()
    }

    #[test]
    fn test_list_container_selects_list() {
        assert_eq!(
            PageMode::select(&Ids(&["blog-articles", "pagination"]), three()),
            PageMode::List
        );
    }

    #[test]
    fn test_preview_container_selects_preview() {
        assert_eq!(
            PageMode::select(&Ids(&["home-articles"]), three()),
            PageMode::Preview { count: three() }
        );
    }

    #[test]
    fn test_list_wins_over_preview() {
        assert_eq!(
            PageMode::select(&Ids(&["home-articles", "blog-articles"]), three()),
            PageMode::List
        );
    }

    #[test]
    fn test_no_container_selects_none() {
        let mode = PageMode::select(&Ids(&["header"]), three());
        assert_eq!(mode, PageMode::None);
        assert_eq!(mode.container_id(), None);
    }
}
