//! Page templates for the `render` command.
//!
//! A template is an HTML page containing the feed containers
//! (`blog-articles` or `home-articles`) and optionally a `pagination`
//! element. Rendering replaces the inner content of those elements and
//! leaves the rest of the page byte-for-byte untouched.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::controller::mode::{Host, PageMode, PAGINATION_ID};
use crate::render::html::HtmlPort;

/// Templates larger than this are rejected.
const MAX_TEMPLATE_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template {path} is too large ({size} bytes, max {max})")]
    TooLarge { path: PathBuf, size: u64, max: u64 },
}

/// Byte offsets of one element's inner content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct InnerSpan {
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTemplate {
    source: String,
}

impl PageTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let metadata = std::fs::metadata(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.len() > MAX_TEMPLATE_SIZE {
            return Err(TemplateError::TooLarge {
                path: path.to_path_buf(),
                size: metadata.len(),
                max: MAX_TEMPLATE_SIZE,
            });
        }

        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(source))
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn into_string(self) -> String {
        self.source
    }

    /// Replace the inner content of the element with the given id.
    ///
    /// Returns `false` and leaves the page unchanged when no such element
    /// exists or it has no closing tag.
    pub fn replace_inner(&mut self, id: &str, html: &str) -> bool {
        match self.inner_span(id) {
            Some(span) => {
                self.source.replace_range(span.start..span.end, html);
                true
            }
            None => {
                tracing::debug!(id, "Template element not found, skipping");
                false
            }
        }
    }

    /// Write rendered markup into the container for `mode` and the
    /// pagination element. Hidden pagination empties the element.
    pub fn fill(&mut self, mode: PageMode, port: &HtmlPort) {
        let Some(id) = mode.container_id() else {
            return;
        };
        self.replace_inner(id, port.container_html());
        self.replace_inner(PAGINATION_ID, port.pagination_html().unwrap_or(""));
    }

    /// Locate the element with `id` in the parsed page and return the byte
    /// range of its content, between the end of the opening tag and the
    /// start of the closing tag.
    fn inner_span(&self, id: &str) -> Option<InnerSpan> {
        let dom = tl::parse(&self.source, tl::ParserOptions::default().track_ids()).ok()?;
        let parser = dom.parser();
        let tag = dom.get_element_by_id(id)?.get(parser)?.as_tag()?;

        let name = tag.name().as_bytes();
        let raw = tag.raw().as_bytes();
        let offset = (raw.as_ptr() as usize).checked_sub(self.source.as_ptr() as usize)?;
        if offset + raw.len() > self.source.len() {
            return None;
        }

        let open_end = opening_tag_end(raw)?;
        if raw[open_end - 1] == b'/' {
            // Self-closing, nothing to fill
            return None;
        }
        let close_start = closing_tag_start(raw, name)?;
        if close_start <= open_end {
            return None;
        }
        Some(InnerSpan {
            start: offset + open_end + 1,
            end: offset + close_start,
        })
    }
}

/// Index of the `>` closing the opening tag, skipping quoted attribute values.
fn opening_tag_end(raw: &[u8]) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in raw.iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'>') => return Some(i),
            (None, _) => {}
        }
    }
    None
}

/// Index of the `</name>` ending the element source, if it is closed.
fn closing_tag_start(raw: &[u8], name: &[u8]) -> Option<usize> {
    let lt = raw.windows(2).rposition(|w| w == b"</")?;
    let tail = raw[lt + 2..].strip_suffix(b">")?.trim_ascii_end();
    tail.eq_ignore_ascii_case(name).then_some(lt)
}

impl Host for PageTemplate {
    fn has_element(&self, id: &str) -> bool {
        tl::parse(&self.source, tl::ParserOptions::default().track_ids())
            .is_ok_and(|dom| dom.get_element_by_id(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_has_element() {
        let page = PageTemplate::new(r#"<main><div id="blog-articles"></div></main>"#);
        assert!(page.has_element("blog-articles"));
        assert!(!page.has_element("home-articles"));
    }

    #[test]
    fn test_data_attribute_is_not_an_id() {
        let page = PageTemplate::new(r#"<div data-id="pagination"></div>"#);
        assert!(!page.has_element("pagination"));
    }

    #[test]
    fn test_replace_inner_keeps_surroundings() {
        let mut page = PageTemplate::new(
            "<body>\n<div class=\"grid\" id=\"blog-articles\">old</div>\n<footer></footer>\n</body>",
        );
        assert!(page.replace_inner("blog-articles", "<p>new</p>"));
        assert_eq!(
            page.as_str(),
            "<body>\n<div class=\"grid\" id=\"blog-articles\"><p>new</p></div>\n<footer></footer>\n</body>"
        );
    }

    #[test]
    fn test_replace_inner_with_nested_same_tag() {
        let mut page = PageTemplate::new(
            "<div id='home-articles'><div class=\"placeholder\"><div></div></div></div><div id=\"after\"></div>",
        );
        assert!(page.replace_inner("home-articles", "X"));
        assert_eq!(
            page.as_str(),
            "<div id='home-articles'>X</div><div id=\"after\"></div>"
        );
    }

    #[test]
    fn test_similar_tag_names_do_not_count() {
        let mut page = PageTemplate::new("<nav id=\"pagination\"><navx></navx>old</nav>");
        assert!(page.replace_inner("pagination", ""));
        assert_eq!(page.as_str(), "<nav id=\"pagination\"></nav>");
    }

    #[test]
    fn test_angle_bracket_in_attribute_value() {
        let mut page = PageTemplate::new(
            r#"<section data-note="a>b" id="blog-articles">old</section>"#,
        );
        assert!(page.has_element("blog-articles"));
        assert!(page.replace_inner("blog-articles", "new"));
        assert_eq!(
            page.as_str(),
            r#"<section data-note="a>b" id="blog-articles">new</section>"#
        );
    }

    #[test]
    fn test_commented_out_element_is_ignored() {
        let mut page = PageTemplate::new(
            r#"<!-- <div id="blog-articles">old</div> --><div id="blog-articles">live</div>"#,
        );
        assert!(page.replace_inner("blog-articles", "NEW"));
        assert_eq!(
            page.as_str(),
            r#"<!-- <div id="blog-articles">old</div> --><div id="blog-articles">NEW</div>"#
        );
    }

    #[test]
    fn test_commented_out_element_does_not_count() {
        let page = PageTemplate::new(r#"<!-- <div id="home-articles"></div> -->"#);
        assert!(!page.has_element("home-articles"));
    }

    #[test]
    fn test_missing_element_is_noop() {
        let source = "<div id=\"blog-articles\"></div>";
        let mut page = PageTemplate::new(source);
        assert!(!page.replace_inner("pagination", "<button></button>"));
        assert_eq!(page.as_str(), source);
    }

    #[test]
    fn test_unclosed_element_is_noop() {
        let source = "<div id=\"blog-articles\"><p>never closed";
        let mut page = PageTemplate::new(source);
        assert!(!page.replace_inner("blog-articles", "x"));
        assert_eq!(page.as_str(), source);
    }

    #[test]
    fn test_fill_list_and_pagination() {
        use crate::controller::paginate::Pagination;
        use crate::render::{Notice, RenderPort};

        let mut page = PageTemplate::new(
            "<div id=\"blog-articles\">placeholder</div><nav id=\"pagination\">stale</nav>",
        );
        let mut port = HtmlPort::new();
        port.render_notice(&Notice::NoArticles);
        port.render_pagination(Some(&Pagination::new(1, 1)));

        page.fill(PageMode::List, &port);
        assert_eq!(
            page.as_str(),
            "<div id=\"blog-articles\"><p class=\"no-articles\">Aucun article disponible.</p>\n</div><nav id=\"pagination\"></nav>"
        );
    }

    #[test]
    fn test_fill_without_container_is_noop() {
        let source = "<main></main>";
        let mut page = PageTemplate::new(source);
        page.fill(PageMode::None, &HtmlPort::new());
        assert_eq!(page.as_str(), source);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("blogfeed_template_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("blog.html");
        std::fs::write(&path, "<div id=\"blog-articles\"></div>").unwrap();

        let page = PageTemplate::load(&path).unwrap();
        assert!(page.has_element("blog-articles"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file() {
        let err = PageTemplate::load(Path::new("/nonexistent/blogfeed/blog.html")).unwrap_err();
        assert!(matches!(err, TemplateError::Io { .. }));
    }
}
