//! Utility functions shared by the feed core and both hosts.
//!
//! - **HTML escaping**: entity escaping for text placed into markup
//! - **Text processing**: excerpts, column-aware truncation, control-char stripping
//! - **URLs**: endpoint validation and deep-link construction
//!
//! # Examples
//!
//! ```
//! use blogfeed::util::{escape_html, excerpt};
//!
//! assert_eq!(escape_html("<b>hi</b>"), "&lt;b&gt;hi&lt;/b&gt;");
//! assert_eq!(excerpt("abcdef", 3), "abc...");
//! ```

mod html;
mod text;
mod url;

pub use html::{escape_attr, escape_html};
pub use text::{display_width, excerpt, strip_control_chars, truncate_to_width};
pub use self::url::{deep_link, validate_endpoint, UrlValidationError};

/// Maximum accepted search query length, in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
