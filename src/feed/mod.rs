//! Article feed loading: record validation, body parsing and HTTP fetching.
//!
//! - [`article`] - the validated [`Article`] record and slug rules
//! - [`parser`] - JSON body to validated articles
//! - [`fetcher`] - one timed GET against the article endpoint
//!
//! # Example
//!
//! ```ignore
//! use blogfeed::feed::{build_client, Fetcher};
//!
//! let fetcher = Fetcher::new(build_client()?, endpoint, Duration::from_secs(10));
//! let result = fetcher.fetch_articles().await?;
//! println!("{} articles ({} skipped)", result.articles.len(), result.skipped);
//! ```

mod article;
mod fetcher;
mod parser;

pub use article::{is_slug_char, is_valid_slug, Article, InvalidArticle, MAX_SLUG_LENGTH};
pub use fetcher::{build_client, FetchError, Fetcher};
pub use parser::{parse_articles, ParseError, ParseResult};
