use serde_json::Value;
use thiserror::Error;

use super::article::Article;

/// Errors for response bodies that cannot yield an article list at all.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Body is not valid JSON
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Body is valid JSON but the top-level value is not an array
    #[error("Invalid format: expected a JSON array, got {0}")]
    NotAnArray(&'static str),
}

/// Outcome of parsing an article list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    /// Valid articles, in response order
    pub articles: Vec<Article>,
    /// Number of records dropped by validation
    pub skipped: usize,
}

/// Parse an API response body into validated articles.
///
/// Invalid records are dropped (never repaired) and counted in
/// [`ParseResult::skipped`].
pub fn parse_articles(bytes: &[u8]) -> Result<ParseResult, ParseError> {
    let value: Value = serde_json::from_slice(bytes)?;

    let records = match value {
        Value::Array(records) => records,
        other => return Err(ParseError::NotAnArray(json_kind(&other))),
    };

    let total = records.len();
    let mut articles = Vec::with_capacity(total);
    for (index, record) in records.into_iter().enumerate() {
        match Article::from_json(record) {
            Ok(article) => articles.push(article),
            Err(reason) => {
                tracing::debug!(index, %reason, "Dropping invalid article record");
            }
        }
    }

    let skipped = total - articles.len();
    Ok(ParseResult { articles, skipped })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
