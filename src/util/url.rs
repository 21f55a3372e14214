use thiserror::Error;
use url::Url;

/// Errors that can occur while validating a configured URL.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
}

/// Validates an http(s) URL used as the article endpoint or the site root.
///
/// # Examples
///
/// ```
/// use blogfeed::util::validate_endpoint;
///
/// assert!(validate_endpoint("https://example.com/api/articles").is_ok());
/// assert!(validate_endpoint("file:///etc/passwd").is_err());
/// ```
pub fn validate_endpoint(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(url_str)?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(UrlValidationError::MissingHost),
    }

    Ok(url)
}

/// Builds the deep-link address of an article: `<site>/blog.html?slug=<slug>`.
///
/// The slug is percent-encoded by the query serializer.
pub fn deep_link(site: &Url, slug: &str) -> Url {
    let mut link = site.join("blog.html").unwrap_or_else(|_| site.clone());
    link.query_pairs_mut().clear().append_pair("slug", slug);
    link
}
