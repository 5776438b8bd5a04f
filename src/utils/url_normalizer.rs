//! Destination URL normalization and validation.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// Shape an absolute destination must have after scheme defaulting.
static DESTINATION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?([\w-]+(\.[\w-]+)+)([\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-])?$")
        .expect("valid destination regex")
});

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),
}

/// Prefixes `https://` when the input carries neither `http://` nor `https://`.
///
/// ```ignore
/// assert_eq!(ensure_scheme("example.com/a"), "https://example.com/a");
/// assert_eq!(ensure_scheme("http://example.com"), "http://example.com");
/// ```
pub fn ensure_scheme(input: &str) -> String {
    if input.starts_with("http://") || input.starts_with("https://") {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

/// Normalizes a user-supplied destination for storage.
///
/// Surrounding whitespace is trimmed, the scheme defaults to `https://`, and
/// the result must match the absolute-URL pattern and parse as a URL. The
/// string is otherwise stored exactly as given.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::Empty`] for blank input and
/// [`UrlNormalizationError::InvalidFormat`] when validation fails.
pub fn normalize_destination(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }

    let candidate = ensure_scheme(trimmed);

    if !DESTINATION_REGEX.is_match(&candidate) {
        return Err(UrlNormalizationError::InvalidFormat(
            "expected a host with a top-level domain".to_string(),
        ));
    }

    parse_absolute(&candidate)?;

    Ok(candidate)
}

/// Parses `candidate` as an absolute http(s) URL with a host.
pub fn parse_absolute(candidate: &str) -> Result<Url, UrlNormalizationError> {
    let url =
        Url::parse(candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(UrlNormalizationError::InvalidFormat(format!(
                "unsupported scheme '{other}'"
            )));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::InvalidFormat(
            "missing host".to_string(),
        ));
    }

    Ok(url)
}
