//! Destination URL validation.
//!
//! Links store the submitted URL verbatim so that a redirect returns exactly what
//! the client sent. Validation only decides whether the input is acceptable; it
//! never rewrites it beyond trimming surrounding whitespace.

use url::Url;

/// Longest destination URL accepted, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Reasons a destination URL is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UrlValidationError {
    #[error("URL must not be empty")]
    Empty,

    #[error("URL exceeds {max} bytes")]
    TooLong { max: usize },

    #[error("URL must not contain whitespace or control characters")]
    ForbiddenCharacters,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed, got '{0}'")]
    UnsupportedProtocol(String),

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must be written as scheme://host with forward slashes")]
    NotAbsolute,
}

/// Checks that `input` is an absolute http/https URL and returns the trimmed
/// string to store.
///
/// # Rules
///
/// 1. Non-empty after trimming, at most [`MAX_URL_LENGTH`] bytes
/// 2. No interior whitespace or control characters (the URL parser would silently
///    strip them, which would break the verbatim round-trip)
/// 3. Parses as an absolute URL
/// 4. Scheme is `http` or `https`, and a host is present
/// 5. Literally written as `scheme://...` without backslashes. The parser
///    repairs `https:example.com` or `http:\\host`, but the stored text is sent
///    back verbatim and a browser would resolve those forms relative to the
///    shortener itself.
///
/// # Security
///
/// Rejects `javascript:`, `data:`, `file:` and other non-web schemes.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(validate_url(" https://example.com/a ").unwrap(), "https://example.com/a");
/// assert!(validate_url("not a url").is_err());
/// assert!(validate_url("ftp://example.com").is_err());
/// ```
pub fn validate_url(input: &str) -> Result<String, UrlValidationError> {
    let candidate = input.trim();

    if candidate.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if candidate.len() > MAX_URL_LENGTH {
        return Err(UrlValidationError::TooLong {
            max: MAX_URL_LENGTH,
        });
    }

    if candidate
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(UrlValidationError::ForbiddenCharacters);
    }

    let url =
        Url::parse(candidate).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::UnsupportedProtocol(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    let after_scheme = &candidate[url.scheme().len()..];
    if !after_scheme.starts_with("://") || candidate.contains('\\') {
        return Err(UrlValidationError::NotAbsolute);
    }

    Ok(candidate.to_string())
}

/// Serializes a stored destination into an ASCII form fit for a `Location` header.
///
/// ASCII destinations are returned unchanged. Non-ASCII ones go through the URL
/// parser, which percent-encodes the path and punycodes the host without
/// changing the destination.
pub fn to_location_header(stored: &str) -> Option<String> {
    if stored.is_ascii() && !stored.chars().any(|c| c.is_ascii_control()) {
        return Some(stored.to_string());
    }

    Url::parse(stored).ok().map(|url| url.to_string())
}
