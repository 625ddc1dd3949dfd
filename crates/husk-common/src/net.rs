//! Fetch utilities for the husk web client.
//!
//! Provides `data:` URL decoding and simple blocking HTTP wrappers used by the
//! page loader. Pages are always fetched as text; husk never decodes images.
use base64::Engine;
use std::time::Duration;
use thiserror::Error;

/// User-Agent header sent when the caller does not configure one.
///
/// Mimics a common desktop browser to avoid basic bot detection.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while fetching a resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be built.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or the body could not be read.
    #[error("request to {url} failed: {source}")]
    Request {
        /// The requested URL.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP error {status} for {url}")]
    Status {
        /// The requested URL.
        url: String,
        /// Numeric status code.
        status: u16,
    },

    /// A `data:` URL was malformed.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
}

/// Request options shared by every fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Overall request timeout.
    pub timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// A parsed `data:` URL that can be decoded into raw bytes or text.
pub struct DataUrl {
    /// The full raw `data:` URL string (e.g. `data:text/html;base64,...`).
    pub raw_data: String,
}

impl DataUrl {
    /// Create a new `DataUrl` from a raw data URL string.
    #[must_use]
    pub const fn new(raw_data: String) -> Self {
        Self { raw_data }
    }

    fn split(&self) -> Result<(&str, &str), FetchError> {
        let data_url = self.raw_data.trim_start_matches("data:");
        data_url
            .split_once(',')
            .ok_or_else(|| FetchError::DataUrl("missing comma".to_string()))
    }

    /// The media type of the payload, `text/plain` when none is given.
    #[must_use]
    pub fn media_type(&self) -> &str {
        let Ok((metadata, _)) = self.split() else {
            return "text/plain";
        };
        let media_type = metadata.split(';').next().unwrap_or_default();
        if media_type.is_empty() {
            "text/plain"
        } else {
            media_type
        }
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// Supports base64 payloads and percent-encoded payloads.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let (metadata, data) = self.split()?;

        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            percent_decode(data)
        }
    }

    /// Decode the payload as UTF-8 text, replacing invalid sequences.
    pub fn decode_text(&self) -> Result<String, FetchError> {
        self.decode()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

fn percent_decode(data: &str) -> Result<Vec<u8>, FetchError> {
    let bytes = data.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = bytes
                .get(i + 1..i + 3)
                .and_then(|pair| std::str::from_utf8(pair).ok())
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| FetchError::DataUrl(format!("bad escape at offset {i}")))?;
            decoded.push(hex);
            i += 3;
        } else {
            decoded.push(bytes[i]);
            i += 1;
        }
    }
    Ok(decoded)
}

fn client(options: &FetchOptions) -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .timeout(options.timeout)
        .user_agent(options.user_agent.clone())
        .build()
        .map_err(FetchError::Client)
}

fn read_text(url: &str, response: reqwest::blocking::Response) -> Result<String, FetchError> {
    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    response.text().map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })
}

/// Fetch a URL with `GET` and return its body as text.
pub fn fetch_text(url: &str, options: &FetchOptions) -> Result<String, FetchError> {
    tracing::debug!(url, "GET");
    let response = client(options)?
        .get(url)
        .send()
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
    read_text(url, response)
}

/// `POST` a body to a URL and return the response body as text.
pub fn post_text(
    url: &str,
    body: String,
    content_type: &str,
    options: &FetchOptions,
) -> Result<String, FetchError> {
    tracing::debug!(url, content_type, "POST");
    let response = client(options)?
        .post(url)
        .header(reqwest::header::CONTENT_TYPE, content_type)
        .body(body)
        .send()
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
    read_text(url, response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_data_url() {
        let url = DataUrl::new("data:text/html;base64,PHA+aGk8L3A+".to_string());
        assert_eq!(url.media_type(), "text/html");
        assert_eq!(url.decode_text().unwrap(), "<p>hi</p>");
    }

    #[test]
    fn test_percent_encoded_data_url() {
        let url = DataUrl::new("data:,%3Cb%3Ebold%3C/b%3E".to_string());
        assert_eq!(url.media_type(), "text/plain");
        assert_eq!(url.decode_text().unwrap(), "<b>bold</b>");
    }

    #[test]
    fn test_data_url_without_comma_is_rejected() {
        let url = DataUrl::new("data:text/html".to_string());
        assert!(matches!(url.decode(), Err(FetchError::DataUrl(_))));
    }
}
