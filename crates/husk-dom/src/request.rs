//! Request descriptors handed to the navigation layer.

use strum_macros::{AsRefStr, Display, EnumString};
use url::Url;

/// Content type of urlencoded form bodies.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// HTTP method of a [`WebRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// What a click or submit asks the enclosing window to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebRequest {
    /// Absolute URL to load.
    pub url: Url,
    /// Request method.
    pub method: HttpMethod,
    /// Request body for `POST`.
    pub body: Option<String>,
    /// Content type of `body`.
    pub content_type: Option<String>,
    /// Target window name (`_self`, `_blank`, a frame name, ...), if any.
    pub target: Option<String>,
}

impl WebRequest {
    /// A `GET` request for `url`.
    #[must_use]
    pub const fn get(url: Url) -> Self {
        Self {
            url,
            method: HttpMethod::Get,
            body: None,
            content_type: None,
            target: None,
        }
    }

    /// A urlencoded `POST` of `body` to `url`.
    #[must_use]
    pub fn post_form(url: Url, body: String) -> Self {
        Self {
            url,
            method: HttpMethod::Post,
            body: Some(body),
            content_type: Some(FORM_URLENCODED.to_string()),
            target: None,
        }
    }

    /// Set the target window name; empty names are ignored.
    #[must_use]
    pub fn with_target(mut self, target: Option<&str>) -> Self {
        self.target = target.filter(|t| !t.is_empty()).map(str::to_string);
        self
    }
}
