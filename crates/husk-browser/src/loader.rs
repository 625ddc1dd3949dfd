//! Fetching page sources.
//!
//! The client hands every request that is not `about:` or `data:` to a
//! [`PageLoader`]. [`HttpLoader`] talks to the network (and reads `file:`
//! URLs); [`StaticLoader`] serves pages from memory and records what was
//! requested.

use husk_common::net::{FetchError, FetchOptions, fetch_text, post_text};
use husk_dom::{FORM_URLENCODED, HttpMethod, WebRequest};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Errors raised while fetching a page.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Network failure or bad status.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A `file:` URL could not be read.
    #[error("failed to read {path}: {source}")]
    File {
        /// The local path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The loader has nothing at this URL.
    #[error("no page at {0}")]
    NotFound(Url),

    /// The loader does not handle this scheme.
    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),
}

/// Source of page markup.
pub trait PageLoader {
    /// Fetch the markup `request` points at.
    fn fetch(&self, request: &WebRequest) -> Result<String, LoadError>;
}

/// Loads `http`, `https` and `file` URLs.
#[derive(Debug, Clone, Default)]
pub struct HttpLoader {
    options: FetchOptions,
}

impl HttpLoader {
    /// A loader sending requests with `options`.
    #[must_use]
    pub const fn new(options: FetchOptions) -> Self {
        Self { options }
    }
}

impl PageLoader for HttpLoader {
    fn fetch(&self, request: &WebRequest) -> Result<String, LoadError> {
        let url = &request.url;
        match url.scheme() {
            "http" | "https" => {
                let text = match (request.method, &request.body) {
                    (HttpMethod::Post, Some(body)) => post_text(
                        url.as_str(),
                        body.clone(),
                        request.content_type.as_deref().unwrap_or(FORM_URLENCODED),
                        &self.options,
                    )?,
                    _ => fetch_text(url.as_str(), &self.options)?,
                };
                Ok(text)
            }
            "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|()| LoadError::NotFound(url.clone()))?;
                std::fs::read_to_string(&path).map_err(|source| LoadError::File { path, source })
            }
            other => Err(LoadError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// In-memory pages keyed by URL.
///
/// Query strings are part of the key. Every request is recorded, so tests
/// can check what a form submission sent.
#[derive(Debug, Default)]
pub struct StaticLoader {
    pages: HashMap<String, String>,
    requests: RefCell<Vec<WebRequest>>,
}

impl StaticLoader {
    /// An empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` at `url`.
    #[must_use]
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.insert(url, html);
        self
    }

    /// Serve `html` at `url`, replacing any previous page.
    pub fn insert(&mut self, url: &str, html: &str) {
        let key = Url::parse(url).map_or_else(|_| url.to_string(), String::from);
        let _ = self.pages.insert(key, html.to_string());
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<WebRequest> {
        self.requests.borrow().clone()
    }
}

impl PageLoader for StaticLoader {
    fn fetch(&self, request: &WebRequest) -> Result<String, LoadError> {
        self.requests.borrow_mut().push(request.clone());
        self.pages
            .get(request.url.as_str())
            .cloned()
            .ok_or_else(|| LoadError::NotFound(request.url.clone()))
    }
}

impl<L: PageLoader + ?Sized> PageLoader for std::rc::Rc<L> {
    fn fetch(&self, request: &WebRequest) -> Result<String, LoadError> {
        (**self).fetch(request)
    }
}
