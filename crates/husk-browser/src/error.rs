//! Error type of the web client.

use crate::loader::LoadError;
use husk_dom::{DomError, WindowId};
use husk_html::HtmlError;
use husk_js::ScriptError;
use thiserror::Error;
use url::Url;

/// Errors raised by [`WebClient`](crate::WebClient) operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// The page source could not be fetched.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The page source could not be turned into a page.
    #[error(transparent)]
    Html(#[from] HtmlError),

    /// A tree operation failed, including script errors raised through the
    /// page.
    #[error(transparent)]
    Dom(#[from] DomError),

    /// The script engine could not be set up.
    #[error(transparent)]
    Script(#[from] ScriptError),

    /// The window id does not name an open window.
    #[error("no open window {0}")]
    UnknownWindow(WindowId),

    /// A URL given by the caller did not parse.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        /// The text that failed to parse.
        url: String,
        /// Parser error.
        #[source]
        source: url::ParseError,
    },

    /// Scripts kept navigating away from freshly loaded pages.
    #[error("too many script navigations, last to {0}")]
    NavigationLoop(Url),
}
