//! High-level browser API for husk.
//!
//! # Scope
//!
//! This crate provides:
//! - **Windows** - top-level windows and the nested windows behind frames
//! - **Navigation** - target resolution (`_self`, `_blank`, `_parent`,
//!   `_top`, named windows) and session history
//! - **Page Loading** - fetch, parse, run scripts, load frames, fire `load`
//! - **Configuration** - [`ClientOptions`], readable from JSON
//!
//! # Not Yet Implemented
//!
//! - Cookies and HTTP authentication
//! - Redirect bookkeeping beyond what the HTTP client follows on its own

mod client;
mod config;
mod error;
mod loader;

pub use husk_dom as dom;
pub use husk_html as html;
pub use husk_js as js;

pub use client::{WebClient, WebWindow};
pub use config::{ClientOptions, ConfigError};
pub use error::BrowserError;
pub use loader::{HttpLoader, LoadError, PageLoader, StaticLoader};
