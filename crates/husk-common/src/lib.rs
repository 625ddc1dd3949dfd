//! Common utilities for the husk headless browser.
//!
//! This crate provides shared infrastructure used by the other husk crates:
//! - **Warning System** - deduplicated warnings about unsupported content
//! - **Fetching** - `data:` URL decoding and blocking HTTP requests

pub mod net;
pub mod warning;
