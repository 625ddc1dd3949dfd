//! Deduplicated warnings about unsupported content.
//!
//! Pages routinely contain the same unsupported construct hundreds of times
//! (a processing instruction per row, a frame nested too deep on every page of
//! a site). Each distinct message is reported once through `tracing` until
//! [`clear_warnings`] is called.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// Global set of warnings we've already emitted (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about unsupported content (emitted once per unique message).
///
/// Returns `true` if this call emitted the warning.
///
/// # Example
/// ```ignore
/// warn_once("HTML", "processing instruction <?php ...?> ignored");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_emit = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_emit {
        tracing::warn!(component, "{message}");
    }
    should_emit
}

/// Clear all recorded warnings (call when loading a new page)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
