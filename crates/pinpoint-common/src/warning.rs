//! Warnings with colored terminal output.
//!
//! Messages are deduplicated so that a selector which is re-checked on every
//! ascent step is only reported once. Used by the selector engine and the
//! synthesizer to surface soft failures without changing their results.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

/// ANSI color codes for terminal output
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a degraded outcome (prints once per unique message).
///
/// # Example
/// ```ignore
/// warn_once("Selector", "cannot parse 'div >'");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(warning_key(component, message));

    if should_print {
        eprintln!("{YELLOW}[pinpoint {component}] ⚠ {message}{RESET}");
    }
}

/// Whether this warning has been printed since the last [`clear_warnings`].
#[must_use]
pub fn was_warned(component: &str, message: &str) -> bool {
    WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|set| set.contains(&warning_key(component, message)))
}

fn warning_key(component: &str, message: &str) -> String {
    format!("[{component}] {message}")
}

/// Clear all recorded warnings (call before processing a new document).
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}
