//! Tuned lists that decide which element properties are worth putting in a
//! selector. The values are empirical; change them only with new evidence.

/// Class-name fragments that usually describe transient UI state or a grid
/// column rather than the element itself. A class containing any of these
/// substrings is never used.
pub const COMMON_CLASS_NAMES: &[&str] = &[
    "focus", "hover", "hidden", "visible", "dirty", "touched", "valid", "disable", "enable",
    "active", "col-",
];

/// Tag names too generic to identify an element on their own. They are only
/// used after every other feature has been tried.
pub const COMMON_NODE_NAMES: &[&str] = &["div", "span", "p", "b", "i", "u", "strong", "em", "h2", "h3"];

/// Ids containing this are regenerated on every page load (embedded video
/// players), so they are never used.
pub const VOLATILE_ID_PATTERN: &str = "player_uid_";

/// Whether a class token avoids every entry of [`COMMON_CLASS_NAMES`].
#[must_use]
pub fn is_uncommon_class_name(class_name: &str) -> bool {
    !COMMON_CLASS_NAMES
        .iter()
        .any(|common| class_name.contains(common))
}

/// Whether an escaped tag name is in [`COMMON_NODE_NAMES`].
#[must_use]
pub fn is_common_node_name(node_name: &str) -> bool {
    COMMON_NODE_NAMES.contains(&node_name)
}
