//! Per-element selector features.
//!
//! Each feature looks at one property of an element and either produces a
//! selector fragment for it or declines. [`FEATURES`] lists them from most to
//! least recognisable; [`feature_selector`] takes fragments from the front of
//! that list until the budget is spent.

use std::collections::VecDeque;

use pinpoint_common::uri::{FriendlyUriOptions, encode_uri, friendly_uri_suffix};
use pinpoint_dom::{DomTree, ElementData, NodeId};

use super::heuristics::{is_common_node_name, is_uncommon_class_name};
use crate::escape::{EscapeError, escape_identifier};

/// Properties of an element computed once and shared by every feature.
#[derive(Debug, Clone)]
pub struct ElementProps<'a> {
    /// The element itself.
    pub element: &'a ElementData,
    /// Escaped tag name as it would appear in a type selector.
    pub node_name: String,
    /// Custom elements have a `-` in their name.
    pub is_custom: bool,
    /// Generic tags listed in [`super::heuristics::COMMON_NODE_NAMES`].
    pub is_common: bool,
    /// Uncommon class tokens that no element sibling also carries.
    pub distinct_classes: Vec<&'a str>,
}

impl<'a> ElementProps<'a> {
    /// Collect the properties of `node`. Returns `Ok(None)` when `node` is not
    /// an element.
    ///
    /// # Errors
    ///
    /// Returns [`EscapeError`] if the tag name contains U+0000.
    pub fn from_node(tree: &'a DomTree, node: NodeId) -> Result<Option<Self>, EscapeError> {
        let Some(element) = tree.as_element(node) else {
            return Ok(None);
        };
        let node_name = escape_identifier(element.selector_name(tree.mode()))?;

        Ok(Some(Self {
            element,
            is_custom: node_name.contains('-'),
            is_common: is_common_node_name(&node_name),
            distinct_classes: distinct_classes(tree, node, element),
            node_name,
        }))
    }
}

/// Class tokens of `element` that are not noise and that no element sibling
/// shares, in source order.
fn distinct_classes<'a>(tree: &'a DomTree, node: NodeId, element: &'a ElementData) -> Vec<&'a str> {
    let siblings: Vec<&ElementData> = tree
        .element_siblings(node)
        .into_iter()
        .filter(|&sibling| sibling != node)
        .filter_map(|sibling| tree.as_element(sibling))
        .collect();

    element
        .class_list()
        .into_iter()
        .filter(|class_name| is_uncommon_class_name(class_name))
        .filter(|class_name| !siblings.iter().any(|sibling| sibling.has_class(class_name)))
        .collect()
}

/// A feature: one way of describing an element as a selector fragment.
pub type Feature = fn(&ElementProps<'_>) -> Result<Option<String>, EscapeError>;

/// Every feature, highest priority first.
pub const FEATURES: &[Feature] = &[
    custom_element,
    role,
    uncommon_node_name,
    name,
    distinct_class_list,
    src_href,
    common_node_name,
];

/// `my-widget`
///
/// # Errors
///
/// Never fails; shares the [`Feature`] signature.
pub fn custom_element(props: &ElementProps<'_>) -> Result<Option<String>, EscapeError> {
    Ok(props.is_custom.then(|| props.node_name.clone()))
}

/// `[role="menuitem"]`, whenever the attribute is present.
///
/// # Errors
///
/// Returns [`EscapeError`] if the role contains U+0000.
pub fn role(props: &ElementProps<'_>) -> Result<Option<String>, EscapeError> {
    props
        .element
        .attr("role")
        .map(|value| Ok(format!("[role=\"{}\"]", escape_identifier(value)?)))
        .transpose()
}

/// `button`, or `input[type="password"]` for inputs with a type.
///
/// # Errors
///
/// Returns [`EscapeError`] if the input type contains U+0000.
pub fn uncommon_node_name(props: &ElementProps<'_>) -> Result<Option<String>, EscapeError> {
    if props.is_common || props.is_custom {
        return Ok(None);
    }
    let mut selector = props.node_name.clone();
    if selector == "input"
        && let Some(input_type) = props.element.attr("type")
    {
        selector.push_str(&format!("[type=\"{}\"]", escape_identifier(input_type)?));
    }
    Ok(Some(selector))
}

/// `[name="username"]`, for elements without an id.
///
/// # Errors
///
/// Returns [`EscapeError`] if the name contains U+0000.
pub fn name(props: &ElementProps<'_>) -> Result<Option<String>, EscapeError> {
    if props.element.has_attr("id") {
        return Ok(None);
    }
    props
        .element
        .attr("name")
        .filter(|value| !value.is_empty())
        .map(|value| Ok(format!("[name=\"{}\"]", escape_identifier(value)?)))
        .transpose()
}

/// `.dogs.cats`, only when one or two distinct classes remain.
///
/// # Errors
///
/// Returns [`EscapeError`] if a class contains U+0000.
pub fn distinct_class_list(props: &ElementProps<'_>) -> Result<Option<String>, EscapeError> {
    if !(1..=2).contains(&props.distinct_classes.len()) {
        return Ok(None);
    }
    let mut selector = String::new();
    for class_name in &props.distinct_classes {
        selector.push('.');
        selector.push_str(&escape_identifier(*class_name)?);
    }
    Ok(Some(selector))
}

/// `[href$="about/"]` or `[src$="logo.png"]`, from the friendly end of the URI.
///
/// `href` wins over `src`. The suffix is percent-encoded; when the encoded
/// form is no longer a suffix of the raw value the feature is dropped, since
/// the selector would not match.
///
/// # Errors
///
/// Never fails; shares the [`Feature`] signature.
pub fn src_href(props: &ElementProps<'_>) -> Result<Option<String>, EscapeError> {
    let Some((attr, value)) = ["href", "src"]
        .into_iter()
        .find_map(|attr| props.element.attr(attr).map(|value| (attr, value)))
    else {
        return Ok(None);
    };

    Ok(friendly_uri_suffix(value, &FriendlyUriOptions::default())
        .map(|suffix| encode_uri(&suffix))
        .filter(|encoded| value.ends_with(encoded.as_str()))
        .map(|encoded| format!("[{attr}$=\"{encoded}\"]")))
}

/// `div`, as a last resort.
///
/// # Errors
///
/// Never fails; shares the [`Feature`] signature.
pub fn common_node_name(props: &ElementProps<'_>) -> Result<Option<String>, EscapeError> {
    Ok(props.is_common.then(|| props.node_name.clone()))
}

/// Whether a fragment is a type selector, which has to lead its compound.
fn is_type_fragment(fragment: &str) -> bool {
    !fragment.starts_with(['#', '.', '[', ':'])
}

/// Join up to `feature_count` features of an element into one compound
/// selector, type selector first.
///
/// # Errors
///
/// Returns [`EscapeError`] from any feature that had to escape a NUL.
pub fn feature_selector(props: &ElementProps<'_>, feature_count: usize) -> Result<String, EscapeError> {
    let mut fragments = VecDeque::with_capacity(feature_count.min(FEATURES.len()));

    for feature in FEATURES {
        if fragments.len() >= feature_count {
            break;
        }
        let Some(fragment) = feature(props)?.filter(|fragment| !fragment.is_empty()) else {
            continue;
        };
        if is_type_fragment(&fragment) {
            fragments.push_front(fragment);
        } else {
            fragments.push_back(fragment);
        }
    }

    Ok(fragments.into_iter().collect())
}
