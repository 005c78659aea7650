//! Document query capability.
//!
//! The synthesizer never reaches into a document directly. It asks a
//! [`DocumentQuery`] which elements a selector resolves to, and whether a
//! given element matches one. [`TreeQuery`] answers those questions for a
//! [`DomTree`] using the selector engine in [`crate::selector`].

use pinpoint_common::warning::warn_once;
use pinpoint_dom::{DomTree, NodeId};
use thiserror::Error;

use crate::selector::{SelectorError, parse_selector};

/// Errors raised by a query capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// The host has no element-matching primitive.
    #[error("no selector matching capability is available")]
    NoCapability,

    /// The selector could not be parsed.
    #[error("invalid selector '{selector}': {source}")]
    InvalidSelector {
        /// The selector as given.
        selector: String,
        /// Why it was rejected.
        source: SelectorError,
    },
}

/// Read-only access to a live document by selector.
pub trait DocumentQuery {
    /// [`querySelectorAll`](https://dom.spec.whatwg.org/#dom-parentnode-queryselectorall)
    ///
    /// Every element the selector matches, in tree order. A selector the
    /// implementation cannot evaluate matches nothing.
    fn query_all(&self, selector: &str) -> Vec<NodeId>;

    /// [`Element.matches`](https://dom.spec.whatwg.org/#dom-element-matches)
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoCapability`] when matching is unavailable and
    /// [`QueryError::InvalidSelector`] when the selector cannot be parsed.
    fn matches(&self, node: NodeId, selector: &str) -> Result<bool, QueryError>;

    /// Whether the selector resolves to exactly one element.
    fn is_unique(&self, selector: &str) -> bool {
        self.query_all(selector).len() == 1
    }
}

/// [`DocumentQuery`] over an in-memory [`DomTree`].
///
/// Every call parses the selector and scans the whole tree; nothing is cached,
/// so results always reflect the tree as it is now.
#[derive(Debug, Clone, Copy)]
pub struct TreeQuery<'a> {
    tree: &'a DomTree,
}

impl<'a> TreeQuery<'a> {
    /// Query the given tree.
    #[must_use]
    pub const fn new(tree: &'a DomTree) -> Self {
        Self { tree }
    }

    /// The tree being queried.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }
}

impl DocumentQuery for TreeQuery<'_> {
    fn query_all(&self, selector: &str) -> Vec<NodeId> {
        match parse_selector(selector) {
            Ok(parsed) => self
                .tree
                .elements()
                .filter(|&id| parsed.matches_in_tree(self.tree, id))
                .collect(),
            Err(err) => {
                warn_once("Selector", &format!("ignoring '{selector}': {err}"));
                Vec::new()
            }
        }
    }

    fn matches(&self, node: NodeId, selector: &str) -> Result<bool, QueryError> {
        let parsed = parse_selector(selector).map_err(|source| QueryError::InvalidSelector {
            selector: selector.to_string(),
            source,
        })?;
        Ok(parsed.matches_in_tree(self.tree, node))
    }
}
