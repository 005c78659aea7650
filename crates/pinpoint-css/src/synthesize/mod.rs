//! Selector synthesis.
//!
//! Builds a short selector for an element by describing it with its most
//! recognisable features, then walking up through its ancestors until the
//! path resolves to a single element.
//!
//! The walk is a loop over [`AscentState`] values. Each [`Synthesizer::step`]
//! looks at one element and either hands back the state for its parent or the
//! finished selector, so a single level can be tested on its own.

pub mod features;
pub mod heuristics;

use pinpoint_common::warning::warn_once;
use pinpoint_dom::{DomTree, ElementData, NodeId};
use thiserror::Error;

use self::features::{ElementProps, feature_selector};
use self::heuristics::VOLATILE_ID_PATTERN;
use crate::escape::{EscapeError, escape_identifier};
use crate::query::{DocumentQuery, QueryError, TreeQuery};

/// Joins the per-level fragments of a finished selector.
const CHILD_COMBINATOR: &str = " > ";

/// Errors from [`Synthesizer::synthesize`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// An identifier could not be escaped.
    #[error(transparent)]
    Escape(#[from] EscapeError),

    /// The query capability failed.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Caller-facing knobs for [`Synthesizer::synthesize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisOptions {
    /// The caller already knows the path below is unique.
    pub is_unique: bool,
    /// How many features describe the target element. Ancestors always get one.
    pub feature_count: usize,
    /// Ancestor levels to include even once the selector is unique. The
    /// counter drops by one per level; a level that is not unique takes it
    /// below zero, after which the walk runs to the document element or to
    /// the first page-unique id.
    pub min_depth: isize,
    /// Climb all the way to the document element.
    pub to_root: bool,
}

impl Default for SynthesisOptions {
    fn default() -> Self {
        Self {
            is_unique: false,
            feature_count: 2,
            min_depth: 1,
            to_root: false,
        }
    }
}

impl SynthesisOptions {
    /// Set [`Self::is_unique`].
    #[must_use]
    pub const fn with_unique(mut self, is_unique: bool) -> Self {
        self.is_unique = is_unique;
        self
    }

    /// Set [`Self::feature_count`].
    #[must_use]
    pub const fn with_feature_count(mut self, feature_count: usize) -> Self {
        self.feature_count = feature_count;
        self
    }

    /// Set [`Self::min_depth`].
    #[must_use]
    pub const fn with_min_depth(mut self, min_depth: isize) -> Self {
        self.min_depth = min_depth;
        self
    }

    /// Set [`Self::to_root`].
    #[must_use]
    pub const fn with_to_root(mut self, to_root: bool) -> Self {
        self.to_root = to_root;
        self
    }
}

/// Everything one level of the walk needs. A fresh value is built for every
/// level; nothing is shared between levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AscentState {
    /// The element described at this level.
    pub node: NodeId,
    /// Fragments already chosen for the levels below, nearest first.
    pub child_selectors: Vec<String>,
    /// Levels still owed before uniqueness may stop the walk. Only zero
    /// lets it stop.
    pub min_depth: isize,
    /// Whether the path below already resolves to one element.
    pub is_unique: bool,
    /// Feature budget for this level.
    pub feature_count: usize,
    /// Keep going until there is no parent element.
    pub to_root: bool,
}

impl AscentState {
    /// State for the target element itself. A zero feature budget is raised
    /// to one so every level contributes a fragment.
    #[must_use]
    pub fn start(node: NodeId, options: &SynthesisOptions) -> Self {
        Self {
            node,
            child_selectors: Vec::new(),
            min_depth: options.min_depth,
            is_unique: options.is_unique,
            feature_count: options.feature_count.max(1),
            to_root: options.to_root,
        }
    }
}

/// Outcome of one [`Synthesizer::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ascent {
    /// Describe the parent next.
    Continue(AscentState),
    /// The walk is over.
    Done(String),
}

/// Builds selectors for elements of one tree.
pub struct Synthesizer<'a, Q: DocumentQuery + ?Sized> {
    tree: &'a DomTree,
    query: &'a Q,
}

impl<'a, Q: DocumentQuery + ?Sized> Synthesizer<'a, Q> {
    /// A synthesizer reading `tree` and checking selectors with `query`.
    pub const fn new(tree: &'a DomTree, query: &'a Q) -> Self {
        Self { tree, query }
    }

    /// Build a selector for `node`.
    ///
    /// Returns an empty string when `node` is `None` or not an element. The
    /// result always matches `node`; it is unique whenever the tree allows.
    ///
    /// # Errors
    ///
    /// Returns [`SynthesisError`] if an identifier contains U+0000 or the
    /// query capability cannot match selectors.
    pub fn synthesize(
        &self,
        node: Option<NodeId>,
        options: &SynthesisOptions,
    ) -> Result<String, SynthesisError> {
        let Some(node) = node.filter(|&id| self.tree.as_element(id).is_some()) else {
            return Ok(String::new());
        };

        let mut state = AscentState::start(node, options);
        loop {
            match self.step(&state)? {
                Ascent::Continue(next) => state = next,
                Ascent::Done(selector) => return Ok(selector),
            }
        }
    }

    /// Describe `state.node` and decide whether to climb to its parent.
    ///
    /// A page-unique id ends the walk unless `to_root` is set. Otherwise the
    /// element's features make the fragment, with `:nth-child()` added when a
    /// sibling matches it too, and the walk continues while depth is owed or
    /// the fragment is ambiguous.
    ///
    /// # Errors
    ///
    /// See [`Self::synthesize`].
    pub fn step(&self, state: &AscentState) -> Result<Ascent, SynthesisError> {
        let node = state.node;

        let (fragment, is_unique, add_parent) = if let Some(id_selector) = self.id_selector(node)? {
            (id_selector, true, false)
        } else {
            let Some(props) = ElementProps::from_node(self.tree, node)? else {
                return Ok(Ascent::Done(state.child_selectors.join(CHILD_COMBINATOR)));
            };

            let mut fragment = feature_selector(&props, state.feature_count.max(1))?;
            let suffix = self.nth_child_suffix(node, &fragment)?;
            fragment.push_str(&suffix);

            let is_unique = state.is_unique || self.query.is_unique(&fragment);
            if !is_unique && self.tree.document_element() == Some(node) {
                fragment.push_str(":root");
            }
            (fragment, is_unique, state.min_depth != 0 || !is_unique)
        };

        #[cfg(feature = "trace-ascent")]
        eprintln!("[ASCENT] {node:?} fragment={fragment:?} unique={is_unique}");

        let mut child_selectors = Vec::with_capacity(state.child_selectors.len() + 1);
        child_selectors.push(fragment);
        child_selectors.extend(state.child_selectors.iter().cloned());

        match self.tree.parent_element(node) {
            Some(parent) if state.to_root || add_parent => Ok(Ascent::Continue(AscentState {
                node: parent,
                child_selectors,
                min_depth: state.min_depth.saturating_sub(1),
                is_unique,
                feature_count: 1,
                to_root: state.to_root,
            })),
            _ => Ok(Ascent::Done(child_selectors.join(CHILD_COMBINATOR))),
        }
    }

    /// `#id`, when the element has a non-empty id that is stable across
    /// reloads and used by no other element.
    fn id_selector(&self, node: NodeId) -> Result<Option<String>, SynthesisError> {
        let Some(id) = self
            .tree
            .as_element(node)
            .and_then(ElementData::id)
            .filter(|id| !id.is_empty())
        else {
            return Ok(None);
        };

        let selector = format!("#{}", escape_identifier(id)?);
        if selector.contains(VOLATILE_ID_PATTERN) {
            warn_once("Synthesizer", &format!("skipping volatile id {selector}"));
            return Ok(None);
        }
        Ok(self.query.is_unique(&selector).then_some(selector))
    }

    /// `:nth-child(k)` when another element sibling also matches `fragment`.
    fn nth_child_suffix(&self, node: NodeId, fragment: &str) -> Result<String, QueryError> {
        let siblings = self.tree.element_siblings(node);
        for &sibling in &siblings {
            if sibling != node && self.query.matches(sibling, fragment)? {
                let position = siblings.iter().position(|&s| s == node).map_or(0, |p| p + 1);
                return Ok(format!(":nth-child({position})"));
            }
        }
        Ok(String::new())
    }
}

/// Build a selector for `node`, checking uniqueness against `tree` itself.
///
/// # Errors
///
/// Returns [`SynthesisError`] if an identifier contains U+0000.
///
/// # Example
/// ```
/// use pinpoint_css::synthesize::{SynthesisOptions, synthesize_selector};
/// use pinpoint_dom::{DomTree, ElementData, NodeId};
///
/// let mut tree = DomTree::new();
/// let html = tree.append_element(NodeId::ROOT, ElementData::new("html"));
/// let body = tree.append_element(html, ElementData::new("body"));
/// let nav = tree.append_element(body, ElementData::new("nav").with_attr("id", "main"));
///
/// let selector = synthesize_selector(&tree, Some(nav), &SynthesisOptions::default()).unwrap();
/// assert_eq!(selector, "#main");
/// ```
pub fn synthesize_selector(
    tree: &DomTree,
    node: Option<NodeId>,
    options: &SynthesisOptions,
) -> Result<String, SynthesisError> {
    let query = TreeQuery::new(tree);
    Synthesizer::new(tree, &query).synthesize(node, options)
}
