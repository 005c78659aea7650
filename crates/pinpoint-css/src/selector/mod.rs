//! CSS Selector parsing and matching
//!
//! This module implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) that synthesized
//! selectors use, so that a synthesized selector can be checked against the
//! tree it was built from.

mod parser;

pub use parser::{SelectorError, parse_selector};

use pinpoint_dom::{DocumentMode, DomTree, ElementData, NodeId, NodeType};

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// A simple selector is a single condition on an element. Names and values
/// are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    Type(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),

    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    Universal,

    /// Structural pseudo-class; needs tree context to match.
    PseudoClass(PseudoClass),

    /// Attribute selector matching based on element attributes.
    Attribute(AttributeSelector),
}

/// Structural pseudo-classes per [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 4.4 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,

    /// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
    /// "The :nth-child(An+B) pseudo-class notation represents elements that are
    /// among An+Bth elements from the list composed of their inclusive siblings"
    NthChild(AnPlusB),

    /// [§ 14.4.3 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    FirstChild,

    /// [§ 14.4.4 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,

    /// [§ 14.4.5 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    OnlyChild,

    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// Comments and whitespace-only text do not count as content.
    Empty,
}

/// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// Matches every index `An + B` for some integer `n >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnPlusB {
    /// Step.
    pub a: i64,
    /// Offset.
    pub b: i64,
}

impl AnPlusB {
    /// Whether the 1-based `index` is selected.
    #[must_use]
    pub const fn matches(self, index: i64) -> bool {
        let Some(diff) = index.checked_sub(self.b) else {
            return false;
        };
        if self.a == 0 {
            return diff == 0;
        }
        matches!(diff.checked_rem(self.a), Some(0))
            && matches!(diff.checked_div(self.a), Some(n) if n >= 0)
    }
}

/// Attribute selectors per [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeSelector {
    /// `[attr]`: "Represents an element with the att attribute"
    Exists(String),

    /// `[attr=value]`: value is exactly `value`.
    Equals(String, String),

    /// `[attr~=value]`: one of the whitespace-separated words is `value`.
    Includes(String, String),

    /// `[attr|=value]`: exactly `value`, or `value` followed by `-`.
    DashMatch(String, String),

    /// `[attr^=value]`: begins with `value`.
    PrefixMatch(String, String),

    /// `[attr$=value]`: ends with `value`.
    ///
    /// Example: `[src$="logo.png"]` matches `<img src="//deque.com/logo.png">`
    SuffixMatch(String, String),

    /// `[attr*=value]`: contains `value`.
    SubstringMatch(String, String),
}

/// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
///
/// "A compound selector is a sequence of simple selectors that are not
/// separated by a combinator, and represents a set of simultaneous
/// conditions on a single element."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundSelector {
    /// The list of simple selectors that make up this compound selector.
    pub simple_selectors: Vec<SimpleSelector>,
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,

    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is
    /// a direct child of element A."
    Child,

    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    NextSibling,

    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    SubsequentSibling,
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// Example: `#fixture > div:nth-child(5)` is stored as subject
/// `div:nth-child(5)` with the chain `[(Child, #fixture)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexSelector {
    /// The rightmost compound selector (the subject of the selector).
    pub subject: CompoundSelector,

    /// Chain of (combinator, `compound_selector`) pairs going left from the subject.
    ///
    /// For `A > B C`, this would be `[(Descendant, B), (Child, A)]`.
    pub combinators: Vec<(Combinator, CompoundSelector)>,
}

/// A parsed CSS selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSelector {
    /// The complex selector (compound selectors with combinators).
    pub complex: ComplexSelector,
}

impl ParsedSelector {
    /// Check if this is a simple selector (no combinators).
    #[must_use]
    pub const fn is_simple(&self) -> bool {
        self.complex.combinators.is_empty()
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Match this selector against an element with full tree context.
    /// Non-element nodes never match.
    #[must_use]
    pub fn matches_in_tree(&self, tree: &DomTree, node_id: NodeId) -> bool {
        compound_matches_in_tree(&self.complex.subject, tree, node_id)
            && self.matches_combinators(tree, node_id, 0)
    }

    /// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
    ///
    /// Match the combinator chain starting at `index`, given that `current_id`
    /// already matched the compound to the right of it. Descendant and
    /// subsequent-sibling steps backtrack over every candidate.
    fn matches_combinators(&self, tree: &DomTree, current_id: NodeId, index: usize) -> bool {
        let Some((combinator, compound)) = self.complex.combinators.get(index) else {
            return true;
        };

        let matches_from = |candidate: NodeId| {
            compound_matches_in_tree(compound, tree, candidate)
                && self.matches_combinators(tree, candidate, index + 1)
        };

        match combinator {
            Combinator::Descendant => tree.ancestors(current_id).any(matches_from),
            Combinator::Child => tree.parent(current_id).is_some_and(matches_from),
            Combinator::NextSibling => {
                find_previous_element_sibling(tree, current_id).is_some_and(matches_from)
            }
            Combinator::SubsequentSibling => tree
                .preceding_siblings(current_id)
                .filter(|&sibling| tree.as_element(sibling).is_some())
                .any(matches_from),
        }
    }
}

/// Check if a compound selector matches an element, with tree context for
/// structural pseudo-classes.
fn compound_matches_in_tree(compound: &CompoundSelector, tree: &DomTree, node_id: NodeId) -> bool {
    let Some(element) = tree.as_element(node_id) else {
        return false;
    };
    compound.simple_selectors.iter().all(|simple| match simple {
        SimpleSelector::PseudoClass(pc) => pseudo_class_matches(*pc, tree, node_id),
        _ => simple.matches(element, tree.mode()),
    })
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
fn pseudo_class_matches(pc: PseudoClass, tree: &DomTree, node_id: NodeId) -> bool {
    let siblings = || {
        tree.parent(node_id)
            .map(|parent| tree.element_children(parent).collect::<Vec<_>>())
            .unwrap_or_default()
    };

    match pc {
        PseudoClass::Root => tree.document_element() == Some(node_id),

        PseudoClass::NthChild(anb) => tree
            .element_index(node_id)
            .and_then(|index| i64::try_from(index).ok())
            .is_some_and(|index| anb.matches(index)),

        PseudoClass::FirstChild => siblings().first() == Some(&node_id),

        PseudoClass::LastChild => siblings().last() == Some(&node_id),

        PseudoClass::OnlyChild => siblings() == [node_id],

        PseudoClass::Empty => tree.children(node_id).iter().all(|&child| {
            match tree.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(t)) => t.trim().is_empty(),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            }
        }),
    }
}

/// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
///
/// Find the immediately preceding element sibling (skipping text/comment nodes).
fn find_previous_element_sibling(tree: &DomTree, node_id: NodeId) -> Option<NodeId> {
    tree.preceding_siblings(node_id)
        .find(|&sibling_id| tree.as_element(sibling_id).is_some())
}

impl SimpleSelector {
    /// Check if this simple selector matches the given element.
    ///
    /// Structural pseudo-classes need tree context and never match here.
    #[must_use]
    pub fn matches(&self, element: &ElementData, mode: DocumentMode) -> bool {
        match self {
            // [§ 5.1](https://www.w3.org/TR/selectors-4/#type-selectors)
            // HTML element names are matched ASCII case-insensitively; XML
            // names are matched exactly.
            Self::Type(name) => match mode {
                DocumentMode::Html => element.tag_name.eq_ignore_ascii_case(name),
                DocumentMode::Xhtml => element.tag_name == *name,
            },

            Self::Class(class_name) => element.has_class(class_name),

            Self::Id(id) => element.id() == Some(id.as_str()),

            Self::Universal => true,

            Self::PseudoClass(_) => false,

            Self::Attribute(attr_sel) => attr_sel.matches(element),
        }
    }
}

impl AttributeSelector {
    /// Check the attribute condition against an element.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        match self {
            Self::Exists(name) => element.has_attr(name),
            Self::Equals(name, val) => element.attr(name) == Some(val.as_str()),
            Self::Includes(name, val) => element
                .attr(name)
                .is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val)),
            Self::DashMatch(name, val) => element.attr(name).is_some_and(|v| {
                v == val || v.strip_prefix(val.as_str()).is_some_and(|rest| rest.starts_with('-'))
            }),
            // An empty value never matches for ^=, $= and *=.
            Self::PrefixMatch(name, val) => {
                !val.is_empty() && element.attr(name).is_some_and(|v| v.starts_with(val.as_str()))
            }
            Self::SuffixMatch(name, val) => {
                !val.is_empty() && element.attr(name).is_some_and(|v| v.ends_with(val.as_str()))
            }
            Self::SubstringMatch(name, val) => {
                !val.is_empty() && element.attr(name).is_some_and(|v| v.contains(val.as_str()))
            }
        }
    }
}
