//! Identifier escaping, selector matching, and unique selector synthesis for pinpoint.
//!
//! # Scope
//!
//! This crate implements:
//! - **Identifier escaping** ([CSSOM § 2.1](https://drafts.csswg.org/cssom/#serialize-an-identifier))
//!   - String, boolean, null, and undefined inputs
//!   - Control characters, leading digits, and leading hyphens
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal, and attribute selectors
//!   - Structural pseudo-classes (`:root`, `:nth-child()`, `:first-child`, ...)
//!   - Complex selectors with combinators (descendant, child, sibling)
//!   - CSS escapes in identifiers and strings
//!
//! - **Document queries**
//!   - The [`DocumentQuery`] capability the synthesizer checks selectors with
//!   - [`TreeQuery`], its implementation over a [`pinpoint_dom::DomTree`]
//!
//! - **Selector synthesis**
//!   - Priority-ordered element features (custom tag, role, tag, name, classes, URI)
//!   - Positional tie-breaking with `:nth-child()`
//!   - Ancestor walk until the selector is unique
//!
//! # Not Yet Implemented
//!
//! - Selector lists (`a, b`)
//! - Namespaced type selectors (`svg|rect`)
//! - Pseudo-elements and non-structural pseudo-classes

/// Identifier escaping per [CSSOM § 2.1](https://drafts.csswg.org/cssom/#serialize-an-identifier).
pub mod escape;
/// Selector queries against a document.
pub mod query;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// Unique selector synthesis.
pub mod synthesize;

// Re-exports for convenience
pub use escape::{CssValue, EscapeError, escape_identifier};
pub use query::{DocumentQuery, QueryError, TreeQuery};
pub use selector::{ParsedSelector, SelectorError, parse_selector};
pub use synthesize::{
    Ascent, AscentState, SynthesisError, SynthesisOptions, Synthesizer, synthesize_selector,
};
