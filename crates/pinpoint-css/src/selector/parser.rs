//! [§ 4 Selector syntax](https://www.w3.org/TR/selectors-4/#syntax)
//!
//! A code-point parser for a single complex selector. Identifiers, strings,
//! and escapes follow [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization),
//! so anything produced by [`crate::escape::escape_identifier`] reads back
//! as the original value.

use thiserror::Error;

use super::{
    AnPlusB, AttributeSelector, Combinator, ComplexSelector, CompoundSelector, ParsedSelector,
    PseudoClass, SimpleSelector,
};

/// Errors from [`parse_selector`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectorError {
    /// The selector is empty or only whitespace.
    #[error("empty selector")]
    Empty,

    /// The selector uses syntax outside the supported grammar.
    #[error("invalid selector at position {position}: {reason}")]
    Invalid {
        /// Character index where parsing stopped.
        position: usize,
        /// What was expected or found.
        reason: &'static str,
    },

    /// A pseudo-class or pseudo-element the matcher does not implement.
    #[error("unsupported pseudo-class ':{0}'")]
    UnsupportedPseudo(String),
}

/// Parse a raw selector string into a [`ParsedSelector`].
///
/// Supports type, universal, id, class, attribute, and structural
/// pseudo-class selectors joined by descendant, child, next-sibling, and
/// subsequent-sibling combinators. Selector lists (`a, b`) are not supported.
///
/// # Errors
///
/// Returns a [`SelectorError`] describing the first problem found.
pub fn parse_selector(raw: &str) -> Result<ParsedSelector, SelectorError> {
    SelectorParser::new(raw).parse()
}

/// Cursor over the selector's code points.
struct SelectorParser {
    input: Vec<char>,
    position: usize,
}

impl SelectorParser {
    fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn error(&self, reason: &'static str) -> SelectorError {
        SelectorError::Invalid {
            position: self.position,
            reason,
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Compounds are collected left to right, then the chain is reversed so
    /// matching can walk up from the subject.
    fn parse(mut self) -> Result<ParsedSelector, SelectorError> {
        let _ = self.consume_whitespace();
        if self.peek().is_none() {
            return Err(SelectorError::Empty);
        }

        let mut compounds = vec![self.parse_compound()?];
        let mut combinators_between = Vec::new();

        loop {
            let had_whitespace = self.consume_whitespace();
            let combinator = match self.peek() {
                None => break,
                Some('>') => Combinator::Child,
                Some('+') => Combinator::NextSibling,
                Some('~') => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(self.error("unexpected character")),
            };
            if combinator != Combinator::Descendant {
                let _ = self.consume();
                let _ = self.consume_whitespace();
            }
            combinators_between.push(combinator);
            compounds.push(self.parse_compound()?);
        }

        let Some(subject) = compounds.pop() else {
            return Err(SelectorError::Empty);
        };

        // For "A > B C": compounds [A, B], combinators [Child, Descendant]
        // becomes [(Descendant, B), (Child, A)].
        let combinators = compounds
            .into_iter()
            .zip(combinators_between)
            .rev()
            .map(|(compound, combinator)| (combinator, compound))
            .collect();

        Ok(ParsedSelector {
            complex: ComplexSelector {
                subject,
                combinators,
            },
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// An optional type or universal selector followed by any number of
    /// id, class, attribute, and pseudo-class selectors.
    fn parse_compound(&mut self) -> Result<CompoundSelector, SelectorError> {
        let mut simple_selectors = Vec::new();

        if self.peek() == Some('*') {
            let _ = self.consume();
            simple_selectors.push(SimpleSelector::Universal);
        } else if self.would_start_ident_sequence(0) {
            simple_selectors.push(SimpleSelector::Type(self.consume_ident_sequence()));
        }

        loop {
            match self.peek() {
                // [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
                Some('#') => {
                    let _ = self.consume();
                    let name = self.consume_ident_sequence();
                    if name.is_empty() {
                        return Err(self.error("expected an id after '#'"));
                    }
                    simple_selectors.push(SimpleSelector::Id(name));
                }

                // [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
                Some('.') => {
                    let _ = self.consume();
                    if !self.would_start_ident_sequence(0) {
                        return Err(self.error("expected a class name after '.'"));
                    }
                    simple_selectors.push(SimpleSelector::Class(self.consume_ident_sequence()));
                }

                Some('[') => {
                    let _ = self.consume();
                    simple_selectors.push(SimpleSelector::Attribute(self.parse_attribute()?));
                }

                Some(':') => {
                    let _ = self.consume();
                    simple_selectors.push(SimpleSelector::PseudoClass(self.parse_pseudo_class()?));
                }

                _ => break,
            }
        }

        if simple_selectors.is_empty() {
            return Err(self.error("expected a selector"));
        }

        Ok(CompoundSelector { simple_selectors })
    }

    /// [§ 6.4 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    ///
    /// Called after the opening `[`.
    fn parse_attribute(&mut self) -> Result<AttributeSelector, SelectorError> {
        let _ = self.consume_whitespace();
        if !self.would_start_ident_sequence(0) {
            return Err(self.error("expected an attribute name"));
        }
        let name = self.consume_ident_sequence();
        let _ = self.consume_whitespace();

        let operator = match self.consume() {
            Some(']') => return Ok(AttributeSelector::Exists(name)),
            Some('=') => '=',
            Some(op @ ('~' | '|' | '^' | '$' | '*')) => {
                if self.consume() != Some('=') {
                    return Err(self.error("expected '=' in attribute selector"));
                }
                op
            }
            _ => return Err(self.error("expected ']' or an attribute operator")),
        };

        let _ = self.consume_whitespace();
        let value = match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                let _ = self.consume();
                self.consume_string(quote)?
            }
            _ if self.would_start_ident_sequence(0) => self.consume_ident_sequence(),
            _ => return Err(self.error("expected an attribute value")),
        };

        let _ = self.consume_whitespace();
        if self.consume() != Some(']') {
            return Err(self.error("expected ']'"));
        }

        Ok(match operator {
            '~' => AttributeSelector::Includes(name, value),
            '|' => AttributeSelector::DashMatch(name, value),
            '^' => AttributeSelector::PrefixMatch(name, value),
            '$' => AttributeSelector::SuffixMatch(name, value),
            '*' => AttributeSelector::SubstringMatch(name, value),
            _ => AttributeSelector::Equals(name, value),
        })
    }

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    ///
    /// Called after the `:`.
    fn parse_pseudo_class(&mut self) -> Result<PseudoClass, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::UnsupportedPseudo(":".to_string()));
        }
        if !self.would_start_ident_sequence(0) {
            return Err(self.error("expected a pseudo-class name"));
        }
        let name = self.consume_ident_sequence().to_ascii_lowercase();

        if self.peek() == Some('(') {
            let _ = self.consume();
            let mut argument = String::new();
            loop {
                match self.consume() {
                    Some(')') => break,
                    Some(c) => argument.push(c),
                    None => return Err(self.error("unterminated '('")),
                }
            }
            return match name.as_str() {
                "nth-child" => parse_an_plus_b(&argument)
                    .map(PseudoClass::NthChild)
                    .ok_or_else(|| self.error("invalid An+B expression")),
                _ => Err(SelectorError::UnsupportedPseudo(name)),
            };
        }

        match name.as_str() {
            "root" => Ok(PseudoClass::Root),
            "first-child" => Ok(PseudoClass::FirstChild),
            "last-child" => Ok(PseudoClass::LastChild),
            "only-child" => Ok(PseudoClass::OnlyChild),
            "empty" => Ok(PseudoClass::Empty),
            _ => Err(SelectorError::UnsupportedPseudo(name)),
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    ///
    /// Called after the opening quote; returns the unescaped contents.
    fn consume_string(&mut self, ending: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == ending => return Ok(value),
                None => return Err(self.error("unterminated string")),
                Some('\n') => return Err(self.error("newline in string")),
                Some('\\') => match self.peek() {
                    // "If the next input code point is EOF, do nothing."
                    None => {}
                    // "Otherwise, if the next input code point is a newline, consume it."
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => {
                    result.push(c);
                    let _ = self.consume();
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    let _ = self.consume();
                    result.push(self.consume_escaped_code_point());
                }
                _ => return result,
            }
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// Called after the backslash.
    fn consume_escaped_code_point(&mut self) -> char {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = String::from(c);
                while hex.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                    if let Some(c) = self.consume() {
                        hex.push(c);
                    }
                }
                // "If the next input code point is whitespace, consume it as well."
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                // "If this number is zero, or is for a surrogate, or is greater than
                // the maximum allowed code point, return U+FFFD."
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .filter(|&n| n != 0)
                    .and_then(char::from_u32)
                    .unwrap_or('\u{FFFD}')
            }
            // "EOF: This is a parse error. Return U+FFFD."
            None => '\u{FFFD}',
            Some(c) => c,
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    fn would_start_ident_sequence(&self, offset: usize) -> bool {
        match self.peek_at(offset) {
            Some('-') => match self.peek_at(offset + 1) {
                Some(c) if is_ident_start_code_point(c) || c == '-' => true,
                second => is_valid_escape(second, self.peek_at(offset + 2)),
            },
            Some(c) if is_ident_start_code_point(c) => true,
            first @ Some('\\') => is_valid_escape(first, self.peek_at(offset + 1)),
            _ => false,
        }
    }

    /// Consume whitespace; returns whether any was consumed.
    fn consume_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
        self.position != start
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// [CSS Syntax § 6.2 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-syntax)
///
/// Accepts `odd`, `even`, `B`, `An`, and `An+B` with optional signs and
/// whitespace around the `+`/`-` joining the two parts.
fn parse_an_plus_b(argument: &str) -> Option<AnPlusB> {
    let compact: String = argument
        .chars()
        .filter(|c| !is_whitespace(*c))
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "" => return None,
        "odd" => return Some(AnPlusB { a: 2, b: 1 }),
        "even" => return Some(AnPlusB { a: 2, b: 0 }),
        _ => {}
    }

    let Some((a_part, b_part)) = compact.split_once('n') else {
        return compact.parse().ok().map(|b| AnPlusB { a: 0, b });
    };

    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        _ => a_part.parse().ok()?,
    };
    let b = match b_part {
        "" => 0,
        _ if b_part.starts_with(['+', '-']) => b_part.parse().ok()?,
        _ => return None,
    };
    Some(AnPlusB { a, b })
}

/// [§ 4.2 whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}')
}

/// [§ 4.2 ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
const fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    matches!(first, Some('\\')) && !matches!(second, Some('\n'))
}
