//! Syntax tree for parsed patterns.
//!
//! Every node keeps the exact pattern text it was parsed from. The DFA
//! builder uses that text as the identity of a guard, and the DOT export
//! uses it as an edge label.

use crate::cursor::Cursor;

/// Root of a parsed pattern. Matches only when the alternation consumes the
/// whole input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    pub alternation: Alternation,
    pub label: String,
}

/// Ordered alternatives; earlier branches are preferred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alternation {
    pub branches: Vec<Term>,
    pub label: String,
}

/// A quantified atom followed by the rest of its concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
    pub atom: Atom,
    pub repeat: Repeat,
    pub tail: Option<Box<Term>>,
    /// Source text of this term and its tail.
    pub label: String,
}

impl Term {
    /// Iterate over this term and every tail term after it.
    pub fn chain(&self) -> impl Iterator<Item = &Term> {
        std::iter::successors(Some(self), |term| term.tail.as_deref())
    }
}

/// Repetition range; `max == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Repeat {
    pub min: u32,
    pub max: Option<u32>,
}

impl Repeat {
    pub const ONCE: Repeat = Repeat {
        min: 1,
        max: Some(1),
    };

    #[inline]
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// True when one more repetition is allowed after `count`.
    #[inline]
    pub fn allows_more(&self, count: u32) -> bool {
        self.max.map_or(true, |max| count < max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Atom {
    Group(Alternation),
    Charset(Charset),
    Meta(Meta),
}

/// `[...]` or `[^...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Charset {
    pub negated: bool,
    pub items: Vec<Meta>,
    /// Source text including the brackets.
    pub label: String,
}

impl Charset {
    /// Test the next character against the entries in order.
    ///
    /// Each entry reads the same character; a rejecting entry is rolled back
    /// before the next one is tried. When nothing accepts, the character is
    /// still consumed, so the cursor always moves by exactly one.
    pub fn matches(&self, cursor: &mut Cursor<'_>) -> bool {
        if cursor.is_eof() {
            return false;
        }
        let mut hit = false;
        for item in &self.items {
            if item.matches(cursor) {
                hit = true;
                break;
            }
            cursor.step_back(1);
        }
        if !hit {
            cursor.step_forward(1);
        }
        hit != self.negated
    }
}

/// A single-character predicate or a zero-width assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meta {
    pub kind: MetaKind,
    pub label: String,
}

impl Meta {
    /// Consuming kinds read one character; assertions leave the cursor where
    /// it was.
    pub fn matches(&self, cursor: &mut Cursor<'_>) -> bool {
        match self.kind {
            MetaKind::Assertion(assertion) => assertion.holds(cursor),
            _ => match cursor.read() {
                Some(c) => self.kind.accepts(c),
                None => false,
            },
        }
    }

    #[inline]
    pub fn is_zero_width(&self) -> bool {
        matches!(self.kind, MetaKind::Assertion(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Literal(char),
    /// Inclusive range.
    Range(char, char),
    Class(Class),
    Assertion(Assertion),
}

impl MetaKind {
    /// Predicate for consuming kinds. Assertions never accept a character.
    pub fn accepts(&self, c: char) -> bool {
        match *self {
            MetaKind::Literal(l) => c == l,
            MetaKind::Range(lo, hi) => lo <= c && c <= hi,
            MetaKind::Class(class) => class.accepts(c),
            MetaKind::Assertion(_) => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    /// `.`
    Any,
    Digit,
    NotDigit,
    Word,
    NotWord,
    Space,
    NotSpace,
}

impl Class {
    pub fn accepts(self, c: char) -> bool {
        match self {
            Class::Any => c != '\n' && c != '\r',
            Class::Digit => c.is_ascii_digit(),
            Class::NotDigit => !c.is_ascii_digit(),
            Class::Word => is_word(c),
            Class::NotWord => !is_word(c),
            Class::Space => is_space(c),
            Class::NotSpace => !is_space(c),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    /// `^`
    LineBegin,
    /// `$`
    LineEnd,
    /// `\b`
    Boundary,
    /// `\B`
    NonBoundary,
}

impl Assertion {
    /// Evaluate at the cursor position without consuming anything.
    ///
    /// Boundaries compare the two sides of the position, each classified as
    /// "whitespace or edge of input" versus anything else.
    pub fn holds(self, cursor: &Cursor<'_>) -> bool {
        let behind = cursor.look_behind();
        let ahead = cursor.peek();
        match self {
            Assertion::LineBegin => matches!(behind, None | Some('\n')),
            Assertion::LineEnd => matches!(ahead, None | Some('\n')),
            Assertion::Boundary => is_space_or_edge(behind) != is_space_or_edge(ahead),
            Assertion::NonBoundary => is_space_or_edge(behind) == is_space_or_edge(ahead),
        }
    }
}

/// An automaton transition predicate: a single Meta or a whole Charset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    Meta(Meta),
    Charset(Charset),
}

impl Guard {
    #[inline]
    pub fn label(&self) -> &str {
        match self {
            Guard::Meta(meta) => &meta.label,
            Guard::Charset(set) => &set.label,
        }
    }

    #[inline]
    pub fn is_zero_width(&self) -> bool {
        match self {
            Guard::Meta(meta) => meta.is_zero_width(),
            Guard::Charset(_) => false,
        }
    }

    #[inline]
    pub fn matches(&self, cursor: &mut Cursor<'_>) -> bool {
        match self {
            Guard::Meta(meta) => meta.matches(cursor),
            Guard::Charset(set) => set.matches(cursor),
        }
    }
}

#[inline]
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

#[inline]
fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C')
}

#[inline]
fn is_space_or_edge(c: Option<char>) -> bool {
    c.map_or(true, is_space)
}
