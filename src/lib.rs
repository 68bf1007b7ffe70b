//! miniregex: a small regular-expression engine with three interchangeable
//! matchers.
//!
//! A pattern is parsed once into a syntax tree and can then be matched by
//! backtracking over the tree, by simulating a Thompson NFA, or by simulating
//! a DFA built from that NFA by subset construction. All three decide the
//! same language; they differ only in cost. Matching is always against the
//! whole input.
//!
//! ```
//! use miniregex::{Regex, Strategy};
//!
//! let re = Regex::new(r"(\d{2,3}[a-z]+){2,3}").unwrap();
//! assert!(re.is_match("12xyz34abc567defg"));
//! assert!(!re.is_match("12xyz"));
//!
//! // Force a particular matcher.
//! let re = Regex::builder(r"\w+word\b")
//!     .strategy(Strategy::Backtrack)
//!     .build()
//!     .unwrap();
//! assert!(re.is_match("keyword"));
//! ```

pub mod automaton;
mod cache;
pub mod cursor;
pub mod regexp;

use std::fmt;
use std::io;
use std::sync::OnceLock;

use log::debug;

use automaton::{Dfa, Nfa};
use regexp::Pattern;

pub use cache::RegexCache;
pub use regexp::{parse, EXPANSION_MAX, REPEAT_MAX};

/// Errors produced while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid pattern: {message} at offset {offset}")]
    InvalidPattern { message: String, offset: usize },
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>, offset: usize) -> Self {
        Error::InvalidPattern {
            message: message.into(),
            offset,
        }
    }

    /// Character offset in the pattern where the problem was found.
    pub fn offset(&self) -> usize {
        match self {
            Error::InvalidPattern { offset, .. } => *offset,
        }
    }
}

/// Which matcher `Regex::is_match` runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// Walk the syntax tree with backtracking. Exponential in the worst case.
    Backtrack,
    /// Simulate the Thompson NFA.
    Nfa,
    /// Simulate the DFA built from the NFA.
    #[default]
    Dfa,
}

/// A compiled pattern.
///
/// The automaton for the configured strategy is built eagerly; the others
/// are built the first time `is_match_with` asks for them.
#[derive(Debug)]
pub struct Regex {
    pattern: String,
    ast: Pattern,
    strategy: Strategy,
    nfa: OnceLock<Nfa>,
    dfa: OnceLock<Dfa>,
}

impl Regex {
    /// Compile `pattern` with the default strategy.
    pub fn new(pattern: &str) -> Result<Self, Error> {
        RegexBuilder::new(pattern).build()
    }

    pub fn with_strategy(pattern: &str, strategy: Strategy) -> Result<Self, Error> {
        RegexBuilder::new(pattern).strategy(strategy).build()
    }

    pub fn builder(pattern: &str) -> RegexBuilder {
        RegexBuilder::new(pattern)
    }

    /// True when `text` as a whole matches the pattern.
    pub fn is_match(&self, text: &str) -> bool {
        self.is_match_with(text, self.strategy)
    }

    /// Like `is_match`, with an explicit matcher.
    pub fn is_match_with(&self, text: &str, strategy: Strategy) -> bool {
        let chars: Vec<char> = text.chars().collect();
        match strategy {
            Strategy::Backtrack => regexp::backtrack::is_match(&self.ast, &chars),
            Strategy::Nfa => self.nfa().is_match(&chars),
            Strategy::Dfa => self.dfa().is_match(&chars),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The parsed syntax tree.
    pub fn pattern(&self) -> &Pattern {
        &self.ast
    }

    pub fn nfa(&self) -> &Nfa {
        self.nfa.get_or_init(|| {
            let nfa = regexp::build_nfa(&self.ast);
            debug!(
                "built NFA for {:?}: {} states, {} reachable",
                self.pattern,
                nfa.len(),
                nfa.reachable().len()
            );
            nfa
        })
    }

    pub fn dfa(&self) -> &Dfa {
        self.dfa.get_or_init(|| {
            let dfa = Dfa::from_nfa(self.nfa());
            debug!("built DFA for {:?}: {} states", self.pattern, dfa.len());
            dfa
        })
    }

    /// Write the NFA in Graphviz DOT format.
    pub fn write_nfa_dot(&self, out: impl io::Write) -> io::Result<()> {
        automaton::write_nfa(self.nfa(), out)
    }

    /// Write the DFA in Graphviz DOT format.
    pub fn write_dfa_dot(&self, out: impl io::Write) -> io::Result<()> {
        automaton::write_dfa(self.dfa(), out)
    }
}

impl fmt::Display for Regex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Configuration for compiling a `Regex`.
#[derive(Debug, Clone)]
pub struct RegexBuilder {
    pattern: String,
    strategy: Strategy,
}

impl RegexBuilder {
    pub fn new(pattern: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            strategy: Strategy::default(),
        }
    }

    pub fn strategy(&mut self, strategy: Strategy) -> &mut Self {
        self.strategy = strategy;
        self
    }

    pub fn build(&self) -> Result<Regex, Error> {
        let ast = parse(&self.pattern)?;
        let regex = Regex {
            pattern: self.pattern.clone(),
            ast,
            strategy: self.strategy,
            nfa: OnceLock::new(),
            dfa: OnceLock::new(),
        };
        match regex.strategy {
            Strategy::Backtrack => {}
            Strategy::Nfa => {
                regex.nfa();
            }
            Strategy::Dfa => {
                regex.dfa();
            }
        }
        Ok(regex)
    }
}

/// Compile `pattern` with the default strategy.
pub fn compile(pattern: &str) -> Result<Regex, Error> {
    Regex::new(pattern)
}
