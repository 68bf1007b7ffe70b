//! Pattern parsing, the syntax tree, and the two matchers that work from it
//! directly: the backtracker and the Thompson NFA builder.
//!
//! Supported syntax:
//! - literals, and `\` escapes of `\.*+?{}[]()^$|-`
//! - `\t`, `\r`, `\n`
//! - `.` matches anything except `\n` and `\r`
//! - `\d \D \w \W \s \S` character classes
//! - `[...]` and `[^...]` with `a-z` / `0-9` style ranges
//! - `^`, `$`, `\b`, `\B` zero-width assertions
//! - `(...)` groups and `|` alternation
//! - `?`, `*`, `+`, `{n}`, `{n,}`, `{n,m}` quantifiers, greedy, at most
//!   `REPEAT_MAX` per bound, and at most `EXPANSION_MAX` automaton states
//!   once nested quantifiers are multiplied out
//!
//! Matching always covers the whole input.

mod ast;
pub mod backtrack;
mod nfa;
mod parser;

pub use ast::{
    Alternation, Assertion, Atom, Charset, Class, Guard, Meta, MetaKind, Pattern, Repeat, Term,
};
pub use nfa::build_nfa;
pub use parser::{parse, EXPANSION_MAX, REPEAT_MAX};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let pattern = parse("abc").unwrap();
        assert_eq!(pattern.label, "abc");
        assert_eq!(pattern.alternation.branches.len(), 1);
        assert_eq!(pattern.alternation.branches[0].chain().count(), 3);
    }

    #[test]
    fn test_parse_alternation() {
        let pattern = parse("cat|dog").unwrap();
        let labels: Vec<_> = pattern
            .alternation
            .branches
            .iter()
            .map(|b| b.label.as_str())
            .collect();
        assert_eq!(labels, vec!["cat", "dog"]);
    }

    #[test]
    fn test_parse_charset_keeps_brackets_in_label() {
        let pattern = parse("[^a-z_]+").unwrap();
        let term = &pattern.alternation.branches[0];
        match &term.atom {
            Atom::Charset(set) => {
                assert!(set.negated);
                assert_eq!(set.label, "[^a-z_]");
                assert_eq!(set.items.len(), 2);
                assert_eq!(set.items[0].kind, MetaKind::Range('a', 'z'));
            }
            other => panic!("expected charset, got {other:?}"),
        }
        assert_eq!(term.repeat, Repeat::new(1, None));
    }

    #[test]
    fn test_guard_labels() {
        let pattern = parse("\\d[xy]").unwrap();
        let guards: Vec<Guard> = pattern.alternation.branches[0]
            .chain()
            .map(|term| match &term.atom {
                Atom::Meta(meta) => Guard::Meta(meta.clone()),
                Atom::Charset(set) => Guard::Charset(set.clone()),
                Atom::Group(_) => unreachable!(),
            })
            .collect();
        assert_eq!(guards[0].label(), "\\d");
        assert_eq!(guards[1].label(), "[xy]");
        assert!(!guards[0].is_zero_width());
    }

    #[test]
    fn test_backtrack_and_nfa_agree() {
        for (pattern, text) in [
            ("(\\w{2}\\d+)+[aeiou]+", "ab12aeiou"),
            ("[ \\t\\r\\n]*\\w+\\s*=\\s*[0-9]{1,}\\s*", "    aabb   =  9988 "),
            ("(a|b){3}", "abab"),
            ("a$\\nb", "a\nb"),
        ] {
            let parsed = parse(pattern).unwrap();
            let chars: Vec<char> = text.chars().collect();
            assert_eq!(
                backtrack::is_match(&parsed, &chars),
                build_nfa(&parsed).is_match(&chars),
                "{pattern} on {text:?}"
            );
        }
    }
}
