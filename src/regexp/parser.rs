//! Recursive-descent parser for the pattern language.
//!
//! Grammar:
//!
//! ```text
//! Pattern     := Alternation $
//! Alternation := Term ('|' Alternation)?
//! Term        := Atom Quantifier? Term?
//! Atom        := '(' Alternation ')' | '[' Charset ']' | Meta
//! Charset     := '^'? Meta+
//! Quantifier  := '+' | '*' | '?' | '{' m (',' n?)? '}'
//! ```
//!
//! Group and charset bodies are found by scanning ahead for the closing
//! delimiter and then parsed through a cursor window over just the body.
//! Any failure aborts the whole parse.

use crate::cursor::Cursor;
use crate::Error;

use super::ast::{
    Alternation, Assertion, Atom, Charset, Class, Meta, MetaKind, Pattern, Repeat, Term,
};

/// Largest repetition count accepted in `{m,n}`.
///
/// This bounds a single quantifier only. Nested quantifiers multiply, so the
/// automaton size is bounded separately by [`EXPANSION_MAX`].
pub const REPEAT_MAX: u32 = 1000;

/// Largest number of NFA states a pattern may expand into.
///
/// Estimated from the syntax tree before anything is built; patterns over it
/// are rejected as invalid.
pub const EXPANSION_MAX: u64 = 1_000_000;

/// Characters that may follow `\` to stand for themselves.
const ESCAPABLE: &str = "\\.*+?{}[]()^$|-";

/// Parse `pattern` into a syntax tree.
pub fn parse(pattern: &str) -> Result<Pattern, Error> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut cursor = Cursor::new(&chars);
    let alternation = parse_alternation(&mut cursor)?;
    if let Some(c) = cursor.peek() {
        return Err(Error::invalid(
            format!("unexpected '{c}'"),
            cursor.position(),
        ));
    }
    if expansion(&alternation) > EXPANSION_MAX {
        return Err(Error::invalid(
            format!("pattern expands past {EXPANSION_MAX} automaton states"),
            0,
        ));
    }
    Ok(Pattern {
        alternation,
        label: pattern.to_string(),
    })
}

/// Upper bound on the states the NFA builder allocates for `alternation`.
fn expansion(alternation: &Alternation) -> u64 {
    alternation.branches.iter().fold(2, |total, branch| {
        branch
            .chain()
            .fold(total, |total, term| total.saturating_add(term_expansion(term)))
    })
}

fn term_expansion(term: &Term) -> u64 {
    let atom = match &term.atom {
        Atom::Group(group) => expansion(group),
        Atom::Meta(_) | Atom::Charset(_) => 2,
    };
    let repeat = term.repeat;
    let copies = repeat.max.unwrap_or(repeat.min).max(1);
    atom.saturating_mul(u64::from(copies)).saturating_add(2)
}

fn parse_alternation(cursor: &mut Cursor<'_>) -> Result<Alternation, Error> {
    let start = cursor.position();
    let mut branches = vec![parse_term(cursor)?];
    while cursor.peek() == Some('|') {
        cursor.read();
        branches.push(parse_term(cursor)?);
    }
    Ok(Alternation {
        branches,
        label: cursor.slice(start, cursor.position()),
    })
}

/// Parse a concatenation up to the next `|` or the end of the window.
///
/// Links are collected first and folded from the right so long
/// concatenations do not recurse once per atom while parsing.
fn parse_term(cursor: &mut Cursor<'_>) -> Result<Term, Error> {
    let mut links = Vec::new();
    loop {
        let start = cursor.position();
        let atom = parse_atom(cursor)?;
        let repeat = parse_quantifier(cursor)?;
        links.push((start, atom, repeat));
        if matches!(cursor.peek(), None | Some('|')) {
            break;
        }
    }

    let end = cursor.position();
    let mut chain: Option<Box<Term>> = None;
    for (start, atom, repeat) in links.into_iter().rev() {
        chain = Some(Box::new(Term {
            atom,
            repeat,
            tail: chain,
            label: cursor.slice(start, end),
        }));
    }
    // `links` always holds at least one entry.
    chain
        .map(|term| *term)
        .ok_or_else(|| Error::invalid("expected an atom", end))
}

fn parse_atom(cursor: &mut Cursor<'_>) -> Result<Atom, Error> {
    let start = cursor.position();
    match cursor.peek() {
        None => Err(Error::invalid("expected an atom", start)),
        Some('|') => Err(Error::invalid("empty alternative", start)),
        Some(')') => Err(Error::invalid("unmatched ')'", start)),
        Some('*' | '+' | '?' | '{') => Err(Error::invalid("nothing to repeat", start)),
        Some('(') => {
            let close = find_group_close(cursor, start)?;
            let mut body = cursor.window(start + 1, close);
            let alternation = parse_alternation(&mut body)?;
            cursor.restore(close + 1);
            Ok(Atom::Group(alternation))
        }
        Some('[') => {
            let close = find_charset_close(cursor, start)?;
            let mut body = cursor.window(start + 1, close);
            let charset = parse_charset(&mut body, cursor.slice(start, close + 1), start)?;
            cursor.restore(close + 1);
            Ok(Atom::Charset(charset))
        }
        Some(_) => parse_meta(cursor).map(Atom::Meta),
    }
}

/// Position of the `)` closing the group opened at `open`.
fn find_group_close(cursor: &Cursor<'_>, open: usize) -> Result<usize, Error> {
    let mut scan = cursor.at(open + 1);
    let mut depth = 1usize;
    while let Some(c) = scan.read() {
        match c {
            '\\' => {
                scan.read();
            }
            '[' => {
                let close = find_charset_close(&scan, scan.position() - 1)?;
                scan.restore(close + 1);
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(scan.position() - 1);
                }
            }
            _ => {}
        }
    }
    Err(Error::invalid("unterminated group", open))
}

/// Position of the `]` closing the charset opened at `open`.
fn find_charset_close(cursor: &Cursor<'_>, open: usize) -> Result<usize, Error> {
    let mut scan = cursor.at(open + 1);
    while let Some(c) = scan.read() {
        match c {
            '\\' => {
                scan.read();
            }
            ']' => return Ok(scan.position() - 1),
            _ => {}
        }
    }
    Err(Error::invalid("unterminated character class", open))
}

fn parse_quantifier(cursor: &mut Cursor<'_>) -> Result<Repeat, Error> {
    let start = cursor.position();
    let repeat = match cursor.peek() {
        Some('+') => Repeat::new(1, None),
        Some('*') => Repeat::new(0, None),
        Some('?') => Repeat::new(0, Some(1)),
        Some('{') => {
            cursor.read();
            return parse_bounds(cursor, start);
        }
        _ => return Ok(Repeat::ONCE),
    };
    cursor.read();
    Ok(repeat)
}

/// Parse the inside of `{m}`, `{m,}` or `{m,n}`; the `{` is already read.
fn parse_bounds(cursor: &mut Cursor<'_>, open: usize) -> Result<Repeat, Error> {
    let min = parse_count(cursor)?;
    let max = match cursor.read() {
        Some('}') => Some(min),
        Some(',') => {
            if cursor.peek() == Some('}') {
                cursor.read();
                None
            } else {
                let max = parse_count(cursor)?;
                if cursor.read() != Some('}') {
                    return Err(Error::invalid("unterminated repetition", open));
                }
                Some(max)
            }
        }
        None => return Err(Error::invalid("unterminated repetition", open)),
        Some(c) => {
            return Err(Error::invalid(
                format!("unexpected '{c}' in repetition"),
                cursor.position() - 1,
            ))
        }
    };
    if let Some(max) = max {
        if min > max {
            return Err(Error::invalid(
                format!("repetition minimum {min} exceeds maximum {max}"),
                open,
            ));
        }
    }
    Ok(Repeat::new(min, max))
}

fn parse_count(cursor: &mut Cursor<'_>) -> Result<u32, Error> {
    let start = cursor.position();
    let mut value: u32 = 0;
    while let Some(digit) = cursor.peek().and_then(|c| c.to_digit(10)) {
        cursor.read();
        value = value
            .checked_mul(10)
            .and_then(|v| v.checked_add(digit))
            .filter(|&v| v <= REPEAT_MAX)
            .ok_or_else(|| {
                Error::invalid(
                    format!("repetition count exceeds {REPEAT_MAX}"),
                    start,
                )
            })?;
    }
    if cursor.position() == start {
        return Err(Error::invalid("expected repetition count", start));
    }
    Ok(value)
}

/// Parse one meta outside a charset.
fn parse_meta(cursor: &mut Cursor<'_>) -> Result<Meta, Error> {
    let start = cursor.position();
    let kind = match cursor.read() {
        None => return Err(Error::invalid("expected an atom", start)),
        Some('.') => MetaKind::Class(Class::Any),
        Some('^') => MetaKind::Assertion(Assertion::LineBegin),
        Some('$') => MetaKind::Assertion(Assertion::LineEnd),
        Some('\\') => parse_escape(cursor, start, false)?,
        Some(c) => MetaKind::Literal(c),
    };
    Ok(Meta {
        kind,
        label: cursor.slice(start, cursor.position()),
    })
}

/// Parse the character after `\`; `start` is the position of the backslash.
fn parse_escape(cursor: &mut Cursor<'_>, start: usize, in_charset: bool) -> Result<MetaKind, Error> {
    let Some(c) = cursor.read() else {
        return Err(Error::invalid("trailing escape", start));
    };
    let kind = match c {
        'd' => MetaKind::Class(Class::Digit),
        'D' => MetaKind::Class(Class::NotDigit),
        'w' => MetaKind::Class(Class::Word),
        'W' => MetaKind::Class(Class::NotWord),
        's' => MetaKind::Class(Class::Space),
        'S' => MetaKind::Class(Class::NotSpace),
        't' => MetaKind::Literal('\t'),
        'r' => MetaKind::Literal('\r'),
        'n' => MetaKind::Literal('\n'),
        'b' if !in_charset => MetaKind::Assertion(Assertion::Boundary),
        'B' if !in_charset => MetaKind::Assertion(Assertion::NonBoundary),
        c if ESCAPABLE.contains(c) => MetaKind::Literal(c),
        c => {
            return Err(Error::invalid(
                format!("invalid escape sequence '\\{c}'"),
                start,
            ))
        }
    };
    Ok(kind)
}

/// Parse a charset body (the text between the brackets).
fn parse_charset(body: &mut Cursor<'_>, label: String, open: usize) -> Result<Charset, Error> {
    let negated = body.peek() == Some('^');
    if negated {
        body.read();
    }
    let mut items = Vec::new();
    while !body.is_eof() {
        items.push(parse_charset_item(body)?);
    }
    if items.is_empty() {
        return Err(Error::invalid("empty character class", open));
    }
    Ok(Charset {
        negated,
        items,
        label,
    })
}

fn parse_charset_item(body: &mut Cursor<'_>) -> Result<Meta, Error> {
    let start = body.position();
    let kind = match body.read() {
        None => return Err(Error::invalid("expected a class entry", start)),
        Some('\\') => parse_escape(body, start, true)?,
        Some(lo) if lo.is_ascii_alphanumeric() && starts_range(body) => {
            body.read();
            let hi = body.read().unwrap_or(lo);
            let same_kind = (lo.is_ascii_alphabetic() && hi.is_ascii_alphabetic())
                || (lo.is_ascii_digit() && hi.is_ascii_digit());
            if !same_kind || lo > hi {
                return Err(Error::invalid(
                    format!("invalid range '{lo}-{hi}'"),
                    start,
                ));
            }
            MetaKind::Range(lo, hi)
        }
        Some(c) => MetaKind::Literal(c),
    };
    Ok(Meta {
        kind,
        label: body.slice(start, body.position()),
    })
}

/// True when the cursor sits on a `-` that is followed by a range end.
fn starts_range(body: &Cursor<'_>) -> bool {
    let mut ahead = *body;
    ahead.read() == Some('-') && ahead.peek().is_some()
}
