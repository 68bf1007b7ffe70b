//! Backtracking matcher that walks the syntax tree directly.
//!
//! Matching is continuation-driven: each step consumes the goal at the head
//! of a continuation (the rest of the pattern still to match) and succeeds
//! overall only if some path empties the continuation at end of input.
//! Alternatives are tried left to right and quantifiers are greedy with
//! shrink, so the first successful path is the one a leftmost-preferring
//! greedy matcher would find.
//!
//! Choice points live on a heap `Vec` of frames rather than on the native
//! stack, and a continuation only grows with pattern nesting, never with the
//! number of repetitions. Long inputs therefore cost heap, not stack depth.
//!
//! Runtime is exponential in the worst case (`a?a?a?...aaa`); there is no
//! step budget.

use std::rc::Rc;

use crate::cursor::Cursor;

use super::ast::{Alternation, Atom, Pattern, Term};

#[derive(Clone, Copy)]
enum Goal<'p> {
    Alternation(&'p Alternation),
    Term(&'p Term),
    /// Whatever follows `term` in its concatenation.
    Tail(&'p Term),
    /// Decide whether a quantified group runs iteration `count + 1`.
    Repeat {
        term: &'p Term,
        group: &'p Alternation,
        count: u32,
    },
    /// A group iteration that started at `entered_at` just matched.
    Iterated {
        term: &'p Term,
        group: &'p Alternation,
        count: u32,
        entered_at: usize,
    },
}

struct Link<'p> {
    goal: Goal<'p>,
    next: Continuation<'p>,
}

/// Persistent goal list; frames share suffixes.
type Continuation<'p> = Option<Rc<Link<'p>>>;

fn then<'p>(goal: Goal<'p>, next: Continuation<'p>) -> Continuation<'p> {
    Some(Rc::new(Link { goal, next }))
}

enum Frame<'p, 'a> {
    /// Resume `cont` from `cursor`.
    Resume {
        cursor: Cursor<'a>,
        cont: Continuation<'p>,
    },
    /// Shorter runs of a single-character atom, longest last.
    Shrink {
        term: &'p Term,
        runs: Vec<Cursor<'a>>,
        cont: Continuation<'p>,
    },
}

/// Whole-input match of `pattern` against `text`.
pub fn is_match(pattern: &Pattern, text: &[char]) -> bool {
    let mut stack: Vec<Frame<'_, '_>> = Vec::new();
    let mut cursor = Cursor::new(text);
    let mut cont = then(Goal::Alternation(&pattern.alternation), None);
    loop {
        let advanced = match cont.take() {
            None if cursor.is_eof() => return true,
            None => false,
            Some(link) => {
                cont = link.next.clone();
                step(link.goal, &mut cursor, &mut cont, &mut stack)
            }
        };
        if !advanced {
            match resume(&mut stack) {
                Some((at, next)) => {
                    cursor = at;
                    cont = next;
                }
                None => return false,
            }
        }
    }
}

/// Pop the most recent choice point.
fn resume<'p, 'a>(stack: &mut Vec<Frame<'p, 'a>>) -> Option<(Cursor<'a>, Continuation<'p>)> {
    loop {
        match stack.pop()? {
            Frame::Resume { cursor, cont } => return Some((cursor, cont)),
            Frame::Shrink {
                term,
                mut runs,
                cont,
            } => {
                let Some(at) = runs.pop() else {
                    continue;
                };
                let resumed = then(Goal::Tail(term), cont.clone());
                if !runs.is_empty() {
                    stack.push(Frame::Shrink { term, runs, cont });
                }
                return Some((at, resumed));
            }
        }
    }
}

/// Execute one goal. Returns false when this path fails.
fn step<'p, 'a>(
    goal: Goal<'p>,
    cursor: &mut Cursor<'a>,
    cont: &mut Continuation<'p>,
    stack: &mut Vec<Frame<'p, 'a>>,
) -> bool {
    match goal {
        Goal::Alternation(alternation) => {
            let Some((first, rest)) = alternation.branches.split_first() else {
                return false;
            };
            for branch in rest.iter().rev() {
                stack.push(Frame::Resume {
                    cursor: *cursor,
                    cont: then(Goal::Term(branch), cont.clone()),
                });
            }
            *cont = then(Goal::Term(first), cont.take());
            true
        }
        Goal::Term(term) => match &term.atom {
            Atom::Group(group) => {
                *cont = then(
                    Goal::Repeat {
                        term,
                        group,
                        count: 0,
                    },
                    cont.take(),
                );
                true
            }
            Atom::Charset(set) => {
                guard_run(term, |c: &mut Cursor<'a>| set.matches(c), cursor, cont, stack)
            }
            Atom::Meta(meta) => {
                guard_run(term, |c: &mut Cursor<'a>| meta.matches(c), cursor, cont, stack)
            }
        },
        Goal::Tail(term) => {
            if let Some(tail) = term.tail.as_deref() {
                *cont = then(Goal::Term(tail), cont.take());
            }
            true
        }
        Goal::Repeat { term, group, count } => {
            let repeat = term.repeat;
            if !repeat.allows_more(count) {
                if count < repeat.min {
                    return false;
                }
                *cont = then(Goal::Tail(term), cont.take());
                return true;
            }
            // Stopping here is the fallback once another iteration fails.
            if count >= repeat.min {
                stack.push(Frame::Resume {
                    cursor: *cursor,
                    cont: then(Goal::Tail(term), cont.clone()),
                });
            }
            let after = then(
                Goal::Iterated {
                    term,
                    group,
                    count,
                    entered_at: cursor.position(),
                },
                cont.take(),
            );
            *cont = then(Goal::Alternation(group), after);
            true
        }
        Goal::Iterated {
            term,
            group,
            count,
            entered_at,
        } => {
            // An empty repetition past `min` cannot lead anywhere new.
            if count >= term.repeat.min && cursor.position() == entered_at {
                return false;
            }
            *cont = then(
                Goal::Repeat {
                    term,
                    group,
                    count: count + 1,
                },
                cont.take(),
            );
            true
        }
    }
}

/// Greedy-with-shrink repetition of a single-character atom.
///
/// A guard matches at most one way from a given position, so the positions
/// after each repetition are recorded up front. The longest run is taken
/// now; the shorter ones down to `min` become one `Shrink` frame.
fn guard_run<'p, 'a>(
    term: &'p Term,
    guard: impl Fn(&mut Cursor<'a>) -> bool,
    cursor: &mut Cursor<'a>,
    cont: &mut Continuation<'p>,
    stack: &mut Vec<Frame<'p, 'a>>,
) -> bool {
    let repeat = term.repeat;
    let mut runs = vec![*cursor];
    let mut current = *cursor;
    let mut count = 0u32;
    while repeat.allows_more(count) {
        let mut probe = current;
        if !guard(&mut probe) {
            break;
        }
        // A zero-width guard that already satisfied `min` can only repeat in place.
        if probe.position() == current.position() && count >= repeat.min {
            break;
        }
        current = probe;
        count += 1;
        runs.push(current);
    }
    if count < repeat.min {
        return false;
    }

    runs.pop();
    runs.drain(..repeat.min as usize);
    if !runs.is_empty() {
        stack.push(Frame::Shrink {
            term,
            runs,
            cont: cont.clone(),
        });
    }
    *cursor = current;
    *cont = then(Goal::Tail(term), cont.take());
    true
}
