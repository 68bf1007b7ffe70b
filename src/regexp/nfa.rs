//! Thompson construction from a parsed pattern into an arena NFA.
//!
//! Every Meta or Charset atom becomes a two-state fragment whose entry state
//! carries the guard. Quantifiers are expanded by cloning the atom's fragment:
//! `min` mandatory copies chained together, followed by either one looping
//! copy (unbounded) or `max - min` optional copies that can each exit early.
//! The atom is built once; the first copy is that fragment itself and later
//! copies are clones of it, taken before anything can follow its end.
//!
//! The result is passed through `Nfa::collapse_epsilons` before it is
//! returned.

use crate::automaton::{Fragment, GuardId, Nfa, StateArena, StateId};

use super::ast::{Alternation, Atom, Guard, Pattern, Term};

/// Build the NFA for a parsed pattern.
pub fn build_nfa(pattern: &Pattern) -> Nfa {
    let mut builder = NfaBuilder {
        arena: StateArena::with_capacity(16),
        guards: Vec::new(),
    };
    let fragment = builder.alternation(&pattern.alternation);
    let mut nfa = Nfa::new(builder.arena, builder.guards, fragment.start, fragment.end);
    nfa.collapse_epsilons();
    nfa
}

struct NfaBuilder {
    arena: StateArena,
    guards: Vec<Guard>,
}

impl NfaBuilder {
    fn epsilon(&mut self) -> StateId {
        self.arena.alloc(None)
    }

    fn alternation(&mut self, alternation: &Alternation) -> Fragment {
        if let [only] = alternation.branches.as_slice() {
            return self.sequence(only);
        }
        let start = self.epsilon();
        let end = self.epsilon();
        for branch in &alternation.branches {
            let fragment = self.sequence(branch);
            self.arena.connect(start, fragment.start);
            self.arena.connect(fragment.end, end);
        }
        Fragment { start, end }
    }

    /// A term and all of its tail terms, chained end to start.
    fn sequence(&mut self, first: &Term) -> Fragment {
        let mut fragment = self.quantified(first);
        for term in first.chain().skip(1) {
            let next = self.quantified(term);
            self.arena.connect(fragment.end, next.start);
            fragment.end = next.end;
        }
        fragment
    }

    fn atom(&mut self, atom: &Atom) -> Fragment {
        match atom {
            Atom::Group(group) => self.alternation(group),
            Atom::Meta(meta) => self.guarded(Guard::Meta(meta.clone())),
            Atom::Charset(set) => self.guarded(Guard::Charset(set.clone())),
        }
    }

    fn guarded(&mut self, guard: Guard) -> Fragment {
        let id = GuardId::new(self.guards.len());
        self.guards.push(guard);
        let start = self.arena.alloc(Some(id));
        let end = self.epsilon();
        self.arena.connect(start, end);
        Fragment { start, end }
    }

    /// One term without its tail, with the quantifier expanded.
    fn quantified(&mut self, term: &Term) -> Fragment {
        let template = self.atom(&term.atom);
        let mut unused = Some(template);
        let mut copy = |arena: &mut StateArena| {
            unused
                .take()
                .unwrap_or_else(|| arena.clone_fragment(template))
        };
        let start = self.epsilon();
        let exit = self.epsilon();
        let repeat = term.repeat;

        let mut current = start;
        let mut last = None;
        for _ in 0..repeat.min {
            let next = copy(&mut self.arena);
            self.arena.connect(current, next.start);
            current = next.end;
            last = Some(next);
        }

        match repeat.max {
            None => {
                // `X+` loops on its last mandatory copy; `X*` needs one of its own.
                let looping = match last {
                    Some(mandatory) => mandatory,
                    None => {
                        let next = copy(&mut self.arena);
                        self.arena.connect(current, next.start);
                        self.arena.connect(current, exit);
                        current = next.end;
                        next
                    }
                };
                self.arena.connect(looping.end, looping.start);
                self.arena.connect(current, exit);
            }
            Some(max) => {
                self.arena.connect(current, exit);
                for _ in repeat.min..max {
                    let next = copy(&mut self.arena);
                    self.arena.connect(current, next.start);
                    self.arena.connect(next.end, exit);
                    current = next.end;
                }
            }
        }

        Fragment { start, end: exit }
    }
}
