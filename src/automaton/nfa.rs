//! Thompson NFA and its frontier-stepping simulation.
//!
//! Epsilon edges and zero-width assertions are resolved while simulating: at
//! each input position, every frontier state is expanded depth-first through
//! epsilon states and assertions that hold there, and every consuming state
//! reached is tested against the character at that position. One visited set
//! per position keeps epsilon cycles from looping.

use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::regexp::Guard;

use super::arena::{NfaState, StateArena, StateId};
use super::sparse_set::{Frontiers, SparseSet};

/// A compiled NFA: state arena, guard table, entry and accept states.
#[derive(Clone, Debug)]
pub struct Nfa {
    arena: StateArena,
    guards: Vec<Guard>,
    start: StateId,
    accept: StateId,
}

impl Nfa {
    pub fn new(arena: StateArena, guards: Vec<Guard>, start: StateId, accept: StateId) -> Self {
        Self {
            arena,
            guards,
            start,
            accept,
        }
    }

    #[inline]
    pub fn start(&self) -> StateId {
        self.start
    }

    #[inline]
    pub fn accept(&self) -> StateId {
        self.accept
    }

    /// Arena size, including states no longer reachable from `start`.
    #[inline]
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    #[inline]
    pub fn state(&self, id: StateId) -> &NfaState {
        &self.arena[id]
    }

    #[inline]
    pub fn edges(&self, id: StateId) -> &[StateId] {
        &self.arena[id].edges
    }

    #[inline]
    pub fn guards(&self) -> &[Guard] {
        &self.guards
    }

    /// The guard tested when entering `id`.
    #[inline]
    pub fn guard_of(&self, id: StateId) -> Option<&Guard> {
        self.arena[id].guard.map(|g| &self.guards[g.index()])
    }

    /// States reachable from `start`, in breadth-first order.
    pub fn reachable(&self) -> Vec<StateId> {
        let mut seen = SparseSet::new(self.len());
        let mut order = vec![self.start];
        seen.insert(self.start.index());
        let mut i = 0;
        while i < order.len() {
            for &target in self.edges(order[i]) {
                if seen.insert(target.index()) {
                    order.push(target);
                }
            }
            i += 1;
        }
        order
    }

    /// Merge every epsilon state that has exactly one predecessor into that
    /// predecessor, returning the number of states merged away.
    ///
    /// The start state and self-loops are left alone. If the accept state is
    /// merged, its predecessor becomes the accept state.
    pub fn collapse_epsilons(&mut self) -> usize {
        let order = self.reachable();
        let mut preds: Vec<SmallVec<[StateId; 2]>> = vec![SmallVec::new(); self.len()];
        for &state in &order {
            for &target in self.edges(state) {
                let incoming = &mut preds[target.index()];
                if !incoming.contains(&state) {
                    incoming.push(state);
                }
            }
        }

        let mut removed = vec![false; self.len()];
        let mut merged = 0;
        for &state in &order {
            if removed[state.index()] {
                continue;
            }
            let mut i = 0;
            while i < self.arena[state].edges.len() {
                let target = self.arena[state].edges[i];
                let mergeable = target != state
                    && target != self.start
                    && self.arena[target].guard.is_none()
                    && preds[target.index()][..] == [state];
                if !mergeable {
                    i += 1;
                    continue;
                }

                let inherited = std::mem::take(&mut self.arena[target].edges);
                self.arena[state].edges.remove(i);
                for successor in inherited {
                    let incoming = &mut preds[successor.index()];
                    incoming.retain(|p| *p != target);
                    if !incoming.contains(&state) {
                        incoming.push(state);
                    }
                    self.arena.connect(state, successor);
                }
                preds[target.index()].clear();
                removed[target.index()] = true;
                if target == self.accept {
                    self.accept = state;
                }
                merged += 1;
                // Inherited edges may expose further merges.
                i = 0;
            }
        }
        merged
    }

    /// Whole-input match of `text`.
    pub fn is_match(&self, text: &[char]) -> bool {
        let subject = Cursor::new(text);
        let mut frontiers = Frontiers::new(self.len());
        let mut seen = SparseSet::new(self.len());
        let mut stack = Vec::new();
        frontiers.current.insert(self.start.index());

        for pos in 0..text.len() {
            let at = subject.at(pos);
            seen.clear();
            for &from in frontiers.current.as_slice() {
                let next = &mut frontiers.next;
                self.walk(StateId::new(from), at, &mut seen, &mut stack, |target, consumed| {
                    if consumed {
                        next.insert(target.index());
                    }
                    false
                });
            }
            if frontiers.next.is_empty() {
                return false;
            }
            frontiers.advance();
        }

        let at = subject.at(text.len());
        seen.clear();
        frontiers.current.as_slice().iter().any(|&from| {
            let from = StateId::new(from);
            from == self.accept
                || self.walk(from, at, &mut seen, &mut stack, |target, _| target == self.accept)
        })
    }

    /// Expand `from` at `at` without consuming input.
    ///
    /// `enter` is called for each state entered through an epsilon edge or a
    /// holding assertion (`consumed == false`), and for each consuming state
    /// whose guard accepts the character at `at` (`consumed == true`). Only
    /// the former are expanded further. Returns true as soon as `enter` does.
    fn walk(
        &self,
        from: StateId,
        at: Cursor<'_>,
        seen: &mut SparseSet,
        stack: &mut Vec<StateId>,
        mut enter: impl FnMut(StateId, bool) -> bool,
    ) -> bool {
        stack.clear();
        stack.push(from);
        while let Some(state) = stack.pop() {
            for &target in self.edges(state) {
                if !seen.insert(target.index()) {
                    continue;
                }
                match self.guard_of(target) {
                    None => {
                        if enter(target, false) {
                            return true;
                        }
                        stack.push(target);
                    }
                    Some(guard) => {
                        let mut probe = at;
                        if !guard.matches(&mut probe) {
                            continue;
                        }
                        let consumed = !guard.is_zero_width();
                        if enter(target, consumed) {
                            return true;
                        }
                        if !consumed {
                            stack.push(target);
                        }
                    }
                }
            }
        }
        false
    }
}
