//! Subset construction over the NFA and multi-path DFA simulation.
//!
//! A composite state is the set of NFA states entered through one guard.
//! Successors are grouped by the guard's *source text*, not by what the
//! guard accepts, so `\d` and `[0-9]` leaving the same composite become two
//! edges even though they overlap. The price is that one character can
//! satisfy several edges, so the matcher keeps a list of current composites
//! instead of a single one.
//!
//! Zero-width assertions become composites of their own, entered without
//! consuming input; the matcher expands them at each position before
//! stepping.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::cursor::Cursor;
use crate::regexp::Guard;

use super::arena::{GuardId, StateId};
use super::nfa::Nfa;
use super::sparse_set::SparseSet;

/// Multiplier of the canonical member-set hash.
pub const HASH_MULTIPLIER: u64 = 131;

/// Canonical hash of a sorted member list: `hash = hash * 131 + id`.
pub fn canonical_hash(members: &[StateId]) -> u64 {
    members.iter().fold(0u64, |hash, id| {
        hash.wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(id.index() as u64)
    })
}

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DfaStateId(u32);

impl DfaStateId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DfaStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// A composite state.
#[derive(Clone, Debug)]
pub struct DfaState {
    /// Guard shared by every member; `None` for the root and for the
    /// accept-only composite.
    pub guard: Option<GuardId>,
    /// Member NFA states, sorted ascending.
    pub members: Vec<StateId>,
    pub accepting: bool,
    pub edges: SmallVec<[DfaStateId; 4]>,
}

#[derive(Clone, Debug)]
pub struct Dfa {
    states: Vec<DfaState>,
    guards: Vec<Guard>,
    root: DfaStateId,
}

/// How successors of a composite are bucketed during construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GroupKey<'n> {
    Label(&'n str),
    Accept,
}

impl Dfa {
    /// Subset construction starting from `{nfa.start}`.
    pub fn from_nfa(nfa: &Nfa) -> Self {
        let mut builder = DfaBuilder {
            nfa,
            states: Vec::new(),
            index: FxHashMap::default(),
        };
        let (root, _) = builder.intern(None, vec![nfa.start()]);

        let mut worklist = VecDeque::from([root]);
        let mut seen = SparseSet::new(nfa.len());
        let mut stack = Vec::new();
        while let Some(current) = worklist.pop_front() {
            let groups = builder.successors(current, &mut seen, &mut stack);
            for (key, members) in groups {
                let guard = match key {
                    GroupKey::Accept => None,
                    GroupKey::Label(_) => nfa.state(members[0]).guard,
                };
                let (target, fresh) = builder.intern(guard, members);
                if fresh {
                    worklist.push_back(target);
                }
                let edges = &mut builder.states[current.index()].edges;
                if !edges.contains(&target) {
                    edges.push(target);
                }
            }
        }

        Dfa {
            states: builder.states,
            guards: nfa.guards().to_vec(),
            root,
        }
    }

    #[inline]
    pub fn root(&self) -> DfaStateId {
        self.root
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    #[inline]
    pub fn state(&self, id: DfaStateId) -> &DfaState {
        &self.states[id.index()]
    }

    pub fn states(&self) -> impl Iterator<Item = (DfaStateId, &DfaState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (DfaStateId(i as u32), state))
    }

    #[inline]
    pub fn guard_of(&self, id: DfaStateId) -> Option<&Guard> {
        self.states[id.index()]
            .guard
            .map(|g| &self.guards[g.index()])
    }

    /// Whole-input match of `text`.
    pub fn is_match(&self, text: &[char]) -> bool {
        let subject = Cursor::new(text);
        let mut current = vec![self.root];
        let mut next = Vec::new();
        let mut seen = SparseSet::new(self.len());

        for pos in 0..text.len() {
            let at = subject.at(pos);
            self.expand_zero_width(&mut current, at, &mut seen);

            seen.clear();
            next.clear();
            for &state in &current {
                for &target in &self.states[state.index()].edges {
                    let Some(guard) = self.guard_of(target) else {
                        continue;
                    };
                    if guard.is_zero_width() || !seen.insert(target.index()) {
                        continue;
                    }
                    let mut probe = at;
                    if guard.matches(&mut probe) {
                        next.push(target);
                    }
                }
            }
            if next.is_empty() {
                return false;
            }
            std::mem::swap(&mut current, &mut next);
        }

        let at = subject.at(text.len());
        self.expand_zero_width(&mut current, at, &mut seen);
        current.iter().any(|&id| {
            let state = &self.states[id.index()];
            state.accepting
                || state.edges.iter().any(|&target| {
                    let target = &self.states[target.index()];
                    target.guard.is_none() && target.accepting
                })
        })
    }

    /// Append every assertion composite reachable from `current` whose
    /// assertion holds at `at`.
    fn expand_zero_width(&self, current: &mut Vec<DfaStateId>, at: Cursor<'_>, seen: &mut SparseSet) {
        seen.clear();
        for id in current.iter() {
            seen.insert(id.index());
        }
        let mut i = 0;
        while i < current.len() {
            let state = current[i];
            for &target in &self.states[state.index()].edges {
                let Some(guard) = self.guard_of(target) else {
                    continue;
                };
                if !guard.is_zero_width() || seen.contains(target.index()) {
                    continue;
                }
                let mut probe = at;
                if guard.matches(&mut probe) {
                    seen.insert(target.index());
                    current.push(target);
                }
            }
            i += 1;
        }
    }
}

struct DfaBuilder<'n> {
    nfa: &'n Nfa,
    states: Vec<DfaState>,
    /// Canonical hash to every composite with that hash.
    index: FxHashMap<u64, SmallVec<[DfaStateId; 1]>>,
}

impl<'n> DfaBuilder<'n> {
    /// Find or create the composite for `members`; true when created.
    fn intern(&mut self, guard: Option<GuardId>, mut members: Vec<StateId>) -> (DfaStateId, bool) {
        members.sort_unstable();
        members.dedup();
        let bucket = self.index.entry(canonical_hash(&members)).or_default();
        if let Some(&existing) = bucket
            .iter()
            .find(|id| self.states[id.index()].members == members)
        {
            return (existing, false);
        }

        let id = DfaStateId(self.states.len() as u32);
        bucket.push(id);
        let accepting = members.binary_search(&self.nfa.accept()).is_ok();
        self.states.push(DfaState {
            guard,
            members,
            accepting,
            edges: SmallVec::new(),
        });
        (id, true)
    }

    /// Guarded NFA states reachable from the members of `id` through epsilon
    /// edges, bucketed by guard label in first-seen order. An epsilon accept
    /// state reached on the way goes into the accept bucket.
    fn successors(
        &self,
        id: DfaStateId,
        seen: &mut SparseSet,
        stack: &mut Vec<StateId>,
    ) -> Vec<(GroupKey<'n>, Vec<StateId>)> {
        let nfa = self.nfa;
        let mut slots: FxHashMap<GroupKey<'n>, usize> = FxHashMap::default();
        let mut groups: Vec<(GroupKey<'n>, Vec<StateId>)> = Vec::new();
        let mut add = |key: GroupKey<'n>, state: StateId| {
            let slot = *slots.entry(key).or_insert_with(|| {
                groups.push((key, Vec::new()));
                groups.len() - 1
            });
            let members = &mut groups[slot].1;
            if !members.contains(&state) {
                members.push(state);
            }
        };

        seen.clear();
        stack.clear();
        stack.extend_from_slice(&self.states[id.index()].members);
        while let Some(state) = stack.pop() {
            for &target in nfa.edges(state) {
                match nfa.guard_of(target) {
                    Some(guard) => add(GroupKey::Label(guard.label()), target),
                    None => {
                        if !seen.insert(target.index()) {
                            continue;
                        }
                        if target == nfa.accept() {
                            add(GroupKey::Accept, target);
                        }
                        stack.push(target);
                    }
                }
            }
        }
        groups
    }
}
