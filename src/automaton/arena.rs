//! Arena-based state allocation for cyclic NFA structures.
//!
//! States are addressed by `StateId`, a plain index, so unbounded repetition
//! can point a state back at an earlier one without any ownership games.
//! Identity is the index: two states with the same guard are still distinct
//! unless something merges them explicitly.
//!
//! A state's guard describes how it is *entered*: an edge `s -> t` is an
//! epsilon move when `t` has no guard, and a guarded move (consuming one
//! character, or testing an assertion in place) otherwise.

use std::collections::VecDeque;
use std::fmt;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// A state identifier, just an index into the arena.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct StateId(u32);

impl StateId {
    #[inline]
    pub fn new(index: usize) -> Self {
        StateId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Index into an NFA's guard table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct GuardId(u32);

impl GuardId {
    #[inline]
    pub fn new(index: usize) -> Self {
        GuardId(index as u32)
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A state in the arena.
#[derive(Clone, Debug, Default)]
pub struct NfaState {
    /// Guard tested when entering this state; `None` for epsilon states.
    pub guard: Option<GuardId>,
    /// Outgoing edges in insertion order, without duplicates.
    pub edges: SmallVec<[StateId; 2]>,
}

/// A partially built automaton with one entry and one exit state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// Arena for allocating NFA states.
///
/// Numbering starts at zero for every arena, so ids are stable per compiled
/// pattern rather than process-wide.
#[derive(Clone, Default)]
pub struct StateArena {
    states: Vec<NfaState>,
}

impl fmt::Debug for StateArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateArena")
            .field("states_count", &self.states.len())
            .finish()
    }
}

impl StateArena {
    pub fn new() -> Self {
        Self { states: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
        }
    }

    /// Allocate a new state, returning its ID.
    pub fn alloc(&mut self, guard: Option<GuardId>) -> StateId {
        let id = StateId(self.states.len() as u32);
        self.states.push(NfaState {
            guard,
            edges: SmallVec::new(),
        });
        id
    }

    /// Add the edge `from -> to` unless it already exists.
    pub fn connect(&mut self, from: StateId, to: StateId) {
        let edges = &mut self[from].edges;
        if !edges.contains(&to) {
            edges.push(to);
        }
    }

    /// Number of states in the arena, including unreachable ones.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Deep-copy the sub-graph reachable from `fragment.start`.
    ///
    /// Every copied state gets a fresh id except that the fragment's `end`
    /// maps to the clone's own fresh `end`, and traversal stops there: edges
    /// leaving `end` belong to whatever the fragment was wired into, not to
    /// the fragment. Guards are shared by id.
    pub fn clone_fragment(&mut self, fragment: Fragment) -> Fragment {
        let end_guard = self[fragment.end].guard;
        let end = self.alloc(end_guard);
        if fragment.start == fragment.end {
            return Fragment { start: end, end };
        }

        let start_guard = self[fragment.start].guard;
        let start = self.alloc(start_guard);
        let mut mapped: FxHashMap<StateId, StateId> = FxHashMap::default();
        mapped.insert(fragment.end, end);
        mapped.insert(fragment.start, start);

        let mut queue = VecDeque::from([fragment.start]);
        while let Some(original) = queue.pop_front() {
            if original == fragment.end {
                continue;
            }
            let copy = mapped[&original];
            let edges = self[original].edges.clone();
            for target in edges {
                let copied_target = match mapped.get(&target) {
                    Some(&existing) => existing,
                    None => {
                        let guard = self[target].guard;
                        let fresh = self.alloc(guard);
                        mapped.insert(target, fresh);
                        queue.push_back(target);
                        fresh
                    }
                };
                self.connect(copy, copied_target);
            }
        }
        Fragment { start, end }
    }
}

impl std::ops::Index<StateId> for StateArena {
    type Output = NfaState;

    #[inline]
    fn index(&self, id: StateId) -> &Self::Output {
        &self.states[id.index()]
    }
}

impl std::ops::IndexMut<StateId> for StateArena {
    #[inline]
    fn index_mut(&mut self, id: StateId) -> &mut Self::Output {
        &mut self.states[id.index()]
    }
}
