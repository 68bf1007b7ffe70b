//! Finite automata built from parsed patterns.
//!
//! - `arena`: state storage, ids, fragments and fragment cloning
//! - `nfa`: the Thompson NFA, epsilon collapsing and frontier simulation
//! - `dfa`: subset construction grouped by guard label, and its simulation
//! - `sparse_set`: O(1)-clear visited and frontier sets used by both
//! - `dot`: Graphviz export
//!
//! Construction of the NFA from a syntax tree lives in `regexp`.

mod arena;
mod dfa;
mod dot;
mod nfa;
mod sparse_set;

pub use arena::{Fragment, GuardId, NfaState, StateArena, StateId};
pub use dfa::{canonical_hash, Dfa, DfaState, DfaStateId, HASH_MULTIPLIER};
pub use dot::{write_dfa, write_nfa};
pub use nfa::Nfa;
pub use sparse_set::{Frontiers, SparseSet};

#[cfg(test)]
mod tests;
