//! Graphviz DOT rendering of built automata, for debugging.
//!
//! Edges are labelled with the guard of the state they enter; epsilon edges
//! carry `ε`. The start state is drawn as a box and accepting states as
//! double circles.

use std::io::{self, Write};

use super::dfa::Dfa;
use super::nfa::Nfa;

/// Render the states of `nfa` reachable from its start.
pub fn write_nfa(nfa: &Nfa, mut out: impl Write) -> io::Result<()> {
    writeln!(out, "digraph nfa {{")?;
    writeln!(out, "\trankdir=LR;")?;
    writeln!(out, "\t{} [shape=box];", nfa.start())?;
    writeln!(out, "\t{} [shape=doublecircle];", nfa.accept())?;
    for state in nfa.reachable() {
        for &target in nfa.edges(state) {
            let label = nfa.guard_of(target).map_or("ε", |g| g.label());
            writeln!(out, "\t{} -> {} [label=\"{}\"];", state, target, escape(label))?;
        }
    }
    writeln!(out, "}}")
}

/// Render every composite state of `dfa`.
pub fn write_dfa(dfa: &Dfa, mut out: impl Write) -> io::Result<()> {
    writeln!(out, "digraph dfa {{")?;
    writeln!(out, "\trankdir=LR;")?;
    writeln!(out, "\t{} [shape=box];", dfa.root())?;
    for (id, state) in dfa.states() {
        if state.accepting {
            writeln!(out, "\t{} [shape=doublecircle];", id)?;
        }
        for &target in &state.edges {
            let label = match dfa.guard_of(target) {
                Some(guard) => guard.label(),
                None if dfa.state(target).accepting => "accept",
                None => "ε",
            };
            writeln!(out, "\t{} -> {} [label=\"{}\"];", id, target, escape(label))?;
        }
    }
    writeln!(out, "}}")
}

fn escape(label: &str) -> String {
    let mut escaped = String::with_capacity(label.len());
    for c in label.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped
}
