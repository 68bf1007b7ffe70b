use super::*;
use crate::regexp::{build_nfa, parse, Guard, Meta, MetaKind};

fn literal(c: char) -> Guard {
    Guard::Meta(Meta {
        kind: MetaKind::Literal(c),
        label: c.to_string(),
    })
}

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn nfa(pattern: &str) -> Nfa {
    build_nfa(&parse(pattern).unwrap())
}

fn dfa(pattern: &str) -> Dfa {
    Dfa::from_nfa(&nfa(pattern))
}

#[test]
fn test_arena_connect_dedups() {
    let mut arena = StateArena::new();
    let a = arena.alloc(None);
    let b = arena.alloc(None);
    arena.connect(a, b);
    arena.connect(a, b);
    assert_eq!(arena[a].edges.as_slice(), &[b]);
    assert_eq!(arena.len(), 2);
}

#[test]
fn test_clone_fragment_fresh_ids() {
    let mut arena = StateArena::new();
    let guard = Some(GuardId::new(0));
    let start = arena.alloc(guard);
    let end = arena.alloc(None);
    arena.connect(start, end);

    let copy = arena.clone_fragment(Fragment { start, end });
    assert_ne!(copy.start, start);
    assert_ne!(copy.end, end);
    assert_eq!(arena[copy.start].guard, guard);
    assert_eq!(arena[copy.start].edges.as_slice(), &[copy.end]);
    assert!(arena[copy.end].edges.is_empty());
    assert_eq!(arena.len(), 4);
}

#[test]
fn test_clone_fragment_stops_at_end() {
    let mut arena = StateArena::new();
    let start = arena.alloc(None);
    let end = arena.alloc(None);
    let beyond = arena.alloc(Some(GuardId::new(0)));
    arena.connect(start, end);
    arena.connect(end, beyond);

    let copy = arena.clone_fragment(Fragment { start, end });
    assert_eq!(arena.len(), 5);
    assert!(arena[copy.end].edges.is_empty());
    assert_eq!(arena[end].edges.as_slice(), &[beyond]);
}

#[test]
fn test_clone_fragment_keeps_cycles() {
    let mut arena = StateArena::new();
    let start = arena.alloc(None);
    let body = arena.alloc(Some(GuardId::new(0)));
    let end = arena.alloc(None);
    arena.connect(start, body);
    arena.connect(body, body);
    arena.connect(body, end);

    let copy = arena.clone_fragment(Fragment { start, end });
    let copied_body = arena[copy.start].edges[0];
    assert_ne!(copied_body, body);
    assert!(arena[copied_body].edges.contains(&copied_body));
    assert!(arena[copied_body].edges.contains(&copy.end));
}

#[test]
fn test_collapse_moves_accept() {
    let mut arena = StateArena::new();
    let start = arena.alloc(None);
    let middle = arena.alloc(None);
    let guarded = arena.alloc(Some(GuardId::new(0)));
    let accept = arena.alloc(None);
    arena.connect(start, middle);
    arena.connect(middle, guarded);
    arena.connect(guarded, accept);

    let mut nfa = Nfa::new(arena, vec![literal('x')], start, accept);
    assert_eq!(nfa.collapse_epsilons(), 2);
    assert_eq!(nfa.start(), start);
    assert_eq!(nfa.accept(), guarded);
    assert_eq!(nfa.edges(start), &[guarded]);
    assert!(nfa.is_match(&chars("x")));
    assert!(!nfa.is_match(&chars("")));
}

#[test]
fn test_collapse_keeps_shared_states() {
    let mut arena = StateArena::new();
    let start = arena.alloc(None);
    let left = arena.alloc(Some(GuardId::new(0)));
    let right = arena.alloc(Some(GuardId::new(1)));
    let join = arena.alloc(None);
    arena.connect(start, left);
    arena.connect(start, right);
    arena.connect(left, join);
    arena.connect(right, join);

    let mut nfa = Nfa::new(arena, vec![literal('l'), literal('r')], start, join);
    assert_eq!(nfa.collapse_epsilons(), 0);
    assert_eq!(nfa.accept(), join);
    assert!(nfa.is_match(&chars("l")));
    assert!(nfa.is_match(&chars("r")));
    assert!(!nfa.is_match(&chars("lr")));
}

#[test]
fn test_nfa_epsilon_cycle_terminates() {
    let mut arena = StateArena::new();
    let start = arena.alloc(None);
    let other = arena.alloc(None);
    arena.connect(start, other);
    arena.connect(other, start);

    let nfa = Nfa::new(arena, Vec::new(), start, other);
    assert!(nfa.is_match(&chars("")));
    assert!(!nfa.is_match(&chars("a")));
}

#[test]
fn test_canonical_hash() {
    assert_eq!(canonical_hash(&[]), 0);
    assert_eq!(canonical_hash(&[StateId::new(7)]), 7);
    assert_eq!(
        canonical_hash(&[StateId::new(1), StateId::new(2)]),
        HASH_MULTIPLIER + 2
    );
}

#[test]
fn test_dfa_groups_by_label_not_by_meaning() {
    let built = dfa("\\d|[0-9]");
    let root = built.state(built.root());
    let labels: Vec<_> = root
        .edges
        .iter()
        .filter_map(|&t| built.guard_of(t).map(|g| g.label().to_string()))
        .collect();
    assert_eq!(labels, vec!["\\d".to_string(), "[0-9]".to_string()]);
    assert!(built.is_match(&chars("5")));
    assert!(!built.is_match(&chars("x")));
}

#[test]
fn test_dfa_same_label_shares_composite() {
    let built = dfa("a|a");
    let root = built.state(built.root());
    assert_eq!(root.edges.len(), 1);
    assert_eq!(built.state(root.edges[0]).members.len(), 2);
}

#[test]
fn test_dfa_accept_composite() {
    let built = dfa("a?");
    assert_eq!(built.len(), 3);
    let accept_edges = built
        .state(built.root())
        .edges
        .iter()
        .filter(|&&t| built.guard_of(t).is_none() && built.state(t).accepting)
        .count();
    assert_eq!(accept_edges, 1);
    assert!(built.is_match(&chars("")));
    assert!(built.is_match(&chars("a")));
    assert!(!built.is_match(&chars("aa")));
}

#[test]
fn test_dfa_star_reuses_composite() {
    let built = dfa("a*");
    let (looping, state) = built
        .states()
        .find(|(_, s)| s.guard.is_some())
        .unwrap();
    assert!(state.edges.contains(&looping));
    assert!(built.is_match(&chars("aaaa")));
    assert!(!built.is_match(&chars("aab")));
}

#[test]
fn test_dfa_members_sorted() {
    let built = dfa("(ab|ac|a)d");
    for (_, state) in built.states() {
        assert!(state.members.windows(2).all(|w| w[0] < w[1]));
    }
    assert!(built.is_match(&chars("abd")));
    assert!(built.is_match(&chars("acd")));
    assert!(built.is_match(&chars("ad")));
    assert!(!built.is_match(&chars("abcd")));
}

#[test]
fn test_dfa_assertions() {
    let built = dfa("\\bfoo\\b");
    assert!(built.is_match(&chars("foo")));
    let built = dfa("a$\\nb");
    assert!(built.is_match(&chars("a\nb")));
    assert!(!dfa("a^b").is_match(&chars("ab")));
}

#[test]
fn test_write_nfa_dot() {
    let mut out = Vec::new();
    write_nfa(&nfa("ab"), &mut out).unwrap();
    let dot = String::from_utf8(out).unwrap();
    assert!(dot.starts_with("digraph nfa {\n\trankdir=LR;\n"));
    assert!(dot.contains("[shape=box];"));
    assert!(dot.contains("[shape=doublecircle];"));
    assert!(dot.contains("[label=\"a\"]"));
    assert!(dot.contains("[label=\"b\"]"));
    assert!(dot.ends_with("}\n"));
}

#[test]
fn test_write_dfa_dot_escapes_labels() {
    let mut out = Vec::new();
    write_dfa(&dfa("\\\\\"|a?"), &mut out).unwrap();
    let dot = String::from_utf8(out).unwrap();
    assert!(dot.starts_with("digraph dfa {"));
    assert!(dot.contains("d0 [shape=box];"));
    assert!(dot.contains("[label=\"\\\\\\\\\"]"));
    assert!(dot.contains("[label=\"\\\"\"]"));
    assert!(dot.contains("[label=\"accept\"]"));
}
