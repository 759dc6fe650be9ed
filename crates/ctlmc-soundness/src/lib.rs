//! Property-test support for the model-checking workspace.
//!
//! The strategies here generate random CTL formulas and random partial
//! transition systems over one shared proposition alphabet, so a generated
//! formula has a realistic chance of touching labelled states. The suites
//! under `tests/` combine them into round-trip, precedence, simplification,
//! and truncation-soundness properties.

use ctlmc_syntax::Formula;
use ctlmc_ts::{StateId, SystemBuilder, TransitionSystem};
use proptest::prelude::*;

/// Proposition alphabet shared by formula and system strategies.
pub const ATOMS: [&str; 3] = ["p", "q", "r"];

/// Pending state before assembly: recorded successors, label picks into
/// [`ATOMS`], and the explored flag.
type RawState = (Vec<StateId>, Vec<usize>, bool);

/// Formulas with up to `depth` nested operators: constants and atoms at
/// the leaves, every connective and temporal operator above them.
pub fn arb_formula(depth: u32) -> impl Strategy<Value = Formula> {
    let leaf = prop_oneof![
        Just(Formula::True),
        Just(Formula::False),
        (0..ATOMS.len()).prop_map(|i| Formula::atom(ATOMS[i])),
    ];
    leaf.prop_recursive(depth, 64, 2, |inner| {
        let unary = prop_oneof![
            inner.clone().prop_map(Formula::not),
            inner.clone().prop_map(Formula::ex),
            inner.clone().prop_map(Formula::ax),
            inner.clone().prop_map(Formula::eg),
            inner.clone().prop_map(Formula::ag),
            inner.clone().prop_map(Formula::ef),
            inner.clone().prop_map(Formula::af),
        ];
        let binary = prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.and(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.or(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.implies(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.iff(r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| l.eu(r)),
            (inner.clone(), inner).prop_map(|(l, r)| l.au(r)),
        ];
        prop_oneof![unary, binary]
    })
}

fn raw_states(n: usize) -> impl Strategy<Value = Vec<RawState>> {
    let state = (
        prop::collection::vec(0..n as StateId, 0..=3),
        prop::collection::vec(0..ATOMS.len(), 0..=2),
        any::<bool>(),
    );
    prop::collection::vec(state, n)
}

fn assemble(states: Vec<RawState>) -> TransitionSystem {
    let mut builder = SystemBuilder::new();
    for (id, (successors, picks, explored)) in states.into_iter().enumerate() {
        let labels: Vec<String> = picks.into_iter().map(|i| ATOMS[i].to_string()).collect();
        builder = if explored {
            builder.explored(id as StateId, labels, successors)
        } else {
            builder.truncated(id as StateId, labels, successors)
        };
    }
    // Contiguous ids from zero with in-range successors always validate.
    builder.build().expect("generated states form a valid system")
}

/// Partial transition systems with 1..=6 states, arbitrary recorded edges
/// and labels, each state independently explored or truncated.
pub fn arb_system() -> impl Strategy<Value = TransitionSystem> {
    (1usize..=6).prop_flat_map(raw_states).prop_map(assemble)
}

/// Like [`arb_system`] but with every state explored, so checking is
/// classical and must decide every state.
pub fn arb_explored_system() -> impl Strategy<Value = TransitionSystem> {
    (1usize..=6).prop_flat_map(raw_states).prop_map(|mut states| {
        for state in &mut states {
            state.2 = true;
        }
        assemble(states)
    })
}

/// Pairs `(partial, complete)` where the partial system is a breadth cut
/// of the complete one.
///
/// The complete system is fully explored. The partial system keeps only
/// the states below the cut, drops recorded edges into the cut-off region,
/// and marks every state that lost an edge as truncated. States that kept
/// their whole successor list stay explored with the same successors as in
/// the complete system, which is exactly the shape a bounded exploration
/// hands the checker.
pub fn arb_truncation_pair() -> impl Strategy<Value = (TransitionSystem, TransitionSystem)> {
    (3usize..=8)
        .prop_flat_map(|n| (raw_states(n), 1..=n))
        .prop_map(|(states, cut)| {
            let complete: Vec<RawState> = states
                .iter()
                .map(|(succ, picks, _)| (succ.clone(), picks.clone(), true))
                .collect();
            let partial: Vec<RawState> = states
                .into_iter()
                .take(cut)
                .map(|(succ, picks, _)| {
                    let kept: Vec<StateId> = succ
                        .iter()
                        .copied()
                        .filter(|&t| (t as usize) < cut)
                        .collect();
                    let explored = kept.len() == succ.len();
                    (kept, picks, explored)
                })
                .collect();
            (assemble(partial), assemble(complete))
        })
}
