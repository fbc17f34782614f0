//! Property-based tests for the invariants in spec.md §8,
//! "Invariants (property-based)".
//!
//! The generator builds small, well-formed `ExprDag`s out of the
//! combinators that never need an externally-supplied signature (so every
//! generated DAG is a valid input regardless of what it infers to), then
//! checks properties that must hold of whatever `infer_types` returns,
//! success or failure.

use proptest::prelude::*;
use simplicity_ty_ir::{Combinator, ExprDag, TypeNode};
use simplicity_ty_infer::infer_types;

/// One step of DAG construction: a combinator tag plus however many
/// earlier-node references it needs, resolved modulo the DAG's current
/// length so every reference is automatically in range.
#[derive(Clone, Debug)]
enum Step {
    Iden,
    Unit,
    InjL(usize),
    InjR(usize),
    Take(usize),
    Drop(usize),
    Comp(usize, usize),
    Pair(usize, usize),
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Iden),
        Just(Step::Unit),
        any::<usize>().prop_map(Step::InjL),
        any::<usize>().prop_map(Step::InjR),
        any::<usize>().prop_map(Step::Take),
        any::<usize>().prop_map(Step::Drop),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Step::Comp(a, b)),
        (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Step::Pair(a, b)),
    ]
}

fn build_dag(steps: &[Step]) -> ExprDag {
    let mut dag = ExprDag::new();
    for step in steps {
        let len = dag.len().max(1);
        let combinator = match step {
            Step::Iden => Combinator::Iden,
            Step::Unit => Combinator::Unit,
            Step::InjL(i) => Combinator::InjL(i % len),
            Step::InjR(i) => Combinator::InjR(i % len),
            Step::Take(i) => Combinator::Take(i % len),
            Step::Drop(i) => Combinator::Drop(i % len),
            Step::Comp(i, j) => Combinator::Comp(i % len, j % len),
            Step::Pair(i, j) => Combinator::Pair(i % len, j % len),
        };
        // A reference of `0 % len` is always in range, but the very first
        // pushed node can't reference anything: only allow reference-taking
        // combinators once the DAG is non-empty.
        if dag.is_empty() && !matches!(combinator, Combinator::Iden | Combinator::Unit) {
            dag.push(Combinator::Unit);
        } else {
            dag.push(combinator);
        }
    }
    if dag.is_empty() {
        dag.push(Combinator::Unit);
    }
    dag
}

fn bit_width_of(nodes: &[TypeNode], ix: usize) -> usize {
    match nodes[ix] {
        TypeNode::One => 0,
        TypeNode::Sum(a, b) => 1 + bit_width_of(nodes, a).max(bit_width_of(nodes, b)),
        TypeNode::Product(a, b) => bit_width_of(nodes, a) + bit_width_of(nodes, b),
    }
}

proptest! {
    #[test]
    fn type_dag_index_zero_is_always_one(steps in prop::collection::vec(step_strategy(), 1..24)) {
        let mut dag = build_dag(&steps);
        let census = dag.census();
        let outcome = infer_types(&mut dag, &census).unwrap();
        if let Some(type_dag) = outcome.type_dag {
            prop_assert_eq!(type_dag.get(0), TypeNode::One);
        }
    }

    #[test]
    fn type_dag_children_always_precede_their_parent(steps in prop::collection::vec(step_strategy(), 1..24)) {
        let mut dag = build_dag(&steps);
        let census = dag.census();
        let outcome = infer_types(&mut dag, &census).unwrap();
        if let Some(type_dag) = outcome.type_dag {
            for ix in 0..type_dag.len() {
                match type_dag.get(ix) {
                    TypeNode::One => {}
                    TypeNode::Sum(a, b) | TypeNode::Product(a, b) => {
                        prop_assert!(a < ix);
                        prop_assert!(b < ix);
                    }
                }
            }
        }
    }

    #[test]
    fn bit_width_matches_structural_recomputation(steps in prop::collection::vec(step_strategy(), 1..24)) {
        let mut dag = build_dag(&steps);
        let census = dag.census();
        let outcome = infer_types(&mut dag, &census).unwrap();
        if let Some(type_dag) = outcome.type_dag {
            let nodes = type_dag.nodes().to_vec();
            for ix in 0..type_dag.len() {
                prop_assert_eq!(type_dag.bit_width(ix), bit_width_of(&nodes, ix));
            }
        }
    }

    #[test]
    fn inference_is_deterministic(steps in prop::collection::vec(step_strategy(), 1..24)) {
        let mut dag_a = build_dag(&steps);
        let mut dag_b = dag_a.clone();

        let census_a = dag_a.census();
        let outcome_a = infer_types(&mut dag_a, &census_a).unwrap();
        let census_b = dag_b.census();
        let outcome_b = infer_types(&mut dag_b, &census_b).unwrap();

        match (outcome_a.type_dag, outcome_b.type_dag) {
            (None, None) => {}
            (Some(a), Some(b)) => {
                prop_assert_eq!(a.nodes().to_vec(), b.nodes().to_vec());
                prop_assert_eq!(outcome_a.source_ix, outcome_b.source_ix);
                prop_assert_eq!(outcome_a.target_ix, outcome_b.target_ix);
            }
            _ => prop_assert!(false, "same input diverged between ok/ill-typed across runs"),
        }
    }

    #[test]
    fn re_inferring_after_clearing_annotations_is_idempotent(steps in prop::collection::vec(step_strategy(), 1..24)) {
        let mut dag = build_dag(&steps);
        let census = dag.census();
        let first = infer_types(&mut dag, &census).unwrap();

        dag.clear_annotations();
        let census_again = dag.census();
        let second = infer_types(&mut dag, &census_again).unwrap();

        match (first.type_dag, second.type_dag) {
            (None, None) => {}
            (Some(a), Some(b)) => prop_assert_eq!(a.nodes().to_vec(), b.nodes().to_vec()),
            _ => prop_assert!(false, "re-inference changed well-typedness"),
        }
    }
}
