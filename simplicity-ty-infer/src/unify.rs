//! The worklist-driven unifier (spec.md §4.2).
//!
//! Iterative by construction: a deeply right- or left-nested `PRODUCT`/`SUM`
//! chain must not blow the call stack, so there is no recursive `unify`
//! function here, only a `while let Some(pair) = stack.pop()` loop.

use tracing::trace;

use crate::fault::Fault;
use crate::varstore::{Binding, BindingKind, VarId, VarStore};

/// Drives unification of `stack` to exhaustion (or first clash).
///
/// Push order within a `Sum`/`Product` pair is fixed (`arg[1]` before
/// `arg[0]`, so `arg[0]` is processed first) purely so that traces are
/// reproducible across runs; correctness does not depend on it (spec.md
/// §4.2, "Iterative discipline").
pub(crate) fn unify_all(store: &mut VarStore, mut stack: Vec<(VarId, VarId)>) -> Result<(), Fault> {
    while let Some((alpha, beta)) = stack.pop() {
        let a = store.find(alpha);
        let b = store.find(beta);
        if a == b {
            continue;
        }

        match (store.binding(a), store.binding(b)) {
            (None, None) => {
                trace!(?a, ?b, "unify: both free");
                store.union(a, b);
            }
            (Some(bound), None) | (None, Some(bound)) => {
                trace!(?a, ?b, "unify: one bound");
                let winner = store.union(a, b);
                store.set_binding(winner, bound);
            }
            (Some(ba), Some(bb)) => {
                if ba.kind != bb.kind {
                    return Err(Fault::Clash {
                        left: ba.kind,
                        right: bb.kind,
                    });
                }
                trace!(?a, ?b, kind = ?ba.kind, "unify: both bound, same kind");
                let winner = store.union(a, b);
                store.set_binding(winner, ba);
                if matches!(ba.kind, BindingKind::Sum | BindingKind::Product) {
                    push_children(&mut stack, ba, bb);
                }
            }
        }
    }
    Ok(())
}

fn push_children(stack: &mut Vec<(VarId, VarId)>, ba: Binding, bb: Binding) {
    stack.push((ba.arg[1], bb.arg[1]));
    stack.push((ba.arg[0], bb.arg[0]));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(store: &mut VarStore) -> VarId {
        let v = store.fresh().unwrap();
        store.set_binding(v, Binding::one());
        v
    }

    #[test]
    fn unifying_two_free_vars_leaves_them_free() {
        let mut store = VarStore::new();
        let a = store.fresh().unwrap();
        let b = store.fresh().unwrap();
        unify_all(&mut store, vec![(a, b)]).unwrap();
        let r = store.find(a);
        assert_eq!(store.find(b), r);
        assert!(store.binding(r).is_none());
    }

    #[test]
    fn unifying_bound_with_free_propagates_binding() {
        let mut store = VarStore::new();
        let a = one(&mut store);
        let b = store.fresh().unwrap();
        unify_all(&mut store, vec![(a, b)]).unwrap();
        let r = store.find(b);
        assert_eq!(store.binding(r).unwrap().kind, BindingKind::One);
    }

    #[test]
    fn mismatched_kinds_clash() {
        let mut store = VarStore::new();
        let o = one(&mut store);
        let x = store.fresh().unwrap();
        let sum = store.fresh().unwrap();
        store.set_binding(sum, Binding::sum(x, x));
        let err = unify_all(&mut store, vec![(o, sum)]).unwrap_err();
        assert!(matches!(err, Fault::Clash { .. }));
    }

    #[test]
    fn matching_sums_unify_children_transitively() {
        let mut store = VarStore::new();
        let a1 = store.fresh().unwrap();
        let a2 = store.fresh().unwrap();
        let b1 = store.fresh().unwrap();
        let b2 = store.fresh().unwrap();
        let sum_a = store.fresh().unwrap();
        store.set_binding(sum_a, Binding::sum(a1, a2));
        let sum_b = store.fresh().unwrap();
        store.set_binding(sum_b, Binding::sum(b1, b2));

        unify_all(&mut store, vec![(sum_a, sum_b)]).unwrap();

        assert_eq!(store.find(a1), store.find(b1));
        assert_eq!(store.find(a2), store.find(b2));
    }

    #[test]
    fn deeply_nested_products_do_not_blow_the_stack() {
        let mut store = VarStore::new();
        let depth = 200_000;

        let mut left = store.fresh().unwrap();
        for _ in 0..depth {
            let next = store.fresh().unwrap();
            let wrapped = store.fresh().unwrap();
            store.set_binding(wrapped, Binding::product(left, next));
            left = wrapped;
        }

        let mut right = store.fresh().unwrap();
        for _ in 0..depth {
            let next = store.fresh().unwrap();
            let wrapped = store.fresh().unwrap();
            store.set_binding(wrapped, Binding::product(right, next));
            right = wrapped;
        }

        unify_all(&mut store, vec![(left, right)]).unwrap();
    }
}
