//! The freezer (spec.md §4.4).
//!
//! Converts the solved variable graph into the dense output `TypeDag`,
//! instantiating free variables to `ONE`, and performs the occurs check
//! that the unifier deliberately deferred (spec.md §9, "Occurs check is
//! deferred"). Like the unifier, this is iterative: an explicit stack of
//! enter/exit frames stands in for the call stack a naive recursive
//! post-order DFS would use, so a long `PRODUCT`/`SUM` chain cannot blow it.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use simplicity_ty_ir::{TypeDag, TypeNode};

use crate::fault::Fault;
use crate::varstore::{BindingKind, OccursMark, VarId, VarStore};

enum Frame {
    Enter(VarId),
    Exit(VarId),
}

/// Freezes the representative of `root`, returning its index in
/// `type_dag`. Hash-consing is optional per spec.md §9; this interns by
/// `(kind, left, right)` so that structurally-equal subterms collapse to a
/// single array entry.
pub(crate) fn freeze(
    store: &mut VarStore,
    type_dag: &mut TypeDag,
    interner: &mut FxHashMap<TypeNode, usize>,
    root: VarId,
) -> Result<usize, Fault> {
    let root = store.find(root);
    if let Some(ix) = store.frozen_ix(root) {
        return Ok(ix);
    }

    let mut stack = vec![Frame::Enter(root)];
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Enter(v) => {
                let v = store.find(v);
                if store.frozen_ix(v).is_some() {
                    continue;
                }
                match store.occurs_mark(v) {
                    OccursMark::Gray => {
                        debug!(?v, "freeze: occurs-check failure");
                        return Err(Fault::OccursCheck);
                    }
                    OccursMark::Black => continue,
                    OccursMark::Unseen => {}
                }
                match store.binding(v) {
                    None => {
                        trace!(?v, "freeze: free variable instantiated to ONE");
                        store.set_frozen_ix(v, 0);
                        store.set_occurs_mark(v, OccursMark::Black);
                    }
                    Some(binding) if binding.kind == BindingKind::One => {
                        store.set_frozen_ix(v, 0);
                        store.set_occurs_mark(v, OccursMark::Black);
                    }
                    Some(binding) => {
                        store.set_occurs_mark(v, OccursMark::Gray);
                        stack.push(Frame::Exit(v));
                        stack.push(Frame::Enter(binding.arg[1]));
                        stack.push(Frame::Enter(binding.arg[0]));
                    }
                }
            }
            Frame::Exit(v) => {
                let v = store.find(v);
                let binding = store
                    .binding(v)
                    .expect("an exit frame is only pushed for a bound representative");
                let left = store.find(binding.arg[0]);
                let right = store.find(binding.arg[1]);
                let left_ix = store
                    .frozen_ix(left)
                    .expect("left child was frozen before its parent's exit frame");
                let right_ix = store
                    .frozen_ix(right)
                    .expect("right child was frozen before its parent's exit frame");
                let node = match binding.kind {
                    BindingKind::Sum => TypeNode::Sum(left_ix, right_ix),
                    BindingKind::Product => TypeNode::Product(left_ix, right_ix),
                    BindingKind::One => unreachable!("ONE bindings never reach an exit frame"),
                };
                let ix = intern(type_dag, interner, node).map_err(|()| Fault::AllocationFailure)?;
                store.set_frozen_ix(v, ix);
                store.set_occurs_mark(v, OccursMark::Black);
            }
        }
    }

    Ok(store
        .frozen_ix(root)
        .expect("freeze always assigns the root a frozen_ix before returning"))
}

fn intern(
    type_dag: &mut TypeDag,
    interner: &mut FxHashMap<TypeNode, usize>,
    node: TypeNode,
) -> Result<usize, ()> {
    if let Some(&ix) = interner.get(&node) {
        return Ok(ix);
    }
    let ix = type_dag.push(node)?;
    interner.insert(node, ix);
    Ok(ix)
}
