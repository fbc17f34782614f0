//! The constraint emitter (spec.md §4.3).
//!
//! Walks the expression DAG once, forward, allocating a fresh source and
//! target variable per node and issuing the unification requests that
//! correspond to each combinator's typing rule. Per spec.md §4.3 this code
//! never inspects a variable's *binding* — where a typing rule needs to
//! force a node's type to a particular shape, the emitter builds a *fresh*
//! variable carrying that shape (trivially unbound, so setting its binding
//! directly cannot clash with anything) and unifies the target variable
//! against it. All clash/occurs-check logic stays inside the unifier and
//! freezer.

use rustc_hash::FxHashMap;
use tracing::trace;

use simplicity_ty_ir::{Combinator, ExprDag, TypeShape};

use crate::varstore::{Binding, VarId, VarStore};

/// The source and target unification variables allocated for one
/// expression-DAG node.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeVars {
    pub source: VarId,
    pub target: VarId,
}

pub(crate) struct EmitResult {
    pub node_vars: Vec<NodeVars>,
    pub stack: Vec<(VarId, VarId)>,
}

/// Emits the full set of unification constraints for `dag` into `store`.
///
/// Returns `Err(())` only on allocation failure; the emitter cannot itself
/// produce a type error (spec.md §4.3 describes it as purely mechanical —
/// clash detection is the unifier's job).
pub(crate) fn emit(store: &mut VarStore, dag: &ExprDag) -> Result<EmitResult, ()> {
    let n = dag.len();
    store.try_reserve(n * 2)?;
    let mut node_vars: Vec<NodeVars> = Vec::new();
    node_vars.try_reserve(n)?;
    let mut stack = Vec::new();
    // A word-shape cache shared across all jets/primitives/disconnects in
    // this DAG, so e.g. two 32-bit jets share the same WORD32 variable
    // chain instead of each building their own (SPEC_FULL.md §6's
    // word-power helper, generalized to memoize by bit width).
    let mut word_cache: FxHashMap<u32, VarId> = FxHashMap::default();

    for (ix, node) in dag.nodes().iter().enumerate() {
        let source = store.fresh().map_err(|_| ())?;
        let target = store.fresh().map_err(|_| ())?;
        trace!(ix, tag = node.combinator.tag(), "emit: allocated node vars");

        emit_node(
            store,
            dag,
            &node_vars,
            &mut word_cache,
            &mut stack,
            &node.combinator,
            source,
            target,
        )?;

        node_vars.push(NodeVars { source, target });
    }

    if dag.is_program() {
        if let Some(root) = dag.root_ix() {
            let one_source = fresh_one(store)?;
            let one_target = fresh_one(store)?;
            stack.push((node_vars[root].source, one_source));
            stack.push((node_vars[root].target, one_target));
        }
    }

    Ok(EmitResult { node_vars, stack })
}

fn emit_node(
    store: &mut VarStore,
    dag: &ExprDag,
    node_vars: &[NodeVars],
    word_cache: &mut FxHashMap<u32, VarId>,
    stack: &mut Vec<(VarId, VarId)>,
    combinator: &Combinator,
    source: VarId,
    target: VarId,
) -> Result<(), ()> {
    match *combinator {
        Combinator::Iden => {
            stack.push((source, target));
        }
        Combinator::Unit => {
            let one = fresh_one(store)?;
            stack.push((target, one));
        }
        Combinator::InjL(i) => {
            let child = node_vars[i];
            stack.push((source, child.source));
            let b = store.fresh().map_err(|_| ())?;
            let sum = fresh_sum(store, child.target, b)?;
            stack.push((target, sum));
        }
        Combinator::InjR(i) => {
            let child = node_vars[i];
            stack.push((source, child.source));
            let a = store.fresh().map_err(|_| ())?;
            let sum = fresh_sum(store, a, child.target)?;
            stack.push((target, sum));
        }
        Combinator::Take(i) => {
            let child = node_vars[i];
            stack.push((target, child.target));
            let b = store.fresh().map_err(|_| ())?;
            let prod = fresh_product(store, child.source, b)?;
            stack.push((source, prod));
        }
        Combinator::Drop(i) => {
            let child = node_vars[i];
            stack.push((target, child.target));
            let a = store.fresh().map_err(|_| ())?;
            let prod = fresh_product(store, a, child.source)?;
            stack.push((source, prod));
        }
        Combinator::Comp(i, j) => {
            let ci = node_vars[i];
            let cj = node_vars[j];
            stack.push((source, ci.source));
            stack.push((ci.target, cj.source));
            stack.push((target, cj.target));
        }
        Combinator::Case(i, j) => {
            let var1 = store.fresh().map_err(|_| ())?;
            let var2 = store.fresh().map_err(|_| ())?;
            let var3 = store.fresh().map_err(|_| ())?;
            let sum12 = fresh_sum(store, var1, var2)?;
            let source_ty = fresh_product(store, sum12, var3)?;
            stack.push((source, source_ty));

            if !matches!(dag.node(i).combinator, Combinator::Hidden) {
                let ci = node_vars[i];
                let prod_i = fresh_product(store, var1, var3)?;
                stack.push((ci.source, prod_i));
                stack.push((target, ci.target));
            }
            if !matches!(dag.node(j).combinator, Combinator::Hidden) {
                let cj = node_vars[j];
                let prod_j = fresh_product(store, var2, var3)?;
                stack.push((cj.source, prod_j));
                stack.push((target, cj.target));
            }
        }
        Combinator::Pair(i, j) => {
            let ci = node_vars[i];
            let cj = node_vars[j];
            stack.push((source, ci.source));
            stack.push((source, cj.source));
            let prod = fresh_product(store, ci.target, cj.target)?;
            stack.push((target, prod));
        }
        Combinator::Disconnect(i, j) => {
            let ci = node_vars[i];
            let cj = node_vars[j];
            let b = store.fresh().map_err(|_| ())?;
            let c = store.fresh().map_err(|_| ())?;
            let d = store.fresh().map_err(|_| ())?;
            let word256 = word_var(store, word_cache, 256)?;
            let prod_word_source = fresh_product(store, word256, source)?;
            stack.push((ci.source, prod_word_source));
            let prod_bc = fresh_product(store, b, c)?;
            stack.push((ci.target, prod_bc));
            stack.push((cj.source, c));
            stack.push((cj.target, d));
            let prod_bd = fresh_product(store, b, d)?;
            stack.push((target, prod_bd));
        }
        Combinator::Witness | Combinator::Hidden => {
            // No type constraints: the node's source/target stay free and
            // instantiate to `ONE` at freeze time unless sharing
            // constraints from elsewhere pin them down.
        }
        Combinator::Jet(ref sig) | Combinator::Primitive(ref sig) => {
            let source_var = shape_var(store, word_cache, &sig.source)?;
            let target_var = shape_var(store, word_cache, &sig.target)?;
            stack.push((source, source_var));
            stack.push((target, target_var));
        }
    }
    Ok(())
}

fn fresh_one(store: &mut VarStore) -> Result<VarId, ()> {
    let v = store.fresh().map_err(|_| ())?;
    store.set_binding(v, Binding::one());
    Ok(v)
}

fn fresh_sum(store: &mut VarStore, a: VarId, b: VarId) -> Result<VarId, ()> {
    let v = store.fresh().map_err(|_| ())?;
    store.set_binding(v, Binding::sum(a, b));
    Ok(v)
}

fn fresh_product(store: &mut VarStore, a: VarId, b: VarId) -> Result<VarId, ()> {
    let v = store.fresh().map_err(|_| ())?;
    store.set_binding(v, Binding::product(a, b));
    Ok(v)
}

/// Builds (and memoizes, by bit width) the power-of-two word type used by
/// jet/primitive signatures and by `disconnect`'s 256-bit witness slot
/// (SPEC_FULL.md §5.2, grounded in `apoelstra-rust-simplicity`'s
/// `two_0..two_256` construction).
fn word_var(store: &mut VarStore, cache: &mut FxHashMap<u32, VarId>, bits: u32) -> Result<VarId, ()> {
    if let Some(&v) = cache.get(&bits) {
        return Ok(v);
    }
    let v = if bits == 0 {
        fresh_one(store)?
    } else if bits == 1 {
        let one = word_var(store, cache, 0)?;
        fresh_sum(store, one, one)?
    } else {
        debug_assert_eq!(bits % 2, 0, "word width must be a power of two");
        let half = word_var(store, cache, bits / 2)?;
        fresh_product(store, half, half)?
    };
    cache.insert(bits, v);
    Ok(v)
}

fn shape_var(
    store: &mut VarStore,
    word_cache: &mut FxHashMap<u32, VarId>,
    shape: &TypeShape,
) -> Result<VarId, ()> {
    match shape {
        TypeShape::One => fresh_one(store),
        TypeShape::Word(bits) => word_var(store, word_cache, *bits),
        TypeShape::Sum(a, b) => {
            let a = shape_var(store, word_cache, a)?;
            let b = shape_var(store, word_cache, b)?;
            fresh_sum(store, a, b)
        }
        TypeShape::Product(a, b) => {
            let a = shape_var(store, word_cache, a)?;
            let b = shape_var(store, word_cache, b)?;
            fresh_product(store, a, b)
        }
    }
}
