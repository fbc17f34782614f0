//! Monomorphic type inference for Simplicity expression DAGs.
//!
//! The engine runs strictly sequentially (spec.md §2, §5): emit the
//! constraints implied by the expression DAG's combinators and sharing,
//! unify them to a fixed point (or the first clash), then freeze the
//! solved graph into a dense type DAG, instantiating any variable still
//! free to `ONE`. There is a single public entry point, [`infer_types`].

mod emit;
mod fault;
mod freeze;
mod unify;
mod varstore;

use rustc_hash::FxHashMap;
use tracing::{debug, instrument};

use simplicity_ty_ir::{ExprDag, InferError, TypeAnnotation, TypeDag, TypeNode};

use fault::Fault;
use varstore::VarStore;

/// The result of a successful call to [`infer_types`] (spec.md §6,
/// "Output objects"). `type_dag` is `None` exactly when `dag` is ill-typed
/// — a clash or an occurs-check cycle; both are reported identically here,
/// per spec.md §7.
#[derive(Debug)]
pub struct InferOutcome {
    pub type_dag: Option<TypeDag>,
    pub source_ix: usize,
    pub target_ix: usize,
}

fn ill_typed() -> InferOutcome {
    InferOutcome {
        type_dag: None,
        source_ix: 0,
        target_ix: 0,
    }
}

/// Runs type inference over `dag`, writing a `TypeAnnotation` onto every
/// node on success (spec.md §6, "Annotation writeback") and leaving `dag`'s
/// annotations in an unspecified, not-to-be-read state on failure (spec.md
/// §5, "Failure atomicity").
///
/// Returns `Err(InferError::AllocationFailure)` only for a hard allocation
/// failure. A soft type error (no principal type exists) is reported as
/// `Ok(InferOutcome { type_dag: None, .. })`.
#[instrument(skip(dag, census), fields(nodes = dag.len()))]
pub fn infer_types(
    dag: &mut ExprDag,
    census: &simplicity_ty_ir::Census,
) -> Result<InferOutcome, InferError> {
    if dag.is_empty() {
        return Ok(InferOutcome {
            type_dag: Some(TypeDag::new()),
            source_ix: 0,
            target_ix: 0,
        });
    }

    let mut store = VarStore::with_capacity(census.total() * 2 + 8);

    let emitted = match emit::emit(&mut store, dag) {
        Ok(e) => e,
        Err(()) => return Err(InferError::AllocationFailure),
    };

    if let Err(fault) = unify::unify_all(&mut store, emitted.stack) {
        return match fault {
            Fault::AllocationFailure => Err(InferError::AllocationFailure),
            Fault::Clash { left, right } => {
                debug!(?left, ?right, "infer_types: unification clash");
                Ok(ill_typed())
            }
            Fault::OccursCheck => unreachable!("the unifier never performs the occurs check"),
        };
    }

    let mut type_dag = TypeDag::new();
    let mut interner: FxHashMap<TypeNode, usize> = FxHashMap::default();

    let root_ix = dag.root_ix().expect("checked non-empty above");
    let mut source_ix = 0;
    let mut target_ix = 0;

    for (ix, vars) in emitted.node_vars.iter().enumerate() {
        let frozen_source = match freeze::freeze(&mut store, &mut type_dag, &mut interner, vars.source) {
            Ok(fix) => fix,
            Err(Fault::AllocationFailure) => return Err(InferError::AllocationFailure),
            Err(Fault::OccursCheck) => {
                debug!(ix, "infer_types: occurs-check failure on source");
                return Ok(ill_typed());
            }
            Err(Fault::Clash { .. }) => unreachable!("the freezer never detects a clash"),
        };
        let frozen_target = match freeze::freeze(&mut store, &mut type_dag, &mut interner, vars.target) {
            Ok(fix) => fix,
            Err(Fault::AllocationFailure) => return Err(InferError::AllocationFailure),
            Err(Fault::OccursCheck) => {
                debug!(ix, "infer_types: occurs-check failure on target");
                return Ok(ill_typed());
            }
            Err(Fault::Clash { .. }) => unreachable!("the freezer never detects a clash"),
        };

        dag.annotate(
            ix,
            TypeAnnotation {
                source_ix: frozen_source,
                target_ix: frozen_target,
            },
        );

        if ix == root_ix {
            source_ix = frozen_source;
            target_ix = frozen_target;
        }
    }

    Ok(InferOutcome {
        type_dag: Some(type_dag),
        source_ix,
        target_ix,
    })
}
