//! Internal failure modes.
//!
//! `spec.md` §7 deliberately conflates `Clash` and `OccursCheck` at the
//! public boundary (both mean "no principal type exists" to a caller of
//! `infer_types`), but keeps them distinguishable internally "for testing"
//! — which is exactly what this enum is for. `AllocationFailure` is kept in
//! the same enum purely so every fallible step in the pipeline can return
//! one `Result` type; it is surfaced completely differently at the
//! boundary (`Err(InferError::AllocationFailure)` rather than folded into a
//! `None` type DAG).

use crate::varstore::BindingKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Fault {
    /// Two representatives were bound with incompatible constructors.
    Clash {
        left: BindingKind,
        right: BindingKind,
    },
    /// The freezer's two-colour DFS revisited a gray (in-progress)
    /// representative: the solved binding graph has a cycle.
    OccursCheck,
    /// A backing allocation could not be grown.
    AllocationFailure,
}
