use thiserror::Error;

/// The three ways a call to `infer_types` can end, per the public contract:
/// a hard allocation failure, or a soft type error (clash or occurs-check
/// cycle), both of which are reported as "no principal type exists".
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InferError {
    /// A backing allocation could not be grown. The caller receives no
    /// result at all; any partially-built state is discarded.
    #[error("allocation failure during type inference")]
    AllocationFailure,
}
