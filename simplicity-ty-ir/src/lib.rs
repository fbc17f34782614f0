//! Data model for Simplicity monomorphic type inference: the expression-DAG
//! input contract, the combinator census, and the type-DAG output contract.
//!
//! This crate intentionally contains no inference logic. It is the narrow
//! interface `simplicity-ty-infer` is built against, the way `chalk-ir`
//! carries chalk's term representation without any solver logic of its own.

mod combinator;
mod dag;
mod error;
mod shape;
mod type_dag;

pub use combinator::{Combinator, NodeIx};
pub use dag::{Census, ExprDag, ExprNode, TypeAnnotation};
pub use error::InferError;
pub use shape::{FixedSignature, TypeShape};
pub use type_dag::{TypeDag, TypeNode};
