use crate::shape::FixedSignature;

/// A node reference: the index of an earlier node in the same `ExprDag`.
/// Simplicity DAGs are well-formed by construction in the sense that every
/// child index is strictly less than the index of the node referencing it.
pub type NodeIx = usize;

/// The combinator tag of an expression-DAG node, carrying references to its
/// (already-emitted) children. This mirrors the combinator set named in
/// `spec.md` §4.3: identity, unit, injection, case, pair, take, drop, comp,
/// disconnect, witness/asserts, jets, primitives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Combinator {
    /// `iden : A -> A`
    Iden,
    /// `unit : A -> ONE`
    Unit,
    /// `injl(t) : A -> SUM(B, C)` where `t : A -> B`
    InjL(NodeIx),
    /// `injr(t) : A -> SUM(C, B)` where `t : A -> B`
    InjR(NodeIx),
    /// `take(t) : PRODUCT(A, B) -> C` where `t : A -> C`
    Take(NodeIx),
    /// `drop(t) : PRODUCT(A, B) -> C` where `t : B -> C`
    Drop(NodeIx),
    /// `comp(s, t) : A -> C` where `s : A -> B`, `t : B -> C`
    Comp(NodeIx, NodeIx),
    /// `case(s, t) : PRODUCT(SUM(A, B), C) -> D`
    /// where `s : PRODUCT(A, C) -> D`, `t : PRODUCT(B, C) -> D`.
    /// Either branch may instead be a `Hidden` node, in which case that
    /// branch contributes no constraint (this is how assertions are
    /// expressed: `assertl`/`assertr` are `case` with one hidden branch).
    Case(NodeIx, NodeIx),
    /// `pair(s, t) : A -> PRODUCT(B, C)` where `s : A -> B`, `t : A -> C`
    Pair(NodeIx, NodeIx),
    /// `disconnect(s, t) : A -> PRODUCT(B, D)`
    /// where `s : PRODUCT(WORD256, A) -> PRODUCT(B, C)`, `t : C -> D`.
    Disconnect(NodeIx, NodeIx),
    /// A witness node: supplies a value at evaluation time, contributes no
    /// type constraint of its own.
    Witness,
    /// A pruned branch of an assertion. Contributes no type constraint and
    /// may not itself be referenced as an argument to `comp`/`pair`/etc.
    /// outside of being a direct child of `Case`.
    Hidden,
    /// A jet: a primitive with externally-supplied fixed source/target type.
    Jet(FixedSignature),
    /// A Bitcoin/Elements primitive: likewise externally typed.
    Primitive(FixedSignature),
}

impl Combinator {
    /// The tag name, used for the combinator census and for error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            Combinator::Iden => "iden",
            Combinator::Unit => "unit",
            Combinator::InjL(_) => "injl",
            Combinator::InjR(_) => "injr",
            Combinator::Take(_) => "take",
            Combinator::Drop(_) => "drop",
            Combinator::Comp(_, _) => "comp",
            Combinator::Case(_, _) => "case",
            Combinator::Pair(_, _) => "pair",
            Combinator::Disconnect(_, _) => "disconnect",
            Combinator::Witness => "witness",
            Combinator::Hidden => "hidden",
            Combinator::Jet(_) => "jet",
            Combinator::Primitive(_) => "primitive",
        }
    }
}
