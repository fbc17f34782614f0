//! The union-find variable pool (spec.md §4.1).
//!
//! Variables live in a single contiguous `Vec`, addressed by the newtype
//! index `VarId` rather than by pointer (spec.md §9, "Union-find via
//! indices, not pointers") — the same discipline `chalk-ir`/`ena` use for
//! their key types (`ItemId`, `ena::unify::UnifyKey` implementors).
//!
//! This layer is purely structural: it knows about representatives, rank
//! and path compression, and nothing about what a binding *means*. Binding
//! storage and clash detection belong to the unifier (`crate::unify`).

/// An index into the variable pool. A fresh `VarId` is always a free,
/// unranked, parentless representative — the pool's `Default` derive gives
/// us this for free, matching the "zeroed state is a fresh free variable"
/// ergonomic invariant from spec.md §3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VarId(u32);

impl VarId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// The constructor a bound representative carries, and its children when
/// non-trivial. `arg` is meaningful only for `Sum`/`Product`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    One,
    Sum,
    Product,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    pub kind: BindingKind,
    pub arg: [VarId; 2],
}

impl Binding {
    pub fn one() -> Binding {
        Binding {
            kind: BindingKind::One,
            // Unused for `One`, but we need *some* value; pointing at self
            // would require knowing our own id, so these are simply inert
            // placeholders never read for this kind.
            arg: [VarId(0), VarId(0)],
        }
    }

    pub fn sum(a: VarId, b: VarId) -> Binding {
        Binding {
            kind: BindingKind::Sum,
            arg: [a, b],
        }
    }

    pub fn product(a: VarId, b: VarId) -> Binding {
        Binding {
            kind: BindingKind::Product,
            arg: [a, b],
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum OccursMark {
    #[default]
    Unseen,
    Gray,
    Black,
}

#[derive(Clone, Debug, Default)]
struct UnificationVar {
    parent: Option<VarId>,
    rank: u32,
    binding: Option<Binding>,
    // Freezing-phase scratch (spec.md §3 "scratch slot", §4.4): inert
    // outside of `Freezer::freeze`.
    occurs_mark: OccursMark,
    frozen_ix: Option<usize>,
}

/// The variable pool. Never shrinks; released as a whole when the engine
/// call returns (spec.md §5 "Memory ownership").
#[derive(Clone, Debug, Default)]
pub struct VarStore {
    vars: Vec<UnificationVar>,
}

impl VarStore {
    pub fn new() -> Self {
        VarStore::default()
    }

    pub fn with_capacity(cap: usize) -> Self {
        VarStore {
            vars: Vec::with_capacity(cap),
        }
    }

    /// Reserves room for `additional` more variables without creating them,
    /// surfacing allocation failure instead of aborting the process.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), ()> {
        self.vars.try_reserve(additional).map_err(|_| ())
    }

    /// Allocates a fresh, free, unbound variable. Only the emitter calls
    /// this (spec.md §2: "The unifier and freezer never allocate new
    /// variables; only the emitter does").
    pub fn fresh(&mut self) -> Result<VarId, ()> {
        self.vars.try_reserve(1).map_err(|_| ())?;
        let id = VarId(self.vars.len() as u32);
        self.vars.push(UnificationVar::default());
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Finds the representative of `v`'s equivalence class, compressing
    /// every traversed node's parent pointer to point directly at the
    /// representative (spec.md §4.1: "After `find`, every traversed `v`
    /// has `v.parent = representative`").
    pub fn find(&mut self, v: VarId) -> VarId {
        let mut root = v;
        while let Some(p) = self.vars[root.index()].parent {
            root = p;
        }
        let mut cur = v;
        while cur != root {
            let next = self.vars[cur.index()].parent.expect("non-root has a parent");
            self.vars[cur.index()].parent = Some(root);
            cur = next;
        }
        root
    }

    pub fn is_representative(&self, v: VarId) -> bool {
        self.vars[v.index()].parent.is_none()
    }

    /// The binding of a representative, if any. Panics (in debug builds)
    /// if `v` is not currently a representative — callers are expected to
    /// `find` first.
    pub fn binding(&self, v: VarId) -> Option<Binding> {
        debug_assert!(self.is_representative(v));
        self.vars[v.index()].binding
    }

    pub fn set_binding(&mut self, v: VarId, binding: Binding) {
        debug_assert!(self.is_representative(v));
        self.vars[v.index()].binding = Some(binding);
    }

    /// Structural union of two *representatives*: selects the higher-rank
    /// side as parent (ties increment the winner's rank), per spec.md
    /// §4.1. Carries no binding logic — the caller (the unifier) is
    /// responsible for combining bindings before or after calling this.
    /// Returns the new representative.
    ///
    /// The loser's binding is cleared, keeping the "well-formed class"
    /// invariant (`isBound`/`bound` inert on a non-representative) true by
    /// construction, and freeing that slot up as scratch space for the
    /// caller if it wants it.
    pub fn union(&mut self, a: VarId, b: VarId) -> VarId {
        debug_assert!(self.is_representative(a));
        debug_assert!(self.is_representative(b));
        if a == b {
            return a;
        }
        let rank_a = self.vars[a.index()].rank;
        let rank_b = self.vars[b.index()].rank;
        let (winner, loser) = if rank_a > rank_b {
            (a, b)
        } else if rank_b > rank_a {
            (b, a)
        } else {
            self.vars[a.index()].rank += 1;
            (a, b)
        };
        self.vars[loser.index()].parent = Some(winner);
        self.vars[loser.index()].binding = None;
        self.vars[loser.index()].rank = 0;
        winner
    }

    pub(crate) fn occurs_mark(&self, v: VarId) -> OccursMark {
        self.vars[v.index()].occurs_mark
    }

    pub(crate) fn set_occurs_mark(&mut self, v: VarId, mark: OccursMark) {
        self.vars[v.index()].occurs_mark = mark;
    }

    pub(crate) fn frozen_ix(&self, v: VarId) -> Option<usize> {
        self.vars[v.index()].frozen_ix
    }

    pub(crate) fn set_frozen_ix(&mut self, v: VarId, ix: usize) {
        self.vars[v.index()].frozen_ix = Some(ix);
    }
}
