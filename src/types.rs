//! The type hierarchy of a domain: a forest of named types rooted at an implicit root type,
//! each carrying the ordered list of constants that belong to it (including those inherited
//! from its descendant types, per the spec's subset invariant).

use crate::ref_store::RefPool;
use std::borrow::Borrow;
use std::error::Error;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;

#[derive(Debug, Copy, Clone, Eq, Ord, PartialOrd, PartialEq, Hash)]
pub struct TypeId(usize);

impl From<usize> for TypeId {
    fn from(id: usize) -> Self {
        TypeId(id)
    }
}
impl From<TypeId> for usize {
    fn from(id: TypeId) -> Self {
        id.0
    }
}

#[derive(Clone)]
pub struct TypeHierarchy<T> {
    types: RefPool<TypeId, T>,
    /// `last_subtype[t]` is the id of the last type that was declared as a (possibly
    /// indirect) child of `t`, in declaration order; together with `t` itself this
    /// identifies the contiguous range of ids that make up `t`'s subtree.
    last_subtype: Vec<TypeId>,
    /// Direct parent of each type, in declaration order; `None` for a root. Kept only so the
    /// emitter can print each type with its parent (spec.md 4.4); the subtree logic above
    /// never needs it.
    parent: Vec<Option<TypeId>>,
}

#[derive(Debug)]
pub struct UnreachableFromRoot<T>(pub Vec<(T, Option<T>)>);

impl<T: Debug> Error for UnreachableFromRoot<T> {}

impl<T: Debug> std::fmt::Display for UnreachableFromRoot<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "types not reachable from any root type: {:?}", self.0)
    }
}

impl<T> TypeHierarchy<T> {
    /// Builds the hierarchy from a set of `(type, optional-parent)` pairs. Types are
    /// emitted in a pre-order traversal starting from each root (no declared parent),
    /// so that every type's subtree occupies a contiguous range of ids.
    pub fn new(mut types: Vec<(T, Option<T>)>) -> Result<Self, UnreachableFromRoot<T>>
    where
        T: Eq + Clone + Hash,
    {
        let mut sys = TypeHierarchy {
            types: RefPool::default(),
            last_subtype: Vec::new(),
            parent: Vec::new(),
        };

        let mut trace: Vec<Option<T>> = vec![None];

        while let Some(parent) = trace.last().cloned() {
            match types.iter().position(|tup| tup.1 == parent) {
                Some(pos_of_child) => {
                    let child = types.remove(pos_of_child);
                    let parent_id = child.1.as_ref().map(|p| sys.types.get_ref(p).unwrap());
                    let id = sys.types.push(child.0.clone());
                    debug_assert_eq!(usize::from(id), sys.last_subtype.len());
                    sys.last_subtype.push(id);
                    sys.parent.push(parent_id);
                    trace.push(Some(child.0));
                }
                None => {
                    trace.pop();
                    if let Some(Some(p)) = trace.last() {
                        let parent_id = sys.types.get_ref(p).unwrap();
                        let last_child = TypeId::from(sys.types.len() - 1);
                        sys.last_subtype[usize::from(parent_id)] = last_child;
                    }
                }
            }
        }
        if types.is_empty() {
            Ok(sys)
        } else {
            Err(UnreachableFromRoot(types))
        }
    }

    pub fn id_of<Q: ?Sized>(&self, tpe: &Q) -> Option<TypeId>
    where
        Q: Eq + Hash,
        T: Eq + Hash + Borrow<Q>,
    {
        self.types.get_ref(tpe)
    }

    pub fn from_id(&self, tid: TypeId) -> &T {
        self.types.get(tid)
    }

    pub fn parent(&self, tid: TypeId) -> Option<TypeId> {
        self.parent[usize::from(tid)]
    }

    pub fn is_subtype(&self, tpe: TypeId, possible_subtype: TypeId) -> bool {
        tpe <= possible_subtype && possible_subtype <= self.last_subtype[usize::from(tpe)]
    }

    pub fn last_subtype(&self, tpe: TypeId) -> TypeId {
        let sub = self.last_subtype[usize::from(tpe)];
        debug_assert!(self.is_subtype(tpe, sub));
        sub
    }

    /// Iterator on all types by increasing id, i.e. in the pre-order they were declared.
    pub fn types(&self) -> impl Iterator<Item = TypeId> {
        self.types.keys()
    }

    /// Appends a brand new top-level type (a sibling of the existing roots, itself a child of
    /// the implicit root). Used by the LTL compiler to add `baState` (spec.md 4.3.1) after
    /// parsing has already fixed every other type's contiguous subtree range; since a new root
    /// has no descendants yet, no existing range needs adjusting.
    pub fn push_root(&mut self, t: T) -> TypeId
    where
        T: Eq + Hash + Clone,
    {
        let id = self.types.push(t);
        debug_assert_eq!(usize::from(id), self.last_subtype.len());
        self.last_subtype.push(id);
        self.parent.push(None);
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_system() {
        let types = vec![
            ("A", None),
            ("B", None),
            ("A1", Some("A")),
            ("A11", Some("A1")),
            ("A2", Some("A")),
            ("A12", Some("A1")),
        ];

        let ts = TypeHierarchy::new(types).unwrap();
        let names = ["A", "B", "A1", "A11", "A12", "A2"];
        let ids: Vec<TypeId> = names.iter().map(|name| ts.id_of(name).unwrap()).collect();
        if let [a, b, a1, a11, a12, a2] = *ids {
            assert!(ts.is_subtype(a, a));
            assert!(ts.is_subtype(a, a1));
            assert!(ts.is_subtype(a, a11));
            assert!(ts.is_subtype(a, a12));
            assert!(ts.is_subtype(a, a2));

            assert!(ts.is_subtype(a1, a1));
            assert!(ts.is_subtype(a1, a11));
            assert!(ts.is_subtype(a1, a12));
            assert!(!ts.is_subtype(a1, a));

            assert!(!ts.is_subtype(a, b));
            assert!(!ts.is_subtype(b, a));
        } else {
            panic!("unexpected number of types");
        }
    }

    #[test]
    fn unreachable_type_is_rejected() {
        let types = vec![("A", None), ("B", Some("missing"))];
        assert!(TypeHierarchy::new(types).is_err());
    }
}
