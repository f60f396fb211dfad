//! Associates every constant, predicate and action name in a domain with a compact,
//! comparable [`SymId`] and its declared [`TypeId`], and lets that set grow: the LTL
//! compiler interns fresh predicates, constants and actions into the same table it read
//! the original domain from (spec.md 3: "all fresh symbols are uniquely named and inserted
//! in the domain's string table before use").

use crate::types::{TypeHierarchy, TypeId};
use anyhow::{ensure, Result};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::fmt::{Debug, Display, Error, Formatter};
use std::hash::Hash;

#[derive(Clone)]
pub struct SymbolTable<T, Sym> {
    pub types: TypeHierarchy<T>,
    symbols: Vec<Sym>,
    ids: HashMap<Sym, SymId>,
    tpe_of: Vec<TypeId>,
    instances_by_exact_type: Vec<ContiguousSymbols>,
}

impl<T, Sym: Debug> Debug for SymbolTable<T, Sym> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for (i, x) in self.symbols.iter().enumerate() {
            writeln!(f, "{:?}\t<- {:?}", SymId::from(i), x)?;
        }
        Ok(())
    }
}

/// An iterable, contiguous range of symbol ids. Typically all instances of a given type.
#[derive(Copy, Clone, Debug)]
pub struct ContiguousSymbols {
    first: usize,
    after_last: usize,
}

impl ContiguousSymbols {
    pub fn new(first: SymId, last_exclusive: SymId) -> Self {
        ContiguousSymbols {
            first: first.into(),
            after_last: last_exclusive.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.after_last - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.first == self.after_last
    }
}

impl Iterator for ContiguousSymbols {
    type Item = SymId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.first < self.after_last {
            self.first += 1;
            Some(SymId::from(self.first - 1))
        } else {
            None
        }
    }
}

impl<T, Sym> SymbolTable<T, Sym> {
    /// Builds a fresh table from a type hierarchy and an initial `(symbol, type)` set.
    pub fn new(th: TypeHierarchy<T>, symbols: Vec<(Sym, T)>) -> Result<Self>
    where
        T: Clone + Eq + Hash,
        Sym: Clone + Eq + Hash + Display,
    {
        let mut instances_by_type: HashMap<TypeId, Vec<Sym>> = HashMap::new();
        for (sym, tpe) in symbols {
            let tpe_id = th.id_of(&tpe).unwrap();
            instances_by_type.entry(tpe_id).or_default().push(sym);
        }

        let n_types = th.types().count();
        let mut table = SymbolTable {
            types: th,
            symbols: Vec::new(),
            ids: HashMap::new(),
            tpe_of: Vec::new(),
            instances_by_exact_type: vec![ContiguousSymbols::new(0.into(), 0.into()); n_types],
        };

        for tpe in table.types.types() {
            let first = table.symbols.len();
            for sym in instances_by_type.remove(&tpe).unwrap_or_default() {
                ensure!(!table.ids.contains_key(&sym), "duplicated symbol: {}", sym);
                let id = SymId::from(table.symbols.len());
                table.symbols.push(sym.clone());
                table.tpe_of.push(tpe);
                table.ids.insert(sym, id);
            }
            let after_last = table.symbols.len();
            table.instances_by_exact_type[usize::from(tpe)] =
                ContiguousSymbols::new(first.into(), after_last.into());
        }

        Ok(table)
    }

    /// Interns a brand new symbol of the given type, returning its fresh id. Used by the
    /// LTL compiler to append the automaton-state constants, the per-predicate req/nreq/end
    /// twins, and the fresh actions.
    pub fn declare(&mut self, sym: Sym, tpe: TypeId) -> SymId
    where
        Sym: Clone + Eq + Hash + Display,
    {
        debug_assert!(
            self.ids.get(&sym).is_none(),
            "attempted to redeclare an existing symbol"
        );
        let id = SymId::from(self.symbols.len());
        self.symbols.push(sym.clone());
        self.tpe_of.push(tpe);
        self.ids.insert(sym, id);
        let range = &mut self.instances_by_exact_type[usize::from(tpe)];
        if range.is_empty() {
            *range = ContiguousSymbols::new(id, SymId::from(usize::from(id) + 1));
        } else {
            range.after_last = usize::from(id) + 1;
        }
        id
    }

    pub fn id<W: ?Sized>(&self, sym: &W) -> Option<SymId>
    where
        W: Eq + Hash,
        Sym: Eq + Hash + Borrow<W>,
    {
        self.ids.get(sym).copied()
    }

    pub fn symbol(&self, id: SymId) -> &Sym {
        &self.symbols[usize::from(id)]
    }

    pub fn type_of(&self, id: SymId) -> TypeId {
        self.tpe_of[usize::from(id)]
    }

    pub fn iter(&self) -> impl Iterator<Item = SymId> {
        (0..self.symbols.len()).map(SymId::from)
    }

    /// All direct or indirect instances of the given type, streamed lazily (never
    /// materialized into a `Vec`): see spec.md 4.3.3 on the grounding enumeration.
    pub fn instances_of_type(&self, tpe: TypeId) -> ContiguousSymbols {
        let mut instances = self.instances_by_exact_type[usize::from(tpe)];
        instances.after_last = self.instances_by_exact_type[usize::from(self.types.last_subtype(tpe))].after_last;
        instances
    }

    pub fn format(&self, sexpr: &[SymId]) -> String
    where
        Sym: Display,
    {
        let mut s = String::from("(");
        for sym in sexpr {
            write!(s, "{} ", self.symbol(*sym)).unwrap();
        }
        if s.ends_with(' ') {
            s.pop();
        }
        s.push(')');
        s
    }
}

/// Numeric representation of a symbol. Stable for the lifetime of its [`SymbolTable`]: new
/// symbols are always appended, never inserted in the middle, so existing ids never change.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Debug, Hash)]
pub struct SymId(u32);

impl From<SymId> for usize {
    fn from(id: SymId) -> Self {
        id.0 as usize
    }
}

impl From<usize> for SymId {
    fn from(i: usize) -> Self {
        SymId(i as u32)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    pub fn table() -> SymbolTable<&'static str, &'static str> {
        let types = vec![
            ("predicate", None),
            ("object", None),
            ("rover", Some("object")),
            ("location", Some("object")),
        ];
        let types = TypeHierarchy::new(types).unwrap();

        let instances = vec![
            ("at", "predicate"),
            ("can_traverse", "predicate"),
            ("rover1", "rover"),
            ("l1", "location"),
            ("l2", "location"),
        ];
        SymbolTable::new(types, instances).unwrap()
    }

    #[test]
    fn instances() {
        let symbols = table();
        let types = &symbols.types;
        let rover = types.id_of("rover").unwrap();
        let predicate = types.id_of("predicate").unwrap();
        let location = types.id_of("location").unwrap();
        let object = types.id_of("object").unwrap();
        assert_eq!(symbols.instances_of_type(predicate).count(), 2);
        assert_eq!(symbols.instances_of_type(object).count(), 3);
        assert_eq!(symbols.instances_of_type(rover).count(), 1);
        assert_eq!(symbols.instances_of_type(location).count(), 2);
    }

    #[test]
    fn declare_extends_type_instances() {
        let mut symbols = table();
        let object = symbols.types.id_of("object").unwrap();
        let before = symbols.instances_of_type(object).count();
        symbols.declare("rover2", symbols.types.id_of("rover").unwrap());
        assert_eq!(symbols.instances_of_type(object).count(), before + 1);
        assert!(symbols.id("rover2").is_some());
    }
}
