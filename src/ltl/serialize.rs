//! spec.md 4.1: renders an [`Ltl`] tree into the fully-parenthesized line the external
//! translator expects, and builds the canonical-name -> atom map the automaton parser (4.2)
//! uses to recover literals from transition labels.

use crate::model::{Atom, Ltl, Term};
use crate::symbols::SymbolTable;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Injective map from an atom's canonical name (without the `!` polarity marker) to the atom
/// it names. Built as a side effect of serialization; consulted while parsing labels.
#[derive(Default)]
pub struct AtomNames {
    by_name: HashMap<String, Atom>,
}

impl AtomNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pred_arg1_arg2…`, the atom's canonical name with no polarity marker.
    pub fn name_of<T>(symbols: &SymbolTable<T, String>, atom: &Atom) -> String {
        let mut s = symbols.symbol(atom.pred).clone();
        for arg in &atom.args {
            let arg_name = match arg {
                Term::Const(c) => symbols.symbol(*c).clone(),
                Term::Var(i) => format!("v{i}"),
            };
            write!(s, "_{arg_name}").unwrap();
        }
        s
    }

    fn register<T>(&mut self, symbols: &SymbolTable<T, String>, atom: &Atom) -> String {
        let name = Self::name_of(symbols, atom);
        self.by_name.entry(name.clone()).or_insert_with(|| Atom {
            pred: atom.pred,
            args: atom.args.clone(),
            positive: true,
        });
        name
    }

    /// Looks up a literal token from a transition label (already stripped of its leading
    /// `!`), returning the atom it names at positive polarity; callers apply their own
    /// polarity on top.
    pub fn lookup(&self, canonical_name: &str) -> Option<&Atom> {
        self.by_name.get(canonical_name)
    }
}

/// Serializes `formula` into the external translator's grammar, registering every atom it
/// mentions into `names` (spec.md 4.1's "side-effect: populates an injective map").
pub fn serialize<T>(symbols: &SymbolTable<T, String>, names: &mut AtomNames, formula: &Ltl) -> String {
    match formula {
        Ltl::Atom(a) => {
            let name = names.register(symbols, a);
            if a.positive {
                name
            } else {
                format!("!{name}")
            }
        }
        Ltl::Not(x) => format!("(!{})", serialize(symbols, names, x)),
        Ltl::And(a, b) => format!(
            "({} && {})",
            serialize(symbols, names, a),
            serialize(symbols, names, b)
        ),
        Ltl::Or(a, b) => format!(
            "({} || {})",
            serialize(symbols, names, a),
            serialize(symbols, names, b)
        ),
        Ltl::Impl(a, b) => format!(
            "({} -> {})",
            serialize(symbols, names, a),
            serialize(symbols, names, b)
        ),
        Ltl::Iff(a, b) => format!(
            "({} <-> {})",
            serialize(symbols, names, a),
            serialize(symbols, names, b)
        ),
        Ltl::Next(x) => format!("(X {})", serialize(symbols, names, x)),
        Ltl::Always(x) => format!("([] {})", serialize(symbols, names, x)),
        Ltl::Eventually(x) => format!("(<> {})", serialize(symbols, names, x)),
        Ltl::Until(a, b) => format!(
            "({} U {})",
            serialize(symbols, names, a),
            serialize(symbols, names, b)
        ),
        Ltl::Release(a, b) => format!(
            "({} V {})",
            serialize(symbols, names, a),
            serialize(symbols, names, b)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TypeHierarchy;

    fn symbols() -> SymbolTable<String, String> {
        let types = TypeHierarchy::new(vec![("predicate".to_string(), None)]).unwrap();
        SymbolTable::new(types, vec![("p".to_string(), "predicate".to_string())]).unwrap()
    }

    #[test]
    fn atom_round_trips_through_name_map() {
        let symbols = symbols();
        let p = symbols.id("p").unwrap();
        let mut names = AtomNames::new();
        let formula = Ltl::Eventually(Box::new(Ltl::Atom(Atom::pos(p, vec![]))));
        let text = serialize(&symbols, &mut names, &formula);
        assert_eq!(text, "(<> p)");
        assert!(names.lookup("p").is_some());
    }

    #[test]
    fn negated_atom_gets_bang_prefix_but_unprefixed_name() {
        let symbols = symbols();
        let p = symbols.id("p").unwrap();
        let mut names = AtomNames::new();
        let formula = Ltl::Atom(Atom::neg(p, vec![]));
        let text = serialize(&symbols, &mut names, &formula);
        assert_eq!(text, "!p");
        assert!(names.lookup("p").is_some());
    }
}
