//! The AST the surface parser produces and the LTL compiler mutates in place: types,
//! predicates, atoms, clauses, effect forms and action schemas (spec.md 3), plus the two
//! containers (`Domain`, `Instance`) that hold a whole problem between phases.
//!
//! Fresh symbols are always appended (never inserted in the middle of an existing list) so
//! that indices handed out before compilation remain valid after it; see spec.md 3's
//! "Lifecycle" paragraph.

use crate::symbols::SymId;
use crate::types::TypeId;
use std::collections::HashSet;

/// Either a bound constant or the `i`-th parameter of the enclosing scope (an action's own
/// parameters, followed by any `forall`-bound parameters local to one [`Complex`] effect).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Term {
    Const(SymId),
    Var(usize),
}

/// A predicate reference applied to an ordered argument list, with a polarity flag.
///
/// Equality and hashing deliberately ignore `positive`, matching spec.md 3: "Two atoms are
/// equal iff predicate and argument list are equal." This lets the compiler use the same
/// `Atom` value as both a positive and a negative reference to a fact (e.g. a clause's `pos`
/// and `neg` buckets) without the equality-ignoring-polarity rule being reimplemented at every
/// call site.
#[derive(Clone, Debug)]
pub struct Atom {
    pub pred: SymId,
    pub args: Vec<Term>,
    pub positive: bool,
}

impl Atom {
    pub fn pos(pred: SymId, args: Vec<Term>) -> Self {
        Atom { pred, args, positive: true }
    }

    pub fn neg(pred: SymId, args: Vec<Term>) -> Self {
        Atom { pred, args, positive: false }
    }

    pub fn negated(&self) -> Atom {
        Atom { pred: self.pred, args: self.args.clone(), positive: !self.positive }
    }
}

impl PartialEq for Atom {
    fn eq(&self, other: &Self) -> bool {
        self.pred == other.pred && self.args == other.args
    }
}
impl Eq for Atom {}
impl std::hash::Hash for Atom {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pred.hash(state);
        self.args.hash(state);
    }
}

/// A disjunction of positive and negative atom occurrences.
#[derive(Clone, Debug, Default)]
pub struct Clause {
    pub pos: Vec<Atom>,
    pub neg: Vec<Atom>,
}

/// A flat conjunctive guard: positive atoms, negative atoms, and disequality constraints
/// between two terms of the enclosing scope (needed for `loopHere`'s `?x≠?s` universal
/// delete, spec.md 4.3.4).
#[derive(Clone, Debug, Default)]
pub struct ConjGuard {
    pub pos: Vec<Atom>,
    pub neg: Vec<Atom>,
    pub neq: Vec<(Term, Term)>,
}

impl ConjGuard {
    pub fn is_trivial(&self) -> bool {
        self.pos.is_empty() && self.neg.is_empty() && self.neq.is_empty()
    }
}

/// A guard on an effect form, either a flat conjunction or a clause set (CNF).
#[derive(Clone, Debug)]
pub enum Guard {
    Conj(ConjGuard),
    Cnf(Vec<Clause>),
}

/// One `forall`-bound parameter local to a [`Complex`] effect, named for emission.
#[derive(Clone, Debug)]
pub struct Param {
    pub name: String,
    pub tpe: TypeId,
}

/// Effect form (spec.md 3 calls it "Complex"): `forall params. (guard => (adds & dels))`.
/// `forall` parameters are addressed as `Term::Var(n + i)` where `n` is the enclosing action
/// schema's own parameter count and `i` is the index into `forall`.
#[derive(Clone, Debug, Default)]
pub struct Complex {
    pub forall: Vec<Param>,
    pub guard: Option<Guard>,
    pub add: Vec<Atom>,
    pub del: Vec<Atom>,
}

/// A block of mutually exclusive alternative effect lists; exactly one is applied.
#[derive(Clone, Debug)]
pub struct OneOf {
    pub alternatives: Vec<Vec<Complex>>,
}

/// A disjunctive guard (CNF) gating an add/delete pair, used only for effects the LTL
/// compiler introduces from automaton transition labels (spec.md 3).
#[derive(Clone, Debug)]
pub struct ClauseEffect {
    pub guard: Vec<Clause>,
    pub add: Vec<Atom>,
    pub del: Vec<Atom>,
}

#[derive(Clone, Debug)]
pub struct Predicate {
    pub sym: SymId,
    pub params: Vec<TypeId>,
}

#[derive(Clone, Debug)]
pub struct ActionSchema {
    pub name: SymId,
    pub params: Vec<Param>,
    pub pre: ConjGuard,
    pub add: Vec<Atom>,
    pub del: Vec<Atom>,
    pub effects: Vec<Complex>,
    pub one_of: Vec<OneOf>,
    pub clause_effects: Vec<ClauseEffect>,
}

impl ActionSchema {
    pub fn new(name: SymId, params: Vec<Param>) -> Self {
        ActionSchema {
            name,
            params,
            pre: ConjGuard::default(),
            add: Vec::new(),
            del: Vec::new(),
            effects: Vec::new(),
            one_of: Vec::new(),
            clause_effects: Vec::new(),
        }
    }
}

/// The LTL goal tree, before compilation replaces it with classical goal sets.
#[derive(Clone, Debug)]
pub enum Ltl {
    Atom(Atom),
    Not(Box<Ltl>),
    And(Box<Ltl>, Box<Ltl>),
    Or(Box<Ltl>, Box<Ltl>),
    Impl(Box<Ltl>, Box<Ltl>),
    Iff(Box<Ltl>, Box<Ltl>),
    Next(Box<Ltl>),
    Always(Box<Ltl>),
    Eventually(Box<Ltl>),
    Until(Box<Ltl>, Box<Ltl>),
    Release(Box<Ltl>, Box<Ltl>),
}

/// The combined domain+instance container the compiler operates on. spec.md 3 describes the
/// domain container as already holding init/goal/automaton fields; we keep domain and
/// instance data in one struct during compilation and let the emitter split it back into two
/// surface-syntax artifacts (spec.md 4.4).
pub struct Domain {
    pub name: String,
    pub symbols: crate::symbols::SymbolTable<String, String>,
    pub pure_constants: HashSet<SymId>,
    pub predicates: Vec<Predicate>,
    pub actions: Vec<ActionSchema>,
}

impl Domain {
    pub fn predicate(&self, sym: SymId) -> &Predicate {
        self.predicates.iter().find(|p| p.sym == sym).expect("unknown predicate symbol")
    }
}

pub struct Instance {
    pub name: String,
    pub domain_name: String,
    pub init_pos: Vec<Atom>,
    pub init_clauses: Vec<Clause>,
    pub goal_pos: Vec<Atom>,
    pub goal_neg: Vec<Atom>,
    pub goal_clauses: Vec<Clause>,
    pub ltl_goal: Option<Ltl>,
    pub automaton: Option<crate::automaton::Automaton>,
}

impl Instance {
    pub fn new(name: String, domain_name: String) -> Self {
        Instance {
            name,
            domain_name,
            init_pos: Vec::new(),
            init_clauses: Vec::new(),
            goal_pos: Vec::new(),
            goal_neg: Vec::new(),
            goal_clauses: Vec::new(),
            ltl_goal: None,
            automaton: None,
        }
    }
}
