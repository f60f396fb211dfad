//! The Büchi automaton model: an arena of states and transitions addressed by stable
//! indices, never by owning references (spec.md 9: "never hold owning cross-references").
//!
//! [`buchi`] turns the external translator's never-claim text into a value of this type;
//! [`crate::compile`] is the only other reader.

pub mod buchi;

use crate::model::Atom;
use crate::ref_store::RefStore;

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct StateId(usize);
impl From<usize> for StateId {
    fn from(i: usize) -> Self {
        StateId(i)
    }
}
impl From<StateId> for usize {
    fn from(i: StateId) -> Self {
        i.0
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub struct TransId(usize);
impl From<usize> for TransId {
    fn from(i: usize) -> Self {
        TransId(i)
    }
}
impl From<TransId> for usize {
    fn from(i: TransId) -> Self {
        i.0
    }
}

#[derive(Clone, Debug)]
pub struct State {
    /// The raw SPIN-side identifier (e.g. `T0_init`, `accept_all`), kept only for
    /// diagnostics: everything else addresses states by [`StateId`].
    pub spin_id: String,
    pub accepting: bool,
    pub outgoing: Vec<TransId>,
    pub incoming: Vec<TransId>,
}

/// A label is a conjunction of positive and negative atom occurrences; an empty label is the
/// constant `true` (spec.md 3).
#[derive(Clone, Debug, Default)]
pub struct Label {
    pub pos: Vec<Atom>,
    pub neg: Vec<Atom>,
}

#[derive(Clone, Debug)]
pub struct Transition {
    pub src: StateId,
    pub dst: StateId,
    pub label: Label,
}

#[derive(Clone, Debug)]
pub struct Automaton {
    states: RefStore<StateId, State>,
    transitions: RefStore<TransId, Transition>,
    initial: StateId,
}

impl Automaton {
    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.keys()
    }

    pub fn state(&self, id: StateId) -> &State {
        self.states.get(id)
    }

    pub fn is_accepting(&self, id: StateId) -> bool {
        self.states.get(id).accepting
    }

    pub fn transitions(&self) -> impl Iterator<Item = (TransId, &Transition)> {
        self.transitions.iter()
    }

    pub fn transition(&self, id: TransId) -> &Transition {
        self.transitions.get(id)
    }

    pub fn outgoing(&self, s: StateId) -> impl Iterator<Item = TransId> + '_ {
        self.states.get(s).outgoing.iter().copied()
    }
}

/// Incrementally assembled by [`buchi::parse_never_claim`]; states may be referenced (as a
/// transition destination) before they are defined, per spec.md 4.2 obligation 5.
#[derive(Default)]
pub struct AutomatonBuilder {
    states: RefStore<StateId, State>,
    transitions: RefStore<TransId, Transition>,
    by_spin_id: std::collections::HashMap<String, StateId>,
    initial: Option<StateId>,
}

impl AutomatonBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the state for `spin_id`, allocating it (not yet marked initial or accepting
    /// beyond what its id implies) if this is the first time it is mentioned.
    pub fn state_for(&mut self, spin_id: &str) -> StateId {
        if let Some(&id) = self.by_spin_id.get(spin_id) {
            return id;
        }
        let accepting = spin_id.contains("accept");
        let id = self.states.push(State {
            spin_id: spin_id.to_string(),
            accepting,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        self.by_spin_id.insert(spin_id.to_string(), id);
        if self.initial.is_none() {
            self.initial = Some(id);
        }
        id
    }

    pub fn add_transition(&mut self, src: StateId, dst: StateId, label: Label) -> TransId {
        let id = self.transitions.push(Transition { src, dst, label });
        self.states.get_mut(src).outgoing.push(id);
        self.states.get_mut(dst).incoming.push(id);
        id
    }

    pub fn build(self) -> anyhow::Result<Automaton> {
        let initial = self
            .initial
            .ok_or_else(|| anyhow::anyhow!("automaton has no states: no initial state"))?;
        Ok(Automaton { states: self.states, transitions: self.transitions, initial })
    }
}
