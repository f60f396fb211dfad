//! LTL formula serialization to the external translator's line-based grammar (spec.md 4.1)
//! and the atom name map the Büchi parser uses to recover literals from label text.

pub mod serialize;

pub use crate::model::Ltl;
pub use serialize::{serialize, AtomNames};
