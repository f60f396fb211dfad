//! Reads the surface STRIPS+LTL syntax: [`sexpr`] turns source text into a bare parenthesized
//! tree, [`surface`] interprets that tree as a domain, an instance and an LTL goal.

pub mod sexpr;
pub mod surface;
