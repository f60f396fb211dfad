//! The Emitter (spec.md 4.4): serializes the (possibly compiled) domain and instance back to
//! the surface syntax. It never rewrites — only formats what [`crate::compile`] or the
//! surface parser already produced.

use crate::model::{ActionSchema, Atom, Clause, ClauseEffect, Complex, ConjGuard, Domain, Guard, Instance, OneOf, Param, Term};
use crate::symbols::SymbolTable;
use std::fmt::Write as _;

fn wrap_and(parts: Vec<String>) -> String {
    match parts.len() {
        0 => "(and)".to_string(),
        1 => parts.into_iter().next().unwrap(),
        _ => format!("(and {})", parts.join(" ")),
    }
}

/// spec.md 4.4 (ii): two or more literals wrap in `(or ...)`; a single literal is emitted bare.
fn wrap_or(parts: Vec<String>) -> String {
    match parts.len() {
        0 => "(or)".to_string(),
        1 => parts.into_iter().next().unwrap(),
        _ => format!("(or {})", parts.join(" ")),
    }
}

fn fmt_term(t: &Term, scope: &[Param], symbols: &SymbolTable<String, String>) -> String {
    match t {
        Term::Const(c) => symbols.symbol(*c).clone(),
        Term::Var(i) => scope[*i].name.clone(),
    }
}

/// `positive` overrides the bucket the atom came from (the `pos`/`neg` list it sits in), not
/// [`Atom::positive`] itself — two atoms with opposite polarity compare equal (spec.md 3), so
/// the list an atom was pushed into is the only reliable polarity signal once it is stored.
fn fmt_literal(atom: &Atom, positive: bool, scope: &[Param], symbols: &SymbolTable<String, String>) -> String {
    let args: Vec<String> = atom.args.iter().map(|t| fmt_term(t, scope, symbols)).collect();
    let body = if args.is_empty() {
        format!("({})", symbols.symbol(atom.pred))
    } else {
        format!("({} {})", symbols.symbol(atom.pred), args.join(" "))
    };
    if positive {
        body
    } else {
        format!("(not {body})")
    }
}

fn fmt_clause(c: &Clause, scope: &[Param], symbols: &SymbolTable<String, String>) -> String {
    let mut lits: Vec<String> = c.pos.iter().map(|a| fmt_literal(a, true, scope, symbols)).collect();
    lits.extend(c.neg.iter().map(|a| fmt_literal(a, false, scope, symbols)));
    wrap_or(lits)
}

fn fmt_conj_guard(g: &ConjGuard, scope: &[Param], symbols: &SymbolTable<String, String>) -> String {
    let mut parts: Vec<String> = g.pos.iter().map(|a| fmt_literal(a, true, scope, symbols)).collect();
    parts.extend(g.neg.iter().map(|a| fmt_literal(a, false, scope, symbols)));
    for (a, b) in &g.neq {
        parts.push(format!("(not (= {} {}))", fmt_term(a, scope, symbols), fmt_term(b, scope, symbols)));
    }
    wrap_and(parts)
}

fn fmt_guard(g: &Guard, scope: &[Param], symbols: &SymbolTable<String, String>) -> String {
    match g {
        Guard::Conj(c) => fmt_conj_guard(c, scope, symbols),
        Guard::Cnf(clauses) => wrap_and(clauses.iter().map(|c| fmt_clause(c, scope, symbols)).collect()),
    }
}

fn fmt_typed_vars(params: &[Param], symbols: &SymbolTable<String, String>) -> String {
    params
        .iter()
        .map(|p| format!("{} - {}", p.name, symbols.types.from_id(p.tpe)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn fmt_complex(c: &Complex, action_params: &[Param], symbols: &SymbolTable<String, String>) -> String {
    let mut scope = action_params.to_vec();
    scope.extend(c.forall.iter().cloned());

    let mut body_parts: Vec<String> = c.add.iter().map(|a| fmt_literal(a, true, &scope, symbols)).collect();
    body_parts.extend(c.del.iter().map(|a| fmt_literal(a, false, &scope, symbols)));
    let body = wrap_and(body_parts);

    let inner = match &c.guard {
        None => body,
        Some(g) => format!("(when {} {})", fmt_guard(g, &scope, symbols), body),
    };

    if c.forall.is_empty() {
        inner
    } else {
        format!("(forall ({}) {})", fmt_typed_vars(&c.forall, symbols), inner)
    }
}

fn fmt_one_of(o: &OneOf, action_params: &[Param], symbols: &SymbolTable<String, String>) -> String {
    let alts: Vec<String> = o
        .alternatives
        .iter()
        .map(|alt| wrap_and(alt.iter().map(|c| fmt_complex(c, action_params, symbols)).collect()))
        .collect();
    format!("(oneof {})", alts.join(" "))
}

fn fmt_clause_effect(e: &ClauseEffect, action_params: &[Param], symbols: &SymbolTable<String, String>) -> String {
    let guard = wrap_and(e.guard.iter().map(|c| fmt_clause(c, action_params, symbols)).collect());
    let mut body_parts: Vec<String> = e.add.iter().map(|a| fmt_literal(a, true, action_params, symbols)).collect();
    body_parts.extend(e.del.iter().map(|a| fmt_literal(a, false, action_params, symbols)));
    format!("(when {} {})", guard, wrap_and(body_parts))
}

fn render_action(a: &ActionSchema, symbols: &SymbolTable<String, String>) -> String {
    let mut effect_parts: Vec<String> = a.add.iter().map(|at| fmt_literal(at, true, &a.params, symbols)).collect();
    effect_parts.extend(a.del.iter().map(|at| fmt_literal(at, false, &a.params, symbols)));
    effect_parts.extend(a.effects.iter().map(|c| fmt_complex(c, &a.params, symbols)));
    effect_parts.extend(a.one_of.iter().map(|o| fmt_one_of(o, &a.params, symbols)));
    effect_parts.extend(a.clause_effects.iter().map(|c| fmt_clause_effect(c, &a.params, symbols)));

    format!(
        "  (:action {}\n    :parameters ({})\n    :precondition {}\n    :effect {})",
        symbols.symbol(a.name),
        fmt_typed_vars(&a.params, symbols),
        fmt_conj_guard(&a.pre, &a.params, symbols),
        wrap_and(effect_parts)
    )
}

/// Produces the domain text (spec.md 4.4): types with their parents, constants grouped by
/// type with the root-type tail printed last, predicates, then each action.
pub fn emit_domain(domain: &Domain) -> String {
    let mut s = String::new();
    writeln!(s, "(define (domain {})", domain.name).unwrap();
    writeln!(s, "  (:requirements :strips :typing)").unwrap();

    let mut type_decls = Vec::new();
    for t in domain.symbols.types.types() {
        let name = domain.symbols.types.from_id(t);
        if name == "predicate" || name == "action" {
            continue;
        }
        match domain.symbols.types.parent(t) {
            Some(p) => type_decls.push(format!("{} - {}", name, domain.symbols.types.from_id(p))),
            None => type_decls.push(name.clone()),
        }
    }
    writeln!(s, "  (:types {})", type_decls.join(" ")).unwrap();

    let mut root_tail = Vec::new();
    let mut constant_lines = Vec::new();
    for t in domain.symbols.types.types() {
        let name = domain.symbols.types.from_id(t);
        if name == "predicate" || name == "action" {
            continue;
        }
        let names: Vec<String> = domain.symbols.instances_of_type(t).map(|sym| domain.symbols.symbol(sym).clone()).collect();
        if names.is_empty() {
            continue;
        }
        let line = format!("{} - {}", names.join(" "), name);
        if domain.symbols.types.parent(t).is_none() {
            root_tail.push(line);
        } else {
            constant_lines.push(line);
        }
    }
    constant_lines.extend(root_tail);
    writeln!(s, "  (:constants {})", constant_lines.join(" ")).unwrap();

    let preds: Vec<String> = domain
        .predicates
        .iter()
        .map(|p| {
            let params: Vec<Param> = p.params.iter().enumerate().map(|(i, &t)| Param { name: format!("?a{i}"), tpe: t }).collect();
            if params.is_empty() {
                format!("({})", domain.symbols.symbol(p.sym))
            } else {
                format!("({} {})", domain.symbols.symbol(p.sym), fmt_typed_vars(&params, &domain.symbols))
            }
        })
        .collect();
    writeln!(s, "  (:predicates {})", preds.join(" ")).unwrap();

    for a in &domain.actions {
        writeln!(s, "{}", render_action(a, &domain.symbols)).unwrap();
    }
    writeln!(s, ")").unwrap();
    s
}

/// Produces the instance text (spec.md 4.4): name, domain reference, empty objects block
/// (objects are emitted as domain constants), init block, goal block.
pub fn emit_instance(instance: &Instance, domain: &Domain) -> String {
    let mut s = String::new();
    writeln!(s, "(define (problem {})", instance.name).unwrap();
    writeln!(s, "  (:domain {})", instance.domain_name).unwrap();
    writeln!(s, "  (:objects)").unwrap();

    let mut init_parts: Vec<String> = instance.init_pos.iter().map(|a| fmt_literal(a, true, &[], &domain.symbols)).collect();
    init_parts.extend(instance.init_clauses.iter().map(|c| fmt_clause(c, &[], &domain.symbols)));
    writeln!(s, "  (:init {})", init_parts.join(" ")).unwrap();

    let mut goal_parts: Vec<String> = instance.goal_pos.iter().map(|a| fmt_literal(a, true, &[], &domain.symbols)).collect();
    goal_parts.extend(instance.goal_neg.iter().map(|a| fmt_literal(a, false, &[], &domain.symbols)));
    goal_parts.extend(instance.goal_clauses.iter().map(|c| fmt_clause(c, &[], &domain.symbols)));
    writeln!(s, "  (:goal {})", wrap_and(goal_parts)).unwrap();
    writeln!(s, ")").unwrap();
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::surface::parse_domain;

    #[test]
    fn emits_parenthesized_atoms_and_negation() {
        let domain = parse_domain(
            r#"(define (domain t) (:predicates (p)) (:action a :effect (and (p) (not (p)))))"#,
        )
        .unwrap();
        let text = emit_domain(&domain);
        assert!(text.contains("(p)"));
        assert!(text.contains("(not (p))"));
    }

    #[test]
    fn single_literal_clause_has_no_or() {
        let domain = parse_domain(r#"(define (domain t) (:predicates (p)))"#).unwrap();
        let p = domain.symbols.id("p").unwrap();
        let clause = Clause { pos: vec![Atom::pos(p, vec![])], neg: vec![] };
        assert_eq!(fmt_clause(&clause, &[], &domain.symbols), "(p)");
    }

    #[test]
    fn multi_literal_clause_wraps_in_or() {
        let domain = parse_domain(r#"(define (domain t) (:predicates (p) (q)))"#).unwrap();
        let p = domain.symbols.id("p").unwrap();
        let q = domain.symbols.id("q").unwrap();
        let clause = Clause { pos: vec![Atom::pos(p, vec![]), Atom::pos(q, vec![])], neg: vec![] };
        assert_eq!(fmt_clause(&clause, &[], &domain.symbols), "(or (p) (q))");
    }
}
