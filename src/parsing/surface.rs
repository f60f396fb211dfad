//! A minimal reader for the STRIPS + typing + conditional-effects + LTL-goal subset of the
//! planning surface language (spec.md treats the full surface parser as an external
//! collaborator supplying an AST; this is the crate's own best-effort concrete instance of
//! that collaborator, grounded on the PDDL feature subset the teacher crate's own parser
//! recognized — HDDL, durative actions and numeric fluents are not supported here).

use crate::model::{ActionSchema, Atom, Complex, ConjGuard, Domain, Guard, Instance, Ltl, Param, Predicate, Term};
use crate::parsing::sexpr::{self, SExpr};
use crate::symbols::SymbolTable;
use crate::types::TypeHierarchy;
use anyhow::{anyhow, bail, Context, Result};

fn atom_list<'a>(e: &'a SExpr, what: &str) -> Result<&'a [SExpr]> {
    e.as_list().ok_or_else(|| anyhow!("line {}: expected a list for {what}", e.line()))
}

fn section<'a>(sections: &'a [SExpr], keyword: &str) -> Option<&'a [SExpr]> {
    sections.iter().find_map(|s| {
        let list = s.as_list()?;
        let (head, rest) = list.split_first()?;
        (head.as_atom()? == keyword).then_some(rest)
    })
}

/// Parses a PDDL-style typed list: a flat run of names, optionally broken into `- type`
/// segments (`?x ?y - loc ?z - obj`); names with no trailing `- type` take `default_type`.
fn parse_typed_names(items: &[SExpr], default_type: &str) -> Result<Vec<(String, String)>> {
    let mut out = Vec::new();
    let mut pending = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let tok = items[i].as_atom().ok_or_else(|| anyhow!("line {}: expected a name", items[i].line()))?;
        if tok == "-" {
            i += 1;
            let tpe = items
                .get(i)
                .and_then(|e| e.as_atom())
                .ok_or_else(|| anyhow!("expected a type name after `-`"))?;
            for name in pending.drain(..) {
                out.push((name, tpe.to_string()));
            }
            i += 1;
        } else {
            pending.push(tok.to_string());
            i += 1;
        }
    }
    for name in pending.drain(..) {
        out.push((name, default_type.to_string()));
    }
    Ok(out)
}

/// Same shape as [`parse_typed_names`] but parents are optional (root types have none), for
/// the `:types` section.
fn parse_type_decls(items: &[SExpr]) -> Result<Vec<(String, Option<String>)>> {
    let mut out = Vec::new();
    let mut pending = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let tok = items[i].as_atom().ok_or_else(|| anyhow!("line {}: expected a type name", items[i].line()))?;
        if tok == "-" {
            i += 1;
            let parent = items
                .get(i)
                .and_then(|e| e.as_atom())
                .ok_or_else(|| anyhow!("expected a parent type after `-`"))?;
            for name in pending.drain(..) {
                out.push((name, Some(parent.to_string())));
            }
            i += 1;
        } else {
            pending.push(tok.to_string());
            i += 1;
        }
    }
    for name in pending.drain(..) {
        out.push((name, None));
    }
    Ok(out)
}

fn term_of(name: &str, scope: &[Param], symbols: &SymbolTable<String, String>) -> Result<Term> {
    if let Some(i) = scope.iter().position(|p| p.name == name) {
        return Ok(Term::Var(i));
    }
    symbols
        .id(name)
        .map(Term::Const)
        .ok_or_else(|| anyhow!("reference to unknown constant or variable `{name}`"))
}

fn parse_atom_application(
    e: &SExpr,
    scope: &[Param],
    symbols: &SymbolTable<String, String>,
) -> Result<Atom> {
    let list = atom_list(e, "an atom")?;
    let (head, args) = list.split_first().ok_or_else(|| anyhow!("line {}: empty atom", e.line()))?;
    let pred_name = head.as_atom().ok_or_else(|| anyhow!("line {}: predicate name must be an atom", head.line()))?;
    let pred = symbols
        .id(pred_name)
        .ok_or_else(|| anyhow!("line {}: undeclared predicate `{pred_name}`", head.line()))?;
    let args = args
        .iter()
        .map(|a| {
            let name = a.as_atom().ok_or_else(|| anyhow!("line {}: expected an argument name", a.line()))?;
            term_of(name, scope, symbols)
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Atom::pos(pred, args))
}

fn parse_literal(e: &SExpr, scope: &[Param], symbols: &SymbolTable<String, String>) -> Result<Atom> {
    if let Some(list) = e.as_list() {
        if let Some(("not", [inner])) = list.split_first().map(|(h, t)| (h.as_atom().unwrap_or(""), t)) {
            let mut atom = parse_atom_application(inner, scope, symbols)?;
            atom.positive = false;
            return Ok(atom);
        }
    }
    parse_atom_application(e, scope, symbols)
}

fn collect_conjuncts(e: &SExpr, scope: &[Param], symbols: &SymbolTable<String, String>, g: &mut ConjGuard) -> Result<()> {
    if let Some(list) = e.as_list() {
        if list.first().and_then(|h| h.as_atom()) == Some("and") {
            for c in &list[1..] {
                collect_conjuncts(c, scope, symbols, g)?;
            }
            return Ok(());
        }
    }
    let lit = parse_literal(e, scope, symbols)?;
    if lit.positive {
        g.pos.push(lit);
    } else {
        g.neg.push(lit);
    }
    Ok(())
}

fn parse_guard(e: &SExpr, scope: &[Param], symbols: &SymbolTable<String, String>) -> Result<ConjGuard> {
    let mut g = ConjGuard::default();
    collect_conjuncts(e, scope, symbols, &mut g)?;
    Ok(g)
}

/// Parses one effect expression, accumulating unconditional adds/deletes and any nested
/// `when`/`forall` effect forms into `complexes` (spec.md 3's "Complex").
fn parse_effect(
    e: &SExpr,
    scope: &[Param],
    domain: &Domain,
    add: &mut Vec<Atom>,
    del: &mut Vec<Atom>,
    complexes: &mut Vec<Complex>,
) -> Result<()> {
    if let Some(list) = e.as_list() {
        match list.first().and_then(|h| h.as_atom()) {
            Some("and") => {
                for c in &list[1..] {
                    parse_effect(c, scope, domain, add, del, complexes)?;
                }
                return Ok(());
            }
            Some("not") => {
                let mut atom = parse_atom_application(&list[1], scope, &domain.symbols)?;
                atom.positive = false;
                del.push(atom);
                return Ok(());
            }
            Some("when") => {
                let guard = parse_guard(&list[1], scope, &domain.symbols)?;
                let (mut inner_add, mut inner_del, mut nested) = (Vec::new(), Vec::new(), Vec::new());
                parse_effect(&list[2], scope, domain, &mut inner_add, &mut inner_del, &mut nested)?;
                complexes.push(Complex { forall: vec![], guard: Some(Guard::Conj(guard)), add: inner_add, del: inner_del });
                complexes.extend(nested);
                return Ok(());
            }
            Some("forall") => {
                let var_list = atom_list(&list[1], "a forall variable list")?;
                let typed = parse_typed_names(var_list, "object")?;
                let forall_params = typed
                    .iter()
                    .map(|(n, t)| {
                        domain
                            .symbols
                            .types
                            .id_of(t)
                            .map(|tpe| Param { name: n.clone(), tpe })
                            .ok_or_else(|| anyhow!("undeclared type `{t}` in forall"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                let mut inner_scope = scope.to_vec();
                inner_scope.extend(forall_params.clone());

                let body = &list[2];
                if let Some(blist) = body.as_list() {
                    if blist.first().and_then(|h| h.as_atom()) == Some("when") {
                        let guard = parse_guard(&blist[1], &inner_scope, &domain.symbols)?;
                        let (mut inner_add, mut inner_del, mut nested) = (Vec::new(), Vec::new(), Vec::new());
                        parse_effect(&blist[2], &inner_scope, domain, &mut inner_add, &mut inner_del, &mut nested)?;
                        complexes.push(Complex {
                            forall: forall_params,
                            guard: Some(Guard::Conj(guard)),
                            add: inner_add,
                            del: inner_del,
                        });
                        complexes.extend(nested);
                        return Ok(());
                    }
                }
                let (mut inner_add, mut inner_del, mut nested) = (Vec::new(), Vec::new(), Vec::new());
                parse_effect(body, &inner_scope, domain, &mut inner_add, &mut inner_del, &mut nested)?;
                complexes.push(Complex { forall: forall_params, guard: None, add: inner_add, del: inner_del });
                complexes.extend(nested);
                return Ok(());
            }
            _ => {}
        }
    }
    add.push(parse_atom_application(e, scope, &domain.symbols)?);
    Ok(())
}

fn build_type_hierarchy(user_types: Vec<(String, Option<String>)>) -> Result<TypeHierarchy<String>> {
    let mut all = user_types;
    if !all.iter().any(|(n, _)| n == "object") {
        all.push(("object".to_string(), None));
    }
    all.push(("predicate".to_string(), None));
    all.push(("action".to_string(), None));
    TypeHierarchy::new(all).map_err(|e| anyhow!("{e}"))
}

pub fn parse_domain(src: &str) -> Result<Domain> {
    let root = sexpr::parse(src).context("reading domain s-expression")?;
    let top = atom_list(&root, "the domain file")?;
    if top.first().and_then(|e| e.as_atom()) != Some("define") {
        bail!("domain file must start with `(define ...)`");
    }
    let header = atom_list(&top[1], "the `(domain NAME)` header")?;
    let name = header.get(1).and_then(|e| e.as_atom()).unwrap_or("unnamed").to_string();
    let sections = &top[2..];

    let user_types = match section(sections, ":types") {
        Some(items) => parse_type_decls(items)?,
        None => vec![],
    };
    let types = build_type_hierarchy(user_types)?;

    let object_type = types.id_of("object").expect("object root type always present");
    let constants = match section(sections, ":constants") {
        Some(items) => parse_typed_names(items, "object")?,
        None => vec![],
    };
    let constants = constants
        .into_iter()
        .map(|(n, t)| {
            types.id_of(&t).ok_or_else(|| anyhow!("undeclared type `{t}` for constant `{n}`"))?;
            Ok((n, t))
        })
        .collect::<Result<Vec<_>>>()?;

    let symbols = SymbolTable::new(types, constants).context("building the domain symbol table")?;
    let _ = object_type;

    let mut domain = Domain { name, symbols, pure_constants: Default::default(), predicates: vec![], actions: vec![] };

    if let Some(items) = section(sections, ":predicates") {
        for item in items {
            let list = atom_list(item, "a predicate declaration")?;
            let (head, rest) = list.split_first().ok_or_else(|| anyhow!("empty predicate declaration"))?;
            let pred_name = head.as_atom().ok_or_else(|| anyhow!("predicate name must be an atom"))?;
            let typed = parse_typed_names(rest, "object")?;
            let params = typed
                .iter()
                .map(|(_, t)| domain.symbols.types.id_of(t).ok_or_else(|| anyhow!("undeclared type `{t}`")))
                .collect::<Result<Vec<_>>>()?;
            let predicate_type = domain.symbols.types.id_of("predicate").unwrap();
            let sym = domain.symbols.declare(pred_name.to_string(), predicate_type);
            domain.predicates.push(Predicate { sym, params });
        }
    }

    for s in sections {
        let list = match s.as_list() {
            Some(l) => l,
            None => continue,
        };
        if list.first().and_then(|h| h.as_atom()) != Some(":action") {
            continue;
        }
        let action_name = list.get(1).and_then(|e| e.as_atom()).ok_or_else(|| anyhow!("action missing a name"))?;
        let mut params: Vec<Param> = vec![];
        let mut pre: Option<&SExpr> = None;
        let mut eff: Option<&SExpr> = None;
        let mut i = 2;
        while i < list.len() {
            match list[i].as_atom() {
                Some(":parameters") => {
                    let var_list = atom_list(&list[i + 1], "action parameters")?;
                    let typed = parse_typed_names(var_list, "object")?;
                    params = typed
                        .iter()
                        .map(|(n, t)| {
                            domain
                                .symbols
                                .types
                                .id_of(t)
                                .map(|tpe| Param { name: n.clone(), tpe })
                                .ok_or_else(|| anyhow!("undeclared type `{t}`"))
                        })
                        .collect::<Result<Vec<_>>>()?;
                    i += 2;
                }
                Some(":precondition") => {
                    pre = Some(&list[i + 1]);
                    i += 2;
                }
                Some(":effect") => {
                    eff = Some(&list[i + 1]);
                    i += 2;
                }
                _ => i += 1,
            }
        }

        let action_type = domain.symbols.types.id_of("action").unwrap();
        let sym = domain.symbols.declare(action_name.to_string(), action_type);
        let mut schema = ActionSchema::new(sym, params);
        if let Some(pre) = pre {
            schema.pre = parse_guard(pre, &schema.params, &domain.symbols)?;
        }
        if let Some(eff) = eff {
            let mut complexes = vec![];
            let params_snapshot = schema.params.clone();
            parse_effect(eff, &params_snapshot, &domain, &mut schema.add, &mut schema.del, &mut complexes)?;
            schema.effects = complexes;
        }
        domain.actions.push(schema);
    }

    Ok(domain)
}

fn parse_ltl(e: &SExpr, symbols: &SymbolTable<String, String>) -> Result<Ltl> {
    if let Some(list) = e.as_list() {
        if let Some(head) = list.first().and_then(|h| h.as_atom()) {
            let rest = &list[1..];
            let unary = |idx: usize| -> Result<Box<Ltl>> { Ok(Box::new(parse_ltl(&rest[idx], symbols)?)) };
            return Ok(match head {
                "not" => Ltl::Not(unary(0)?),
                "and" => Ltl::And(unary(0)?, unary(1)?),
                "or" => Ltl::Or(unary(0)?, unary(1)?),
                "imply" => Ltl::Impl(unary(0)?, unary(1)?),
                "iff" => Ltl::Iff(unary(0)?, unary(1)?),
                "next" => Ltl::Next(unary(0)?),
                "always" => Ltl::Always(unary(0)?),
                "eventually" => Ltl::Eventually(unary(0)?),
                "until" => Ltl::Until(unary(0)?, unary(1)?),
                "release" => Ltl::Release(unary(0)?, unary(1)?),
                _ => Ltl::Atom(parse_atom_application(e, &[], symbols)?),
            });
        }
    }
    bail!("line {}: malformed LTL subformula", e.line())
}

pub fn parse_instance(src: &str, domain: &Domain) -> Result<Instance> {
    let root = sexpr::parse(src).context("reading instance s-expression")?;
    let top = atom_list(&root, "the instance file")?;
    if top.first().and_then(|e| e.as_atom()) != Some("define") {
        bail!("instance file must start with `(define ...)`");
    }
    let header = atom_list(&top[1], "the `(problem NAME)` header")?;
    let name = header.get(1).and_then(|e| e.as_atom()).unwrap_or("unnamed").to_string();
    let sections = &top[2..];

    let domain_name = section(sections, ":domain")
        .and_then(|s| s.first())
        .and_then(|e| e.as_atom())
        .unwrap_or(&domain.name)
        .to_string();

    let mut instance = Instance::new(name, domain_name);

    if let Some(items) = section(sections, ":init") {
        for item in items {
            instance.init_pos.push(parse_atom_application(item, &[], &domain.symbols)?);
        }
    }

    if let Some(items) = section(sections, ":goal") {
        if let [goal_expr] = items {
            if let Some(list) = goal_expr.as_list() {
                if list.first().and_then(|h| h.as_atom()) == Some("ltl") {
                    instance.ltl_goal = Some(parse_ltl(&list[1], &domain.symbols)?);
                }
            }
        }
    }

    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = r#"
        (define (domain test)
          (:types location)
          (:predicates (at ?l - location) (ready))
          (:action move
            :parameters (?from - location ?to - location)
            :precondition (and (at ?from))
            :effect (and (not (at ?from)) (at ?to))))
    "#;

    #[test]
    fn parses_domain_with_typed_action() {
        let domain = parse_domain(DOMAIN).unwrap();
        assert_eq!(domain.name, "test");
        assert_eq!(domain.predicates.len(), 2);
        let move_action = domain.actions.iter().find(|a| domain.symbols.symbol(a.name) == "move").unwrap();
        assert_eq!(move_action.params.len(), 2);
        assert_eq!(move_action.add.len(), 1);
        assert_eq!(move_action.del.len(), 1);
    }

    #[test]
    fn parses_instance_with_ltl_goal() {
        let domain = parse_domain(
            r#"(define (domain test2) (:predicates (p)) (:action mk :effect (p)))"#,
        )
        .unwrap();
        let instance = parse_instance(
            r#"(define (problem inst) (:domain test2) (:init) (:goal (ltl (eventually (p)))))"#,
            &domain,
        )
        .unwrap();
        assert!(matches!(instance.ltl_goal, Some(Ltl::Eventually(_))));
    }
}
