//! State-machine well-formedness and reachability. See spec.md §4.5
//! "Transitions" and "State machine termination".

use crate::error::{Diagnostic, Diagnostics};
use crate::ir::entity::{Entity, FieldType, Guard, TransitionFrom};
use crate::ir::{AppSpec, DeclCategory, Declaration};
use std::collections::{HashMap, HashSet};

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.declarations(DeclCategory::Entity) {
        let Declaration::Entity(entity) = decl else { continue };
        if entity.transitions.is_empty() {
            continue;
        }
        check_entity(spec, entity, diags);
    }
}

fn check_entity(spec: &AppSpec, entity: &Entity, diags: &mut Diagnostics) {
    let Some(status_field) = entity.status_field() else {
        diags.push(Diagnostic::error(
            entity.location.clone(),
            "validate.unknown_state",
            format!("entity `{}` declares transitions but has no enum status field", entity.name),
        ));
        return;
    };
    let FieldType::Enum { variants, default } = &status_field.ty else {
        return;
    };
    let variant_set: HashSet<&str> = variants.iter().map(String::as_str).collect();

    check_guards(spec, entity, diags);

    let mut seen_edges = HashSet::new();
    for transition in &entity.transitions {
        if let TransitionFrom::State(s) = &transition.from {
            if !variant_set.contains(s.as_str()) {
                diags.push(Diagnostic::error(
                    transition.location.clone(),
                    "validate.unknown_state",
                    format!(
                        "entity `{}` transition `from` references unknown state `{s}`",
                        entity.name
                    ),
                ));
            }
        }
        if !variant_set.contains(transition.to.as_str()) {
            diags.push(Diagnostic::error(
                transition.location.clone(),
                "validate.unknown_state",
                format!(
                    "entity `{}` transition `to` references unknown state `{}`",
                    entity.name, transition.to
                ),
            ));
        }

        let from_key = match &transition.from {
            TransitionFrom::State(s) => s.clone(),
            TransitionFrom::Wildcard => "*".to_string(),
        };
        if !seen_edges.insert((from_key, transition.to.clone())) {
            diags.push(Diagnostic::error(
                transition.location.clone(),
                "validate.duplicate_transition",
                format!(
                    "entity `{}` declares the transition {:?} -> {} more than once",
                    entity.name, transition.from, transition.to
                ),
            ));
        }
    }

    check_reachability(entity, variants, default.as_deref(), diags);
}

fn check_guards(spec: &AppSpec, entity: &Entity, diags: &mut Diagnostics) {
    let known_roles = known_roles(spec);
    for transition in &entity.transitions {
        match &transition.guard {
            Some(Guard::Requires(field_name)) if entity.field(field_name).is_none() => {
                diags.push(Diagnostic::error(
                    transition.location.clone(),
                    "validate.field_not_on_entity",
                    format!(
                        "entity `{}` transition guard `requires {field_name}` names an unknown field",
                        entity.name
                    ),
                ));
            }
            Some(Guard::Role(role)) if !known_roles.contains(role.as_str()) => {
                diags.push(Diagnostic::warning(
                    transition.location.clone(),
                    "validate.unreferenced_role",
                    format!(
                        "entity `{}` transition guard `role({role})` is not referenced by any persona or access rule",
                        entity.name
                    ),
                ));
            }
            _ => {}
        }
    }
}

/// Roles named by `role(R)` in any access rule, plus persona names, which
/// together form the universe a transition guard's `role(R)` is checked
/// against (spec.md §4.5 "Transitions": "not referenced by any persona or
/// access rule").
fn known_roles(spec: &AppSpec) -> HashSet<String> {
    let mut roles = HashSet::new();
    for decl in spec.declarations(DeclCategory::Persona) {
        if let Declaration::Persona(p) = decl {
            roles.insert(p.name.clone());
        }
    }
    for decl in spec.declarations(DeclCategory::Entity) {
        let Declaration::Entity(entity) = decl else { continue };
        for rule in entity.permit.iter().chain(entity.forbid.iter()) {
            collect_role_idents(&rule.predicate, &mut roles);
        }
    }
    roles
}

fn collect_role_idents(expr: &crate::ir::expr::Expr, roles: &mut HashSet<String>) {
    use crate::ir::expr::Expr;
    match expr {
        Expr::Call { name, args, .. } if name == "role" => {
            if let Some(Expr::Ident { name, .. }) = args.first() {
                roles.insert(name.clone());
            }
        }
        Expr::Binary { left, right, .. } => {
            collect_role_idents(left, roles);
            collect_role_idents(right, roles);
        }
        Expr::Unary { operand, .. } => collect_role_idents(operand, roles),
        Expr::Call { args, .. } => {
            for arg in args {
                collect_role_idents(arg, roles);
            }
        }
        _ => {}
    }
}

fn check_reachability(
    entity: &Entity,
    variants: &[String],
    default: Option<&str>,
    diags: &mut Diagnostics,
) {
    let Some(default) = default.or_else(|| variants.first().map(String::as_str)) else {
        return;
    };

    let mut outgoing: HashMap<&str, Vec<&str>> = HashMap::new();
    let mut has_wildcard_from = false;
    for transition in &entity.transitions {
        match &transition.from {
            TransitionFrom::State(s) => {
                outgoing.entry(s.as_str()).or_default().push(transition.to.as_str());
            }
            TransitionFrom::Wildcard => has_wildcard_from = true,
        }
    }

    let mut reachable = HashSet::new();
    let mut stack = vec![default];
    reachable.insert(default);
    while let Some(state) = stack.pop() {
        if let Some(targets) = outgoing.get(state) {
            for target in targets {
                if reachable.insert(target) {
                    stack.push(target);
                }
            }
        }
        if has_wildcard_from {
            for transition in &entity.transitions {
                if matches!(transition.from, TransitionFrom::Wildcard) && reachable.insert(transition.to.as_str()) {
                    stack.push(transition.to.as_str());
                }
            }
        }
    }

    // A state targeted by some transition's `to` is treated as having
    // reached a legitimate terminal point if it has no outgoing edge of
    // its own (spec.md §4.5 "State machine termination": "declared a
    // terminal state"). A state neither incoming nor outgoing never
    // appears in the transition table at all and is flagged on both
    // counts.
    let incoming: HashSet<&str> = entity.transitions.iter().map(|t| t.to.as_str()).collect();

    for state in variants {
        if state.as_str() != default && !reachable.contains(state.as_str()) {
            diags.push(Diagnostic::warning(
                entity.location.clone(),
                "validate.unreachable_from_default",
                format!("entity `{}` state `{state}` is unreachable from the default state", entity.name),
            ));
        }

        let has_outgoing = outgoing.get(state.as_str()).is_some_and(|v| !v.is_empty()) || has_wildcard_from;
        let is_terminal = incoming.contains(state.as_str());
        if !has_outgoing && !is_terminal {
            diags.push(Diagnostic::warning(
                entity.location.clone(),
                "validate.no_outgoing_transition",
                format!(
                    "entity `{}` state `{state}` has no outgoing transition and is not declared terminal",
                    entity.name
                ),
            ));
        }
    }
}
