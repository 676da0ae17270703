//! Access-rule (`permit`/`forbid`) syntactic well-formedness. See
//! spec.md §4.5 "Access rules": "the validator performs a syntactic
//! well-formedness check only" — no attempt is made here to evaluate or
//! resolve the combined permit/forbid semantics.

use crate::error::{Diagnostic, Diagnostics};
use crate::ir::entity::Entity;
use crate::ir::expr::{BinaryOp, Expr};
use crate::ir::{AppSpec, DeclCategory, Declaration};

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.declarations(DeclCategory::Entity) {
        let Declaration::Entity(entity) = decl else { continue };
        for rule in entity.permit.iter().chain(entity.forbid.iter()) {
            check_predicate(entity, &rule.predicate, diags);
        }
    }
}

fn check_predicate(entity: &Entity, expr: &Expr, diags: &mut Diagnostics) {
    match expr {
        Expr::Ident { name, .. } if name == "authenticated" => {}
        Expr::Call { name, args, location } if name == "role" => {
            if args.len() != 1 || !matches!(args[0], Expr::Ident { .. }) {
                diags.push(Diagnostic::error(
                    location.clone(),
                    "validate.invalid_access_predicate",
                    format!("entity `{}`: `role(...)` takes exactly one identifier argument", entity.name),
                ));
            }
        }
        Expr::Binary { op, left, right, location } => {
            match op {
                BinaryOp::And | BinaryOp::Or => {
                    check_predicate(entity, left, diags);
                    check_predicate(entity, right, diags);
                }
                BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                    check_relational_operand(entity, left, diags);
                    check_relational_operand(entity, right, diags);
                }
                _ => {
                    diags.push(Diagnostic::error(
                        location.clone(),
                        "validate.invalid_access_predicate",
                        format!("entity `{}`: access predicates may only combine `and`/`or` or compare fields", entity.name),
                    ));
                }
            }
        }
        Expr::Unary { operand, .. } => check_predicate(entity, operand, diags),
        _ => {
            diags.push(Diagnostic::error(
                expr.location().clone(),
                "validate.invalid_access_predicate",
                format!(
                    "entity `{}`: access predicate must be `role(...)`, `authenticated`, or a field comparison",
                    entity.name
                ),
            ));
        }
    }
}

fn check_relational_operand(entity: &Entity, expr: &Expr, diags: &mut Diagnostics) {
    match expr {
        Expr::Ident { name, location } => {
            if name != "current_user" && entity.field(name).is_none() {
                diags.push(Diagnostic::error(
                    location.clone(),
                    "validate.field_not_on_entity",
                    format!("entity `{}`: access predicate references unknown field `{name}`", entity.name),
                ));
            }
        }
        Expr::FieldRef { path, location } => {
            if let Some(head) = path.first() {
                if entity.field(head).is_none() {
                    diags.push(Diagnostic::error(
                        location.clone(),
                        "validate.field_not_on_entity",
                        format!("entity `{}`: access predicate references unknown field `{head}`", entity.name),
                    ));
                }
            }
        }
        Expr::Literal { .. } => {}
        _ => diags.push(Diagnostic::error(
            expr.location().clone(),
            "validate.invalid_access_predicate",
            format!("entity `{}`: relational operand must be a field, `current_user`, or a literal", entity.name),
        )),
    }
}
