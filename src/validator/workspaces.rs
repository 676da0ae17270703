//! Workspace well-formedness: engine hints, aggregation expressions, and
//! signal limits. See spec.md §4.5 "Workspaces".

use crate::error::{Diagnostic, Diagnostics};
use crate::ir::expr::Expr;
use crate::ir::workspace::{EngineHint, Workspace};
use crate::ir::{AppSpec, DeclCategory, Declaration};

const AGGREGATE_FNS: &[&str] = &["count", "sum", "avg", "min", "max"];

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.declarations(DeclCategory::Workspace) {
        let Declaration::Workspace(workspace) = decl else { continue };
        check_workspace(workspace, diags);
    }
}

fn check_workspace(workspace: &Workspace, diags: &mut Diagnostics) {
    if let (Some(hint), Some(loc)) = (&workspace.engine_hint, &workspace.engine_hint_location) {
        if EngineHint::parse(hint).is_none() {
            diags.push(Diagnostic::error(
                loc.clone(),
                "validate.invalid_engine_hint",
                format!(
                    "workspace `{}`: `{hint}` is not a recognized engine_hint (focus_metric, scanner_table, dual_pane_flow, monitor_wall, command_center)",
                    workspace.name
                ),
            ));
        }
    }

    for signal in &workspace.signals {
        if let (Some(limit), Some(loc)) = (signal.limit, &signal.limit_location) {
            if limit < 1 {
                diags.push(Diagnostic::error(
                    loc.clone(),
                    "validate.invalid_aggregation",
                    format!("workspace `{}` signal `{}`: `limit` must be a positive integer", workspace.name, signal.name),
                ));
            }
        }

        for aggregate in &signal.aggregate {
            check_aggregate_expr(workspace, signal, &aggregate.expr, diags);
        }
    }
}

fn check_aggregate_expr(workspace: &Workspace, signal: &crate::ir::workspace::Signal, expr: &Expr, diags: &mut Diagnostics) {
    let Expr::Call { name, args, location } = expr else {
        diags.push(Diagnostic::error(
            expr.location().clone(),
            "validate.invalid_aggregation",
            format!(
                "workspace `{}` signal `{}`: aggregate must be count/sum/avg/min/max",
                workspace.name, signal.name
            ),
        ));
        return;
    };

    if !AGGREGATE_FNS.contains(&name.as_str()) {
        diags.push(Diagnostic::error(
            location.clone(),
            "validate.invalid_aggregation",
            format!(
                "workspace `{}` signal `{}`: `{name}` is not a recognized aggregate function",
                workspace.name, signal.name
            ),
        ));
        return;
    }

    if args.is_empty() {
        diags.push(Diagnostic::error(
            location.clone(),
            "validate.invalid_aggregation",
            format!("workspace `{}` signal `{}`: `{name}(...)` requires an argument", workspace.name, signal.name),
        ));
    }
}
