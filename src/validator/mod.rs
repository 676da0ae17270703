//! Semantic validator: traverses the linked `AppSpec`, collecting every
//! diagnostic it can before returning. Never rewrites the IR (spec.md §4.5
//! "Contract"). See `crate::compile` for how this composes with linking.

mod access;
mod entities;
mod lint;
mod processes;
mod reserved;
mod references;
mod surfaces;
mod transitions;
mod workspaces;

use crate::error::Diagnostics;
use crate::ir::AppSpec;
use tracing::instrument;

/// Runs every validation rule group against `spec`, returning a sorted
/// batch of diagnostics. The caller decides whether to treat the result as
/// a failure (any `Diagnostic::is_error`) — the validator itself never
/// halts early (spec.md §7 "Propagation": "Validation errors are
/// collected fully and returned together").
#[instrument(skip(spec))]
pub fn validate(spec: &AppSpec) -> Diagnostics {
    let mut diags = Diagnostics::new();

    references::check(spec, &mut diags);
    entities::check(spec, &mut diags);
    transitions::check(spec, &mut diags);
    access::check(spec, &mut diags);
    surfaces::check(spec, &mut diags);
    workspaces::check(spec, &mut diags);
    processes::check(spec, &mut diags);
    lint::check(spec, &mut diags);

    diags.sort();
    for diag in diags.iter().filter(|d| !d.is_error()) {
        tracing::warn!(code = diag.code, message = %diag.message, "validation warning");
    }
    tracing::info!(
        errors = diags.error_count(),
        warnings = diags.warning_count(),
        "validation complete"
    );
    diags
}
