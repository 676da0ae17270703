//! Top-level pipeline sequencing: manifest → loader → linker → validator.
//! Grounded on the teacher's `compiler::mod::DescriptorCompiler` (staged
//! pipeline, one `#[instrument]`ed span per stage) but synchronous, since
//! the core is a batch compiler with no stage requiring concurrency for
//! correctness (spec.md §5).

use crate::error::{DazzleError, Diagnostic, Diagnostics};
use crate::ir::AppSpec;
use crate::linker;
use crate::loader;
use crate::location::Location;
use crate::manifest::Manifest;
use crate::validator;
use std::path::Path;
use tracing::{info, instrument};

/// Compiles a project rooted at `manifest_path` straight through to a
/// validated `AppSpec`. Mirrors spec.md §6 "IR handoff":
/// `compile(manifest_path) -> Result<AppSpec, Diagnostics>`. Warnings do
/// not fail the compile; only `Diagnostic::is_error` entries do.
#[instrument(skip(manifest_path))]
pub fn compile(manifest_path: impl AsRef<Path>) -> Result<AppSpec, Diagnostics> {
    let manifest_path = manifest_path.as_ref();
    let manifest = Manifest::load(manifest_path).map_err(|e| single(e, manifest_path))?;

    let module_asts = loader::load_modules(&manifest).map_err(|e| single(e, manifest_path))?;
    let any_app_decl = module_asts.iter().any(|m| m.app.is_some());
    info!(modules = module_asts.len(), "loaded modules");

    let mut spec = linker::link(module_asts).map_err(|e| single(e, manifest_path))?;
    spec.stack_name = manifest.stack_name.clone();

    let mut diagnostics = validator::validate(&spec);
    if !any_app_decl {
        diagnostics.push(
            Diagnostic::warning(
                Location::synthetic(std::sync::Arc::new(manifest_path.to_path_buf())),
                "validate.app_declaration_inferred",
                format!(
                    "no `app` declaration found; inferring app_name = {:?} from the first module",
                    spec.app_name
                ),
            ),
        );
    }
    for key in &manifest.unknown_keys {
        diagnostics.push(Diagnostic::warning(
            Location::synthetic(std::sync::Arc::new(manifest_path.to_path_buf())),
            "manifest.unknown_key",
            format!("unrecognized manifest key `{key}`"),
        ));
    }
    diagnostics.sort();

    if diagnostics.has_errors() {
        return Err(diagnostics);
    }

    Ok(spec)
}

fn single(err: DazzleError, manifest_path: &Path) -> Diagnostics {
    let fallback = Location::synthetic(std::sync::Arc::new(manifest_path.to_path_buf()));
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(err.into_diagnostic(fallback));
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_project(dir: &std::path::Path, files: &[(&str, &str)]) {
        std::fs::write(
            dir.join("dazzle.toml"),
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n[modules]\npaths = [\"src\"]\n",
        )
        .unwrap();
        std::fs::create_dir_all(dir.join("src")).unwrap();
        for (name, content) in files {
            let mut f = std::fs::File::create(dir.join("src").join(name)).unwrap();
            f.write_all(content.as_bytes()).unwrap();
        }
    }

    #[test]
    fn compiles_a_minimal_module() {
        let dir = tempfile::tempdir().unwrap();
        write_project(
            dir.path(),
            &[(
                "m.dsl",
                "module m\nentity Task \"Task\":\n    id: uuid pk\n    title: str(200) required\n",
            )],
        );

        let spec = compile(dir.path().join("dazzle.toml")).unwrap();
        assert_eq!(spec.app_name, "m");
        assert_eq!(spec.modules.len(), 1);
    }

    #[test]
    fn reports_no_modules_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("dazzle.toml"),
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n[modules]\npaths = [\"src\"]\n",
        )
        .unwrap();
        std::fs::create_dir_all(dir.path().join("src")).unwrap();

        let err = compile(dir.path().join("dazzle.toml")).unwrap_err();
        assert!(err.has_errors());
    }

    #[test]
    fn reports_module_cycle() {
        let dir = tempfile::tempdir().unwrap();
        write_project(
            dir.path(),
            &[("a.dsl", "module a\nuse b\n"), ("b.dsl", "module b\nuse a\n")],
        );

        let err = compile(dir.path().join("dazzle.toml")).unwrap_err();
        assert_eq!(err.0.len(), 1);
        assert_eq!(err.0[0].code, "link.cycle");
    }
}
