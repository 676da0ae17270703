//! Module loader: file discovery from a project manifest, lexing and
//! parsing every discovered `.dsl` file into a `ModuleAst`. See spec.md
//! §4.3 "Module loader".

use crate::error::{DazzleError, DazzleResult};
use crate::ir::ModuleAst;
use crate::lexer::lex_file;
use crate::manifest::Manifest;
use crate::parser::parse_module;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Walks every directory named in the manifest's `[modules].paths`,
/// collecting files with a `.dsl` extension (spec.md §4.3 "Discovery").
#[instrument(skip(manifest))]
pub fn discover_files(manifest: &Manifest) -> DazzleResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for dir in manifest.resolved_module_dirs() {
        walk_dir(&dir, &mut files)?;
    }
    files.sort();
    Ok(files)
}

fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> DazzleResult<()> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| DazzleError::Io(format!("cannot read directory {}: {e}", dir.display())))?;
    for entry in entries {
        let entry = entry.map_err(|e| DazzleError::Io(format!("cannot read directory entry: {e}")))?;
        let path = entry.path();
        if path.is_dir() {
            walk_dir(&path, out)?;
        } else if path.extension().and_then(|e| e.to_str()) == Some("dsl") {
            out.push(path);
        }
    }
    Ok(())
}

/// Reads, lexes, and parses every `.dsl` file under the manifest's module
/// paths. A file whose first non-comment statement is not `module
/// DottedName` is reported as `MissingModuleHeader`; the guard is really
/// enforced by the parser requiring `module` first, so we only add the
/// path context here. Two files declaring the same module name are a
/// `DuplicateModule` error unless their contents are byte-identical, in
/// which case the later file is silently skipped (spec.md §4.3).
#[instrument(skip(manifest))]
pub fn load_modules(manifest: &Manifest) -> DazzleResult<Vec<ModuleAst>> {
    let files = discover_files(manifest)?;
    if files.is_empty() {
        return Err(DazzleError::NoModulesFound);
    }

    let mut modules: Vec<ModuleAst> = Vec::new();
    let mut contents_by_name: std::collections::HashMap<String, (PathBuf, String)> = std::collections::HashMap::new();

    for path in files {
        let source = std::fs::read_to_string(&path)
            .map_err(|e| DazzleError::Io(format!("cannot read {}: {e}", path.display())))?;
        let source = strip_bom(&source);
        let file = Arc::new(path.clone());

        let tokens = lex_file(source, file.clone())?;
        if !starts_with_module_header(&tokens) {
            return Err(DazzleError::MissingModuleHeader {
                path: path.display().to_string(),
            });
        }
        let ast = parse_module(tokens, file)?;

        if let Some((first_path, first_content)) = contents_by_name.get(&ast.name) {
            if first_content == source {
                debug!(module = %ast.name, path = %path.display(), "skipping verbatim duplicate module file");
                continue;
            }
            return Err(DazzleError::DuplicateModule {
                name: ast.name.clone(),
                first: first_path.display().to_string(),
                second: path.display().to_string(),
            });
        }
        contents_by_name.insert(ast.name.clone(), (path.clone(), source.to_string()));
        modules.push(ast);
    }

    Ok(modules)
}

fn strip_bom(source: &str) -> &str {
    source.strip_prefix('\u{feff}').unwrap_or(source)
}

fn starts_with_module_header(tokens: &[crate::lexer::Token]) -> bool {
    use crate::lexer::{Keyword, TokenKind};
    tokens
        .iter()
        .find(|t| !matches!(t.kind, TokenKind::Newline))
        .map(|t| matches!(t.kind, TokenKind::Keyword(Keyword::Module)))
        .unwrap_or(false)
}
