//! `dazzle.toml` project manifest. See spec.md §6 "Project manifest".
//!
//! Follows the teacher's `config/mod.rs` shape: a loader with
//! `load_from_file`/`load_from_str`, a `validate()` per section, and
//! `Default` impls where the format allows omission.

use crate::error::{DazzleError, DazzleResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    pub name: String,
    pub version: String,
    #[serde(flatten)]
    pub extra: toml::value::Table,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModulesSection {
    pub paths: Vec<PathBuf>,
    #[serde(flatten)]
    pub extra: toml::value::Table,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StackSection {
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: toml::value::Table,
}

#[derive(Debug, Clone, Deserialize)]
struct RawManifest {
    project: ProjectSection,
    modules: ModulesSection,
    stack: Option<StackSection>,
    #[serde(flatten)]
    extra: toml::value::Table,
}

/// A parsed, validated `dazzle.toml`. Unknown top-level keys are preserved
/// in `extra` and forwarded (spec.md §6); unknown keys within recognized
/// sections surface as `Diagnostics` from [`Manifest::load`], not as
/// load failures.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub project_name: String,
    pub project_version: String,
    pub module_paths: Vec<PathBuf>,
    pub stack_name: Option<String>,
    pub root: PathBuf,
    pub unknown_keys: Vec<String>,
    /// Unrecognized top-level tables, preserved and forwarded verbatim
    /// (spec.md §6: "Unknown top-level keys are preserved and forwarded"),
    /// unlike unrecognized keys within a known section, which surface as
    /// `unknown_keys` warnings instead.
    pub top_level_extra: toml::value::Table,
}

const KNOWN_PROJECT_KEYS: &[&str] = &["name", "version"];
const KNOWN_MODULES_KEYS: &[&str] = &["paths"];
const KNOWN_STACK_KEYS: &[&str] = &["name"];

impl Manifest {
    pub fn load(path: impl AsRef<Path>) -> DazzleResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DazzleError::Io(format!("cannot read manifest {}: {e}", path.display())))?;
        let root = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self::parse(&content, root)
    }

    pub fn parse(content: &str, root: PathBuf) -> DazzleResult<Self> {
        let raw: RawManifest =
            toml::from_str(content).map_err(|e| DazzleError::Manifest(format!("invalid dazzle.toml: {e}")))?;

        if raw.modules.paths.is_empty() {
            return Err(DazzleError::Manifest(
                "[modules].paths must be a non-empty array".to_string(),
            ));
        }

        let mut unknown_keys = Vec::new();
        collect_unknown(&raw.project.extra, "project", KNOWN_PROJECT_KEYS, &mut unknown_keys);
        collect_unknown(&raw.modules.extra, "modules", KNOWN_MODULES_KEYS, &mut unknown_keys);
        if let Some(stack) = &raw.stack {
            collect_unknown(&stack.extra, "stack", KNOWN_STACK_KEYS, &mut unknown_keys);
        }

        Ok(Manifest {
            project_name: raw.project.name,
            project_version: raw.project.version,
            module_paths: raw.modules.paths,
            stack_name: raw.stack.and_then(|s| s.name),
            root,
            unknown_keys,
            top_level_extra: raw.extra,
        })
    }

    /// Absolute directories to search for `.dsl` files (spec.md §4.3
    /// "Discovery").
    pub fn resolved_module_dirs(&self) -> Vec<PathBuf> {
        self.module_paths.iter().map(|p| self.root.join(p)).collect()
    }
}

fn collect_unknown(table: &toml::value::Table, section: &str, known: &[&str], out: &mut Vec<String>) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            out.push(format!("{section}.{key}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_manifest() {
        let m = Manifest::parse(
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n[modules]\npaths = [\"src\"]\n",
            PathBuf::from("."),
        )
        .unwrap();
        assert_eq!(m.project_name, "demo");
        assert_eq!(m.module_paths, vec![PathBuf::from("src")]);
        assert!(m.unknown_keys.is_empty());
    }

    #[test]
    fn rejects_empty_module_paths() {
        let err = Manifest::parse(
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n[modules]\npaths = []\n",
            PathBuf::from("."),
        );
        assert!(err.is_err());
    }

    #[test]
    fn flags_unknown_keys_without_failing() {
        let m = Manifest::parse(
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\ncolor = \"red\"\n[modules]\npaths = [\"src\"]\n",
            PathBuf::from("."),
        )
        .unwrap();
        assert_eq!(m.unknown_keys, vec!["project.color".to_string()]);
    }

    #[test]
    fn passes_through_stack_name() {
        let m = Manifest::parse(
            "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n[modules]\npaths = [\"src\"]\n[stack]\nname = \"next-rails\"\n",
            PathBuf::from("."),
        )
        .unwrap();
        assert_eq!(m.stack_name.as_deref(), Some("next-rails"));
    }
}
