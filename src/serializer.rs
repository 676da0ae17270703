//! Canonical JSON (de)serialization of the IR. See spec.md §6 "IR handoff":
//! "canonical JSON with deterministic field order so downstream tools can
//! consume it without linking against the core as a library."
//!
//! Reworked from the teacher's `compiler::serializer::BinarySerializer`
//! (a custom binary format for kernel loading) into plain `serde_json`,
//! since the IR handoff contract here is a textual, tool-agnostic format,
//! not a kernel-loadable blob. `SymbolTable` carries its own
//! `Serialize`/`Deserialize` impl (see `ir::app_spec`) that renders as a
//! sorted array rather than a JSON object, so `AppSpec`'s derived impls
//! already produce canonical output with no wrapper type needed here.

use crate::error::{DazzleError, DazzleResult};
use crate::ir::AppSpec;
use tracing::instrument;

/// Serializes an `AppSpec` to pretty-printed, deterministic JSON. Two
/// `AppSpec`s with the same declarations serialize byte-identically
/// regardless of module processing order quirks, since `SymbolTable`
/// always renders sorted (spec.md §8 "Determinism").
#[instrument(skip(spec))]
pub fn to_json(spec: &AppSpec) -> DazzleResult<String> {
    serde_json::to_string_pretty(spec).map_err(|e| DazzleError::Io(format!("failed to serialize AppSpec: {e}")))
}

#[instrument(skip(content))]
pub fn from_json(content: &str) -> DazzleResult<AppSpec> {
    serde_json::from_str(content).map_err(|e| DazzleError::Io(format!("failed to deserialize AppSpec: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{AppSpec, SymbolTable};

    #[test]
    fn round_trips_a_minimal_spec() {
        let spec = AppSpec {
            app_name: "m".to_string(),
            app_title: "m".to_string(),
            modules: Vec::new(),
            symbols: SymbolTable::new(),
            llm_config: None,
            stack_name: None,
        };
        let json = to_json(&spec).unwrap();
        let round_tripped = from_json(&json).unwrap();
        assert_eq!(round_tripped.app_name, spec.app_name);
        assert_eq!(round_tripped.modules.len(), spec.modules.len());
    }
}
