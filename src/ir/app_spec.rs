//! `AppSpec`: the linked, validated root. Sole contract with downstream
//! generators. See spec.md §3 "AppSpec".

use super::llm::LlmConfig;
use super::module::{Declaration, DeclCategory, Module};
use crate::location::Location;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A fully-qualified (module-prefixed) symbol table entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symbol {
    pub qualified_name: String,
    pub category: DeclCategory,
    pub location: Location,
}

/// Built by the linker in topological module order so every reference
/// resolves against already-seen declarations (spec.md §4.4 "Symbol
/// table"). Keyed by `(category, qualified_name)`; `IndexMap` keeps
/// insertion order for deterministic iteration without imposing an
/// ordering requirement on lookups.
///
/// Serializes as a sorted `Vec<Symbol>`, never a JSON object (spec.md §6
/// "canonical JSON with deterministic field order"; a `(DeclCategory,
/// String)` tuple key has no JSON-object representation regardless).
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: IndexMap<(DeclCategory, String), Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    pub fn insert(&mut self, symbol: Symbol) -> Option<Symbol> {
        let key = (symbol.category, symbol.qualified_name.clone());
        self.entries.insert(key, symbol)
    }

    pub fn get(&self, category: DeclCategory, qualified_name: &str) -> Option<&Symbol> {
        self.entries.get(&(category, qualified_name.to_string()))
    }

    pub fn contains(&self, category: DeclCategory, qualified_name: &str) -> bool {
        self.get(category, qualified_name).is_some()
    }

    /// Every symbol whose unqualified (post-`.`) name matches, regardless
    /// of which module declared it — used by reference resolution, which
    /// sees only a bare entity/surface/etc. name, not the declaring
    /// module's prefix.
    pub fn resolve_unqualified(&self, category: DeclCategory, name: &str) -> Vec<&Symbol> {
        self.entries
            .values()
            .filter(|s| s.category == category && unqualified(&s.qualified_name) == name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Deterministic JSON rendering: array of entries sorted by
    /// `(kind, name)`, never a JSON object (spec.md §11 "Canonical JSON
    /// field order").
    pub fn sorted_entries(&self) -> Vec<&Symbol> {
        let mut v: Vec<&Symbol> = self.entries.values().collect();
        v.sort_by(|a, b| (a.category, &a.qualified_name).cmp(&(b.category, &b.qualified_name)));
        v
    }
}

impl Serialize for SymbolTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.sorted_entries().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SymbolTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let symbols = Vec::<Symbol>::deserialize(deserializer)?;
        let mut table = SymbolTable::new();
        for symbol in symbols {
            table.insert(symbol);
        }
        Ok(table)
    }
}

fn unqualified(qualified: &str) -> &str {
    qualified.rsplit('.').next().unwrap_or(qualified)
}

/// The linked, validated IR root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSpec {
    pub app_name: String,
    pub app_title: String,
    pub modules: Vec<Module>,
    pub symbols: SymbolTable,
    pub llm_config: Option<LlmConfig>,
    pub stack_name: Option<String>,
}

impl AppSpec {
    /// All declarations of a given category across all modules, in
    /// topological-module-then-source order (spec.md §4.4
    /// "Determinism").
    pub fn declarations(&self, category: DeclCategory) -> impl Iterator<Item = &Declaration> {
        self.modules
            .iter()
            .flat_map(|m| m.declarations.iter())
            .filter(move |d| d.category() == category)
    }

    pub fn find(&self, category: DeclCategory, name: &str) -> Option<&Declaration> {
        self.declarations(category).find(|d| d.name() == name)
    }
}
