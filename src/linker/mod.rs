//! Linker: resolves the `use` dependency graph across module ASTs,
//! topologically orders modules, builds the global symbol table, and
//! assembles the unvalidated `AppSpec`. See spec.md §4.4 "Linker".

use crate::error::{DazzleError, DazzleResult};
use crate::ir::{AppSpec, Module, ModuleAst, ModuleId, Symbol, SymbolTable};
use std::collections::{HashMap, VecDeque};
use tracing::instrument;

/// Builds the module dependency graph, Kahn-sorts it, constructs the
/// symbol table, and merges every module's declarations into an
/// `AppSpec`. Never validates semantics beyond what's needed to construct
/// the IR (spec.md §4.4 "Contract").
#[instrument(skip(modules))]
pub fn link(modules: Vec<ModuleAst>) -> DazzleResult<AppSpec> {
    let order = topological_order(&modules)?;

    let mut app_name = None;
    let mut app_title = None;
    let mut app_locations = Vec::new();
    let mut llm_config = None;
    let mut llm_config_locations = Vec::new();

    let mut linked_modules = Vec::new();
    let mut symbols = SymbolTable::new();

    for (id, idx) in order.into_iter().enumerate() {
        let ast = &modules[idx];
        if let Some(app) = &ast.app {
            app_name.get_or_insert_with(|| app.app_name.clone());
            app_title.get_or_insert_with(|| app.app_title.clone());
            app_locations.push(app.location.clone());
        }

        let module_id = ModuleId(id);
        for decl in &ast.declarations {
            if let crate::ir::Declaration::LlmConfig(cfg) = decl {
                llm_config_locations.push(cfg.location.clone());
                llm_config.get_or_insert_with(|| cfg.clone());
            }

            let qualified = format!("{}.{}", ast.name, decl.name());
            if let Some(existing) = symbols.get(decl.category(), &qualified) {
                return Err(DazzleError::DuplicateSymbol {
                    name: decl.name().to_string(),
                    first: existing.location.to_string(),
                    second: decl.location().to_string(),
                });
            }
            symbols.insert(Symbol {
                qualified_name: qualified,
                category: decl.category(),
                location: decl.location().clone(),
            });
        }

        linked_modules.push(Module {
            id: module_id,
            name: ast.name.clone(),
            declarations: ast.declarations.clone(),
            location: ast.location.clone(),
        });
    }

    if app_locations.len() > 1 {
        return Err(DazzleError::MultipleAppDeclarations {
            locations: app_locations,
        });
    }
    if llm_config_locations.len() > 1 {
        return Err(DazzleError::MultipleLlmConfig {
            locations: llm_config_locations,
        });
    }

    let (app_name, app_title) = match (app_name, app_title) {
        (Some(n), Some(t)) => (n, t),
        _ => {
            let first = linked_modules
                .iter()
                .min_by(|a, b| a.name.cmp(&b.name))
                .map(|m| m.name.clone())
                .unwrap_or_default();
            (first.clone(), first)
        }
    };

    tracing::info!(modules = linked_modules.len(), symbols = symbols.len(), "linking complete");
    Ok(AppSpec {
        app_name,
        app_title,
        modules: linked_modules,
        symbols,
        llm_config,
        stack_name: None,
    })
}

/// Iterative Kahn topological sort over the `use` graph (spec.md §4.4
/// "Dependency graph"). Returns the indices of `modules` in dependency
/// order; modules at the same depth are ordered lexicographically by
/// name for determinism (spec.md §5 "Ordering guarantees").
fn topological_order(modules: &[ModuleAst]) -> DazzleResult<Vec<usize>> {
    let index_by_name: HashMap<&str, usize> =
        modules.iter().enumerate().map(|(i, m)| (m.name.as_str(), i)).collect();

    let mut pending: Vec<usize> = vec![0; modules.len()];
    let mut consumers: Vec<Vec<usize>> = vec![Vec::new(); modules.len()];

    for (i, m) in modules.iter().enumerate() {
        for (used, loc) in &m.uses {
            if used == "self" {
                return Err(DazzleError::Cycle {
                    members: vec![m.name.clone()],
                    location: loc.clone(),
                });
            }
            let Some(&dep) = index_by_name.get(used.as_str()) else {
                return Err(DazzleError::UnknownModule {
                    name: used.clone(),
                    location: loc.clone(),
                });
            };
            pending[i] += 1;
            consumers[dep].push(i);
        }
    }

    let mut queue: VecDeque<usize> = (0..modules.len()).filter(|&i| pending[i] == 0).collect();
    let mut ordered_queue: Vec<usize> = queue.iter().copied().collect();
    ordered_queue.sort_by_key(|&i| modules[i].name.clone());
    queue = ordered_queue.into();

    let mut order = Vec::new();
    while let Some(i) = queue.pop_front() {
        order.push(i);
        let mut freed = Vec::new();
        for &c in &consumers[i] {
            pending[c] -= 1;
            if pending[c] == 0 {
                freed.push(c);
            }
        }
        freed.sort_by_key(|&i| modules[i].name.clone());
        for c in freed {
            queue.push_back(c);
        }
    }

    if order.len() < modules.len() {
        let mut members: Vec<String> = (0..modules.len())
            .filter(|i| !order.contains(i))
            .map(|i| modules[i].name.clone())
            .collect();
        members.sort();

        let member_set: std::collections::HashSet<&str> = members.iter().map(String::as_str).collect();
        let earliest = &modules[index_by_name[members[0].as_str()]];
        let location = earliest
            .uses
            .iter()
            .find(|(used, _)| member_set.contains(used.as_str()))
            .map(|(_, loc)| loc.clone())
            .unwrap_or_else(|| earliest.location.clone());

        return Err(DazzleError::Cycle { members, location });
    }

    Ok(order)
}

/// Free function kept separate from `link` so hosts can construct a
/// symbol table without a full link (e.g. incremental editor tooling).
pub fn build_symbol_table(modules: &[Module]) -> SymbolTable {
    let mut table = SymbolTable::new();
    for m in modules {
        for decl in &m.declarations {
            let _ = table.insert(Symbol {
                qualified_name: format!("{}.{}", m.name, decl.name()),
                category: decl.category(),
                location: decl.location().clone(),
            });
        }
    }
    table
}
