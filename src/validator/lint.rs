//! Lint-only checks: naming conventions, dead code, empty sections, and
//! duplicate labels. All warnings, never errors (spec.md §4.5 "Lint").

use crate::error::{Diagnostic, Diagnostics};
use crate::ir::{AppSpec, DeclCategory, Declaration};
use std::collections::{HashMap, HashSet};

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    check_naming(spec, diags);
    check_dead_entities(spec, diags);
    check_surfaces(spec, diags);
}

fn check_naming(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.modules.iter().flat_map(|m| m.declarations.iter()) {
        let name = decl.name();
        let ok = if matches!(decl, Declaration::Entity(_)) {
            is_pascal_case(name)
        } else {
            is_snake_case(name)
        };
        if !ok {
            let convention = if matches!(decl, Declaration::Entity(_)) { "PascalCase" } else { "snake_case" };
            diags.push(Diagnostic::warning(
                decl.location().clone(),
                "validate.naming_convention",
                format!("`{name}` does not follow {convention} naming"),
            ));
        }
    }
}

fn is_pascal_case(name: &str) -> bool {
    name.chars().next().is_some_and(|c| c.is_ascii_uppercase())
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_snake_case(name: &str) -> bool {
    !name.is_empty()
        && name.chars().next().is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn check_dead_entities(spec: &AppSpec, diags: &mut Diagnostics) {
    let mut referenced: HashSet<&str> = HashSet::new();
    for decl in spec.declarations(DeclCategory::Surface) {
        if let Declaration::Surface(s) = decl {
            referenced.insert(s.entity.as_str());
        }
    }
    for decl in spec.declarations(DeclCategory::Workspace) {
        if let Declaration::Workspace(w) = decl {
            for signal in &w.signals {
                referenced.insert(signal.source.as_str());
            }
        }
    }
    for decl in spec.declarations(DeclCategory::Scenario) {
        if let Declaration::Scenario(s) = decl {
            for fixture in &s.fixtures {
                referenced.insert(fixture.entity.as_str());
            }
        }
    }
    for decl in spec.declarations(DeclCategory::Entity) {
        let Declaration::Entity(entity) = decl else { continue };
        if !referenced.contains(entity.name.as_str()) {
            diags.push(Diagnostic::warning(
                entity.location.clone(),
                "validate.dead_entity",
                format!("entity `{}` is referenced by no surface, workspace, or scenario", entity.name),
            ));
        }
    }
}

fn check_surfaces(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.declarations(DeclCategory::Surface) {
        let Declaration::Surface(surface) = decl else { continue };
        if surface.sections.is_empty() {
            diags.push(Diagnostic::warning(
                surface.location.clone(),
                "validate.empty_section",
                format!("surface `{}` declares no sections", surface.name),
            ));
        }
        for section in &surface.sections {
            if section.fields.is_empty() {
                diags.push(Diagnostic::warning(
                    section.location.clone(),
                    "validate.empty_section",
                    format!("surface `{}` section `{}` lists no fields", surface.name, section.name),
                ));
            }
            let mut seen = HashMap::new();
            for field in &section.fields {
                *seen.entry(field.as_str()).or_insert(0) += 1;
            }
            for (field, count) in seen {
                if count > 1 {
                    diags.push(Diagnostic::warning(
                        section.location.clone(),
                        "validate.duplicate_label",
                        format!(
                            "surface `{}` section `{}` lists field `{field}` more than once",
                            surface.name, section.name
                        ),
                    ));
                }
            }
        }
    }
}
