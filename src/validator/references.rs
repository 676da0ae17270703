//! Cross-declaration reference resolution. See spec.md §4.5 "References".

use super::entities::literal_matches_type;
use crate::error::{Diagnostic, Diagnostics};
use crate::ir::{AppSpec, DeclCategory, Declaration, Entity, FieldType, RefKind};
use std::collections::HashMap;

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    check_entity_references(spec, diags);
    check_surface_references(spec, diags);
    check_workspace_references(spec, diags);
    check_scenario_references(spec, diags);
}

fn entity_names(spec: &AppSpec) -> Vec<&str> {
    spec.declarations(DeclCategory::Entity)
        .filter_map(|d| match d {
            Declaration::Entity(e) => Some(e.name.as_str()),
            _ => None,
        })
        .collect()
}

fn check_entity_references(spec: &AppSpec, diags: &mut Diagnostics) {
    let known: Vec<&str> = entity_names(spec);
    // (owner, target) pairs of has_many/belongs_to, for the pairing advisory.
    let mut relations: HashMap<(&str, &str), Vec<RefKind>> = HashMap::new();

    for decl in spec.declarations(DeclCategory::Entity) {
        let Declaration::Entity(entity) = decl else { continue };
        for field in &entity.fields {
            if let FieldType::Reference {
                kind,
                target,
                target_location,
            } = &field.ty
            {
                if !known.contains(&target.as_str()) {
                    diags.push(Diagnostic::error(
                        target_location.clone(),
                        "validate.unknown_entity",
                        format!("unknown entity `{target}` referenced by {}.{}", entity.name, field.name),
                    ));
                    continue;
                }
                if matches!(kind, RefKind::HasMany | RefKind::BelongsTo) {
                    relations
                        .entry((entity.name.as_str(), target.as_str()))
                        .or_default()
                        .push(kind.clone());
                }
            }
        }
    }

    for ((owner, target), kinds) in &relations {
        let inverse = match kinds.first() {
            Some(RefKind::HasMany) => relations.get(&(target, owner)).map(|v| {
                v.iter().any(|k| matches!(k, RefKind::BelongsTo))
            }),
            Some(RefKind::BelongsTo) => relations.get(&(target, owner)).map(|v| {
                v.iter().any(|k| matches!(k, RefKind::HasMany))
            }),
            _ => None,
        };
        if inverse == Some(false) || inverse.is_none() {
            if let Some(entity) = spec.find(DeclCategory::Entity, owner) {
                diags.push(Diagnostic::warning(
                    entity.location().clone(),
                    "validate.unpaired_relation",
                    format!("`{owner}` relates to `{target}` with no paired inverse relation"),
                ));
            }
        }
    }
}

fn check_surface_references(spec: &AppSpec, diags: &mut Diagnostics) {
    let known = entity_names(spec);
    for decl in spec.declarations(DeclCategory::Surface) {
        let Declaration::Surface(surface) = decl else { continue };
        if !known.contains(&surface.entity.as_str()) {
            diags.push(Diagnostic::error(
                surface.entity_location.clone(),
                "validate.unknown_entity",
                format!("surface `{}` uses unknown entity `{}`", surface.name, surface.entity),
            ));
            continue;
        }
        let entity = find_entity(spec, &surface.entity);
        if let Some(entity) = entity {
            for section in &surface.sections {
                for field in &section.fields {
                    if entity.field(field).is_none() {
                        diags.push(Diagnostic::error(
                            section.location.clone(),
                            "validate.field_not_on_entity",
                            format!(
                                "surface `{}` section `{}` references field `{field}` not on entity `{}`",
                                surface.name, section.name, entity.name
                            ),
                        ));
                    }
                }
            }
        }
    }
}

fn check_workspace_references(spec: &AppSpec, diags: &mut Diagnostics) {
    let known = entity_names(spec);
    let surfaces: Vec<&str> = spec
        .declarations(DeclCategory::Surface)
        .filter_map(|d| match d {
            Declaration::Surface(s) => Some(s.name.as_str()),
            _ => None,
        })
        .collect();

    for decl in spec.declarations(DeclCategory::Workspace) {
        let Declaration::Workspace(workspace) = decl else { continue };
        for signal in &workspace.signals {
            if !known.contains(&signal.source.as_str()) {
                diags.push(Diagnostic::error(
                    signal.source_location.clone(),
                    "validate.unknown_entity",
                    format!(
                        "workspace `{}` signal `{}` sources unknown entity `{}`",
                        workspace.name, signal.name, signal.source
                    ),
                ));
            }
            if let (Some(action), Some(loc)) = (&signal.action, &signal.action_location) {
                if !surfaces.contains(&action.as_str()) {
                    diags.push(Diagnostic::error(
                        loc.clone(),
                        "validate.unknown_entity",
                        format!(
                            "workspace `{}` signal `{}` action references unknown surface `{action}`",
                            workspace.name, signal.name
                        ),
                    ));
                }
            }
        }
    }
}

fn check_scenario_references(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.declarations(DeclCategory::Scenario) {
        let Declaration::Scenario(scenario) = decl else { continue };
        for fixture in &scenario.fixtures {
            let Some(entity) = find_entity(spec, &fixture.entity) else {
                diags.push(Diagnostic::error(
                    fixture.entity_location.clone(),
                    "validate.unknown_entity",
                    format!(
                        "scenario `{}` fixture references unknown entity `{}`",
                        scenario.name, fixture.entity
                    ),
                ));
                continue;
            };
            for field in &entity.fields {
                if field.has_modifier(crate::ir::FieldModifier::Required)
                    && field.default.is_none()
                    && !fixture.values.contains_key(&field.name)
                {
                    diags.push(Diagnostic::error(
                        fixture.location.clone(),
                        "validate.invalid_scenario_fixture",
                        format!(
                            "scenario `{}` fixture for `{}` is missing required field `{}`",
                            scenario.name, fixture.entity, field.name
                        ),
                    ));
                }
            }
            for (key, value) in &fixture.values {
                match entity.field(key) {
                    None => diags.push(Diagnostic::error(
                        fixture.location.clone(),
                        "validate.invalid_scenario_fixture",
                        format!(
                            "scenario `{}` fixture names field `{}` not on entity `{}`",
                            scenario.name, key, fixture.entity
                        ),
                    )),
                    Some(field) if !literal_matches_type(&field.ty, value) => {
                        diags.push(Diagnostic::error(
                            fixture.location.clone(),
                            "validate.invalid_scenario_fixture",
                            format!(
                                "scenario `{}` fixture value for `{}.{}` does not match the field's type",
                                scenario.name, fixture.entity, key
                            ),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }
    }
}

fn find_entity<'a>(spec: &'a AppSpec, name: &str) -> Option<&'a Entity> {
    match spec.find(DeclCategory::Entity, name)? {
        Declaration::Entity(e) => Some(e),
        _ => None,
    }
}
