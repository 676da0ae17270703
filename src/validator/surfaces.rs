//! Surface/entity consistency. See spec.md §4.5 "Surfaces".

use crate::error::{Diagnostic, Diagnostics};
use crate::ir::entity::{Entity, FieldModifier};
use crate::ir::surface::{Surface, SurfaceMode};
use crate::ir::{AppSpec, DeclCategory, Declaration};

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.declarations(DeclCategory::Surface) {
        let Declaration::Surface(surface) = decl else { continue };
        let Some(Declaration::Entity(entity)) = spec.find(DeclCategory::Entity, &surface.entity) else {
            continue; // already reported by validator::references
        };
        check_surface(entity, surface, diags);
    }
}

fn check_surface(entity: &Entity, surface: &Surface, diags: &mut Diagnostics) {
    if !matches!(surface.mode, SurfaceMode::Edit | SurfaceMode::Create) {
        return;
    }
    for section in &surface.sections {
        for field_name in &section.fields {
            let Some(field) = entity.field(field_name) else { continue };
            if field.has_modifier(FieldModifier::Pk)
                || field.has_modifier(FieldModifier::AutoAdd)
                || field.has_modifier(FieldModifier::AutoUpdate)
            {
                diags.push(Diagnostic::warning(
                    section.location.clone(),
                    "validate.naming_convention",
                    format!(
                        "surface `{}` explicitly lists generated field `{field_name}` in {:?} mode",
                        surface.name, surface.mode
                    ),
                ));
            }
        }
    }
}
