//! Primary keys, field types/defaults, and enum well-formedness. See
//! spec.md §4.5 "Primary keys", "Field types and defaults", "Enums".

use super::reserved;
use crate::error::{Diagnostic, Diagnostics};
use crate::ir::entity::{DefaultValue, Entity, FieldModifier, FieldType, ScalarType};
use crate::ir::expr::Literal;
use crate::ir::{AppSpec, DeclCategory, Declaration};
use std::collections::HashSet;

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    for decl in spec.declarations(DeclCategory::Entity) {
        let Declaration::Entity(entity) = decl else { continue };
        check_primary_key(entity, diags);
        check_fields(entity, diags);
    }
}

fn check_primary_key(entity: &Entity, diags: &mut Diagnostics) {
    let pk_count = entity
        .fields
        .iter()
        .filter(|f| f.has_modifier(FieldModifier::Pk))
        .count();

    match pk_count {
        0 => diags.push(Diagnostic::error(
            entity.location.clone(),
            "validate.no_primary_key",
            format!("entity `{}` has no `pk` field", entity.name),
        )),
        1 => {}
        _ => diags.push(Diagnostic::error(
            entity.location.clone(),
            "validate.multiple_primary_keys",
            format!("entity `{}` has more than one `pk` field", entity.name),
        )),
    }
}

fn check_fields(entity: &Entity, diags: &mut Diagnostics) {
    for field in &entity.fields {
        if field.has_modifier(FieldModifier::Required) && field.has_modifier(FieldModifier::Optional) {
            diags.push(Diagnostic::error(
                field.location.clone(),
                "validate.invalid_field_type",
                format!(
                    "field `{}.{}` cannot be both `required` and `optional`",
                    entity.name, field.name
                ),
            ));
        }

        match &field.ty {
            FieldType::Scalar(ScalarType::Str(n)) if *n < 1 => {
                diags.push(Diagnostic::error(
                    field.location.clone(),
                    "validate.invalid_field_type",
                    format!("field `{}.{}`: `str(N)` requires N >= 1", entity.name, field.name),
                ));
            }
            FieldType::Scalar(ScalarType::Decimal { precision, scale }) => {
                if *precision < 1 {
                    diags.push(Diagnostic::error(
                        field.location.clone(),
                        "validate.invalid_field_type",
                        format!(
                            "field `{}.{}`: `decimal(p,s)` requires p >= 1",
                            entity.name, field.name
                        ),
                    ));
                } else if *scale > *precision {
                    diags.push(Diagnostic::error(
                        field.location.clone(),
                        "validate.invalid_field_type",
                        format!(
                            "field `{}.{}`: `decimal(p,s)` requires 0 <= s <= p",
                            entity.name, field.name
                        ),
                    ));
                }
            }
            FieldType::Enum { variants, default } => {
                check_enum(entity, field, variants, default, diags);
            }
            _ => {}
        }

        check_default(entity, field, diags);
    }
}

fn check_enum(
    entity: &Entity,
    field: &crate::ir::entity::Field,
    variants: &[String],
    default: &Option<String>,
    diags: &mut Diagnostics,
) {
    let mut seen = HashSet::new();
    for variant in variants {
        if !seen.insert(variant.as_str()) {
            diags.push(Diagnostic::error(
                field.location.clone(),
                "validate.duplicate_enum_variant",
                format!(
                    "field `{}.{}`: duplicate enum variant `{variant}`",
                    entity.name, field.name
                ),
            ));
        }
        if let Some(hint) = reserved::mandatory_hint(variant) {
            diags.push(
                Diagnostic::error(
                    field.location.clone(),
                    "validate.reserved_enum_value",
                    format!(
                        "field `{}.{}`: `{variant}` is a reserved enum value",
                        entity.name, field.name
                    ),
                )
                .with_hint(format!("use {hint:?} instead")),
            );
        } else if let Some(hint) = reserved::advisory_hint(variant) {
            diags.push(
                Diagnostic::warning(
                    field.location.clone(),
                    "validate.naming_convention",
                    format!(
                        "field `{}.{}`: `{variant}` collides with a commonly generated identifier",
                        entity.name, field.name
                    ),
                )
                .with_hint(format!("consider {hint:?} instead")),
            );
        }
    }
    if let Some(default) = default {
        if !variants.iter().any(|v| v == default) {
            diags.push(Diagnostic::error(
                field.location.clone(),
                "validate.invalid_default",
                format!(
                    "field `{}.{}`: default `{default}` is not a declared variant",
                    entity.name, field.name
                ),
            ));
        }
    }
}

/// Whether `lit` is an acceptable value for a field declared as `ty`.
/// Shared by default-literal checking here and scenario fixture-value
/// checking in `references.rs::check_scenario_references` (spec.md §4.5
/// "References": fixtures "supply values for required fields of the
/// correct type").
pub(super) fn literal_matches_type(ty: &FieldType, lit: &Literal) -> bool {
    matches!(
        (ty, lit),
        (FieldType::Scalar(ScalarType::Int), Literal::Int(_))
            | (FieldType::Scalar(ScalarType::Decimal { .. }), Literal::Decimal(_) | Literal::Int(_))
            | (FieldType::Scalar(ScalarType::Bool), Literal::Bool(_))
            | (
                FieldType::Scalar(
                    ScalarType::Str(_)
                        | ScalarType::Text
                        | ScalarType::Email
                        | ScalarType::Uuid
                        | ScalarType::Datetime
                        | ScalarType::Date
                        | ScalarType::Time
                        | ScalarType::Json
                        | ScalarType::Richtext,
                ),
                Literal::Str(_),
            )
            | (_, Literal::Null)
    )
}

fn check_default(entity: &Entity, field: &crate::ir::entity::Field, diags: &mut Diagnostics) {
    let Some(default) = &field.default else { return };
    let DefaultValue::Literal(lit) = default else { return };

    if !literal_matches_type(&field.ty, lit) {
        diags.push(Diagnostic::error(
            field.location.clone(),
            "validate.invalid_default",
            format!(
                "field `{}.{}`: default literal does not match the field's type",
                entity.name, field.name
            ),
        ));
    }
}
