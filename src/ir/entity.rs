//! Entities: data model declarations. See spec.md §3 "Entities".

use super::expr::Expr;
use crate::location::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldModifier {
    Pk,
    Required,
    Optional,
    Unique,
    AutoAdd,
    AutoUpdate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarType {
    Uuid,
    Str(u32),
    Text,
    Int,
    Decimal { precision: u32, scale: u32 },
    Bool,
    Datetime,
    Date,
    Time,
    Email,
    Json,
    Image,
    File,
    Richtext,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RefKind {
    Ref,
    HasMany,
    BelongsTo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldType {
    Scalar(ScalarType),
    Enum {
        variants: Vec<String>,
        default: Option<String>,
    },
    Reference {
        kind: RefKind,
        target: String,
        target_location: Location,
    },
    Computed(Expr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DefaultValue {
    Literal(crate::ir::expr::Literal),
    EnumVariant(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub modifiers: Vec<FieldModifier>,
    pub default: Option<DefaultValue>,
    pub location: Location,
}

impl Field {
    pub fn has_modifier(&self, m: FieldModifier) -> bool {
        self.modifiers.contains(&m)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransitionFrom {
    State(String),
    Wildcard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Guard {
    Role(String),
    Requires(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub from: TransitionFrom,
    pub to: String,
    pub guard: Option<Guard>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invariant {
    pub expr: Expr,
    pub location: Location,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    List,
}

/// A boolean combination of `role(IDENT)`, `authenticated`, and relational
/// predicates over fields, used by both `permit` and `forbid` clauses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRule {
    pub actions: Vec<Action>,
    pub predicate: Expr,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum AuditSpec {
    All,
    Actions(Vec<Action>),
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Index {
    pub fields: Vec<String>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub display_name: Option<String>,
    pub intent: Option<String>,
    pub domain: Option<String>,
    pub patterns: Vec<String>,
    pub archetype: Option<String>,
    pub fields: Vec<Field>,
    pub transitions: Vec<Transition>,
    pub invariants: Vec<Invariant>,
    pub permit: Vec<AccessRule>,
    pub forbid: Vec<AccessRule>,
    pub audit: Option<AuditSpec>,
    pub indexes: Vec<Index>,
    pub location: Location,
}

impl Entity {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// The designated status field: the enum field named `status`, or
    /// absent that, the first enum field declared (spec.md §4.5
    /// "Transitions").
    pub fn status_field(&self) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == "status" && matches!(f.ty, FieldType::Enum { .. }))
            .or_else(|| self.fields.iter().find(|f| matches!(f.ty, FieldType::Enum { .. })))
    }
}
