//! Surfaces: single UI screens for an entity. See spec.md §3 "Surfaces".

use super::expr::Expr;
use crate::location::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SurfaceMode {
    List,
    View,
    Create,
    Edit,
    Custom,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub display_name: Option<String>,
    pub fields: Vec<String>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UxVariant {
    pub persona: Option<String>,
    pub sort: Option<Expr>,
    pub filter: Option<Expr>,
    pub search: Vec<String>,
    pub empty_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Surface {
    pub name: String,
    pub display_name: Option<String>,
    pub entity: String,
    pub entity_location: Location,
    pub mode: SurfaceMode,
    pub sections: Vec<Section>,
    pub ux: Vec<UxVariant>,
    pub location: Location,
}

impl Surface {
    /// Every field named across all sections, in DSL-authored order,
    /// deduplicated. spec.md §11 "Surfaces" requires this order be
    /// preserved exactly, never reordered.
    pub fn fields(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut out = Vec::new();
        for section in &self.sections {
            for f in &section.fields {
                if seen.insert(f.as_str()) {
                    out.push(f.as_str());
                }
            }
        }
        out
    }
}
