//! Personas and scenarios. See spec.md §3 "Personas" / "Scenarios".

use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProficiencyLevel {
    Novice,
    Intermediate,
    Expert,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: Option<String>,
    pub goals: Vec<String>,
    pub proficiency_level: ProficiencyLevel,
    pub session_style: Option<String>,
    pub default_workspace: Option<String>,
    pub default_workspace_location: Option<Location>,
    pub default_route: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRow {
    pub entity: String,
    pub entity_location: Location,
    pub values: BTreeMap<String, crate::ir::expr::Literal>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub start_routes: BTreeMap<String, String>,
    pub fixtures: Vec<FixtureRow>,
    pub location: Location,
}
