//! Modules: the unit of dependency and namespacing. See spec.md §3
//! "Module" and §4.2 "Top-level grammar".

use super::entity::Entity;
use super::event::{EventModel, Process, Schedule, Subscribe};
use super::llm::{LlmConfig, LlmIntent, LlmModel};
use super::persona::{Persona, Scenario};
use super::surface::Surface;
use super::workspace::Workspace;
use crate::location::Location;
use serde::{Deserialize, Serialize};

/// The `app NAME "Title"` declaration, at most one across all modules
/// (spec.md §4.4 "AppSpec construction").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppDecl {
    pub app_name: String,
    pub app_title: String,
    pub location: Location,
}

/// One parsed declaration. A closed sum type so validators and generators
/// statically cover every variant (spec.md §9 "Dynamic dispatch").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Declaration {
    Entity(Entity),
    Surface(Surface),
    Workspace(Workspace),
    Persona(Persona),
    Scenario(Scenario),
    LlmModel(LlmModel),
    LlmIntent(LlmIntent),
    LlmConfig(LlmConfig),
    EventModel(EventModel),
    Subscribe(Subscribe),
    Process(Process),
    Schedule(Schedule),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::Entity(e) => &e.name,
            Declaration::Surface(s) => &s.name,
            Declaration::Workspace(w) => &w.name,
            Declaration::Persona(p) => &p.name,
            Declaration::Scenario(s) => &s.name,
            Declaration::LlmModel(m) => &m.name,
            Declaration::LlmIntent(i) => &i.name,
            Declaration::LlmConfig(_) => "llm_config",
            Declaration::EventModel(e) => &e.name,
            Declaration::Subscribe(s) => &s.name,
            Declaration::Process(p) => &p.name,
            Declaration::Schedule(s) => &s.name,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Declaration::Entity(e) => &e.location,
            Declaration::Surface(s) => &s.location,
            Declaration::Workspace(w) => &w.location,
            Declaration::Persona(p) => &p.location,
            Declaration::Scenario(s) => &s.location,
            Declaration::LlmModel(m) => &m.location,
            Declaration::LlmIntent(i) => &i.location,
            Declaration::LlmConfig(c) => &c.location,
            Declaration::EventModel(e) => &e.location,
            Declaration::Subscribe(s) => &s.location,
            Declaration::Process(p) => &p.location,
            Declaration::Schedule(s) => &s.location,
        }
    }

    /// The symbol-table category this declaration occupies. See spec.md
    /// §4.4 "Symbol table": each category's namespace is separate.
    pub fn category(&self) -> DeclCategory {
        match self {
            Declaration::Entity(_) => DeclCategory::Entity,
            Declaration::Surface(_) => DeclCategory::Surface,
            Declaration::Workspace(_) => DeclCategory::Workspace,
            Declaration::Persona(_) => DeclCategory::Persona,
            Declaration::Scenario(_) => DeclCategory::Scenario,
            Declaration::LlmModel(_) => DeclCategory::LlmModel,
            Declaration::LlmIntent(_) => DeclCategory::LlmIntent,
            Declaration::LlmConfig(_) => DeclCategory::LlmConfig,
            Declaration::EventModel(_) => DeclCategory::EventModel,
            Declaration::Subscribe(_) => DeclCategory::Subscribe,
            Declaration::Process(_) => DeclCategory::Process,
            Declaration::Schedule(_) => DeclCategory::Schedule,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeclCategory {
    Entity,
    Surface,
    Workspace,
    Persona,
    Scenario,
    LlmModel,
    LlmIntent,
    LlmConfig,
    EventModel,
    Subscribe,
    Process,
    Schedule,
}

/// The parser's output for a single `.dsl` file: unlinked, unresolved,
/// self-contained. Transient — consumed by the linker (spec.md §3
/// "Ownership and lifecycle").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleAst {
    pub name: String,
    pub uses: Vec<(String, Location)>,
    pub app: Option<AppDecl>,
    pub declarations: Vec<Declaration>,
    pub location: Location,
}

/// A module after linking: same content as `ModuleAst`, positioned at its
/// resolved index in topological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub declarations: Vec<Declaration>,
    pub location: Location,
}

/// An index into `AppSpec::modules`, preferred over back-pointers between
/// module structures (spec.md §9 "Cyclic module imports").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub usize);
