//! The frozen, canonical data model that is the contract between the
//! front-end and all back-ends (spec.md §1, §3). Every value here is
//! immutable after construction; "mutation" produces a new value.

pub mod app_spec;
pub mod entity;
pub mod event;
pub mod expr;
pub mod llm;
pub mod module;
pub mod persona;
pub mod surface;
pub mod workspace;

pub use app_spec::{AppSpec, Symbol, SymbolTable};
pub use entity::{
    AccessRule, Action, AuditSpec, DefaultValue, Entity, Field, FieldModifier, FieldType, Guard,
    Index, Invariant, RefKind, ScalarType, Transition, TransitionFrom,
};
pub use event::{EventModel, Process, Schedule, Step, Subscribe};
pub use expr::{BinaryOp, Expr, Literal, UnaryOp};
pub use llm::{LlmConfig, LlmIntent, LlmModel, PiiAction, PiiPolicy, RetryPolicy};
pub use module::{AppDecl, DeclCategory, Declaration, Module, ModuleAst, ModuleId};
pub use persona::{FixtureRow, Persona, ProficiencyLevel, Scenario};
pub use surface::{Section, Surface, SurfaceMode, UxVariant};
pub use workspace::{Aggregate, DisplayKind, EngineHint, Signal, SignalUxVariant, Workspace};
