//! Workspaces: compositions of signals into a navigable view.
//! See spec.md §3 "Workspaces".

use super::expr::Expr;
use crate::location::Location;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineHint {
    FocusMetric,
    ScannerTable,
    DualPaneFlow,
    MonitorWall,
    CommandCenter,
}

impl EngineHint {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "focus_metric" => Some(Self::FocusMetric),
            "scanner_table" => Some(Self::ScannerTable),
            "dual_pane_flow" => Some(Self::DualPaneFlow),
            "monitor_wall" => Some(Self::MonitorWall),
            "command_center" => Some(Self::CommandCenter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayKind {
    List,
    Detail,
    Grid,
    Kanban,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregate {
    pub output_name: String,
    pub expr: Expr,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalUxVariant {
    pub persona: String,
    pub display: Option<DisplayKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub name: String,
    pub source: String,
    pub source_location: Location,
    pub filter: Option<Expr>,
    pub sort: Option<Expr>,
    pub limit: Option<i64>,
    pub limit_location: Option<Location>,
    pub display: Option<DisplayKind>,
    pub aggregate: Vec<Aggregate>,
    pub action: Option<String>,
    pub action_location: Option<Location>,
    pub ux: Vec<SignalUxVariant>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub name: String,
    pub display_name: Option<String>,
    pub purpose: Option<String>,
    pub engine_hint: Option<String>,
    pub engine_hint_location: Option<Location>,
    pub signals: Vec<Signal>,
    pub location: Location,
}
