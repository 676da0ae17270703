//! Events, processes, and schedules. See spec.md §3 "Events / processes /
//! schedules".

use super::expr::Expr;
use crate::location::Location;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventModel {
    pub name: String,
    pub topic: String,
    pub event: String,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscribe {
    pub name: String,
    pub topic: String,
    pub topic_location: Location,
    pub handler: Option<String>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Step {
    ServiceCall {
        name: String,
        service: String,
        service_location: Location,
        args: Vec<Expr>,
        location: Location,
    },
    ChannelMessage {
        name: String,
        channel: String,
        channel_location: Location,
        payload: Expr,
        location: Location,
    },
    Wait {
        name: String,
        duration: Duration,
        location: Location,
    },
    HumanTask {
        name: String,
        role: String,
        role_location: Location,
        location: Location,
    },
    Signal {
        name: String,
        signal: String,
        signal_location: Location,
        location: Location,
    },
}

impl Step {
    pub fn name(&self) -> &str {
        match self {
            Step::ServiceCall { name, .. }
            | Step::ChannelMessage { name, .. }
            | Step::Wait { name, .. }
            | Step::HumanTask { name, .. }
            | Step::Signal { name, .. } => name,
        }
    }

    pub fn location(&self) -> &Location {
        match self {
            Step::ServiceCall { location, .. }
            | Step::ChannelMessage { location, .. }
            | Step::Wait { location, .. }
            | Step::HumanTask { location, .. }
            | Step::Signal { location, .. } => location,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    pub trigger: String,
    pub input: Vec<String>,
    pub steps: Vec<Step>,
    pub timeout: Option<Duration>,
    pub location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    pub cron: String,
    pub steps: Vec<Step>,
    pub location: Location,
}
