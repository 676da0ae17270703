//! Process/schedule well-formedness. See spec.md §4.5 "Process
//! well-formedness".

use crate::error::{Diagnostic, Diagnostics};
use crate::ir::event::Step;
use crate::ir::{AppSpec, DeclCategory, Declaration};
use std::collections::HashSet;

pub fn check(spec: &AppSpec, diags: &mut Diagnostics) {
    let known_roles: Vec<&str> = spec
        .declarations(DeclCategory::Persona)
        .filter_map(|d| match d {
            Declaration::Persona(p) => Some(p.name.as_str()),
            _ => None,
        })
        .collect();

    // `channel_message` steps name the same topic namespace `event_model`
    // and `subscribe` publish/consume (spec.md §4.5 "Process
    // well-formedness": step references "resolve via the symbol table").
    let known_channels: HashSet<&str> = spec
        .declarations(DeclCategory::EventModel)
        .filter_map(|d| match d {
            Declaration::EventModel(e) => Some(e.topic.as_str()),
            _ => None,
        })
        .chain(spec.declarations(DeclCategory::Subscribe).filter_map(|d| match d {
            Declaration::Subscribe(s) => Some(s.topic.as_str()),
            _ => None,
        }))
        .collect();

    // `signal` steps name a workspace-declared signal.
    let known_signals: HashSet<&str> = spec
        .declarations(DeclCategory::Workspace)
        .filter_map(|d| match d {
            Declaration::Workspace(w) => Some(w.signals.iter().map(|s| s.name.as_str())),
            _ => None,
        })
        .flatten()
        .collect();

    for decl in spec.declarations(DeclCategory::Process) {
        let Declaration::Process(process) = decl else { continue };
        if process.steps.is_empty() {
            diags.push(Diagnostic::error(
                process.location.clone(),
                "validate.invalid_field_type",
                format!("process `{}` has no steps", process.name),
            ));
        }
        if let Some(timeout) = process.timeout {
            if timeout.is_zero() {
                diags.push(Diagnostic::error(
                    process.location.clone(),
                    "validate.invalid_field_type",
                    format!("process `{}`: `timeout` must be a positive duration", process.name),
                ));
            }
        }
        for step in &process.steps {
            check_step(step, &known_roles, &known_channels, &known_signals, diags);
        }
    }

    for decl in spec.declarations(DeclCategory::Schedule) {
        let Declaration::Schedule(schedule) = decl else { continue };
        if schedule.steps.is_empty() {
            diags.push(Diagnostic::error(
                schedule.location.clone(),
                "validate.invalid_field_type",
                format!("schedule `{}` has no steps", schedule.name),
            ));
        }
        for step in &schedule.steps {
            check_step(step, &known_roles, &known_channels, &known_signals, diags);
        }
    }
}

fn check_step(
    step: &Step,
    known_roles: &[&str],
    known_channels: &HashSet<&str>,
    known_signals: &HashSet<&str>,
    diags: &mut Diagnostics,
) {
    match step {
        Step::Wait { duration, location, name } => {
            if duration.is_zero() {
                diags.push(Diagnostic::error(
                    location.clone(),
                    "validate.invalid_field_type",
                    format!("step `{name}`: `wait` duration must be positive"),
                ));
            }
        }
        Step::HumanTask { role, role_location, name, .. } => {
            if !known_roles.contains(&role.as_str()) {
                diags.push(Diagnostic::error(
                    role_location.clone(),
                    "validate.unknown_persona_role",
                    format!("step `{name}`: `role` `{role}` does not name a declared persona"),
                ));
            }
        }
        Step::ChannelMessage {
            channel,
            channel_location,
            name,
            ..
        } => {
            if !known_channels.contains(channel.as_str()) {
                diags.push(Diagnostic::error(
                    channel_location.clone(),
                    "validate.unknown_channel",
                    format!(
                        "step `{name}`: `channel` `{channel}` does not match any declared `event`/`subscribe` topic"
                    ),
                ));
            }
        }
        Step::Signal {
            signal,
            signal_location,
            name,
            ..
        } => {
            if !known_signals.contains(signal.as_str()) {
                diags.push(Diagnostic::error(
                    signal_location.clone(),
                    "validate.unknown_signal",
                    format!("step `{name}`: `signal` `{signal}` does not name a declared workspace signal"),
                ));
            }
        }
        // `service_call` names an external system the core has no
        // declaration construct for (no `service` keyword exists in the
        // grammar, see spec.md §4.1's keyword list) — there is nothing in
        // the symbol table to resolve it against, so it is accepted as an
        // opaque identifier, same treatment as other external-collaborator
        // names (spec.md §1 "Deliberately out of scope").
        Step::ServiceCall { .. } => {}
    }
}
