//! Literal end-to-end scenarios and boundary behaviors from spec.md §8.

use dazzle_core::ir::DeclCategory;
use dazzle_core::{compile, link, loader, parser, validate, Manifest};
use std::io::Write;

fn write_project(dir: &std::path::Path, files: &[(&str, &str)]) {
    std::fs::write(
        dir.join("dazzle.toml"),
        "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n[modules]\npaths = [\"src\"]\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.join("src")).unwrap();
    for (name, content) in files {
        let mut f = std::fs::File::create(dir.join("src").join(name)).unwrap();
        f.write_all(content.as_bytes()).unwrap();
    }
}

#[test]
fn scenario_1_minimal() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Task \"Task\":\n    id: uuid pk\n    title: str(200) required\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest).unwrap();
    let spec = link(asts).unwrap();
    let diags = validate(&spec);

    assert_eq!(spec.modules.len(), 1);
    let entities: Vec<_> = spec.declarations(DeclCategory::Entity).collect();
    assert_eq!(entities.len(), 1);
    assert!(!diags.has_errors());

    let spec = compile(dir.path().join("dazzle.toml")).unwrap();
    assert_eq!(spec.app_name, "m");
}

#[test]
fn scenario_2_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[("a.dsl", "module a\nuse b\n"), ("b.dsl", "module b\nuse a\n")],
    );

    let err = compile(dir.path().join("dazzle.toml")).unwrap_err();
    assert_eq!(err.0.len(), 1);
    assert_eq!(err.0[0].code, "link.cycle");
    assert!(err.0[0].message.contains('a') && err.0[0].message.contains('b'));
    assert!(err.0[0].location.file.ends_with("a.dsl"));
    assert_eq!(err.0[0].location.line, 2);
}

#[test]
fn scenario_3_partial_crud_no_warnings() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity MaintenanceTask \"Maintenance Task\":\n    id: uuid pk\n    title: str(200) required\n\nsurface task_list \"Task List\":\n    uses entity MaintenanceTask\n    mode: list\n    section main \"Main\":\n        field title\n\nsurface task_create \"Task Create\":\n    uses entity MaintenanceTask\n    mode: create\n    section main \"Main\":\n        field title\n",
        )],
    );

    let spec = compile(dir.path().join("dazzle.toml")).unwrap();
    let surfaces: Vec<_> = spec.declarations(DeclCategory::Surface).collect();
    assert_eq!(surfaces.len(), 2);

    let diags = validate(&spec);
    assert!(diags
        .iter()
        .all(|d| d.code != "validate.empty_section" && !d.message.contains("edit") && !d.message.contains("delete")));
}

#[test]
fn scenario_4_reserved_enum() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    status: enum[open,submitted,closed]=open\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest).unwrap();
    let spec = link(asts).unwrap();
    let diags = validate(&spec);

    let found = diags
        .iter()
        .find(|d| d.code == "validate.reserved_enum_value" && d.message.contains("submitted"))
        .expect("expected a reserved-enum-value error for `submitted`");
    assert_eq!(found.hint.as_deref(), Some("use \"sent\" instead"));
}

#[test]
fn scenario_5_state_machine_all_reachable_terminal() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    status: enum[draft,open,closed]=draft\n    transitions:\n        draft -> open\n        open -> closed\n\nsurface ticket_list \"Ticket List\":\n    uses entity Ticket\n    mode: list\n    section main \"Main\":\n        field status\n",
        )],
    );

    let spec = compile(dir.path().join("dazzle.toml")).unwrap();
    let diags = validate(&spec);
    assert_eq!(diags.warning_count(), 0);
    assert_eq!(diags.error_count(), 0);
}

#[test]
fn scenario_6_state_machine_no_outgoing_non_terminal() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    status: enum[new,open,closed,parked]=new\n    transitions:\n        new -> open\n        open -> closed\n",
        )],
    );

    let spec = compile(dir.path().join("dazzle.toml")).unwrap();
    let diags = validate(&spec);

    assert!(diags
        .iter()
        .any(|d| d.code == "validate.unreachable_from_default" && d.message.contains("parked")));
    assert!(diags
        .iter()
        .any(|d| d.code == "validate.no_outgoing_transition" && d.message.contains("parked")));
}

#[test]
fn boundary_empty_project_has_no_modules() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("dazzle.toml"),
        "[project]\nname = \"demo\"\nversion = \"0.1.0\"\n[modules]\npaths = [\"src\"]\n",
    )
    .unwrap();
    std::fs::create_dir_all(dir.path().join("src")).unwrap();

    let err = compile(dir.path().join("dazzle.toml")).unwrap_err();
    assert!(err.has_errors());
}

#[test]
fn boundary_module_uses_itself_is_a_cycle() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path(), &[("a.dsl", "module a\nuse self\n")]);

    let err = compile(dir.path().join("dazzle.toml")).unwrap_err();
    assert_eq!(err.0.len(), 1);
    assert_eq!(err.0[0].code, "link.cycle");
    assert!(err.0[0].message.contains('a'));
    assert!(err.0[0].location.file.ends_with("a.dsl"));
    assert_eq!(err.0[0].location.line, 2);
}

#[test]
fn boundary_zero_variant_enum_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    status: enum[]=open\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest);
    assert!(asts.is_err(), "empty enum variant list must be rejected while parsing");
}

#[test]
fn boundary_str_zero_length_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    title: str(0) required\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest).unwrap();
    let spec = link(asts).unwrap();
    let diags = validate(&spec);
    assert!(diags.has_errors());
    assert!(diags.iter().any(|d| d.code == "validate.invalid_field_type"));
}

#[test]
fn boundary_decimal_zero_precision_scale_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Invoice \"Invoice\":\n    id: uuid pk\n    total: decimal(0,0) required\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest).unwrap();
    let spec = link(asts).unwrap();
    let diags = validate(&spec);
    assert!(diags.has_errors());
    assert!(diags.iter().any(|d| d.code == "validate.invalid_field_type"));
}

#[test]
fn boundary_transition_to_unknown_state_is_unknown_state() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    status: enum[new,open]=new\n    transitions:\n        new -> closed\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest).unwrap();
    let spec = link(asts).unwrap();
    let diags = validate(&spec);
    assert!(diags.iter().any(|d| d.code == "validate.unknown_state"));
}

#[test]
fn diagnostics_sort_non_decreasing_by_file_line_column() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    id2: uuid pk\n    status: enum[open,submitted]=open\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest).unwrap();
    let spec = link(asts).unwrap();
    let diags = validate(&spec);

    let mut prev: Option<(u32, u32)> = None;
    for d in diags.iter() {
        let cur = (d.location.line, d.location.column);
        if let Some(p) = prev {
            assert!(p <= cur, "diagnostics not sorted: {p:?} came before {cur:?}");
        }
        prev = Some(cur);
    }
}

#[test]
fn round_trip_preserves_locations() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Task \"Task\":\n    id: uuid pk\n    title: str(200) required\n",
        )],
    );

    let spec = compile(dir.path().join("dazzle.toml")).unwrap();
    let json = dazzle_core::serializer::to_json(&spec).unwrap();
    let round_tripped = dazzle_core::serializer::from_json(&json).unwrap();

    assert_eq!(round_tripped.app_name, spec.app_name);
    assert_eq!(round_tripped.modules.len(), spec.modules.len());
    let original_entity = spec.find(DeclCategory::Entity, "Task").unwrap();
    let rt_entity = round_tripped.find(DeclCategory::Entity, "Task").unwrap();
    assert_eq!(original_entity.location(), rt_entity.location());
}

#[test]
fn validator_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Ticket \"Ticket\":\n    id: uuid pk\n    status: enum[new,open,closed,parked]=new\n    transitions:\n        new -> open\n        open -> closed\n",
        )],
    );

    let manifest = Manifest::load(dir.path().join("dazzle.toml")).unwrap();
    let asts = loader::load_modules(&manifest).unwrap();
    let spec = link(asts).unwrap();

    let first = validate(&spec);
    let second = validate(&spec);
    assert_eq!(first.0.len(), second.0.len());
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.code, b.code);
        assert_eq!(a.message, b.message);
    }
}

#[test]
fn determinism_same_bytes_same_json() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Task \"Task\":\n    id: uuid pk\n    title: str(200) required\n",
        )],
    );

    let spec_a = compile(dir.path().join("dazzle.toml")).unwrap();
    let spec_b = compile(dir.path().join("dazzle.toml")).unwrap();
    let json_a = dazzle_core::serializer::to_json(&spec_a).unwrap();
    let json_b = dazzle_core::serializer::to_json(&spec_b).unwrap();
    assert_eq!(json_a, json_b);
}

#[test]
fn process_step_channel_and_signal_resolve_against_declarations() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Task \"Task\":\n    id: uuid pk\n    title: str(200) required\n\nevent order_created:\n    topic: \"orders\"\n    event: \"OrderCreated\"\n\nworkspace dash:\n    signal recent:\n        source: Task\n\nprocess handle_order:\n    trigger: \"order_created\"\n    step notify: channel_message, channel=\"orders\", payload=1\n    step ping: signal, signal=recent\n",
        )],
    );

    let spec = compile(dir.path().join("dazzle.toml")).unwrap();
    let diags = validate(&spec);
    assert!(!diags.iter().any(|d| d.code == "validate.unknown_channel" || d.code == "validate.unknown_signal"));
}

#[test]
fn process_step_unknown_channel_and_signal_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Task \"Task\":\n    id: uuid pk\n    title: str(200) required\n\nprocess handle_order:\n    trigger: \"order_created\"\n    step notify: channel_message, channel=\"orders\", payload=1\n    step ping: signal, signal=recent\n",
        )],
    );

    let err = compile(dir.path().join("dazzle.toml")).unwrap_err();
    assert!(err
        .iter()
        .any(|d| d.code == "validate.unknown_channel" && d.message.contains("orders")));
    assert!(err
        .iter()
        .any(|d| d.code == "validate.unknown_signal" && d.message.contains("recent")));
}

#[test]
fn invalid_scenario_fixture_type_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    write_project(
        dir.path(),
        &[(
            "m.dsl",
            "module m\nentity Task \"Task\":\n    id: uuid pk\n    title: str(200) required\n\nscenario demo1:\n    demo Task:\n        id = \"t1\"\n        title = 42\n",
        )],
    );

    let err = compile(dir.path().join("dazzle.toml")).unwrap_err();
    let found = err
        .iter()
        .find(|d| d.code == "validate.invalid_scenario_fixture" && d.message.contains("Task.title"))
        .expect("expected a type-mismatch diagnostic for the fixture's `title` value");
    assert!(found.message.contains("does not match the field's type"));
}

#[test]
fn parse_module_is_exposed_for_incremental_hosts() {
    let src = "module m\nentity Task \"Task\":\n    id: uuid pk\n";
    let file = std::sync::Arc::new(std::path::PathBuf::from("m.dsl"));
    let tokens = dazzle_core::lex_file(src, file.clone()).unwrap();
    let ast = parser::parse_module(tokens, file).unwrap();
    assert_eq!(ast.name, "m");
}
