use std::rc::Rc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{Value, json};

use fixturist_plan::{
    DEFAULT_CONSTRAINT_RETRY_ATTEMPTS, DEFAULT_MIN_SPAN, FieldConstraint, FieldSetter, Plan,
    RunKind, RunPolicy, Sequence, constrain_pattern, constrain_range, constrain_string_length,
    constrain_with,
};

#[test]
fn new_plan_defaults_to_one_exact_item() {
    let plan = Plan::new();

    assert_eq!(plan.item_count(), RunPolicy::exact(1));
    assert_eq!(plan.max_constraint_retries(), DEFAULT_CONSTRAINT_RETRY_ATTEMPTS);
    assert_eq!(plan.parent_path(), "");
    assert!(plan.last_run().is_none());
}

#[test]
fn fix_stores_value_for_path() {
    let mut plan = Plan::new();
    plan.fix("add", json!(10));

    match plan.setter("add") {
        Some(FieldSetter::Fixed(value)) => assert_eq!(value, &json!(10)),
        other => panic!("expected fixed setter, got {other:?}"),
    }
    assert!(plan.setter("missing").is_none());
}

#[test]
fn later_setter_on_same_path_replaces_earlier_one() {
    let mut plan = Plan::new();
    plan.fix("name", json!("first"));
    plan.sequence("name", vec![json!("a"), json!("b")]);

    assert!(matches!(plan.setter("name"), Some(FieldSetter::Sequence(_))));
}

#[test]
fn map_key_and_value_sequences_merge_into_one_setter() {
    let mut plan = Plan::new();
    plan.map_key_sequence("genes", vec![json!("A2M")]);
    plan.map_value_sequence("genes", vec![json!("alpha")]);

    let setter = plan.map_setter("genes").expect("map setter");
    let keys = setter.keys.as_ref().expect("keys");
    let values = setter.values.as_ref().expect("values");
    assert_eq!(keys.value_at(0), Some(json!("A2M")));
    assert_eq!(values.value_at(0), Some(json!("alpha")));
}

#[test]
fn index_sequence_yields_nothing_past_the_end() {
    let sequence = Sequence::by_index(vec![json!("a"), json!("b")]);

    assert_eq!(sequence.value_at(1), Some(json!("b")));
    assert_eq!(sequence.value_at(0), Some(json!("a")));
    assert_eq!(sequence.value_at(2), None);
}

#[test]
fn across_sequence_ignores_index_and_never_resets() {
    let sequence = Sequence::across(vec![json!(1), json!(2)]);
    let shared = sequence.clone();

    assert_eq!(sequence.value_at(7), Some(json!(1)));
    assert_eq!(shared.value_at(0), Some(json!(2)));
    assert_eq!(sequence.value_at(0), None);
    assert_eq!(shared.value_at(0), None);
}

#[test]
fn run_policies_resolve_within_bounds() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    for _ in 0..200 {
        let exact = RunPolicy::exact(3).resolve(&mut rng);
        assert_eq!(exact.count, 3);
        assert_eq!(exact.kind, RunKind::Exact);

        let min = RunPolicy::min(4).resolve(&mut rng);
        assert!(min.count >= 4 && min.count < 4 + DEFAULT_MIN_SPAN);

        let spanned = RunPolicy::min_with_span(5, 2).resolve(&mut rng);
        assert!(spanned.count == 5 || spanned.count == 6);

        let max = RunPolicy::max(2).resolve(&mut rng);
        assert!(max.count <= 2);
        assert_eq!(max.kind, RunKind::Max);
    }
}

#[test]
fn zero_span_falls_back_to_default() {
    assert_eq!(RunPolicy::min_with_span(1, 0).span, DEFAULT_MIN_SPAN);
}

#[test]
fn copy_from_fills_gaps_without_overriding_child() {
    let mut parent = Plan::new();
    parent.omit("secret");
    parent.fix("name", json!("parent"));
    parent.fix("age", json!(40));
    parent.constrain("age", constrain_range(0.0, 120.0));
    parent.set_map_item_count("genes", RunPolicy::exact(5));
    parent.on_field(
        "id",
        Rc::new(|index: usize| -> serde_json::Result<Value> { Ok(json!(index)) }),
    );

    let mut child = Plan::new();
    child.fix("name", json!("child"));
    child.copy_from(&parent);

    assert!(child.is_omitted("secret"));
    assert!(matches!(
        child.setter("name"),
        Some(FieldSetter::Fixed(value)) if value == &json!("child")
    ));
    assert!(matches!(
        child.setter("age"),
        Some(FieldSetter::Fixed(value)) if value == &json!(40)
    ));
    assert!(child.constraint("age").is_some());
    assert_eq!(child.map_item_count("genes"), Some(RunPolicy::exact(5)));
    assert!(child.handler("id").is_some());
}

#[test]
fn nested_record_plan_scopes_path_and_inherits() {
    let mut parent = Plan::new();
    parent.set_item_count(RunPolicy::exact(9));
    parent.set_max_constraint_retries(3);
    parent.fix("child.name", json!("Goose"));

    let child = parent.nested_record_plan("child");

    assert_eq!(child.parent_path(), "child");
    assert_eq!(child.item_count(), RunPolicy::exact(1));
    assert_eq!(child.max_constraint_retries(), 3);
    assert!(child.setter("child.name").is_some());
}

#[test]
fn sub_generator_plan_keeps_its_own_directives_and_run_record() {
    let mut parent = Plan::new();
    parent.fix("farmers.name", json!("parent"));
    parent.fix("farmers.cash", json!(1.5));

    let mut tap = Plan::new();
    tap.set_item_count(RunPolicy::exact(2));
    tap.fix("farmers.name", json!("tap"));

    let child = parent.sub_generator_plan(&tap, "farmers");
    assert_eq!(child.parent_path(), "farmers");
    assert_eq!(child.item_count(), RunPolicy::exact(2));
    assert!(matches!(
        child.setter("farmers.name"),
        Some(FieldSetter::Fixed(value)) if value == &json!("tap")
    ));
    assert!(child.setter("farmers.cash").is_some());

    child.record_run(RunPolicy::exact(2).resolve(&mut ChaCha8Rng::seed_from_u64(1)));
    assert_eq!(tap.last_run().map(|run| run.count), Some(2));
}

#[test]
fn map_runs_recorded_on_child_plans_reach_the_root() {
    let root = Plan::new();
    let nested = root.nested_record_plan("owner");
    let tap = Plan::new();
    let sub = nested.sub_generator_plan(&tap, "owner.pets");
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    nested.record_map_run("owner.tags", RunPolicy::exact(3).resolve(&mut rng));
    sub.record_map_run("owner.pets.toys", RunPolicy::max(2).resolve(&mut rng));

    assert_eq!(root.map_last_run("owner.tags").map(|run| run.count), Some(3));
    assert_eq!(
        root.map_last_run("owner.pets.toys").map(|run| run.kind),
        Some(RunKind::Max)
    );
    assert!(tap.map_last_run("owner.pets.toys").is_none());
    assert!(root.map_last_run("owner").is_none());
}

#[test]
fn string_length_constraint_counts_characters() {
    let constraint = constrain_string_length(2, 4);

    assert!(constraint.is_valid(&json!("ab")));
    assert!(constraint.is_valid(&json!("çãõé")));
    assert!(!constraint.is_valid(&json!("a")));
    assert!(!constraint.is_valid(&json!("abcde")));
    assert!(!constraint.is_valid(&json!(12)));
}

#[test]
fn range_and_pattern_constraints_validate_values() {
    let range = constrain_range(1.0, 10.0);
    assert!(range.is_valid(&json!(1)));
    assert!(range.is_valid(&json!(9.5)));
    assert!(!range.is_valid(&json!(11)));
    assert!(!range.is_valid(&json!("5")));

    let pattern = constrain_pattern("[A-Z]{3}-[0-9]+").expect("valid pattern");
    assert!(pattern.is_valid(&json!("ABC-12")));
    assert!(!pattern.is_valid(&json!("xABC-12")));
    assert!(!pattern.is_valid(&json!(null)));

    assert!(constrain_pattern("(").is_err());
}

#[test]
fn predicate_constraint_reports_its_name() {
    let even = constrain_with("even", |value| value.as_i64().is_some_and(|n| n % 2 == 0));

    assert!(even.is_valid(&json!(4)));
    assert!(!even.is_valid(&json!(3)));
    assert!(format!("{even:?}").contains("even"));
}

#[test]
fn invalid_directives_are_recorded() {
    let mut plan = Plan::new();
    plan.record_invalid_directive("bad key");

    assert_eq!(plan.invalid_directives(), ["bad key".to_string()]);
}
