use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use fixturist_core::{Describe, RecordShape, Shape};
use fixturist_generate::{GenerationError, mock, tap};
use fixturist_plan::RunKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Visit {
    ward: String,
    nights: u16,
}

impl Describe for Visit {
    fn shape() -> Shape {
        RecordShape::new("Visit")
            .field::<String>("ward")
            .field::<u16>("nights")
            .into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Patient {
    name: String,
    genes: HashMap<String, i32>,
    labels: HashMap<String, String>,
    visits: BTreeMap<u32, Visit>,
    scores: HashMap<String, Option<f64>>,
}

impl Describe for Patient {
    fn shape() -> Shape {
        RecordShape::new("Patient")
            .field::<String>("name")
            .field::<HashMap<String, i32>>("genes")
            .field::<HashMap<String, String>>("labels")
            .field::<BTreeMap<u32, Visit>>("visits")
            .field::<HashMap<String, Option<f64>>>("scores")
            .into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Clinic {
    patients: Vec<Patient>,
}

impl Describe for Clinic {
    fn shape() -> Shape {
        RecordShape::new("Clinic")
            .field::<Vec<Patient>>("patients")
            .into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Tally {
    by_byte: HashMap<u8, i32>,
    by_flag: HashMap<bool, i32>,
}

impl Describe for Tally {
    fn shape() -> Shape {
        RecordShape::new("Tally")
            .field::<HashMap<u8, i32>>("by_byte")
            .field::<HashMap<bool, i32>>("by_flag")
            .into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Roster {
    shifts: HashMap<String, Vec<String>>,
}

impl Describe for Roster {
    fn shape() -> Shape {
        RecordShape::new("Roster")
            .field::<HashMap<String, Vec<String>>>("shifts")
            .into()
    }
}

struct Registry;

impl Describe for Registry {
    fn shape() -> Shape {
        RecordShape::new("Registry")
            .field::<HashMap<Visit, i32>>("by_visit")
            .into()
    }
}

#[test]
fn maps_default_to_one_entry() {
    let patients = mock::<Patient>()
        .with_exact_items(3)
        .execute_to_type()
        .expect("generate");

    for patient in &patients {
        assert_eq!(patient.genes.len(), 1);
        assert_eq!(patient.labels.len(), 1);
        assert_eq!(patient.visits.len(), 1);
        assert_eq!(patient.scores.len(), 1);
        assert!(patient.scores.values().all(Option::is_some));
    }
}

#[test]
fn exact_map_items_sets_entry_count_for_that_field_only() {
    let patients = mock::<Patient>()
        .with_exact_items(4)
        .with_exact_map_items("genes", 6)
        .execute_to_type()
        .expect("generate");

    for patient in &patients {
        assert_eq!(patient.genes.len(), 6);
        assert_eq!(patient.labels.len(), 1);
    }
}

#[test]
fn max_and_min_map_items_bound_entry_count() {
    let patients = mock::<Patient>()
        .with_exact_items(20)
        .with_max_map_items("genes", 3)
        .with_min_map_items_span("labels", 2, 2)
        .execute_to_type()
        .expect("generate");

    for patient in &patients {
        assert!(patient.genes.len() <= 3);
        assert!((2..4).contains(&patient.labels.len()));
    }
}

#[test]
fn key_sequence_defines_the_key_set() {
    let keys = ["A2M", "BRCA1", "TP53"];

    let patients = mock::<Patient>()
        .with_exact_items(2)
        .with_exact_map_items("genes", keys.len())
        .ensure_map_key_sequence("genes", keys)
        .execute_to_type()
        .expect("generate");

    let expected: BTreeSet<&str> = keys.into_iter().collect();
    for patient in &patients {
        let actual: BTreeSet<&str> = patient.genes.keys().map(String::as_str).collect();
        assert_eq!(actual, expected);
    }
}

#[test]
fn key_and_value_sequences_pair_by_entry_index() {
    let patients = mock::<Patient>()
        .with_exact_map_items("genes", 2)
        .ensure_map_key_sequence("genes", ["A2M", "TP53"])
        .ensure_map_value_sequence("genes", [7, 9])
        .execute_to_type()
        .expect("generate");

    let genes = &patients[0].genes;
    assert_eq!(genes.get("A2M"), Some(&7));
    assert_eq!(genes.get("TP53"), Some(&9));
}

#[test]
fn integer_key_sequences_round_trip() {
    let patients = mock::<Patient>()
        .with_exact_map_items("visits", 2)
        .ensure_map_key_sequence("visits", [10_u32, 20])
        .execute_to_type()
        .expect("generate");

    let days: Vec<u32> = patients[0].visits.keys().copied().collect();
    assert_eq!(days, [10, 20]);
}

#[test]
fn map_values_that_are_records_are_populated_with_inherited_directives() {
    let patients = mock::<Patient>()
        .with_exact_map_items("visits", 3)
        .ensure("visits.ward", "B-12")
        .execute_to_type()
        .expect("generate");

    let visits = &patients[0].visits;
    assert_eq!(visits.len(), 3);
    assert!(visits.values().all(|visit| visit.ward == "B-12"));
}

#[test]
fn fixed_map_replaces_generation() {
    let mut labels = HashMap::new();
    labels.insert("triage".to_string(), "green".to_string());

    let patients = mock::<Patient>()
        .with_exact_map_items("labels", 5)
        .ensure("labels", &labels)
        .execute_to_type()
        .expect("generate");

    assert_eq!(patients[0].labels, labels);
}

#[test]
fn map_directives_reach_maps_inside_list_elements() {
    let clinics = mock::<Clinic>()
        .ensure_via(
            "patients",
            tap()
                .with_exact_items(2)
                .with_exact_map_items("patients.genes", 2)
                .ensure_map_key_sequence("patients.genes", ["A2M", "TP53"]),
        )
        .execute_to_type()
        .expect("generate");

    let patients = &clinics[0].patients;
    assert_eq!(patients.len(), 2);
    for patient in patients {
        assert!(patient.genes.contains_key("A2M"));
        assert!(patient.genes.contains_key("TP53"));
    }
}

#[test]
fn non_primitive_key_without_sequence_is_rejected() {
    let result = mock::<Registry>().execute();

    match result {
        Err(GenerationError::UnsupportedMapKey { path }) => assert_eq!(path, "by_visit"),
        other => panic!("expected unsupported map key, got {other:?}"),
    }
}

#[test]
fn non_primitive_key_with_sequence_is_accepted() {
    let items = mock::<Registry>()
        .ensure_map_key_sequence("by_visit", ["first"])
        .execute()
        .expect("generate");

    let by_visit = items[0]["by_visit"].as_object().expect("map value");
    assert!(by_visit.contains_key("first"));
}

#[test]
fn generated_keys_never_collide_in_small_key_spaces() {
    let items = mock::<Tally>()
        .with_seed(3)
        .with_exact_items(10)
        .with_exact_map_items("by_byte", 40)
        .with_exact_map_items("by_flag", 2)
        .execute()
        .expect("generate");

    for item in &items {
        assert_eq!(item["by_byte"].as_object().map(|map| map.len()), Some(40));
        let flags = item["by_flag"].as_object().expect("flag map");
        assert!(flags.contains_key("true"));
        assert!(flags.contains_key("false"));
    }
}

#[test]
fn asking_for_more_keys_than_the_key_type_holds_is_an_error() {
    let result = mock::<Tally>()
        .with_seed(3)
        .with_exact_map_items("by_flag", 3)
        .execute();

    match result {
        Err(GenerationError::MapKeySpaceExhausted { path, requested }) => {
            assert_eq!(path, "by_flag");
            assert_eq!(requested, 3);
        }
        other => panic!("expected exhausted key space, got {other:?}"),
    }
}

#[test]
fn list_values_keep_one_element_whatever_the_entry_count() {
    let rosters = mock::<Roster>()
        .with_exact_map_items("shifts", 5)
        .execute_to_type()
        .expect("generate");

    let shifts = &rosters[0].shifts;
    assert_eq!(shifts.len(), 5);
    assert!(shifts.values().all(|names| names.len() == 1));
}

#[test]
fn drawn_entry_count_is_reported_per_map_path() {
    let factory = mock::<Patient>()
        .with_seed(9)
        .with_min_map_items_span("genes", 2, 3);
    let patients = factory.execute_to_type().expect("generate");

    let run = factory.map_last_run("genes").expect("genes run recorded");
    assert_eq!(run.kind, RunKind::Min);
    assert_eq!(run.count, patients[0].genes.len());
    assert!((2..5).contains(&run.count));
    assert_eq!(factory.map_last_run("labels").map(|run| run.count), Some(1));
    assert!(factory.map_last_run("missing").is_none());
}

#[test]
fn entry_counts_of_maps_inside_sub_generators_reach_the_outer_factory() {
    let factory = mock::<Clinic>().ensure_via(
        "patients",
        tap()
            .with_exact_items(2)
            .with_exact_map_items("patients.genes", 4),
    );
    factory.execute().expect("generate");

    let run = factory
        .map_last_run("patients.genes")
        .expect("nested run recorded");
    assert_eq!(run.kind, RunKind::Exact);
    assert_eq!(run.count, 4);
}
