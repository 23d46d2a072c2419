//! Integration tests for snapshot import/export.
//!
//! Import is all-or-nothing: a document must carry both the `goals` and
//! `measurements` sequences or the current store stays untouched.

use trackle_core::{Database, NewGoal, NewMeasurement, Period, TrackerService, Weekday};

fn service() -> TrackerService {
    TrackerService::with_database(Database::open_memory().unwrap()).unwrap()
}

fn populated() -> TrackerService {
    let mut svc = service();
    let goal = svc
        .add_goal(NewGoal {
            name: "Gym".into(),
            tag: "Health".into(),
            tag_color: "#34d399".into(),
            frequency: 3,
            period: Period::Weekly,
            start_day: Weekday::Mon,
            start_date: None,
        })
        .unwrap();
    svc.increment_goal(&goal.id).unwrap();
    let m = svc
        .add_measurement(NewMeasurement {
            name: "Weight".into(),
            unit: "kg".into(),
        })
        .unwrap();
    svc.add_measurement_entry(&m.id, 74.5, Some(1_000)).unwrap();
    svc
}

#[test]
fn first_run_initializes_empty_store() {
    let db = Database::open_memory().unwrap();
    let svc = TrackerService::with_database(db).unwrap();
    assert!(svc.store().goals.is_empty());
    assert!(svc.store().measurements.is_empty());
    // The empty snapshot was written on first run.
    let exported = svc.export_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&exported).unwrap();
    assert!(value["goals"].as_array().unwrap().is_empty());
}

#[test]
fn export_import_round_trip_is_identical() {
    let mut svc = populated();
    let exported = svc.export_json().unwrap();
    let before = svc.store().clone();

    assert!(svc.import_json(&exported));
    assert_eq!(svc.store(), &before);
}

#[test]
fn import_into_fresh_service_restores_everything() {
    let svc = populated();
    let exported = svc.export_json().unwrap();

    let mut fresh = service();
    assert!(fresh.import_json(&exported));
    assert_eq!(fresh.store().goals.len(), 1);
    assert_eq!(fresh.store().goals[0].name, "Gym");
    assert_eq!(fresh.store().goals[0].completions[0].count, 1);
    assert_eq!(fresh.store().measurements[0].entries[0].value, 74.5);
}

#[test]
fn import_replaces_rather_than_merges() {
    let mut svc = populated();
    assert!(svc.import_json(r#"{"goals": [], "measurements": []}"#));
    assert!(svc.store().goals.is_empty());
    assert!(svc.store().measurements.is_empty());
}

#[test]
fn import_rejects_missing_measurements() {
    let mut svc = populated();
    let before = svc.store().clone();
    assert!(!svc.import_json(r#"{"goals": []}"#));
    assert_eq!(svc.store(), &before);
}

#[test]
fn import_rejects_missing_goals() {
    let mut svc = populated();
    let before = svc.store().clone();
    assert!(!svc.import_json(r#"{"measurements": []}"#));
    assert_eq!(svc.store(), &before);
}

#[test]
fn import_rejects_malformed_json() {
    let mut svc = populated();
    let before = svc.store().clone();
    assert!(!svc.import_json("not json"));
    assert_eq!(svc.store(), &before);
}

#[test]
fn import_rejects_wrong_shapes() {
    let mut svc = populated();
    let before = svc.store().clone();
    assert!(!svc.import_json(r#"{"goals": {}, "measurements": []}"#));
    assert!(!svc.import_json(r#"[1, 2, 3]"#));
    assert_eq!(svc.store(), &before);
}

#[test]
fn exported_document_uses_the_wire_field_names() {
    let svc = populated();
    let value: serde_json::Value = serde_json::from_str(&svc.export_json().unwrap()).unwrap();
    let goal = &value["goals"][0];
    for key in ["id", "name", "tag", "tagColor", "frequency", "period", "startDay", "completions", "createdAt"] {
        assert!(goal.get(key).is_some(), "goal missing key {key}");
    }
    assert_eq!(goal["period"], "weekly");
    assert_eq!(goal["startDay"], "Mon");
    assert!(goal["completions"][0]["periodStart"].is_i64());

    let measurement = &value["measurements"][0];
    for key in ["id", "name", "unit", "entries", "createdAt"] {
        assert!(measurement.get(key).is_some(), "measurement missing key {key}");
    }
    assert!(measurement["entries"][0]["date"].is_i64());
}

#[test]
fn imported_snapshot_persists_to_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trackle.db");

    let exported = populated().export_json().unwrap();
    {
        let db = Database::open_path(&path).unwrap();
        let mut svc = TrackerService::with_database(db).unwrap();
        assert!(svc.import_json(&exported));
    }

    let db = Database::open_path(&path).unwrap();
    let svc = TrackerService::with_database(db).unwrap();
    assert_eq!(svc.store().goals.len(), 1);
    assert_eq!(svc.store().measurements.len(), 1);
}
