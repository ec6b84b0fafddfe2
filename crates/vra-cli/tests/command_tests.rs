//! Scenario-file driven tests of the command layer.

use pretty_assertions::assert_eq;
use std::path::Path;
use vra_cli::commands::{run_check, run_init, run_request};
use vra_cli::Scenario;
use vra_core::DenialReason;
use vra_test_utils::starved_state;

fn write_example(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("scenario.json");
    Scenario::example().save(&path).unwrap();
    path
}

#[test]
fn init_seeds_a_checkable_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("seeded.json");

    run_init(&path).unwrap();
    let verdict = run_check(&path).unwrap();
    assert!(verdict.is_safe);
    assert_eq!(verdict.sequence, vec![1, 3, 4, 0, 2]);
}

#[test]
fn granted_request_can_be_committed_and_rechecked() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_example(dir.path());
    let committed = dir.path().join("after.json");

    let outcome = run_request(&path, 1, &[1, 0, 2], Some(&committed)).unwrap();
    assert!(outcome.granted);

    // The committed file is a full, valid scenario for the next call.
    let reloaded = Scenario::load(&committed).unwrap();
    assert_eq!(reloaded.available, vec![2, 3, 0]);
    assert_eq!(reloaded.allocation[1], vec![3, 0, 2]);
    assert!(run_check(&committed).unwrap().is_safe);
}

#[test]
fn denied_request_commits_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_example(dir.path());
    let committed = dir.path().join("after.json");

    // Exceeds VM 0's remaining need, so the protocol refuses up front.
    let outcome = run_request(&path, 0, &[8, 0, 0], Some(&committed)).unwrap();
    assert!(!outcome.granted);
    assert_eq!(outcome.denial, Some(DenialReason::ExceedsDeclaredMaximum));
    assert!(!committed.exists());

    // The source scenario is untouched either way.
    assert_eq!(Scenario::load(&path).unwrap(), Scenario::example());
}

#[test]
fn requests_against_an_unsafe_start_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("starved.json");
    Scenario::from_state(&starved_state()).save(&path).unwrap();

    let err = run_request(&path, 0, &[0], None).unwrap_err();
    assert!(err.to_string().contains("no safe completion order"));
}

#[test]
fn malformed_scenario_files_are_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(run_check(&path).is_err());
}
