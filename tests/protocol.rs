use dsviz::command;
use dsviz::error::VizError;
use dsviz::headless::{run_script, run_to_completion};
use dsviz::structures::{ArrayController, BinaryTreeController, Controller, Step};
use dsviz::workbench::{Snapshot, StructureKind, Workbench};

#[test]
fn test_busy_guard_rejects_other_operands() {
    let mut array = ArrayController::new(vec![10, 20, 30]);
    assert_eq!(array.insert(0, 5).unwrap(), Step::Running);
    let before = array.items().to_vec();

    let err = array.remove(1).unwrap_err();
    assert!(matches!(err, VizError::Busy { .. }));
    assert_eq!(array.items(), before.as_slice());
    assert!(array.is_animating());

    run_to_completion(|| array.insert(0, 5), 10_000).unwrap();
    assert_eq!(array.items(), &[5, 10, 20, 30]);
}

#[test]
fn test_controllers_are_independent() {
    let mut left = BinaryTreeController::from_values([50, 40, 60]);
    let mut right = BinaryTreeController::from_values([50, 40, 60]);
    left.delete(40).unwrap();
    right.search(60).unwrap();
    run_to_completion(|| left.delete(40), 10_000).unwrap();
    assert!(right.is_animating());
    run_to_completion(|| right.search(60), 10_000).unwrap();
    assert_eq!(left.len(), 2);
    assert_eq!(right.len(), 3);
}

#[test]
fn test_speed_is_clamped() {
    let mut array = ArrayController::new(vec![1]);
    array.set_speed(10.0);
    assert_eq!(array.speed(), 1.0);
    array.set_speed(0.0);
    assert_eq!(array.speed(), 0.005);
}

#[test]
fn test_faster_speed_takes_fewer_frames() {
    let mut slow = ArrayController::new(vec![1, 2, 3]);
    let mut fast = ArrayController::new(vec![1, 2, 3]);
    fast.set_speed(0.2);
    let slow_frames = run_to_completion(|| slow.remove(0), 10_000).unwrap();
    let fast_frames = run_to_completion(|| fast.remove(0), 10_000).unwrap();
    assert!(fast_frames < slow_frames);
}

#[test]
fn test_headless_script_matches_scenario() {
    let mut bench = Workbench::seeded();
    let report = run_script(&mut bench, StructureKind::Tree, "delete 60; inorder").unwrap();
    assert_eq!(
        report.steps[1].report.as_deref(),
        Some("inorder: 45 55 57 62 65 70")
    );
    match report.result {
        Snapshot::Tree { root, .. } => assert_eq!(root, Some(62)),
        other => panic!("unexpected snapshot {other:?}"),
    }
}

#[test]
fn test_script_output_is_json() {
    let mut bench = Workbench::seeded();
    let report = run_script(&mut bench, StructureKind::Queue, "enqueue 50\ndequeue").unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["result"]["structure"], "queue");
    assert_eq!(json["result"]["values"], serde_json::json!([20, 30, 40, 50]));
    assert_eq!(json["steps"][0]["command"], "enqueue 50");
}

#[test]
fn test_malformed_input_never_reaches_core() {
    let err = command::parse(StructureKind::Array, "insert two 5").unwrap_err();
    assert!(matches!(err, VizError::InvalidInput(_)));
    let err = command::parse(StructureKind::Stack, "launch").unwrap_err();
    assert!(matches!(err, VizError::UnknownCommand(_)));
}
