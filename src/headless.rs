//! Terminal-free replay: drive operations frame by frame without rendering.

use tracing::{debug, info};

use crate::command;
use crate::error::{VizError, VizResult};
use crate::structures::Step;
use crate::workbench::{PendingOp, Snapshot, StructureKind, Workbench};

/// Frame cap used by scripted runs; far beyond any bounded animation
pub const DEFAULT_FRAME_CAP: usize = 1_000_000;

/// Call `step` until it reports completion. Returns the number of frames
/// taken, or [`VizError::Stalled`] once `max_frames` have elapsed.
pub fn run_to_completion(
    mut step: impl FnMut() -> VizResult<Step>,
    max_frames: usize,
) -> VizResult<usize> {
    for frame in 1..=max_frames {
        if step()?.is_complete() {
            return Ok(frame);
        }
    }
    Err(VizError::Stalled { frames: max_frames })
}

/// One command's outcome in a scripted run
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScriptStep {
    pub command: String,
    pub frames: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScriptReport {
    pub steps: Vec<ScriptStep>,
    pub result: Snapshot,
}

impl ScriptReport {
    /// Pretty-printed JSON, as written to stdout by `--script`
    pub fn to_json(&self) -> VizResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse, validate and run every command in `script` against `kind`.
///
/// Stops at the first command that fails to parse or is out of range.
pub fn run_script(
    bench: &mut Workbench,
    kind: StructureKind,
    script: &str,
) -> VizResult<ScriptReport> {
    let mut steps = Vec::new();
    for line in command::split_script(script) {
        let op: PendingOp = command::parse(kind, line)?;
        command::validate(&op, bench.len(kind))?;
        let frames = run_to_completion(|| bench.step(&op), DEFAULT_FRAME_CAP)?;
        debug!(%op, frames, "script command finished");
        steps.push(ScriptStep {
            command: op.to_string(),
            frames,
            report: bench.report(&op),
        });
    }
    info!(structure = %kind, commands = steps.len(), "script finished");
    Ok(ScriptReport {
        steps,
        result: bench.snapshot(kind),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stall_is_reported() {
        let err = run_to_completion(|| Ok(Step::Running), 10).unwrap_err();
        assert!(matches!(err, VizError::Stalled { frames: 10 }));
    }

    #[test]
    fn test_step_errors_propagate() {
        let err = run_to_completion(|| Err(VizError::InvalidInput("x".into())), 10).unwrap_err();
        assert!(matches!(err, VizError::InvalidInput(_)));
    }

    #[test]
    fn test_script_on_array() {
        let mut bench = Workbench::seeded();
        let report = run_script(&mut bench, StructureKind::Array, "insert 2 99; remove 0; search 30")
            .unwrap();
        assert_eq!(
            report.result,
            Snapshot::Array {
                values: vec![20, 99, 30, 40, 50]
            }
        );
        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.steps[2].report.as_deref(), Some("found 30 at index 2"));
    }

    #[test]
    fn test_report_renders_as_json() {
        let mut bench = Workbench::seeded();
        let report = run_script(&mut bench, StructureKind::Stack, "push 5").unwrap();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["steps"][0]["command"], "push 5");
        assert!(json["steps"][0]["frames"].as_u64().unwrap() > 1);
    }

    #[test]
    fn test_script_stops_on_bad_index() {
        let mut bench = Workbench::seeded();
        let err = run_script(&mut bench, StructureKind::LinkedList, "delete 9").unwrap_err();
        assert!(matches!(err, VizError::OutOfRange { .. }));
        assert_eq!(bench.list.values(), vec![10, 20, 30, 40]);
    }
}
