//! Integer array controller (0-based indices).

use glam::Vec2;

use super::sequence::{SeqOp, SeqStyle, SequenceController};
use super::{Controller, Step, CELL_WIDTH};
use crate::error::VizResult;

pub type ArrayController = SequenceController<i32>;
pub type ArrayOp = SeqOp<i32>;

const ARRAY_STYLE: SeqStyle = SeqStyle {
    cell_width: CELL_WIDTH,
    gap: 1.0,
    update_rate: 0.5,
};

impl SequenceController<i32> {
    pub fn new(values: Vec<i32>) -> Self {
        Self::with_style(values, Vec2::new(2.0, 6.0), ARRAY_STYLE)
    }

    pub fn insert(&mut self, index: usize, value: i32) -> VizResult<Step> {
        self.step(&SeqOp::Insert {
            index,
            values: vec![value],
        })
    }

    pub fn remove(&mut self, index: usize) -> VizResult<Step> {
        self.step(&SeqOp::Remove { index })
    }

    pub fn search(&mut self, value: i32) -> VizResult<Step> {
        self.step(&SeqOp::Search { value })
    }

    pub fn update(&mut self, index: usize, value: i32) -> VizResult<Step> {
        self.step(&SeqOp::Update { index, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VizError;
    use crate::structures::{drive, SearchOutcome, Tone, DROP_HEIGHT};

    fn sample() -> ArrayController {
        ArrayController::new(vec![10, 20, 30, 40, 50])
    }

    #[test]
    fn test_insert_commits_immediately() {
        let mut arr = sample();
        assert_eq!(arr.insert(2, 99).unwrap(), Step::Running);
        assert_eq!(arr.items(), &[10, 20, 99, 30, 40, 50]);

        // New cell starts above its slot, the tail starts one slot left
        let targets = arr.targets().to_vec();
        assert_eq!(arr.positions()[2], targets[2] - Vec2::new(0.0, DROP_HEIGHT));
        assert_eq!(arr.positions()[3], targets[2]);
        assert_eq!(arr.positions()[0], targets[0]);
        assert_eq!(arr.highlights().with_tone(Tone::Inserting), vec![2]);
        assert_eq!(arr.highlights().with_tone(Tone::Visiting), vec![3, 4, 5]);
        assert!(!arr.highlights().contains(0));

        drive(|| arr.insert(2, 99));
        assert_eq!(arr.positions(), &targets[..]);
        assert!(arr.highlights().is_empty());
        assert!(!arr.is_animating());
    }

    #[test]
    fn test_remove_commits_at_completion() {
        let mut arr = sample();
        arr.remove(0).unwrap();
        arr.remove(0).unwrap();
        assert_eq!(arr.len(), 5, "value is stale until the slide finishes");
        assert_eq!(arr.highlights().tone(0), Some(Tone::Removing));
        assert_eq!(arr.highlights().with_tone(Tone::Removing), vec![0]);
        assert_eq!(arr.highlights().with_tone(Tone::Visiting), vec![1, 2, 3, 4]);

        drive(|| arr.remove(0));
        assert_eq!(arr.items(), &[20, 30, 40, 50]);
        assert_eq!(arr.positions(), arr.targets());
    }

    #[test]
    fn test_out_of_range_is_noop() {
        let mut arr = sample();
        assert_eq!(arr.insert(6, 1).unwrap(), Step::Complete);
        assert_eq!(arr.remove(5).unwrap(), Step::Complete);
        assert_eq!(arr.update(9, 1).unwrap(), Step::Complete);
        assert_eq!(arr.items(), &[10, 20, 30, 40, 50]);
        assert!(!arr.is_animating());
        assert!(arr.highlights().is_empty());
    }

    #[test]
    fn test_update_swaps_value_at_half_progress() {
        let mut arr = sample();
        arr.update(1, 77).unwrap();
        let mut saw_old_after_start = false;
        loop {
            let step = arr.update(1, 77).unwrap();
            if step.is_complete() {
                break;
            }
            if arr.progress() < 0.5 {
                assert_eq!(arr.items()[1], 20);
                saw_old_after_start = true;
            } else {
                assert_eq!(arr.items()[1], 77);
            }
        }
        assert!(saw_old_after_start);
        assert_eq!(arr.items(), &[10, 77, 30, 40, 50]);
    }

    #[test]
    fn test_update_scene_has_two_ghost_cells() {
        let mut arr = sample();
        arr.update(0, 5).unwrap();
        arr.update(0, 5).unwrap();
        let scene = arr.scene();
        // four untouched cells plus outgoing and incoming ghosts
        assert_eq!(scene.sprites.len(), 6);
        assert!(scene.find("10").is_some());
        assert!(scene.find("5").is_some());
    }

    #[test]
    fn test_search_found_holds_single_highlight() {
        let mut arr = sample();
        arr.search(30).unwrap();
        let mut found_frames = 0;
        loop {
            let step = arr.search(30).unwrap();
            if step.is_complete() {
                break;
            }
            if arr.highlights().tone(2) == Some(Tone::Found) {
                assert_eq!(arr.highlights().len(), 1);
                found_frames += 1;
            }
        }
        assert!(found_frames > 0);
        assert_eq!(arr.last_search(), Some(SearchOutcome::Found(2)));
        assert!(arr.highlights().is_empty());
        assert_eq!(arr.items(), &[10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_search_missing_visits_every_cell() {
        let mut arr = sample();
        let mut visited = Vec::new();
        drive(|| {
            let step = arr.search(31);
            for idx in arr.highlights().with_tone(Tone::Searching) {
                if visited.last() != Some(&idx) {
                    visited.push(idx);
                }
            }
            step
        });
        assert_eq!(visited, vec![0, 1, 2, 3, 4]);
        assert_eq!(arr.last_search(), Some(SearchOutcome::NotFound));
        assert!(arr.highlights().is_empty());
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let mut arr = sample();
        arr.search(50).unwrap();
        let mut last = arr.progress();
        loop {
            let step = arr.search(50).unwrap();
            if step.is_complete() {
                break;
            }
            let p = arr.progress();
            assert!((0.0..=1.0).contains(&p));
            assert!(p >= last, "progress went backwards: {last} -> {p}");
            last = p;
        }
    }

    #[test]
    fn test_busy_rejects_different_operands() {
        let mut arr = sample();
        arr.insert(0, 1).unwrap();
        let err = arr.remove(0).unwrap_err();
        assert!(matches!(err, VizError::Busy { .. }));
        // the in-flight insert is untouched and still completes
        drive(|| arr.insert(0, 1));
        assert_eq!(arr.items(), &[1, 10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_two_instances_do_not_share_state() {
        let mut a = sample();
        let mut b = sample();
        a.remove(4).unwrap();
        assert!(!b.is_animating());
        drive(|| b.insert(0, 7));
        drive(|| a.remove(4));
        assert_eq!(a.items(), &[10, 20, 30, 40]);
        assert_eq!(b.items(), &[7, 10, 20, 30, 40, 50]);
    }
}
