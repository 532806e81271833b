//! Character string controller (0-based indices).
//!
//! Cells sit edge to edge like a character strip. An insert may carry more
//! than one character; every inserted character drops in from above.

use glam::Vec2;

use super::sequence::{SeqOp, SeqStyle, SequenceController};
use super::{Controller, Step};
use crate::error::VizResult;

pub type StringController = SequenceController<char>;
pub type StringOp = SeqOp<char>;

const STRING_STYLE: SeqStyle = SeqStyle {
    cell_width: 4.0,
    gap: 0.0,
    update_rate: 0.3,
};

impl SequenceController<char> {
    pub fn new(text: &str) -> Self {
        Self::with_style(text.chars().collect(), Vec2::new(2.0, 6.0), STRING_STYLE)
    }

    /// Current contents as an owned string
    pub fn text(&self) -> String {
        self.items().iter().collect()
    }

    pub fn insert(&mut self, index: usize, text: &str) -> VizResult<Step> {
        self.step(&SeqOp::Insert {
            index,
            values: text.chars().collect(),
        })
    }

    pub fn remove(&mut self, index: usize) -> VizResult<Step> {
        self.step(&SeqOp::Remove { index })
    }

    pub fn search(&mut self, value: char) -> VizResult<Step> {
        self.step(&SeqOp::Search { value })
    }

    pub fn update(&mut self, index: usize, value: char) -> VizResult<Step> {
        self.step(&SeqOp::Update { index, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::{drive, SearchOutcome, Tone, DROP_HEIGHT};

    #[test]
    fn test_insert_single_char() {
        let mut s = StringController::new("Hello");
        drive(|| s.insert(5, "!"));
        assert_eq!(s.text(), "Hello!");
    }

    #[test]
    fn test_insert_run_drops_every_char() {
        let mut s = StringController::new("Held");
        s.insert(3, "lo Wor").unwrap();
        assert_eq!(s.text(), "Hello Word");
        let targets = s.targets().to_vec();
        for i in 3..9 {
            assert_eq!(s.positions()[i], targets[i] - Vec2::new(0.0, DROP_HEIGHT));
        }
        // 'd' shifted by the full run length
        assert_eq!(s.positions()[9], targets[3]);
        assert_eq!(s.highlights().with_tone(Tone::Inserting), (3..9).collect::<Vec<_>>());
        assert_eq!(s.highlights().with_tone(Tone::Visiting), vec![9]);
        drive(|| s.insert(3, "lo Wor"));
        assert_eq!(s.positions(), &targets[..]);
    }

    #[test]
    fn test_empty_insert_is_noop() {
        let mut s = StringController::new("abc");
        assert_eq!(s.insert(1, "").unwrap(), Step::Complete);
        assert_eq!(s.text(), "abc");
    }

    #[test]
    fn test_remove_and_update() {
        let mut s = StringController::new("Hello");
        drive(|| s.remove(0));
        assert_eq!(s.text(), "ello");
        drive(|| s.update(0, 'E'));
        assert_eq!(s.text(), "Ello");
    }

    #[test]
    fn test_update_is_slower_than_array() {
        let mut s = StringController::new("ab");
        let mut a = crate::structures::ArrayController::new(vec![1, 2]);
        let string_frames = drive(|| s.update(0, 'z'));
        let array_frames = drive(|| a.update(0, 9));
        assert!(string_frames > array_frames);
    }

    #[test]
    fn test_search_char() {
        let mut s = StringController::new("Hello");
        drive(|| s.search('l'));
        assert_eq!(s.last_search(), Some(SearchOutcome::Found(2)));
        drive(|| s.search('z'));
        assert_eq!(s.last_search(), Some(SearchOutcome::NotFound));
    }
}
