//! Per-structure animation controllers.
//!
//! Every mutating operation is a step function: the caller invokes it once per
//! frame with identical operands until it reports [`Step::Complete`]. The
//! first call validates operands and sets up the animation; invalid operands
//! complete immediately without touching anything. The logical value is
//! mutated at a fixed commit point inside the animation, documented on each
//! operation.

pub mod arena;
pub mod array;
pub mod linked_list;
pub mod queue;
pub mod scene;
pub mod sequence;
pub mod stack;
pub mod string;
pub mod tree;

use std::fmt;

use crate::error::{VizError, VizResult};

pub use arena::NodeId;
pub use array::ArrayController;
pub use linked_list::{LinkedListController, ListOp};
pub use queue::{QueueController, QueueOp};
pub use scene::{Link, Scene, Sprite, Tone};
pub use sequence::{SeqOp, SequenceController};
pub use stack::{StackController, StackOp};
pub use string::StringController;
pub use tree::{BinaryTreeController, TraversalOrder, TreeOp};

/// Size of a value cell in layout units
pub const CELL_WIDTH: f32 = 6.0;
pub const CELL_HEIGHT: f32 = 3.0;

/// How far new cells start above their slot, and removed cells fall below it
pub const DROP_HEIGHT: f32 = 4.0;

/// Result of one frame of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Running,
    Complete,
}

impl Step {
    pub fn is_complete(self) -> bool {
        self == Step::Complete
    }
}

/// Outcome of the most recent search on a controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome<K> {
    Found(K),
    NotFound,
}

/// Common surface of the six controllers
pub trait Controller {
    /// One mutation request together with its operands
    type Op: Clone + PartialEq + fmt::Debug;

    /// Advance `op` by one frame
    fn step(&mut self, op: &Self::Op) -> VizResult<Step>;

    fn is_animating(&self) -> bool;

    /// Progress of the in-flight operation in `[0, 1]`; 0 when idle
    fn progress(&self) -> f32;

    /// Per-frame progress rate
    fn speed(&self) -> f32;

    fn set_speed(&mut self, speed: f32);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn scene(&self) -> Scene;
}

/// Reject a request whose operands differ from the animation in flight
pub(crate) fn ensure_same<O: PartialEq + fmt::Debug>(active: &Option<O>, requested: &O) -> VizResult<()> {
    match active {
        Some(current) if current != requested => Err(VizError::busy(current, requested)),
        _ => Ok(()),
    }
}

/// Step `f` until it completes, returning the number of frames taken.
#[cfg(test)]
pub(crate) fn drive(mut f: impl FnMut() -> VizResult<Step>) -> usize {
    for frame in 1..=100_000 {
        if f().expect("step failed").is_complete() {
            return frame;
        }
    }
    panic!("animation never completed");
}
