//! Shared engine behind the array and string controllers.
//!
//! Both containers are a flat row of cells; they differ only in payload type
//! and a few style constants, so one generic controller carries the insert,
//! remove, search and update animations for both.

use std::fmt;

use glam::Vec2;
use tracing::debug;

use super::scene::{Scene, Sprite, Tone};
use super::{ensure_same, Controller, SearchOutcome, Step, CELL_HEIGHT, DROP_HEIGHT};
use crate::animation::{
    advance, bounce_offset, clamp_speed, lerp, lerp_point, Highlights, Hold, DEFAULT_SPEED,
};
use crate::error::VizResult;

/// How long a found cell stays lifted, in seconds
pub const SEARCH_HOLD_SECS: f32 = 2.0;

/// Lift applied to a found cell during its hold
const FOUND_LIFT: f32 = 1.0;

/// Geometry and pacing that differ between arrays and strings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeqStyle {
    pub cell_width: f32,
    pub gap: f32,
    /// Multiplier applied to the speed for update crossfades
    pub update_rate: f32,
}

/// Operations supported by array-like controllers
#[derive(Debug, Clone, PartialEq)]
pub enum SeqOp<T> {
    /// Insert a run of values so that the first lands at `index`
    Insert { index: usize, values: Vec<T> },
    Remove { index: usize },
    Search { value: T },
    Update { index: usize, value: T },
}

impl<T> SeqOp<T> {
    pub fn name(&self) -> &'static str {
        match self {
            SeqOp::Insert { .. } => "insert",
            SeqOp::Remove { .. } => "remove",
            SeqOp::Search { .. } => "search",
            SeqOp::Update { .. } => "update",
        }
    }
}

#[derive(Debug, Clone)]
enum SeqAnim<T> {
    Idle,
    Insert {
        index: usize,
        start: Vec<Vec2>,
        progress: f32,
    },
    Remove {
        index: usize,
        start: Vec<Vec2>,
        progress: f32,
    },
    Search {
        value: T,
        cursor: usize,
        dwell: f32,
        found: Option<(usize, Hold)>,
    },
    Update {
        index: usize,
        old: T,
        new: T,
        progress: f32,
    },
}

impl<T> Default for SeqAnim<T> {
    fn default() -> Self {
        SeqAnim::Idle
    }
}

#[derive(Debug, Clone)]
pub struct SequenceController<T> {
    items: Vec<T>,
    origin: Vec2,
    style: SeqStyle,
    targets: Vec<Vec2>,
    current: Vec<Vec2>,
    highlights: Highlights<usize>,
    speed: f32,
    anim: SeqAnim<T>,
    active: Option<SeqOp<T>>,
    last_search: Option<SearchOutcome<usize>>,
}

impl<T> SequenceController<T>
where
    T: Clone + PartialEq + fmt::Debug + fmt::Display,
{
    pub fn with_style(items: Vec<T>, origin: Vec2, style: SeqStyle) -> Self {
        let mut ctl = Self {
            items,
            origin,
            style,
            targets: Vec::new(),
            current: Vec::new(),
            highlights: Highlights::new(),
            speed: DEFAULT_SPEED,
            anim: SeqAnim::Idle,
            active: None,
            last_search: None,
        };
        ctl.relayout();
        ctl.current = ctl.targets.clone();
        ctl
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Interpolated on-screen positions, one per item
    pub fn positions(&self) -> &[Vec2] {
        &self.current
    }

    /// Resting positions computed from the logical index
    pub fn targets(&self) -> &[Vec2] {
        &self.targets
    }

    pub fn highlights(&self) -> &Highlights<usize> {
        &self.highlights
    }

    pub fn last_search(&self) -> Option<SearchOutcome<usize>> {
        self.last_search
    }

    fn pitch(&self) -> f32 {
        self.style.cell_width + self.style.gap
    }

    pub fn slot_position(&self, index: usize) -> Vec2 {
        Vec2::new(self.origin.x + index as f32 * self.pitch(), self.origin.y)
    }

    fn relayout(&mut self) {
        self.targets = (0..self.items.len()).map(|i| self.slot_position(i)).collect();
    }

    fn begin(&mut self, op: &SeqOp<T>) -> Step {
        let started = match op {
            SeqOp::Insert { index, values } => self.begin_insert(*index, values),
            SeqOp::Remove { index } => self.begin_remove(*index),
            SeqOp::Search { value } => self.begin_search(value.clone()),
            SeqOp::Update { index, value } => self.begin_update(*index, value.clone()),
        };

        if started {
            debug!(op = op.name(), len = self.items.len(), "sequence animation started");
            self.active = Some(op.clone());
            Step::Running
        } else {
            debug!(op = op.name(), len = self.items.len(), "sequence operation ignored");
            Step::Complete
        }
    }

    /// Commit point: the splice happens here, before any motion.
    fn begin_insert(&mut self, index: usize, values: &[T]) -> bool {
        if index > self.items.len() || values.is_empty() {
            return false;
        }
        let count = values.len();
        self.items.splice(index..index, values.iter().cloned());
        self.relayout();

        let mut start = self.targets.clone();
        for (i, slot) in start.iter_mut().enumerate().skip(index) {
            *slot = if i < index + count {
                self.targets[i] - Vec2::new(0.0, DROP_HEIGHT)
            } else {
                self.targets[i - count]
            };
        }
        self.current = start.clone();

        // New cells are inserting; the tail they displace is only sliding
        self.highlights.clear();
        self.highlights.mark_all(index..index + count, Tone::Inserting);
        self.highlights
            .mark_all(index + count..self.items.len(), Tone::Visiting);
        self.anim = SeqAnim::Insert {
            index,
            start,
            progress: 0.0,
        };
        true
    }

    fn begin_remove(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.highlights.only(index, Tone::Removing);
        self.highlights
            .mark_all(index + 1..self.items.len(), Tone::Visiting);
        self.anim = SeqAnim::Remove {
            index,
            start: self.current.clone(),
            progress: 0.0,
        };
        true
    }

    fn begin_search(&mut self, value: T) -> bool {
        self.current = self.targets.clone();
        self.highlights.clear();
        self.last_search = None;
        self.anim = SeqAnim::Search {
            value,
            cursor: 0,
            dwell: 0.0,
            found: None,
        };
        true
    }

    fn begin_update(&mut self, index: usize, value: T) -> bool {
        let Some(old) = self.items.get(index).cloned() else {
            return false;
        };
        self.highlights.only(index, Tone::Inserting);
        self.anim = SeqAnim::Update {
            index,
            old,
            new: value,
            progress: 0.0,
        };
        true
    }

    fn tick(&mut self) -> Step {
        let (next, step) = match std::mem::take(&mut self.anim) {
            SeqAnim::Idle => (SeqAnim::Idle, Step::Complete),
            SeqAnim::Insert {
                index,
                start,
                progress,
            } => {
                let progress = advance(progress, self.speed);
                for i in index..self.items.len() {
                    self.current[i] = lerp_point(start[i], self.targets[i], progress);
                }
                if progress >= 1.0 {
                    self.settle();
                    (SeqAnim::Idle, Step::Complete)
                } else {
                    (
                        SeqAnim::Insert {
                            index,
                            start,
                            progress,
                        },
                        Step::Running,
                    )
                }
            }
            SeqAnim::Remove {
                index,
                start,
                progress,
            } => {
                let progress = advance(progress, self.speed);
                self.current[index] =
                    Vec2::new(start[index].x, start[index].y + DROP_HEIGHT * progress);
                for i in index + 1..self.items.len() {
                    let to = self.slot_position(i - 1).x;
                    self.current[i] = Vec2::new(lerp(start[i].x, to, progress), start[i].y);
                }
                if progress >= 1.0 {
                    // Commit point: the splice waits for the slide to finish
                    self.items.remove(index);
                    self.relayout();
                    self.settle();
                    (SeqAnim::Idle, Step::Complete)
                } else {
                    (
                        SeqAnim::Remove {
                            index,
                            start,
                            progress,
                        },
                        Step::Running,
                    )
                }
            }
            SeqAnim::Search {
                value,
                cursor,
                dwell,
                found,
            } => self.tick_search(value, cursor, dwell, found),
            SeqAnim::Update {
                index,
                old,
                new,
                progress,
            } => {
                let progress = advance(progress, self.speed * self.style.update_rate);
                // Commit point: the value swaps halfway through the crossfade
                if progress >= 0.5 && self.items[index] != new {
                    self.items[index] = new.clone();
                }
                if progress >= 1.0 {
                    self.settle();
                    (SeqAnim::Idle, Step::Complete)
                } else {
                    (
                        SeqAnim::Update {
                            index,
                            old,
                            new,
                            progress,
                        },
                        Step::Running,
                    )
                }
            }
        };
        self.anim = next;
        step
    }

    fn tick_search(
        &mut self,
        value: T,
        mut cursor: usize,
        mut dwell: f32,
        found: Option<(usize, Hold)>,
    ) -> (SeqAnim<T>, Step) {
        if let Some((index, mut hold)) = found {
            let done = hold.tick();
            self.highlights.only(index, Tone::Found);
            self.highlights.decay(index, self.speed * 0.5);
            self.current[index].y = self.targets[index].y - FOUND_LIFT;

            if done {
                self.last_search = Some(SearchOutcome::Found(index));
                self.settle();
                return (SeqAnim::Idle, Step::Complete);
            }
            let found = Some((index, hold));
            return (
                SeqAnim::Search {
                    value,
                    cursor,
                    dwell,
                    found,
                },
                Step::Running,
            );
        }

        if cursor >= self.items.len() {
            debug!(?value, "sequence search exhausted");
            self.last_search = Some(SearchOutcome::NotFound);
            self.settle();
            return (SeqAnim::Idle, Step::Complete);
        }

        self.highlights.only(cursor, Tone::Searching);
        dwell = advance(dwell, self.speed);
        let mut found = None;
        if dwell >= 1.0 {
            if self.items[cursor] == value {
                self.highlights.only(cursor, Tone::Found);
                self.highlights.set_effect(cursor, 1.0);
                self.current[cursor].y = self.targets[cursor].y - FOUND_LIFT;
                found = Some((cursor, Hold::new(SEARCH_HOLD_SECS)));
            } else {
                cursor += 1;
                dwell = 0.0;
            }
        }
        (
            SeqAnim::Search {
                value,
                cursor,
                dwell,
                found,
            },
            Step::Running,
        )
    }

    /// Snap every cell to its slot and drop all transient state
    fn settle(&mut self) {
        self.current = self.targets.clone();
        self.highlights.clear();
        self.active = None;
    }
}

impl<T> Controller for SequenceController<T>
where
    T: Clone + PartialEq + fmt::Debug + fmt::Display,
{
    type Op = SeqOp<T>;

    fn step(&mut self, op: &SeqOp<T>) -> VizResult<Step> {
        ensure_same(&self.active, op)?;
        if self.active.is_none() {
            return Ok(self.begin(op));
        }
        Ok(self.tick())
    }

    fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    fn progress(&self) -> f32 {
        match &self.anim {
            SeqAnim::Idle => 0.0,
            SeqAnim::Insert { progress, .. }
            | SeqAnim::Remove { progress, .. }
            | SeqAnim::Update { progress, .. } => *progress,
            SeqAnim::Search {
                cursor,
                dwell,
                found,
                ..
            } => {
                let len = self.items.len().max(1) as f32;
                let scanned = ((*cursor as f32 + dwell) / len).clamp(0.0, 1.0);
                match found {
                    Some((_, hold)) => scanned + (1.0 - scanned) * hold.fraction(),
                    None => scanned,
                }
            }
        }
    }

    fn speed(&self) -> f32 {
        self.speed
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = clamp_speed(speed);
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn scene(&self) -> Scene {
        let size = Vec2::new(self.style.cell_width, CELL_HEIGHT);
        let updating = match &self.anim {
            SeqAnim::Update { index, .. } => Some(*index),
            _ => None,
        };

        let mut scene = Scene::default();
        for (i, item) in self.items.iter().enumerate() {
            if updating == Some(i) {
                continue;
            }
            let mark = self.highlights.get(i);
            let lift = mark.map(|m| bounce_offset(m.effect)).unwrap_or(0.0);
            let pos = self.current[i] + Vec2::new(0.0, lift);
            scene.sprites.push(
                Sprite::new(item.to_string(), pos, size)
                    .tone(mark.map(|m| m.tone).unwrap_or_default())
                    .caption(i.to_string()),
            );
        }

        if let SeqAnim::Update {
            index,
            old,
            new,
            progress,
        } = &self.anim
        {
            let slot = self.targets[*index];
            let outgoing = slot + Vec2::new(0.0, DROP_HEIGHT * progress);
            let incoming = slot - Vec2::new(0.0, DROP_HEIGHT * (1.0 - progress));
            scene.sprites.push(
                Sprite::new(old.to_string(), outgoing, size)
                    .tone(Tone::Removing)
                    .caption(index.to_string()),
            );
            scene
                .sprites
                .push(Sprite::new(new.to_string(), incoming, size).tone(Tone::Inserting));
        }
        scene
    }
}
