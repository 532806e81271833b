//! FIFO queue laid out left to right, front first.

use std::collections::VecDeque;

use glam::Vec2;
use tracing::debug;

use super::scene::{Link, Scene, Sprite, Tone};
use super::{ensure_same, Controller, Step, CELL_HEIGHT, CELL_WIDTH};
use crate::animation::{
    advance, approach, clamp_speed, ease_out_quad, lerp, Highlights, Hold, DEFAULT_SPEED,
};
use crate::error::VizResult;

const GAP: f32 = 1.0;

/// Speed multiplier for enqueue and dequeue
const MOVE_RATE: f32 = 0.5;

/// Speed multiplier for the front slide
const FRONT_RATE: f32 = 2.0;

/// How far a dequeued element travels left before it disappears
const DEQUEUE_SLIDE: f32 = 2.0 * (CELL_WIDTH + GAP);

/// How far an enqueued element starts beyond the rear slot
const ENQUEUE_ENTRY: f32 = 3.0 * (CELL_WIDTH + GAP);

/// How far the front element slides out while being shown
const FRONT_SHIFT: f32 = 3.0;

/// How long the front element stays out, in seconds
pub const FRONT_HOLD_SECS: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueOp {
    Enqueue { value: i32 },
    Dequeue,
    Front,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FrontPhase {
    Out { progress: f32 },
    Hold(Hold),
    Back { progress: f32 },
}

#[derive(Debug, Clone, Copy, Default)]
enum QueueAnim {
    #[default]
    Idle,
    Enqueue {
        value: i32,
        pos: Vec2,
        progress: f32,
    },
    Dequeue {
        progress: f32,
    },
    Front {
        phase: FrontPhase,
    },
}

#[derive(Debug, Clone)]
pub struct QueueController {
    items: VecDeque<i32>,
    origin: Vec2,
    speed: f32,
    anim: QueueAnim,
    active: Option<QueueOp>,
    /// Slot index of the moving element; the front slide lives in its effect
    highlights: Highlights<usize>,
    last_front: Option<i32>,
}

impl QueueController {
    pub fn new(values: Vec<i32>) -> Self {
        Self {
            items: values.into(),
            origin: Vec2::new(2.0, 6.0),
            speed: DEFAULT_SPEED,
            anim: QueueAnim::Idle,
            active: None,
            highlights: Highlights::new(),
            last_front: None,
        }
    }

    /// Front to rear
    pub fn items(&self) -> Vec<i32> {
        self.items.iter().copied().collect()
    }

    pub fn front(&self) -> Option<i32> {
        self.items.front().copied()
    }

    pub fn rear(&self) -> Option<i32> {
        self.items.back().copied()
    }

    /// Value shown by the most recent completed front
    pub fn last_front(&self) -> Option<i32> {
        self.last_front
    }

    pub fn highlights(&self) -> &Highlights<usize> {
        &self.highlights
    }

    pub fn enqueue(&mut self, value: i32) -> VizResult<Step> {
        self.step(&QueueOp::Enqueue { value })
    }

    pub fn dequeue(&mut self) -> VizResult<Step> {
        self.step(&QueueOp::Dequeue)
    }

    pub fn peek_front(&mut self) -> VizResult<Step> {
        self.step(&QueueOp::Front)
    }

    pub fn slot_position(&self, index: usize) -> Vec2 {
        Vec2::new(
            self.origin.x + index as f32 * (CELL_WIDTH + GAP),
            self.origin.y,
        )
    }

    /// Interpolated position of every queued element, front first
    pub fn positions(&self) -> Vec<Vec2> {
        (0..self.items.len()).map(|i| self.position(i)).collect()
    }

    fn position(&self, index: usize) -> Vec2 {
        let slot = self.slot_position(index);
        match self.anim {
            QueueAnim::Dequeue { progress } if index == 0 => {
                Vec2::new(lerp(slot.x, slot.x - DEQUEUE_SLIDE, progress), slot.y)
            }
            QueueAnim::Dequeue { progress } => {
                let to = self.slot_position(index - 1).x;
                Vec2::new(lerp(slot.x, to, progress), slot.y)
            }
            QueueAnim::Front { .. } if index == 0 => {
                slot - Vec2::new(FRONT_SHIFT * self.highlights.effect(0), 0.0)
            }
            _ => slot,
        }
    }

    /// The element being enqueued, while it is still outside the queue
    pub fn incoming(&self) -> Option<(i32, Vec2)> {
        match self.anim {
            QueueAnim::Enqueue { value, pos, .. } => Some((value, pos)),
            _ => None,
        }
    }

    fn begin(&mut self, op: &QueueOp) -> Step {
        self.anim = match (*op, self.items.is_empty()) {
            (QueueOp::Enqueue { value }, _) => {
                let rear = self.items.len();
                self.highlights.only(rear, Tone::Inserting);
                QueueAnim::Enqueue {
                    value,
                    pos: self.slot_position(rear) + Vec2::new(ENQUEUE_ENTRY, 0.0),
                    progress: 0.0,
                }
            }
            (QueueOp::Dequeue, false) => {
                self.highlights.only(0, Tone::Removing);
                QueueAnim::Dequeue { progress: 0.0 }
            }
            (QueueOp::Front, false) => {
                self.highlights.only(0, Tone::Found);
                QueueAnim::Front {
                    phase: FrontPhase::Out { progress: 0.0 },
                }
            }
            (QueueOp::Dequeue | QueueOp::Front, true) => {
                debug!(?op, "queue is empty, nothing to do");
                return Step::Complete;
            }
        };
        debug!(?op, len = self.items.len(), "queue animation started");
        self.active = Some(*op);
        Step::Running
    }

    fn tick(&mut self) -> Step {
        let rate = self.speed * MOVE_RATE;
        let next = match self.anim {
            QueueAnim::Idle => None,
            QueueAnim::Enqueue {
                value,
                pos,
                progress,
            } => {
                let progress = advance(progress, rate);
                let pos = approach(pos, self.slot_position(self.items.len()), progress);
                if progress >= 1.0 {
                    // Commit point: joins the rear once it has arrived
                    self.items.push_back(value);
                    None
                } else {
                    Some(QueueAnim::Enqueue {
                        value,
                        pos,
                        progress,
                    })
                }
            }
            QueueAnim::Dequeue { progress } => {
                let progress = advance(progress, rate);
                if progress >= 1.0 {
                    // Commit point: the front leaves only after its slide
                    self.items.pop_front();
                    None
                } else {
                    Some(QueueAnim::Dequeue { progress })
                }
            }
            QueueAnim::Front { phase, .. } => {
                let front_rate = self.speed * FRONT_RATE;
                match phase {
                    FrontPhase::Out { progress } => {
                        let progress = advance(progress, front_rate);
                        self.highlights.set_effect(0, ease_out_quad(progress));
                        let phase = if progress >= 1.0 {
                            FrontPhase::Hold(Hold::new(FRONT_HOLD_SECS))
                        } else {
                            FrontPhase::Out { progress }
                        };
                        Some(QueueAnim::Front { phase })
                    }
                    FrontPhase::Hold(mut hold) => {
                        self.highlights.set_effect(0, 1.0);
                        let phase = if hold.tick() {
                            FrontPhase::Back { progress: 0.0 }
                        } else {
                            FrontPhase::Hold(hold)
                        };
                        Some(QueueAnim::Front { phase })
                    }
                    FrontPhase::Back { progress } => {
                        let progress = advance(progress, front_rate);
                        self.highlights.set_effect(0, 1.0 - progress);
                        if progress >= 1.0 {
                            self.last_front = self.front();
                            None
                        } else {
                            Some(QueueAnim::Front {
                                phase: FrontPhase::Back { progress },
                            })
                        }
                    }
                }
            }
        };

        match next {
            Some(anim) => {
                self.anim = anim;
                Step::Running
            }
            None => {
                self.anim = QueueAnim::Idle;
                self.active = None;
                self.highlights.clear();
                Step::Complete
            }
        }
    }
}

impl Controller for QueueController {
    type Op = QueueOp;

    fn step(&mut self, op: &QueueOp) -> VizResult<Step> {
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
        match self.anim {
            QueueAnim::Idle => 0.0,
            QueueAnim::Enqueue { progress, .. } | QueueAnim::Dequeue { progress } => progress,
            QueueAnim::Front { phase, .. } => match phase {
                FrontPhase::Out { progress } => progress / 3.0,
                FrontPhase::Hold(hold) => (1.0 + hold.fraction()) / 3.0,
                FrontPhase::Back { progress } => (2.0 + progress) / 3.0,
            },
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
        let size = Vec2::new(CELL_WIDTH, CELL_HEIGHT);
        let mut scene = Scene::default();

        // Rails above and below the queue body
        let left = self.origin.x - 1.0;
        let right = self.slot_position(self.items.len().max(1)).x;
        for y in [self.origin.y - 0.5, self.origin.y + CELL_HEIGHT + 0.5] {
            scene
                .links
                .push(Link::line(Vec2::new(left, y), Vec2::new(right, y)));
        }

        let last = self.items.len().saturating_sub(1);
        for (i, value) in self.items.iter().enumerate() {
            let tone = self.highlights.tone(i).unwrap_or(Tone::Idle);
            let mut sprite = Sprite::new(value.to_string(), self.position(i), size).tone(tone);
            if i == 0 {
                sprite = sprite.caption("front");
            } else if i == last {
                sprite = sprite.caption("rear");
            }
            scene.sprites.push(sprite);
        }

        if let Some((value, pos)) = self.incoming() {
            let tone = self.highlights.tone(self.items.len()).unwrap_or(Tone::Idle);
            scene
                .sprites
                .push(Sprite::new(value.to_string(), pos, size).tone(tone));
        }
        scene
    }
}
