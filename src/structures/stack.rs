//! LIFO stack drawn as an open-topped container.

use glam::Vec2;
use tracing::debug;

use super::scene::{Link, Scene, Sprite, Tone};
use super::{ensure_same, Controller, Step, CELL_HEIGHT, CELL_WIDTH, DROP_HEIGHT};
use crate::animation::{
    advance, approach, clamp_speed, ease_out_quad, lerp, Highlights, Hold, DEFAULT_SPEED,
};
use crate::error::VizResult;

/// Slots drawn inside the container walls
const CONTAINER_SLOTS: usize = 8;

/// Speed multiplier for push and pop
const MOVE_RATE: f32 = 0.5;

/// Speed multiplier for the peek slide
const PEEK_RATE: f32 = 2.0;

/// How far a peeked element rises out of the stack
const PEEK_LIFT: f32 = 2.0;

/// How long a peeked element stays raised, in seconds
pub const PEEK_HOLD_SECS: f32 = 2.0;

/// How far a popped element travels upward before it disappears
const POP_RISE: f32 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOp {
    Push { value: i32 },
    Pop,
    Peek,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum PeekPhase {
    Rise { progress: f32 },
    Hold(Hold),
    Return { progress: f32 },
}

#[derive(Debug, Clone, Copy, Default)]
enum StackAnim {
    #[default]
    Idle,
    Push {
        value: i32,
        pos: Vec2,
        progress: f32,
    },
    Pop {
        value: i32,
        from: Vec2,
        pos: Vec2,
        progress: f32,
    },
    Peek {
        value: i32,
        origin: Vec2,
        pos: Vec2,
        phase: PeekPhase,
    },
}

#[derive(Debug, Clone)]
pub struct StackController {
    items: Vec<i32>,
    origin: Vec2,
    speed: f32,
    anim: StackAnim,
    active: Option<StackOp>,
    /// Slot index of the element in flight; the peek lift lives in its effect
    highlights: Highlights<usize>,
    last_peek: Option<i32>,
}

impl StackController {
    pub fn new(values: Vec<i32>) -> Self {
        Self {
            items: values,
            origin: Vec2::new(4.0, 2.0),
            speed: DEFAULT_SPEED,
            anim: StackAnim::Idle,
            active: None,
            highlights: Highlights::new(),
            last_peek: None,
        }
    }

    /// Bottom to top
    pub fn items(&self) -> &[i32] {
        &self.items
    }

    pub fn top(&self) -> Option<i32> {
        self.items.last().copied()
    }

    /// Value shown by the most recent completed peek
    pub fn last_peek(&self) -> Option<i32> {
        self.last_peek
    }

    pub fn highlights(&self) -> &Highlights<usize> {
        &self.highlights
    }

    /// Position and value of the element currently in flight, if any
    pub fn floating(&self) -> Option<(i32, Vec2)> {
        match self.anim {
            StackAnim::Idle => None,
            StackAnim::Push { value, pos, .. }
            | StackAnim::Pop { value, pos, .. }
            | StackAnim::Peek { value, pos, .. } => Some((value, pos)),
        }
    }

    pub fn push(&mut self, value: i32) -> VizResult<Step> {
        self.step(&StackOp::Push { value })
    }

    pub fn pop(&mut self) -> VizResult<Step> {
        self.step(&StackOp::Pop)
    }

    pub fn peek(&mut self) -> VizResult<Step> {
        self.step(&StackOp::Peek)
    }

    fn floor(&self) -> f32 {
        self.origin.y + DROP_HEIGHT + CONTAINER_SLOTS as f32 * CELL_HEIGHT
    }

    fn container_top(&self) -> f32 {
        self.floor() - CONTAINER_SLOTS as f32 * CELL_HEIGHT
    }

    pub fn slot_position(&self, index: usize) -> Vec2 {
        Vec2::new(self.origin.x, self.floor() - (index + 1) as f32 * CELL_HEIGHT)
    }

    /// Slot the floating element belongs to: the incoming slot on push, else the top
    fn flight_slot(&self) -> usize {
        match self.anim {
            StackAnim::Push { .. } => self.items.len(),
            _ => self.items.len().saturating_sub(1),
        }
    }

    fn begin(&mut self, op: &StackOp) -> Step {
        let top = self.items.len().saturating_sub(1);
        self.anim = match (*op, self.top()) {
            (StackOp::Push { value }, _) => {
                self.highlights.only(self.items.len(), Tone::Inserting);
                StackAnim::Push {
                    value,
                    pos: Vec2::new(self.origin.x, self.container_top() - CELL_HEIGHT),
                    progress: 0.0,
                }
            }
            (StackOp::Pop, Some(value)) => {
                self.highlights.only(top, Tone::Removing);
                let from = self.slot_position(top);
                StackAnim::Pop {
                    value,
                    from,
                    pos: from,
                    progress: 0.0,
                }
            }
            (StackOp::Peek, Some(value)) => {
                self.highlights.only(top, Tone::Found);
                let origin = self.slot_position(top);
                StackAnim::Peek {
                    value,
                    origin,
                    pos: origin,
                    phase: PeekPhase::Rise { progress: 0.0 },
                }
            }
            (StackOp::Pop | StackOp::Peek, None) => {
                debug!(?op, "stack is empty, nothing to do");
                return Step::Complete;
            }
        };
        debug!(?op, depth = self.items.len(), "stack animation started");
        self.active = Some(*op);
        Step::Running
    }

    fn tick(&mut self) -> Step {
        let rate = self.speed * MOVE_RATE;
        let next = match self.anim {
            StackAnim::Idle => None,
            StackAnim::Push {
                value,
                pos,
                progress,
            } => {
                let progress = advance(progress, rate);
                let target = self.slot_position(self.items.len());
                let pos = approach(pos, target, progress);
                if progress >= 1.0 {
                    // Commit point: the value joins the stack once it lands
                    self.items.push(value);
                    None
                } else {
                    Some(StackAnim::Push {
                        value,
                        pos,
                        progress,
                    })
                }
            }
            StackAnim::Pop {
                value,
                from,
                progress,
                ..
            } => {
                let progress = advance(progress, rate);
                let pos = Vec2::new(from.x, lerp(from.y, from.y - POP_RISE, progress));
                if progress >= 1.0 {
                    // Commit point: removed only after it has left the container
                    self.items.pop();
                    None
                } else {
                    Some(StackAnim::Pop {
                        value,
                        from,
                        pos,
                        progress,
                    })
                }
            }
            StackAnim::Peek {
                value,
                origin,
                phase,
                ..
            } => {
                let peek_rate = self.speed * PEEK_RATE;
                let top = self.items.len().saturating_sub(1);
                // Lift is stored as a fraction of PEEK_LIFT on the top's mark
                let phase = match phase {
                    PeekPhase::Rise { progress } => {
                        let progress = advance(progress, peek_rate);
                        self.highlights.set_effect(top, ease_out_quad(progress));
                        if progress >= 1.0 {
                            Some(PeekPhase::Hold(Hold::new(PEEK_HOLD_SECS)))
                        } else {
                            Some(PeekPhase::Rise { progress })
                        }
                    }
                    PeekPhase::Hold(mut hold) => {
                        self.highlights.set_effect(top, 1.0);
                        if hold.tick() {
                            Some(PeekPhase::Return { progress: 0.0 })
                        } else {
                            Some(PeekPhase::Hold(hold))
                        }
                    }
                    PeekPhase::Return { progress } => {
                        let progress = advance(progress, peek_rate);
                        self.highlights.set_effect(top, 1.0 - progress);
                        if progress >= 1.0 {
                            self.last_peek = Some(value);
                            None
                        } else {
                            Some(PeekPhase::Return { progress })
                        }
                    }
                };
                let lift = PEEK_LIFT * self.highlights.effect(top);
                phase.map(|phase| StackAnim::Peek {
                    value,
                    origin,
                    pos: origin - Vec2::new(0.0, lift),
                    phase,
                })
            }
        };

        match next {
            Some(anim) => {
                self.anim = anim;
                Step::Running
            }
            None => {
                self.anim = StackAnim::Idle;
                self.active = None;
                self.highlights.clear();
                Step::Complete
            }
        }
    }
}

impl Controller for StackController {
    type Op = StackOp;

    fn step(&mut self, op: &StackOp) -> VizResult<Step> {
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
            StackAnim::Idle => 0.0,
            StackAnim::Push { progress, .. } | StackAnim::Pop { progress, .. } => progress,
            StackAnim::Peek { phase, .. } => match phase {
                PeekPhase::Rise { progress } => progress / 3.0,
                PeekPhase::Hold(hold) => (1.0 + hold.fraction()) / 3.0,
                PeekPhase::Return { progress } => (2.0 + progress) / 3.0,
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

        let left = self.origin.x - 1.0;
        let right = self.origin.x + CELL_WIDTH + 1.0;
        let (top, floor) = (self.container_top(), self.floor());
        scene.links.push(Link::line(Vec2::new(left, top), Vec2::new(left, floor)));
        scene.links.push(Link::line(Vec2::new(left, floor), Vec2::new(right, floor)));
        scene.links.push(Link::line(Vec2::new(right, floor), Vec2::new(right, top)));

        // The top element is drawn as the floating sprite while it is in flight
        let hidden_top = matches!(self.anim, StackAnim::Pop { .. } | StackAnim::Peek { .. });
        let shown = if hidden_top {
            self.items.len().saturating_sub(1)
        } else {
            self.items.len()
        };
        for (i, value) in self.items.iter().take(shown).enumerate() {
            let tone = self.highlights.tone(i).unwrap_or(Tone::Idle);
            let mut sprite = Sprite::new(value.to_string(), self.slot_position(i), size).tone(tone);
            if i + 1 == self.items.len() {
                sprite = sprite.caption("top");
            }
            scene.sprites.push(sprite);
        }

        if let Some((value, pos)) = self.floating() {
            let tone = self.highlights.tone(self.flight_slot()).unwrap_or(Tone::Idle);
            scene
                .sprites
                .push(Sprite::new(value.to_string(), pos, size).tone(tone));
        }
        scene
    }
}
