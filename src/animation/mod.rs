//! Interpolation helpers and frame timing shared by every controller.
//!
//! Controllers are stepped once per rendered frame at a nominal 60 Hz, so
//! fixed-duration holds are counted in [`FRAME_SECS`] increments rather than
//! wall-clock time.

pub mod highlight;
pub mod spinner;

use glam::Vec2;

pub use highlight::{Highlights, Mark};

/// Nominal duration of one frame in seconds
pub const FRAME_SECS: f32 = 1.0 / 60.0;

/// Default per-frame progress rate
pub const DEFAULT_SPEED: f32 = 0.05;

/// Lower and upper bounds accepted for the speed setting
pub const MIN_SPEED: f32 = 0.005;
pub const MAX_SPEED: f32 = 1.0;

/// Peak height of the "found" bounce, in layout units
pub const BOUNCE_HEIGHT: f32 = 1.5;

/// Clamp a requested speed into the supported range
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        DEFAULT_SPEED
    } else {
        speed.clamp(MIN_SPEED, MAX_SPEED)
    }
}

/// Advance a progress scalar by `rate`, clamped to `[0, 1]`
pub fn advance(progress: f32, rate: f32) -> f32 {
    (progress + rate.max(0.0)).clamp(0.0, 1.0)
}

/// Linear interpolation
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

/// Linear interpolation of a 2D position
pub fn lerp_point(from: Vec2, to: Vec2, t: f32) -> Vec2 {
    from.lerp(to, t.clamp(0.0, 1.0))
}

/// Move `current` a fraction `factor` of the remaining way toward `target`.
/// At `factor >= 1` the target is reached exactly.
pub fn approach(current: Vec2, target: Vec2, factor: f32) -> Vec2 {
    current + (target - current) * factor.clamp(0.0, 1.0)
}

/// Quadratic ease-out: `1 - (1 - p)²`
pub fn ease_out_quad(p: f32) -> f32 {
    let inv = 1.0 - p.clamp(0.0, 1.0);
    1.0 - inv * inv
}

/// Vertical offset for a bounce scalar in `[0, 1]` (negative is up)
pub fn bounce_offset(bounce: f32) -> f32 {
    let b = bounce.clamp(0.0, 1.0);
    -BOUNCE_HEIGHT * b * b
}

/// A fixed-duration pause counted in frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hold {
    elapsed: f32,
    duration: f32,
}

impl Hold {
    pub fn new(duration_secs: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration: duration_secs.max(0.0),
        }
    }

    /// Count one frame. Returns true once the hold has run its full duration.
    pub fn tick(&mut self) -> bool {
        self.elapsed += FRAME_SECS;
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fraction of the hold already spent, in `[0, 1]`
    pub fn fraction(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Restart the countdown without changing the duration
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_clamps() {
        assert_eq!(advance(0.0, 0.25), 0.25);
        assert_eq!(advance(0.9, 0.25), 1.0);
        assert_eq!(advance(0.5, -1.0), 0.5);
    }

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 2.0), 20.0);
    }

    #[test]
    fn test_approach_reaches_target_at_one() {
        let target = Vec2::new(4.0, -2.0);
        assert_eq!(approach(Vec2::ZERO, target, 1.0), target);
        let halfway = approach(Vec2::ZERO, target, 0.5);
        assert_eq!(halfway, Vec2::new(2.0, -1.0));
    }

    #[test]
    fn test_ease_out_quad_shape() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert!(ease_out_quad(0.25) > 0.25);
    }

    #[test]
    fn test_hold_counts_frames() {
        let mut hold = Hold::new(0.1);
        let mut frames = 0;
        while !hold.tick() {
            frames += 1;
            assert!(frames < 100);
        }
        // 0.1 s at 60 Hz is six frames (allowing float rounding)
        assert!((5..=6).contains(&frames));
        assert_eq!(hold.fraction(), 1.0);
    }

    #[test]
    fn test_two_second_hold_is_about_120_frames() {
        let mut hold = Hold::new(2.0);
        let frames = (1..).take_while(|_| !hold.tick()).count() + 1;
        assert!((119..=121).contains(&frames));
    }

    #[test]
    fn test_clamp_speed() {
        assert_eq!(clamp_speed(0.0), MIN_SPEED);
        assert_eq!(clamp_speed(5.0), MAX_SPEED);
        assert_eq!(clamp_speed(f32::NAN), DEFAULT_SPEED);
    }
}
