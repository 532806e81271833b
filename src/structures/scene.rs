//! Read model handed to the renderer each frame.
//!
//! Positions are layout units with y growing downward; one unit maps to one
//! terminal cell at the default zoom.

use glam::Vec2;
use serde::Serialize;

/// Visual emphasis class of a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum Tone {
    #[default]
    Idle,
    Inserting,
    Removing,
    Searching,
    Found,
    Visiting,
}

/// One drawable box: a cell, node, or floating element in flight
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    pub label: String,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub tone: Tone,
    /// Small text drawn under the box (index, position)
    pub caption: Option<String>,
    /// 0 is fully visible, 1 is fully faded out
    pub fade: f32,
}

impl Sprite {
    pub fn new(label: impl Into<String>, pos: Vec2, size: Vec2) -> Self {
        Self {
            label: label.into(),
            pos,
            size,
            tone: Tone::Idle,
            caption: None,
            fade: 0.0,
        }
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn fade(mut self, fade: f32) -> Self {
        self.fade = fade.clamp(0.0, 1.0);
        self
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }
}

/// A straight connector: tree edge, list arrow, or container wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: Vec2,
    pub to: Vec2,
    pub arrow: bool,
}

impl Link {
    pub fn line(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            to,
            arrow: false,
        }
    }

    pub fn arrow(from: Vec2, to: Vec2) -> Self {
        Self {
            from,
            to,
            arrow: true,
        }
    }
}

/// Everything the renderer needs for one structure on one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub sprites: Vec<Sprite>,
    pub links: Vec<Link>,
}

impl Scene {
    /// Axis-aligned bounds of all sprites and links as (min, max)
    pub fn bounds(&self) -> Option<(Vec2, Vec2)> {
        let points = self
            .sprites
            .iter()
            .flat_map(|s| [s.pos, s.pos + s.size])
            .chain(self.links.iter().flat_map(|l| [l.from, l.to]));

        points.fold(None, |acc, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
    }

    pub fn find(&self, label: &str) -> Option<&Sprite> {
        self.sprites.iter().find(|s| s.label == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_cover_sprites_and_links() {
        let scene = Scene {
            sprites: vec![Sprite::new("1", Vec2::new(2.0, 3.0), Vec2::new(4.0, 3.0))],
            links: vec![Link::line(Vec2::new(-1.0, 0.0), Vec2::new(0.0, 10.0))],
        };
        let (lo, hi) = scene.bounds().unwrap();
        assert_eq!(lo, Vec2::new(-1.0, 0.0));
        assert_eq!(hi, Vec2::new(6.0, 10.0));
    }

    #[test]
    fn test_empty_scene_has_no_bounds() {
        assert!(Scene::default().bounds().is_none());
    }
}
