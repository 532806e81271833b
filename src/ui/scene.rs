//! Draws a [`Scene`] onto a ratatui canvas.
//!
//! Layout units map one-to-one onto terminal cells whenever the scene fits;
//! larger scenes are scaled down to fit. Scene y grows downward while canvas
//! y grows upward, so every y is negated on the way in.

use glam::Vec2;
use ratatui::layout::Rect;
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Context, Line as Segment, Rectangle};
use ratatui::widgets::Block;
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::structures::{Link, Scene, Sprite};
use crate::ui::theme::{Theme, ARROW_HEAD};

/// Empty space kept right of and below the scene
const MARGIN: f32 = 2.0;

/// Canvas bounds for a scene drawn into `width` × `height` cells
pub fn viewport(scene: &Scene, width: u16, height: u16) -> ([f64; 2], [f64; 2]) {
    let hi = scene
        .bounds()
        .map(|(_, hi)| hi + Vec2::splat(MARGIN))
        .unwrap_or(Vec2::ZERO);
    let span_x = f64::from(width).max(f64::from(hi.x));
    let span_y = f64::from(height).max(f64::from(hi.y));
    ([0.0, span_x], [-span_y, 0.0])
}

fn flip(p: Vec2) -> (f64, f64) {
    (f64::from(p.x), -f64::from(p.y))
}

pub fn render(
    f: &mut Frame,
    scene: &Scene,
    theme: &Theme,
    show_captions: bool,
    block: Block,
    area: Rect,
) {
    let inner = block.inner(area);
    let (x_bounds, y_bounds) = viewport(scene, inner.width, inner.height);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            for link in &scene.links {
                draw_link(ctx, link, theme);
            }
            // Text goes on a layer above the lines
            ctx.layer();
            for sprite in scene.sprites.iter().filter(|s| s.fade < 1.0) {
                draw_sprite(ctx, sprite, theme, show_captions);
            }
        });

    f.render_widget(canvas, area);
}

fn draw_link(ctx: &mut Context, link: &Link, theme: &Theme) {
    let (x1, y1) = flip(link.from);
    let (x2, y2) = flip(link.to);
    ctx.draw(&Segment {
        x1,
        y1,
        x2,
        y2,
        color: theme.border,
    });
    if !link.arrow {
        return;
    }
    let dir = link.to - link.from;
    let head = if dir.x.abs() >= dir.y.abs() {
        if dir.x >= 0.0 {
            ARROW_HEAD
        } else {
            "◀"
        }
    } else if dir.y >= 0.0 {
        "▼"
    } else {
        "▲"
    };
    let tip = link.to - dir.normalize_or_zero();
    let (x, y) = flip(tip);
    ctx.print(x, y, Span::styled(head, theme.style_dim()));
}

fn draw_sprite(ctx: &mut Context, sprite: &Sprite, theme: &Theme, show_captions: bool) {
    let style = theme.style_tone(sprite.tone, sprite.fade);
    let color = style.fg.unwrap_or(theme.fg);

    let (x, y) = flip(sprite.pos + Vec2::new(0.0, sprite.size.y));
    ctx.draw(&Rectangle {
        x,
        y,
        width: f64::from(sprite.size.x),
        height: f64::from(sprite.size.y),
        color,
    });

    let center = sprite.center();
    let label_width = sprite.label.width() as f32;
    let (lx, ly) = flip(Vec2::new(center.x - label_width / 2.0, center.y));
    ctx.print(lx, ly, Line::from(Span::styled(sprite.label.clone(), style)));

    if show_captions {
        if let Some(caption) = &sprite.caption {
            let below = Vec2::new(
                center.x - caption.width() as f32 / 2.0,
                sprite.pos.y + sprite.size.y + 1.0,
            );
            let (cx, cy) = flip(below);
            ctx.print(cx, cy, Span::styled(caption.clone(), theme.style_dim()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_to(x: f32, y: f32) -> Scene {
        Scene {
            sprites: vec![Sprite::new("7", Vec2::new(2.0, 2.0), Vec2::new(x - 2.0, y - 2.0))],
            links: Vec::new(),
        }
    }

    #[test]
    fn test_small_scene_maps_cells_one_to_one() {
        let (x, y) = viewport(&scene_to(20.0, 10.0), 80, 24);
        assert_eq!(x, [0.0, 80.0]);
        assert_eq!(y, [-24.0, 0.0]);
    }

    #[test]
    fn test_wide_scene_is_scaled_down() {
        let (x, y) = viewport(&scene_to(100.0, 10.0), 80, 24);
        assert_eq!(x, [0.0, 102.0]);
        assert_eq!(y, [-24.0, 0.0]);
    }

    #[test]
    fn test_empty_scene_uses_area() {
        let (x, _) = viewport(&Scene::default(), 40, 10);
        assert_eq!(x, [0.0, 40.0]);
    }

    #[test]
    fn test_flip_negates_y() {
        assert_eq!(flip(Vec2::new(3.0, 4.0)), (3.0, -4.0));
    }
}
