pub mod components;
pub mod help;
pub mod pages;
pub mod scene;
pub mod theme;

use ratatui::layout::Rect;
use ratatui::Frame;

use crate::app::App;

/// Top-level draw function
pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();
    pages::render(f, app, area);
}

/// A `width` × `height` rectangle centered in `area`, clipped to it
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_centered_rect_fixed() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect_fixed(40, 10, area), Rect::new(20, 7, 40, 10));
        assert_eq!(centered_rect_fixed(100, 50, area), area);
    }

    fn rendered_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_draw_shows_tabs_and_values() {
        let app = App::new(&Config::default());
        let text = rendered_text(&app);
        assert!(text.contains("Linked List"));
        assert!(text.contains("[10, 20, 30, 40, 50]"));
        assert!(text.contains("idle"));
    }

    #[test]
    fn test_draw_every_structure_mid_animation() {
        let mut app = App::new(&Config::default());
        let commands = ["insert 1 7", "insert 0 ab", "at 2 5", "push 1", "dequeue", "delete 60"];
        for (kind, line) in crate::workbench::StructureKind::ALL.into_iter().zip(commands) {
            app.active = kind;
            app.submit(line);
            for _ in 0..5 {
                app.on_tick();
            }
            assert!(app.pending.is_some(), "{kind} finished too early");
            let _ = rendered_text(&app);
            for _ in 0..10_000 {
                if app.pending.is_none() {
                    break;
                }
                app.on_tick();
            }
            assert!(app.pending.is_none());
        }
    }

    #[test]
    fn test_help_overlay_lists_commands() {
        let mut app = App::new(&Config::default());
        app.mode = crate::app::Mode::Help;
        let text = rendered_text(&app);
        assert!(text.contains("Keybindings"));
        assert!(text.contains("insert <index> <value>"));
    }
}
