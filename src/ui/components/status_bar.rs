use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::animation::spinner::spinner_frame;
use crate::app::{App, Mode};
use crate::ui::theme::{Theme, ICON_IDLE};

/// Render the bottom status bar with contextual keybindings and animation state
pub fn render(f: &mut Frame, app: &App, theme: &Theme, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    // Left: keybindings
    let key_spans: Vec<Span> = keybindings(app.mode)
        .iter()
        .flat_map(|(key, desc)| {
            [
                Span::styled(format!(" {key} "), theme.style_key_hint()),
                Span::styled(format!("{desc} "), theme.style_key_desc()),
                Span::styled("│", theme.style_border()),
            ]
        })
        .collect();
    f.render_widget(Paragraph::new(Line::from(key_spans)), chunks[0]);

    // Right: busy indicator, progress, speed
    let state = if app.is_busy() {
        let progress = app.bench.progress(app.active) * 100.0;
        let name = app
            .pending
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        Span::styled(
            format!("{} {name} {progress:>3.0}% ", spinner_frame(app.tick_count)),
            theme.style_accent(),
        )
    } else {
        Span::styled(format!("{ICON_IDLE} idle "), theme.style_success())
    };

    let status_line = Line::from(vec![
        state,
        Span::styled("│", theme.style_border()),
        Span::styled(format!(" speed {:.3} ", app.bench.speed()), theme.style_dim()),
    ]);
    let status = Paragraph::new(status_line).alignment(Alignment::Right);
    f.render_widget(status, chunks[1]);
}

fn keybindings(mode: Mode) -> &'static [(&'static str, &'static str)] {
    match mode {
        Mode::Normal => &[
            ("q", "Quit"),
            ("Tab", "Next"),
            ("1-6", "Structure"),
            ("Enter", "Command"),
            ("+/-", "Speed"),
            ("?", "Help"),
        ],
        Mode::Input => &[("Enter", "Run"), ("↑↓", "History"), ("Esc", "Cancel")],
        Mode::Help => &[("?/Esc", "Close")],
    }
}
