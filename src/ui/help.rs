use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::command;

/// Keybinding entries: (key, description)
const KEYBINDINGS: &[(&str, &str)] = &[
    ("Tab / S-Tab", "Next / previous structure"),
    ("1 - 6", "Jump to structure"),
    ("Enter / i", "Type a command"),
    ("↑ / ↓", "Command history (in prompt)"),
    ("+ / -", "Faster / slower"),
    ("n", "Toggle index captions"),
    ("Esc", "Close dialog / cancel"),
    ("?", "Toggle this help"),
    ("q", "Quit"),
];

/// Render the help overlay: keybindings plus the active structure's commands
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = &app.theme;
    let usage = command::usage(app.active);
    let rows = KEYBINDINGS.len() + usage.len() + 8;
    let width = 56_u16.min(area.width.saturating_sub(4));
    let height = (rows as u16).min(area.height.saturating_sub(2));

    let dialog = super::centered_rect_fixed(width, height, area);
    frame.render_widget(Clear, dialog);

    let block = Block::default()
        .title(Span::styled(" Keybindings ", t.style_accent_bold()))
        .borders(Borders::ALL)
        .border_type(t.border_type)
        .border_style(t.style_accent())
        .style(t.style_default());

    let mut lines: Vec<Line> = vec![Line::from("")];

    for (key, desc) in KEYBINDINGS {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<14}"), t.style_key_hint()),
            Span::styled(*desc, t.style_default()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("  {} commands", app.active.title()),
        t.style_accent_bold(),
    )));
    for form in usage {
        lines.push(Line::from(Span::styled(format!("    {form}"), t.style_default())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  Press ", t.style_dim()),
        Span::styled("?", t.style_key_hint()),
        Span::styled(" or ", t.style_dim()),
        Span::styled("Esc", t.style_key_hint()),
        Span::styled(" to close", t.style_dim()),
    ]));

    let para = Paragraph::new(lines).block(block);
    frame.render_widget(para, dialog);
}
