pub mod structure;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};
use crate::ui::theme::{Theme, ICON_ERROR, ICON_OK};
use crate::ui::{components, help};

/// Render the full screen: tabs + structure page + status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Structure page
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    components::tabs::render(f, app.active, &app.theme, chunks[0]);
    structure::render(f, app, chunks[1]);
    components::status_bar::render(f, app, &app.theme, chunks[2]);

    // Overlays
    app.input_dialog.render(f, &app.theme);
    if app.mode == Mode::Help {
        help::render(f, app, area);
    }

    if let Some(ref msg) = app.toast_message {
        render_toast(f, msg, app.toast_is_error, &app.theme);
    }
}

/// Render a temporary toast notification at the top-right
fn render_toast(f: &mut Frame, message: &str, is_error: bool, theme: &Theme) {
    let area = f.area();
    let width = (message.width() as u16 + 6).min(area.width.saturating_sub(4));
    let x = area.width.saturating_sub(width + 2);
    let toast_area = Rect::new(x, 1, width, 3).intersection(area);

    f.render_widget(Clear, toast_area);

    let (style, icon) = if is_error {
        (theme.style_error(), ICON_ERROR)
    } else {
        (theme.style_success(), ICON_OK)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(style);

    let text = Paragraph::new(Line::from(vec![
        Span::styled(icon, style),
        Span::styled(message, theme.style_default()),
    ]))
    .block(block);

    f.render_widget(text, toast_area);
}
