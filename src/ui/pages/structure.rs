use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, LineGauge, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::ui::scene;
use crate::ui::theme::Theme;
use crate::workbench::Snapshot;

/// Render the active structure: animated canvas above, logical value below
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(8),    // Canvas
            Constraint::Length(5), // Value panel
        ])
        .split(area);

    let canvas_block = Block::default()
        .title(Span::styled(
            format!(" {} ", app.active.title()),
            theme.style_accent_bold(),
        ))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(if app.is_busy() {
            theme.style_accent()
        } else {
            theme.style_border()
        });

    let view = app.bench.scene(app.active);
    scene::render(f, &view, theme, app.show_indices, canvas_block, chunks[0]);

    render_value_panel(f, app, chunks[1]);
}

fn render_value_panel(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let block = Block::default()
        .title(Span::styled(" Value ", theme.style_accent()))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(theme.style_border());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    let snapshot = app.bench.snapshot(app.active);
    f.render_widget(Paragraph::new(value_line(&snapshot, theme)), rows[0]);

    let report = app.last_report.as_deref().unwrap_or("");
    f.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("last  ", theme.style_dim()),
            Span::styled(report, theme.style_default()),
        ])),
        rows[1],
    );

    let progress = if app.is_busy() {
        f64::from(app.bench.progress(app.active)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let gauge = LineGauge::default()
        .filled_style(theme.style_accent())
        .unfilled_style(theme.style_dim())
        .line_set(symbols::line::THICK)
        .label(Span::styled("step  ", theme.style_dim()))
        .ratio(progress);
    f.render_widget(gauge, rows[2]);
}

fn join(values: &[i32]) -> String {
    let parts: Vec<String> = values.iter().map(i32::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn opt(value: Option<i32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// One-line summary of a structure's logical value
pub fn summary(snapshot: &Snapshot) -> String {
    match snapshot {
        Snapshot::Array { values } => join(values),
        Snapshot::String { text } => format!("\"{text}\" (length {})", text.chars().count()),
        Snapshot::LinkedList { values, head, tail } => {
            format!("{}  head {}  tail {}", join(values), opt(*head), opt(*tail))
        }
        Snapshot::Stack { values, top } => format!("{}  top {}", join(values), opt(*top)),
        Snapshot::Queue {
            values,
            front,
            rear,
        } => format!("{}  front {}  rear {}", join(values), opt(*front), opt(*rear)),
        Snapshot::Tree {
            root,
            inorder,
            height,
            ..
        } => format!("inorder {}  root {}  height {height}", join(inorder), opt(*root)),
    }
}

fn value_line<'a>(snapshot: &Snapshot, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled("value ", theme.style_dim()),
        Span::styled(summary(snapshot), theme.style_default()),
    ])
}
