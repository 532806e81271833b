use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Tabs as RataTabs};
use ratatui::Frame;

use crate::ui::theme::Theme;
use crate::workbench::StructureKind;

/// Render the top navigation tab bar, one tab per structure
pub fn render(f: &mut Frame, active: StructureKind, theme: &Theme, area: Rect) {
    let titles: Vec<Line> = StructureKind::ALL
        .iter()
        .enumerate()
        .map(|(i, kind)| {
            let style = if *kind == active {
                theme.style_tab_active()
            } else {
                theme.style_tab_inactive()
            };
            Line::from(vec![
                Span::styled(format!("{}", i + 1), style.add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {} ", kind.title()), style),
            ])
        })
        .collect();

    let tabs = RataTabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(theme.style_border())
                .title(Span::styled(" dsviz ", theme.style_accent_bold())),
        )
        .select(active.index())
        .highlight_style(theme.style_tab_active())
        .divider(Span::styled(" │ ", theme.style_border()));

    f.render_widget(tabs, area);
}
