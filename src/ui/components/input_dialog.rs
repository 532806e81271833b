use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use crate::ui::theme::Theme;

/// How many submitted commands are remembered for ↑/↓ recall
const HISTORY_LIMIT: usize = 32;

/// Single-line command prompt. The cursor counts chars, not bytes.
#[derive(Debug, Clone, Default)]
pub struct InputDialog {
    pub title: String,
    pub prompt: String,
    pub input: String,
    pub cursor_pos: usize,
    pub visible: bool,
    history: Vec<String>,
    recall: Option<usize>,
}

impl InputDialog {
    pub fn new(title: &str, prompt: &str) -> Self {
        Self {
            title: title.to_string(),
            prompt: prompt.to_string(),
            ..Self::default()
        }
    }

    pub fn show(&mut self, title: &str, prompt: &str) {
        self.title = title.to_string();
        self.prompt = prompt.to_string();
        self.input.clear();
        self.cursor_pos = 0;
        self.recall = None;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.input.clear();
        self.cursor_pos = 0;
        self.recall = None;
    }

    fn byte_index(&self, pos: usize) -> usize {
        self.input
            .char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(self.input.len())
    }

    fn char_len(&self) -> usize {
        self.input.chars().count()
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_pos);
        self.input.insert(at, c);
        self.cursor_pos += 1;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_pos > 0 {
            self.cursor_pos -= 1;
            let at = self.byte_index(self.cursor_pos);
            self.input.remove(at);
        }
    }

    pub fn delete_forward(&mut self) {
        if self.cursor_pos < self.char_len() {
            let at = self.byte_index(self.cursor_pos);
            self.input.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor_pos < self.char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.char_len();
    }

    pub fn value(&self) -> &str {
        &self.input
    }

    /// Remember a submitted line; consecutive duplicates are collapsed
    pub fn remember(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || self.history.last().is_some_and(|last| last == line) {
            return;
        }
        self.history.push(line.to_string());
        if self.history.len() > HISTORY_LIMIT {
            self.history.remove(0);
        }
    }

    /// Step back through history (↑)
    pub fn recall_older(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.recall {
            None => self.history.len() - 1,
            Some(i) => i.saturating_sub(1),
        };
        self.load_recall(idx);
    }

    /// Step forward through history (↓); past the newest entry clears the line
    pub fn recall_newer(&mut self) {
        match self.recall {
            Some(i) if i + 1 < self.history.len() => self.load_recall(i + 1),
            Some(_) => {
                self.recall = None;
                self.input.clear();
                self.cursor_pos = 0;
            }
            None => {}
        }
    }

    fn load_recall(&mut self, idx: usize) {
        self.recall = Some(idx);
        self.input = self.history[idx].clone();
        self.cursor_pos = self.char_len();
    }

    pub fn render(&self, f: &mut Frame, theme: &Theme) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 7, f.area());

        // Clear background
        f.render_widget(Clear, area);

        let block = Block::default()
            .title(Span::styled(format!(" {} ", self.title), theme.style_accent_bold()))
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(theme.style_accent());

        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        let prompt = Paragraph::new(Line::from(Span::styled(&self.prompt, theme.style_dim())));
        f.render_widget(prompt, chunks[0]);

        let input_line = Line::from(vec![
            Span::styled("❯ ", theme.style_accent()),
            Span::styled(self.input.as_str(), theme.style_default()),
        ]);
        f.render_widget(Paragraph::new(input_line), chunks[1]);

        // Wide glyphs take two columns
        let before: String = self.input.chars().take(self.cursor_pos).collect();
        let cursor_x = chunks[1].x + 2 + before.width() as u16;
        f.set_cursor_position((cursor_x.min(chunks[1].right()), chunks[1].y));

        let hint = Paragraph::new(Line::from(Span::styled(
            "Enter to run │ ↑↓ history │ Esc to cancel",
            theme.style_dim(),
        )))
        .alignment(Alignment::Center);
        f.render_widget(hint, chunks[2]);
    }
}

/// Create a centered rectangle of given percentage width and fixed height
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputDialog {
        let mut dialog = InputDialog::new("Array", "insert <index> <value>");
        dialog.show("Array", "insert <index> <value>");
        text.chars().for_each(|c| dialog.insert_char(c));
        dialog
    }

    #[test]
    fn test_editing_is_char_based() {
        let mut dialog = typed("insert 0 é");
        assert_eq!(dialog.cursor_pos, 10);
        dialog.move_left();
        dialog.insert_char('x');
        assert_eq!(dialog.value(), "insert 0 xé");
        dialog.move_end();
        dialog.delete_char();
        assert_eq!(dialog.value(), "insert 0 x");
        dialog.move_start();
        dialog.delete_forward();
        assert_eq!(dialog.value(), "nsert 0 x");
    }

    #[test]
    fn test_hide_clears_input() {
        let mut dialog = typed("pop");
        dialog.hide();
        assert!(!dialog.visible);
        assert_eq!(dialog.value(), "");
        assert_eq!(dialog.cursor_pos, 0);
    }

    #[test]
    fn test_history_recall() {
        let mut dialog = typed("");
        dialog.remember("push 1");
        dialog.remember("push 1");
        dialog.remember("pop");
        dialog.recall_older();
        assert_eq!(dialog.value(), "pop");
        dialog.recall_older();
        assert_eq!(dialog.value(), "push 1");
        dialog.recall_older();
        assert_eq!(dialog.value(), "push 1");
        dialog.recall_newer();
        assert_eq!(dialog.value(), "pop");
        dialog.recall_newer();
        assert_eq!(dialog.value(), "");
    }
}
