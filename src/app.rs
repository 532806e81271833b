use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info, warn};

use crate::command;
use crate::config::Config;
use crate::event::Event;
use crate::structures::Step;
use crate::ui::components::input_dialog::InputDialog;
use crate::ui::theme::Theme;
use crate::workbench::{PendingOp, StructureKind, Workbench};

/// Factor applied per `+` / `-` press
const SPEED_STEP: f32 = 1.5;

/// Seconds a toast stays on screen
const TOAST_SECS: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Input,
    Help,
}

// ── Application State ─────────────────────────────────────────────────

pub struct App {
    pub active: StructureKind,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_indices: bool,

    pub bench: Workbench,
    /// Operation currently being stepped once per tick
    pub pending: Option<PendingOp>,
    /// Outcome of the last finished operation
    pub last_report: Option<String>,

    pub input_dialog: InputDialog,

    // Toast notification
    pub toast_message: Option<String>,
    pub toast_is_error: bool,
    pub toast_ticks: u16,
    toast_duration: u16,

    pub tick_count: u64,
}

impl App {
    pub fn new(config: &Config) -> Self {
        let mut bench = Workbench::seeded();
        bench.set_speed(config.speed());
        Self {
            active: config.general.start_structure,
            mode: Mode::Normal,
            should_quit: false,
            theme: Theme::from_config(&config.theme, &config.appearance),
            show_indices: config.appearance.show_indices,

            bench,
            pending: None,
            last_report: None,

            input_dialog: InputDialog::default(),

            toast_message: None,
            toast_is_error: false,
            toast_ticks: 0,
            toast_duration: config.animation.fps.max(1).saturating_mul(TOAST_SECS),

            tick_count: 0,
        }
    }

    /// True while an operation is queued or any controller is mid-animation
    pub fn is_busy(&self) -> bool {
        self.pending.is_some() || self.bench.any_animating()
    }

    /// Handle events from the event loop
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => self.on_tick(),
            Event::Resize(_w, _h) => {
                // ratatui redraws on the next frame
            }
        }
    }

    /// Handle a key event, dispatching to the appropriate handler
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.mode {
            Mode::Input => self.handle_input_key(key),
            Mode::Help => self.handle_help_key(key),
            Mode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.switch_to(self.active.next()),
            KeyCode::BackTab => self.switch_to(self.active.prev()),
            KeyCode::Char(c @ '1'..='6') => {
                let idx = c as usize - '1' as usize;
                self.switch_to(StructureKind::ALL[idx]);
            }
            KeyCode::Enter | KeyCode::Char('i') | KeyCode::Char(':') => self.open_prompt(),
            KeyCode::Char('+') | KeyCode::Char('=') => self.scale_speed(SPEED_STEP),
            KeyCode::Char('-') | KeyCode::Char('_') => self.scale_speed(1.0 / SPEED_STEP),
            KeyCode::Char('n') => {
                self.show_indices = !self.show_indices;
            }
            KeyCode::Char('?') => {
                self.mode = Mode::Help;
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => {
                self.mode = Mode::Normal;
            }
            _ => {}
        }
    }

    // ── Navigation ────────────────────────────────────────────────────

    fn switch_to(&mut self, kind: StructureKind) {
        if kind == self.active {
            return;
        }
        if self.is_busy() {
            self.show_toast("Wait for the current animation to finish", true);
            return;
        }
        debug!(from = %self.active, to = %kind, "switching structure");
        self.active = kind;
        self.last_report = None;
    }

    fn scale_speed(&mut self, factor: f32) {
        self.bench.set_speed(self.bench.speed() * factor);
        let speed = self.bench.speed();
        debug!(speed, "speed changed");
        self.show_toast(&format!("Speed {speed:.3}"), false);
    }

    // ── Command Prompt ────────────────────────────────────────────────

    fn open_prompt(&mut self) {
        if self.is_busy() {
            self.show_toast("Wait for the current animation to finish", true);
            return;
        }
        let usage = command::usage(self.active).join("  │  ");
        self.input_dialog.show(self.active.title(), &usage);
        self.mode = Mode::Input;
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input_dialog.hide();
                self.mode = Mode::Normal;
            }
            KeyCode::Enter => {
                let value = self.input_dialog.value().to_string();
                self.input_dialog.remember(&value);
                self.input_dialog.hide();
                self.mode = Mode::Normal;
                self.submit(&value);
            }
            KeyCode::Backspace => self.input_dialog.delete_char(),
            KeyCode::Delete => self.input_dialog.delete_forward(),
            KeyCode::Left => self.input_dialog.move_left(),
            KeyCode::Right => self.input_dialog.move_right(),
            KeyCode::Home => self.input_dialog.move_start(),
            KeyCode::End => self.input_dialog.move_end(),
            KeyCode::Up => self.input_dialog.recall_older(),
            KeyCode::Down => self.input_dialog.recall_newer(),
            KeyCode::Char(c) => self.input_dialog.insert_char(c),
            _ => {}
        }
    }

    /// Parse and validate a command line, then queue it for animation
    pub fn submit(&mut self, line: &str) {
        if line.trim().is_empty() {
            return;
        }
        let queued = command::parse(self.active, line).and_then(|op| {
            command::validate(&op, self.bench.len(self.active))?;
            Ok(op)
        });
        match queued {
            Ok(op) => {
                info!(structure = %self.active, %op, "operation started");
                self.pending = Some(op);
            }
            Err(e) => {
                warn!(structure = %self.active, input = line, "rejected command: {e}");
                self.show_toast(&e.to_string(), true);
            }
        }
    }

    // ── Frame Clock ───────────────────────────────────────────────────

    /// Advance the pending operation by one frame
    pub fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        self.tick_toast();

        let Some(op) = self.pending.as_ref() else {
            return;
        };
        match self.bench.step(op) {
            Ok(Step::Running) => {}
            Ok(Step::Complete) => {
                let report = self.bench.report(op);
                info!(%op, report = report.as_deref().unwrap_or(""), "operation finished");
                let message = report.clone().unwrap_or_else(|| format!("{op} done"));
                self.last_report = report;
                self.pending = None;
                self.show_toast(&message, false);
            }
            Err(e) => {
                warn!(%op, "operation aborted: {e}");
                self.pending = None;
                self.show_toast(&e.to_string(), true);
            }
        }
    }

    // ── Toast Management ──────────────────────────────────────────────

    pub fn show_toast(&mut self, message: &str, is_error: bool) {
        self.toast_message = Some(message.to_string());
        self.toast_is_error = is_error;
        self.toast_ticks = self.toast_duration;
    }

    pub fn tick_toast(&mut self) {
        if self.toast_ticks > 0 {
            self.toast_ticks -= 1;
            if self.toast_ticks == 0 {
                self.toast_message = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_line(app: &mut App, line: &str) {
        app.handle_key(key(KeyCode::Enter));
        for c in line.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
    }

    fn run_until_idle(app: &mut App) {
        for _ in 0..10_000 {
            if app.pending.is_none() {
                return;
            }
            app.handle_event(Event::Tick);
        }
        panic!("operation never finished");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(&Config::default());
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);

        let mut app = App::new(&Config::default());
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_tab_and_number_navigation() {
        let mut app = App::new(&Config::default());
        assert_eq!(app.active, StructureKind::Array);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.active, StructureKind::String);
        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.active, StructureKind::Tree);
        app.handle_key(key(KeyCode::Char('4')));
        assert_eq!(app.active, StructureKind::Stack);
    }

    #[test]
    fn test_prompt_runs_command() {
        let mut app = App::new(&Config::default());
        app.handle_key(key(KeyCode::Char('4')));
        type_line(&mut app, "push 60");
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.pending.is_some());
        run_until_idle(&mut app);
        assert_eq!(app.bench.stack.top(), Some(60));
        assert_eq!(app.toast_message.as_deref(), Some("push 60 done"));
        assert!(!app.toast_is_error);
    }

    #[test]
    fn test_report_is_kept() {
        let mut app = App::new(&Config::default());
        type_line(&mut app, "search 40");
        run_until_idle(&mut app);
        assert_eq!(app.last_report.as_deref(), Some("found 40 at index 3"));
    }

    #[test]
    fn test_bad_command_shows_error() {
        let mut app = App::new(&Config::default());
        type_line(&mut app, "remove 99");
        assert!(app.pending.is_none());
        assert!(app.toast_is_error);
        assert_eq!(app.bench.array.items(), &[10, 20, 30, 40, 50]);
    }

    #[test]
    fn test_switch_refused_while_busy() {
        let mut app = App::new(&Config::default());
        app.submit("insert 0 5");
        app.handle_event(Event::Tick);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.active, StructureKind::Array);
        assert!(app.toast_is_error);
        run_until_idle(&mut app);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.active, StructureKind::String);
    }

    #[test]
    fn test_escape_cancels_prompt() {
        let mut app = App::new(&Config::default());
        app.handle_key(key(KeyCode::Char('i')));
        assert_eq!(app.mode, Mode::Input);
        app.handle_key(key(KeyCode::Char('x')));
        app.handle_key(key(KeyCode::Esc));
        assert_eq!(app.mode, Mode::Normal);
        assert!(app.pending.is_none());
    }

    #[test]
    fn test_speed_keys_are_clamped() {
        let mut app = App::new(&Config::default());
        for _ in 0..20 {
            app.handle_key(key(KeyCode::Char('+')));
        }
        assert_eq!(app.bench.speed(), 1.0);
        for _ in 0..40 {
            app.handle_key(key(KeyCode::Char('-')));
        }
        assert_eq!(app.bench.speed(), 0.005);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = App::new(&Config::default());
        app.handle_key(key(KeyCode::Char('?')));
        assert_eq!(app.mode, Mode::Help);
        app.handle_key(key(KeyCode::Char('q')));
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_toast_expires() {
        let mut app = App::new(&Config::default());
        app.show_toast("hello", false);
        for _ in 0..(60 * TOAST_SECS) {
            app.tick_toast();
        }
        assert!(app.toast_message.is_none());
    }
}
