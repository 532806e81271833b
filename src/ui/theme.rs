use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

use crate::config::{AppearanceConfig, ThemeConfig, ToneColors};
use crate::structures::Tone;

// ─── Glyphs ──────────────────────────────────────────────────────────────

pub const ICON_OK: &str = " ✓ ";
pub const ICON_ERROR: &str = " ✗ ";
pub const ICON_IDLE: &str = "●";
pub const ARROW_HEAD: &str = "▶";

/// Resolved colors and styles for one run of the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub fg_dim: Color,
    pub accent: Color,
    pub border: Color,
    pub success: Color,
    pub error: Color,
    pub tones: ToneColors,
    pub border_type: BorderType,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default(), &AppearanceConfig::default())
    }
}

impl Theme {
    pub fn from_config(theme: &ThemeConfig, appearance: &AppearanceConfig) -> Self {
        Self {
            // Reset keeps the terminal background (transparency-friendly)
            bg: Color::Reset,
            fg: theme.fg,
            fg_dim: theme.fg_dim,
            accent: theme.accent,
            border: theme.border,
            success: theme.tones.inserting,
            error: theme.tones.removing,
            tones: theme.tones.clone(),
            border_type: border_type(&appearance.border_style),
        }
    }

    pub fn tone_color(&self, tone: Tone) -> Color {
        match tone {
            Tone::Idle => self.tones.idle,
            Tone::Inserting => self.tones.inserting,
            Tone::Removing => self.tones.removing,
            Tone::Searching => self.tones.searching,
            Tone::Found => self.tones.found,
            Tone::Visiting => self.tones.visiting,
        }
    }

    // ─── Style Constructors ──────────────────────────────────────────

    pub fn style_default(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn style_dim(&self) -> Style {
        Style::default().fg(self.fg_dim).bg(self.bg)
    }

    pub fn style_accent(&self) -> Style {
        Style::default().fg(self.accent).bg(self.bg)
    }

    pub fn style_accent_bold(&self) -> Style {
        self.style_accent().add_modifier(Modifier::BOLD)
    }

    pub fn style_border(&self) -> Style {
        Style::default().fg(self.border).bg(self.bg)
    }

    pub fn style_error(&self) -> Style {
        Style::default().fg(self.error).bg(self.bg)
    }

    pub fn style_success(&self) -> Style {
        Style::default().fg(self.success).bg(self.bg)
    }

    pub fn style_key_hint(&self) -> Style {
        self.style_accent_bold()
    }

    pub fn style_key_desc(&self) -> Style {
        self.style_dim()
    }

    pub fn style_tab_active(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    }

    pub fn style_tab_inactive(&self) -> Style {
        self.style_dim()
    }

    /// Style for a sprite; faded sprites drop to the dim color
    pub fn style_tone(&self, tone: Tone, fade: f32) -> Style {
        let fg = if fade >= 0.5 { self.fg_dim } else { self.tone_color(tone) };
        let style = Style::default().fg(fg);
        if tone == Tone::Idle {
            style
        } else {
            style.add_modifier(Modifier::BOLD)
        }
    }
}

fn border_type(name: &str) -> BorderType {
    match name.to_lowercase().as_str() {
        "plain" => BorderType::Plain,
        "thick" => BorderType::Thick,
        "double" => BorderType::Double,
        _ => BorderType::Rounded,
    }
}
