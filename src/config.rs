use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use ratatui::style::Color;
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::animation::{clamp_speed, DEFAULT_SPEED};
use crate::workbench::StructureKind;

// ─── Embedded Default ────────────────────────────────────────────────────
/// Baked into the binary at compile time, so a missing or deleted config file
/// always falls back to a known-good base layer.
const DEFAULT_CONFIG_TOML: &str = include_str!("../default_config.toml");

// ─── CLI Arguments (override layer) ─────────────────────────────────────
/// dsviz: watch data-structure operations animate in the terminal
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "dsviz", version, about, long_about = None)]
pub struct CliArgs {
    /// Path to a custom config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the default config to stdout and exit
    #[arg(long)]
    pub print_default_config: bool,

    /// Structure shown at startup, or targeted by --script
    #[arg(short, long, value_enum)]
    pub structure: Option<StructureKind>,

    /// Per-frame animation progress rate (overrides config file)
    #[arg(long)]
    pub speed: Option<f32>,

    /// Target FPS for the render loop (overrides config file)
    #[arg(long)]
    pub fps: Option<u16>,

    /// Log level filter (overrides config file)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Log file path (overrides the default log directory)
    #[arg(long)]
    pub log: Option<PathBuf>,

    /// Run `;`-separated commands without a terminal and print the result as JSON
    #[arg(long)]
    pub script: Option<String>,
}

// ─── TOML Structs ───────────────────────────────────────────────────────

/// Root configuration, parsed from TOML, then overridden by CLI flags.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Write logs under the data directory when no --log path is given
    pub log_to_file: bool,

    /// Tab selected at startup
    #[serde(default = "default_structure")]
    pub start_structure: StructureKind,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Per-frame progress rate
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Target FPS. Holds are counted at a nominal 60 Hz, so lower values
    /// stretch them in wall-clock time.
    #[serde(default = "default_fps")]
    pub fps: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Draw index / position captions under cells
    #[serde(default = "default_true")]
    pub show_indices: bool,

    /// Border style: "rounded", "plain", "thick", "double"
    #[serde(default = "default_border_style")]
    pub border_style: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    #[serde(deserialize_with = "deserialize_color", default = "default_color_white")]
    pub fg: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_darkgray"
    )]
    pub fg_dim: Color,

    #[serde(deserialize_with = "deserialize_color", default = "default_color_cyan")]
    pub accent: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_darkgray"
    )]
    pub border: Color,

    #[serde(default)]
    pub tones: ToneColors,
}

/// Fill colors for each emphasis tone
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToneColors {
    #[serde(deserialize_with = "deserialize_color", default = "default_color_white")]
    pub idle: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_green"
    )]
    pub inserting: Color,

    #[serde(deserialize_with = "deserialize_color", default = "default_color_red")]
    pub removing: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_yellow"
    )]
    pub searching: Color,

    #[serde(
        deserialize_with = "deserialize_color",
        default = "default_color_magenta"
    )]
    pub found: Color,

    #[serde(deserialize_with = "deserialize_color", default = "default_color_cyan")]
    pub visiting: Color,
}

// ─── Defaults ───────────────────────────────────────────────────────────

impl Default for Config {
    fn default() -> Self {
        // The embedded file is checked by `test_embedded_default_parses`
        toml::from_str(DEFAULT_CONFIG_TOML).unwrap_or_else(|_| Self {
            general: GeneralConfig::default(),
            animation: AnimationConfig::default(),
            appearance: AppearanceConfig::default(),
            theme: ThemeConfig::default(),
        })
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_to_file: false,
            start_structure: default_structure(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            fps: default_fps(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            show_indices: true,
            border_style: default_border_style(),
        }
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            fg: Color::White,
            fg_dim: Color::DarkGray,
            accent: Color::Cyan,
            border: Color::DarkGray,
            tones: ToneColors::default(),
        }
    }
}

impl Default for ToneColors {
    fn default() -> Self {
        Self {
            idle: Color::White,
            inserting: Color::Green,
            removing: Color::Red,
            searching: Color::Yellow,
            found: Color::Magenta,
            visiting: Color::Cyan,
        }
    }
}

// ─── Color Deserializer ─────────────────────────────────────────────────

fn deserialize_color<'de, D>(deserializer: D) -> std::result::Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color: \"{s}\"")))
}

/// Parse a color string into a ratatui Color.
/// Supports: named colors, "reset", "#RRGGBB" hex.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "reset" | "default" | "transparent" => Some(Color::Reset),
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" | "dark_gray" | "dark_grey" => Some(Color::DarkGray),
        "lightred" | "light_red" => Some(Color::LightRed),
        "lightgreen" | "light_green" => Some(Color::LightGreen),
        "lightyellow" | "light_yellow" => Some(Color::LightYellow),
        "lightblue" | "light_blue" => Some(Color::LightBlue),
        "lightmagenta" | "light_magenta" => Some(Color::LightMagenta),
        "lightcyan" | "light_cyan" => Some(Color::LightCyan),
        hex if hex.starts_with('#') && hex.len() == 7 => {
            let r = u8::from_str_radix(&hex[1..3], 16).ok()?;
            let g = u8::from_str_radix(&hex[3..5], 16).ok()?;
            let b = u8::from_str_radix(&hex[5..7], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

// ─── Serde Default Helpers ──────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}
fn default_structure() -> StructureKind {
    StructureKind::Array
}
fn default_speed() -> f32 {
    DEFAULT_SPEED
}
fn default_fps() -> u16 {
    60
}
fn default_border_style() -> String {
    "rounded".into()
}
fn default_color_white() -> Color {
    Color::White
}
fn default_color_darkgray() -> Color {
    Color::DarkGray
}
fn default_color_cyan() -> Color {
    Color::Cyan
}
fn default_color_magenta() -> Color {
    Color::Magenta
}
fn default_color_green() -> Color {
    Color::Green
}
fn default_color_yellow() -> Color {
    Color::Yellow
}
fn default_color_red() -> Color {
    Color::Red
}

// ─── Path Resolution ────────────────────────────────────────────────────

impl Config {
    /// Standard config file path: ~/.config/dsviz/config.toml
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dsviz")
            .join("config.toml")
    }

    /// Log directory: ~/.local/share/dsviz/
    pub fn log_dir() -> PathBuf {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dsviz");
        std::fs::create_dir_all(&data_dir).ok();
        data_dir
    }

    /// Tick interval from FPS
    pub fn tick_rate_ms(&self) -> u64 {
        let fps = self.animation.fps.max(1);
        (1000 / fps as u64).max(1)
    }

    /// Animation speed after clamping into the supported range
    pub fn speed(&self) -> f32 {
        clamp_speed(self.animation.speed)
    }
}

/// Apply CLI flags on top of a parsed config
fn apply_overrides(config: &mut Config, cli: &CliArgs) {
    if let Some(ref level) = cli.log_level {
        config.general.log_level = level.clone();
    }
    if let Some(structure) = cli.structure {
        config.general.start_structure = structure;
    }
    if let Some(speed) = cli.speed {
        config.animation.speed = speed;
    }
    if let Some(fps) = cli.fps {
        config.animation.fps = fps;
    }
    config.animation.speed = clamp_speed(config.animation.speed);
}

// ─── Bootloader ─────────────────────────────────────────────────────────

/// The single entry point for configuration. Called exactly once at startup.
///
/// 1. Resolve config file path (CLI override or default)
/// 2. If the file doesn't exist, create the directory tree and write defaults
/// 3. Parse TOML from disk into Config
/// 4. Apply CLI overrides on top
pub fn load(cli: &CliArgs) -> Result<Config> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);

    if !config_path.exists() {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).wrap_err_with(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(&config_path, DEFAULT_CONFIG_TOML).wrap_err_with(|| {
            format!(
                "Failed to write default config to {}",
                config_path.display()
            )
        })?;
        info!("Created default config at {}", config_path.display());
    }

    let toml_str = std::fs::read_to_string(&config_path)
        .wrap_err_with(|| format!("Failed to read config from {}", config_path.display()))?;

    let mut config = parse(&toml_str).wrap_err_with(|| {
        format!(
            "Failed to parse config at {}.\n\
             Delete the file to regenerate defaults, or run:\n  \
             dsviz --print-default-config > {:?}",
            config_path.display(),
            config_path
        )
    })?;

    apply_overrides(&mut config, cli);
    Ok(config)
}

/// Parse a config document without touching the filesystem
pub fn parse(toml_str: &str) -> Result<Config> {
    toml::from_str(toml_str).map_err(|e| crate::error::VizError::Config(e.to_string()).into())
}

/// Returns the embedded default config TOML string.
pub fn default_config_toml() -> &'static str {
    DEFAULT_CONFIG_TOML
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_default_parses() {
        let config = parse(DEFAULT_CONFIG_TOML).unwrap();
        assert_eq!(config.animation.speed, DEFAULT_SPEED);
        assert_eq!(config.general.start_structure, StructureKind::Array);
        assert_eq!(config.theme.tones.removing, Color::Red);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = parse("[animation]\nspeed = 0.2\n").unwrap();
        assert_eq!(config.animation.speed, 0.2);
        assert_eq!(config.animation.fps, 60);
        assert!(config.appearance.show_indices);
    }

    #[test]
    fn test_embedded_default_documents_hold_clock() {
        let fps_note: Vec<&str> = DEFAULT_CONFIG_TOML
            .lines()
            .skip_while(|l| !l.starts_with("[animation]"))
            .take_while(|l| !l.starts_with("fps"))
            .collect();
        assert!(fps_note.iter().any(|l| l.contains("nominal 60 Hz")));
    }

    #[test]
    fn test_bad_color_is_rejected() {
        assert!(parse("[theme]\naccent = \"chartreuse-ish\"\n").is_err());
    }

    #[test]
    fn test_structure_names() {
        let config = parse("[general]\nstart_structure = \"linked_list\"\n").unwrap();
        assert_eq!(config.general.start_structure, StructureKind::LinkedList);
    }

    #[test]
    fn test_cli_overrides_and_clamps() {
        let mut config = Config::default();
        let cli = CliArgs {
            speed: Some(9.0),
            structure: Some(StructureKind::Tree),
            fps: Some(30),
            ..CliArgs::default()
        };
        apply_overrides(&mut config, &cli);
        assert_eq!(config.animation.speed, 1.0);
        assert_eq!(config.general.start_structure, StructureKind::Tree);
        assert_eq!(config.tick_rate_ms(), 33);
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color(" Dark_Gray "), Some(Color::DarkGray));
        assert_eq!(parse_color("#12"), None);
    }

    #[test]
    fn test_load_creates_missing_file() {
        let dir = std::env::temp_dir().join(format!("dsviz-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = std::fs::remove_file(&path);
        let cli = CliArgs {
            config: Some(path.clone()),
            ..CliArgs::default()
        };
        let config = load(&cli).unwrap();
        assert!(path.exists());
        assert_eq!(config.animation.fps, 60);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
