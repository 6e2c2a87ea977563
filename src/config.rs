use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const MIN_WIDTH: u16 = 60;
pub const MIN_HEIGHT: u16 = 18;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Window geometry (terminal cells)
    pub width: u16,
    pub height: u16,
    pub x: Option<i32>,
    pub y: Option<i32>,

    /// Start with the window hidden to the background.
    pub startmin: bool,

    // Auxiliary windows re-shown on startup
    pub extwin: bool,
    pub statwin: bool,

    /// Override for the worker command line. Defaults to `san-worker`.
    pub worker_cmd: Option<String>,

    pub shortcuts: Shortcuts,
    pub theme: Theme,
}

/// Keyboard bindings, one printable key per action. The action set is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shortcuts {
    pub quit: char,
    pub copy: char,
    pub help: char,
    pub show: char,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub border: String,
    pub border_active: String,
    pub selected_bg: String,

    pub status_active: String,
    pub status_inactive: String,

    pub copied: String,
    pub copy_failed: String,

    pub text: String,
    pub text_muted: String,
    pub highlight: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            width: 100,
            height: 30,
            x: None,
            y: None,
            startmin: false,
            extwin: false,
            statwin: false,
            worker_cmd: None,
            shortcuts: Shortcuts::default(),
            theme: Theme::default(),
        }
    }
}

impl Default for Shortcuts {
    fn default() -> Self {
        Self {
            quit: 'q',
            copy: 'y',
            help: '?',
            show: 's',
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            border: "#5c6370".to_string(),
            border_active: "#98c379".to_string(),
            selected_bg: "#1e3250".to_string(),
            status_active: "#98c379".to_string(),
            status_inactive: "#e06c75".to_string(),
            copied: "#98c379".to_string(),
            copy_failed: "#e06c75".to_string(),
            text: "#abb2bf".to_string(),
            text_muted: "#5c6370".to_string(),
            highlight: "#61afef".to_string(),
        }
    }
}

impl Config {
    /// Load the config from the usual locations, falling back to defaults.
    /// The result is always validated.
    pub fn load(explicit: Option<&Path>) -> Self {
        let paths = [
            explicit.map(Path::to_path_buf),
            dirs::config_dir().map(|p| p.join("steamwatch/config.toml")),
            dirs::home_dir().map(|p| p.join(".steamwatch.toml")),
            Some(PathBuf::from("steamwatch.toml")),
        ];

        for path in paths.into_iter().flatten() {
            if path.exists() {
                if let Ok(content) = std::fs::read_to_string(&path) {
                    match toml::from_str::<Config>(&content) {
                        Ok(mut config) => {
                            config.validate();
                            return config;
                        }
                        Err(err) => {
                            tracing::warn!(path = %path.display(), %err, "ignoring unreadable config");
                        }
                    }
                }
            }
        }

        let mut config = Config::default();
        config.validate();
        config
    }

    /// Clamp out-of-range values instead of failing; a config file should
    /// never be able to produce an unusable window.
    pub fn validate(&mut self) {
        if self.width < MIN_WIDTH {
            self.width = MIN_WIDTH;
        }
        if self.height < MIN_HEIGHT {
            self.height = MIN_HEIGHT;
        }
    }

    pub fn worker_command(&self) -> &str {
        self.worker_cmd.as_deref().unwrap_or("san-worker")
    }
}

impl Theme {
    pub fn parse_color(&self, hex: &str) -> Color {
        parse_hex_color(hex).unwrap_or(Color::White)
    }

    pub fn border(&self) -> Color {
        self.parse_color(&self.border)
    }

    pub fn border_active(&self) -> Color {
        self.parse_color(&self.border_active)
    }

    pub fn selected_bg(&self) -> Color {
        self.parse_color(&self.selected_bg)
    }

    pub fn status_active(&self) -> Color {
        self.parse_color(&self.status_active)
    }

    pub fn status_inactive(&self) -> Color {
        self.parse_color(&self.status_inactive)
    }

    pub fn copied(&self) -> Color {
        self.parse_color(&self.copied)
    }

    pub fn copy_failed(&self) -> Color {
        self.parse_color(&self.copy_failed)
    }

    pub fn text(&self) -> Color {
        self.parse_color(&self.text)
    }

    pub fn text_muted(&self) -> Color {
        self.parse_color(&self.text_muted)
    }

    pub fn highlight(&self) -> Color {
        self.parse_color(&self.highlight)
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}
