//! User configuration — key bindings, display defaults, and persistence.
//!
//! The config file lives at `$XDG_CONFIG_HOME/metatable/config.toml`
//! (default `~/.config/metatable/config.toml`):
//!
//! ```toml
//! dense = false
//! title_format = "start-case"   # start-case | upper | lower | raw
//! tick_ms = 250
//!
//! [bindings]
//! scroll_down = ["Down", "j"]
//! quit = ["q", "Esc"]
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::format::FormattingOptions;
use crate::core::title::TitleFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("cannot serialise config: {0}")]
    Serialise(#[from] toml::ser::Error),
}

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    ToggleDense,
    Reload,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::ToggleDense,
        Action::Reload,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::Top => "Jump to Top",
            Action::Bottom => "Jump to Bottom",
            Action::ToggleDense => "Toggle Dense",
            Action::Reload => "Reload",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::ToggleDense => "toggle_dense",
            Action::Reload => "reload",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding — key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared; SHIFT is ignored for characters since it is already
    /// folded into the character (`G`, `?`).
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = match self.code {
            KeyCode::Char(_) => KeyModifiers::CONTROL | KeyModifiers::ALT,
            _ => KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT,
        };
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Ctrl+c"`, `"PgDn"`, `"q"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            _ => self.key_name(),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Config-file form (e.g. `"Ctrl+c"`, `"PageDown"`, `"q"`).
    pub fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), self.key_name())
    }

    fn key_name(&self) -> String {
        match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Left => "Left".into(),
            KeyCode::Right => "Right".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Backspace => "Backspace".into(),
            KeyCode::Delete => "Delete".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        }
    }

    /// Parse a key string like `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"PageDown"`.
    pub fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.trim().to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let key_part = key_part.trim();
        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
            // Keep the original case for single characters (`G` ≠ `g`).
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── title style ───────

/// Named key-title transforms selectable from config or the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TitleStyle {
    /// Capitalise each word (`fooBar` → `Foo Bar`).
    #[default]
    StartCase,
    Upper,
    Lower,
    /// Show keys exactly as written.
    Raw,
}

impl TitleStyle {
    /// Formatting options implementing this style.
    pub fn options(self) -> FormattingOptions {
        let title_format = match self {
            TitleStyle::StartCase => None,
            TitleStyle::Upper => Some(TitleFormat::new(str::to_uppercase)),
            TitleStyle::Lower => Some(TitleFormat::new(str::to_lowercase)),
            TitleStyle::Raw => Some(TitleFormat::new(str::to_string)),
        };
        FormattingOptions { title_format }
    }
}

// ───────────────────────────────────────── config ────────────

/// On-disk shape of the config file.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
struct ConfigFile {
    dense: bool,
    title_format: TitleStyle,
    tick_ms: u64,
    bindings: BTreeMap<String, Vec<String>>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            dense: false,
            title_format: TitleStyle::default(),
            tick_ms: DEFAULT_TICK_MS,
            bindings: BTreeMap::new(),
        }
    }
}

const DEFAULT_TICK_MS: u64 = 250;

/// Application configuration — key bindings and display defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Start in dense mode (no spacer lines between rows).
    pub dense: bool,
    pub title_style: TitleStyle,
    /// Event-loop tick; also the file-watch polling interval.
    pub tick_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            dense: false,
            title_style: TitleStyle::default(),
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        let n = KeyModifiers::NONE;
        let key = |code| KeyBind::new(code, n);
        let mut m = HashMap::new();

        m.insert(Action::ScrollUp, vec![key(KeyCode::Up), key(KeyCode::Char('k'))]);
        m.insert(Action::ScrollDown, vec![key(KeyCode::Down), key(KeyCode::Char('j'))]);
        m.insert(Action::PageUp, vec![key(KeyCode::PageUp)]);
        m.insert(Action::PageDown, vec![key(KeyCode::PageDown), key(KeyCode::Char(' '))]);
        m.insert(Action::Top, vec![key(KeyCode::Home), key(KeyCode::Char('g'))]);
        m.insert(Action::Bottom, vec![key(KeyCode::End), key(KeyCode::Char('G'))]);
        m.insert(Action::ToggleDense, vec![key(KeyCode::Char('d'))]);
        m.insert(Action::Reload, vec![key(KeyCode::Char('r'))]);
        m.insert(Action::Help, vec![key(KeyCode::Char('?'))]);
        m.insert(Action::Quit, vec![key(KeyCode::Char('q')), key(KeyCode::Esc)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: dense | {}: reload | {}: help | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::ToggleDense),
            self.short_binding(Action::Reload),
            self.short_binding(Action::Help),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults on
    /// any problem.
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring config file");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse config text.  Bindings for unknown actions and unparsable key
    /// strings are skipped; actions not mentioned keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(s)?;
        let mut bindings = Self::default_bindings();

        for (key, values) in &file.bindings {
            let Some(action) = Action::from_config_key(key) else {
                warn!(key = %key, "unknown action in [bindings]");
                continue;
            };
            let parsed: Vec<KeyBind> = values
                .iter()
                .filter_map(|v| {
                    let bind = KeyBind::parse(v);
                    if bind.is_none() {
                        warn!(key = %key, value = %v, "unparsable key binding");
                    }
                    bind
                })
                .collect();
            if !parsed.is_empty() {
                bindings.insert(action, parsed);
            }
        }

        Ok(Self {
            bindings,
            dense: file.dense,
            title_style: file.title_format,
            tick_ms: file.tick_ms.clamp(50, 2000),
        })
    }

    /// Serialise to config-file text.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        let bindings = Action::ALL
            .iter()
            .filter_map(|&action| {
                let binds = self.bindings.get(&action)?;
                let keys = binds.iter().map(KeyBind::to_config_string).collect();
                Some((action.config_key().to_string(), keys))
            })
            .collect();
        let file = ConfigFile {
            dense: self.dense,
            title_format: self.title_style,
            tick_ms: self.tick_ms,
            bindings,
        };
        Ok(toml::to_string_pretty(&file)?)
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/metatable/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("metatable").join("config.toml")
}
