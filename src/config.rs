//! User configuration: keybindings and tunables.
//!
//! Read from a simple `key = value` text file at
//! `$XDG_CONFIG_HOME/json-tree/config.toml` (default
//! `~/.config/json-tree/config.toml`).  The viewer never writes it.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ui::animation::DEFAULT_DURATION_MS;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the tree view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Expand,
    Collapse,
    Toggle,
    ContextMenu,
    Delete,
    OpenFile,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::MoveUp,
        Action::MoveDown,
        Action::Expand,
        Action::Collapse,
        Action::Toggle,
        Action::ContextMenu,
        Action::Delete,
        Action::OpenFile,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::MoveUp => "Move Up",
            Action::MoveDown => "Move Down",
            Action::Expand => "Expand",
            Action::Collapse => "Collapse / Parent",
            Action::Toggle => "Toggle Node",
            Action::ContextMenu => "Row Menu",
            Action::Delete => "Delete Row",
            Action::OpenFile => "Open File",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        match s {
            "move_up" => Some(Action::MoveUp),
            "move_down" => Some(Action::MoveDown),
            "expand" => Some(Action::Expand),
            "collapse" => Some(Action::Collapse),
            "toggle" => Some(Action::Toggle),
            "context_menu" => Some(Action::ContextMenu),
            "delete" => Some(Action::Delete),
            "open_file" => Some(Action::OpenFile),
            "help" => Some(Action::Help),
            "quit" => Some(Action::Quit),
            _ => None,
        }
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT are compared; SHIFT is already folded into the char for
    /// keys like `?`.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    /// User-friendly display string (e.g. `"Ctrl+o"`, `"↑"`, `"q"`).
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Tab => "Tab".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    /// Parse a key string like `"Ctrl+o"`, `"Up"`, `"q"`, `"Space"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let (mods, key_part) = match s.rsplit_once('+') {
            Some((m, k)) if !k.is_empty() => (Some(m), k),
            _ => (None, s),
        };
        for part in mods.into_iter().flat_map(|m| m.split('+')) {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "delete" | "del" => KeyCode::Delete,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and timings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Duration of the group expand/collapse animation.
    pub animation_ms: u64,
    /// Double-click detection window.
    pub double_click_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            animation_ms: DEFAULT_DURATION_MS,
            double_click_ms: 250,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(MoveUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(MoveDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Expand, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Collapse, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(Toggle, vec![KeyBind::new(Enter, n), KeyBind::new(Char(' '), n)]);
        m.insert(ContextMenu, vec![KeyBind::new(Char('m'), n)]);
        m.insert(Action::Delete, vec![KeyBind::new(KeyCode::Delete, n), KeyBind::new(Char('d'), n)]);
        m.insert(OpenFile, vec![KeyBind::new(Char('o'), n)]);
        m.insert(Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When several bindings
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

    /// Set the animation length, clamped to 50..=2000 ms.
    pub fn set_animation_ms(&mut self, ms: u64) {
        self.animation_ms = ms.clamp(50, 2000);
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
            "{}: navigate | {}: toggle | {}: menu | {}: open | {}: help",
            self.short_binding(Action::MoveUp),
            self.short_binding(Action::Toggle),
            self.short_binding(Action::ContextMenu),
            self.short_binding(Action::OpenFile),
            self.short_binding(Action::Help),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                tracing::debug!("config loaded from {}", path.display());
                Self::parse(&contents)
            }
            Err(_) => Self::default(),
        }
    }

    /// Parse config text.  Unknown keys and unparsable values are skipped.
    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "animation_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.set_animation_ms(v);
                    }
                    continue;
                }
                "double_click_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        config.double_click_ms = v.clamp(100, 2000);
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!("config: unknown key {key:?}");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/json-tree/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("json-tree").join("config.toml")
}
