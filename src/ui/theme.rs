//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::tree::{NodeIcon, BASE_FONT_SIZE};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── tree view ──────────────────────────────────────────────

    /// Glyph drawn before a row's label.
    pub fn icon(icon: NodeIcon) -> &'static str {
        match icon {
            NodeIcon::Object => "{}",
            NodeIcon::Array => "[]",
            NodeIcon::Key => "≡ ",
            NodeIcon::Leaf => "– ",
        }
    }

    pub fn icon_style(icon: NodeIcon) -> Style {
        let fg = match icon {
            NodeIcon::Object => Color::Yellow,
            NodeIcon::Array => Color::Magenta,
            NodeIcon::Key => Color::Cyan,
            NodeIcon::Leaf => Color::DarkGray,
        };
        Style::default().fg(fg)
    }

    /// Terminals have one font size, so size maps to emphasis: the first two
    /// levels are bold, deep rows fade out.
    pub fn label_style(icon: NodeIcon, font_size: u16) -> Style {
        let base = match icon {
            NodeIcon::Leaf => Style::default().fg(Color::White),
            _ => Style::default().fg(Color::Cyan),
        };
        if font_size + 1 >= BASE_FONT_SIZE {
            base.add_modifier(Modifier::BOLD)
        } else if font_size + 6 <= BASE_FONT_SIZE {
            base.add_modifier(Modifier::DIM)
        } else {
            base
        }
    }

    pub fn group_style() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    /// Alternating background for odd rows.
    pub fn alternate_row_style() -> Style {
        Style::default().bg(Color::Indexed(235))
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn command_input_style() -> Style {
        Style::default().fg(Color::Yellow)
    }

    // ── popups ─────────────────────────────────────────────────
    pub fn popup_title_style() -> Style {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    }

    pub fn popup_border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn menu_item_style(selected: bool) -> Style {
        if selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        }
    }

    pub fn hint_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }
}
