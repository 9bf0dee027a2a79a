//! Popup overlay widgets: row context menu, help, and the open-file prompt.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::app::menu::ContextMenu;
use crate::config::{Action, AppConfig};
use crate::core::tree::NodeIcon;

use super::theme::Theme;

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .title(title)
        .title_style(Theme::popup_title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::popup_border_style())
}

// ───────────────────────────────────────── context menu ──────

/// Right-click menu drawn at its anchor cell.
pub struct ContextMenuPopup<'a> {
    pub menu: &'a ContextMenu,
}

impl<'a> ContextMenuPopup<'a> {
    /// Where the menu lands inside `area`.
    pub fn rect(menu: &ContextMenu, area: Rect) -> Rect {
        let label_width = menu
            .items
            .iter()
            .map(|i| i.label().len() as u16)
            .max()
            .unwrap_or(0);
        let width = label_width + 6;
        let height = menu.items.len() as u16 + 2;
        anchored_fixed(menu.anchor, width, height, area)
    }
}

impl<'a> Widget for ContextMenuPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = Self::rect(self.menu, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Theme::popup_border_style());
        let inner = block.inner(popup);
        block.render(popup, buf);

        let lines: Vec<Line> = self
            .menu
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                let selected = i == self.menu.selected;
                let prefix = if selected { " ▸ " } else { "   " };
                Line::from(Span::styled(
                    format!("{prefix}{}", item.label()),
                    Theme::menu_item_style(selected),
                ))
            })
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── help popup ────────

/// Static help: what each icon means, then the current key bindings.
pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

const ICON_HELP: &[(NodeIcon, &str)] = &[
    (NodeIcon::Object, "Object: an object value, or an object inside an array"),
    (NodeIcon::Array, "Array: a key holding a list"),
    (NodeIcon::Key, "Key: a key holding a single value"),
    (NodeIcon::Leaf, "Value: a string, number, boolean or null"),
];

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = (ICON_HELP.len() + Action::ALL.len()) as u16 + 9;
        let popup = centered_fixed(76, height, area);
        Clear.render(popup, buf);

        let block = popup_block(" Help ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Theme::hint_style();
        let mut lines = vec![Line::raw(""), Line::styled("  Icons", Theme::popup_title_style())];
        for &(icon, text) in ICON_HELP {
            lines.push(Line::from(vec![
                Span::raw("   "),
                Span::styled(Theme::icon(icon), Theme::icon_style(icon)),
                Span::raw(format!("  {text}")),
            ]));
        }
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled("− ", Theme::group_style()),
            Span::raw(" Group: animated expand/collapse, right-click for its menu"),
        ]));

        lines.push(Line::raw(""));
        lines.push(Line::styled("  Keys", Theme::popup_title_style()));
        let key_style = Theme::command_input_style();
        for &action in Action::ALL {
            lines.push(Line::from(vec![
                Span::raw(format!("   {:<20}", action.label())),
                Span::styled(self.config.display_bindings(action), key_style),
            ]));
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled("  Esc: close", dim)));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── open prompt ───────

/// File filters shown under the path input.
pub const OPEN_FILTERS: &str = "*.json  *.yaml  *.yml  *";

/// Single-line path input that stands in for a file dialog.
pub struct OpenPrompt<'a> {
    pub input: &'a str,
}

impl<'a> Widget for OpenPrompt<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = centered_fixed(64, 7, area);
        Clear.render(popup, buf);

        let block = popup_block(" Open file ");
        let inner = block.inner(popup);
        block.render(popup, buf);

        let dim = Theme::hint_style();
        let lines = vec![
            Line::raw(""),
            Line::from(vec![
                Span::raw(" Path: "),
                Span::styled(format!("{}▏", self.input), Theme::command_input_style()),
            ]),
            Line::from(Span::styled(format!(" Filter: {OPEN_FILTERS}"), dim)),
            Line::from(Span::styled(" Enter: open  Esc: cancel", dim)),
        ];
        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// A fixed-size rectangle with its top-left at `anchor`, shifted back inside
/// `area` when it would overflow the right or bottom edge.
fn anchored_fixed(anchor: (u16, u16), width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let max_x = area.x + area.width - w;
    let max_y = area.y + area.height - h;
    let x = anchor.0.clamp(area.x, max_x);
    let y = anchor.1.clamp(area.y, max_y);
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::menu::MenuItem;

    fn menu(anchor: (u16, u16)) -> ContextMenu {
        ContextMenu {
            target: 1,
            items: vec![MenuItem::Delete, MenuItem::Collapse],
            selected: 0,
            anchor,
        }
    }

    #[test]
    fn context_menu_sits_at_anchor() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(ContextMenuPopup::rect(&menu((10, 5)), area), Rect::new(10, 5, 14, 4));
    }

    #[test]
    fn context_menu_is_pushed_back_inside() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(ContextMenuPopup::rect(&menu((79, 23)), area), Rect::new(66, 20, 14, 4));
    }

    #[test]
    fn help_lists_every_action() {
        let area = Rect::new(0, 0, 100, 40);
        let mut buf = Buffer::empty(area);
        let config = AppConfig::default();
        HelpPopup { config: &config }.render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        for action in Action::ALL {
            assert!(text.contains(action.label()), "missing {}", action.label());
        }
    }
}
