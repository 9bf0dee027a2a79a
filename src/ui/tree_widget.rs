//! Custom Ratatui widget that renders a [`JsonTree`] as an indented,
//! collapsible tree with icon-coded rows.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::core::tree::{JsonTree, NodeIcon, NodeId};

use super::animation::GroupAnimation;
use super::theme::Theme;

// ───────────────────────────────────────── state ─────────────

/// Persistent state for the tree widget (selected index, scroll offset).
#[derive(Debug, Default)]
pub struct TreeWidgetState {
    /// Index into the *visible* flat list that is currently highlighted.
    pub selected: usize,
    /// Vertical scroll offset (first visible row).
    pub offset: usize,
}

impl TreeWidgetState {
    pub fn select_next(&mut self, max: usize) {
        if max > 0 && self.selected < max - 1 {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside `0..len`.
    pub fn clamp_selection(&mut self, len: usize) {
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Ensure the selected row is visible within the viewport of `height` rows.
    pub fn clamp_scroll(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected - height + 1;
        }
    }
}

// ───────────────────────────────────────── row model ─────────

/// One rendered row in the tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub node_id: NodeId,
    /// Displayed level, 1 for top-level rows.
    pub depth: usize,
    pub label: String,
    pub icon: NodeIcon,
    pub font_size: u16,
    pub is_group: bool,
    pub expanded: bool,
    pub child_count: usize,
}

/// Flatten the visible part of `tree`.  While `animation` runs, the animated
/// node only shows as many descendant rows as the current frame reveals.
pub fn build_rows(tree: &JsonTree, animation: Option<&GroupAnimation>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for &child in &tree.get(tree.root).children {
        collect_rows(tree, child, animation, &mut rows);
    }
    rows
}

fn collect_rows(
    tree: &JsonTree,
    node_id: NodeId,
    animation: Option<&GroupAnimation>,
    rows: &mut Vec<TreeRow>,
) {
    let node = tree.get(node_id);
    rows.push(TreeRow {
        node_id,
        depth: node.depth,
        label: node.label.clone(),
        icon: node.icon,
        font_size: node.font_size,
        is_group: node.is_group,
        expanded: node.expanded,
        child_count: node.children.len(),
    });

    if !node.expanded {
        return;
    }

    let first_child_row = rows.len();
    for &child in &node.children {
        collect_rows(tree, child, animation, rows);
    }
    if let Some(anim) = animation.filter(|a| a.node == node_id) {
        rows.truncate(first_child_row + anim.revealed_rows());
    }
}

/// Position of `node_id` in `rows`.
pub fn row_index_of(rows: &[TreeRow], node_id: NodeId) -> Option<usize> {
    rows.iter().position(|r| r.node_id == node_id)
}

// ───────────────────────────────────────── widget ────────────

/// The tree widget itself: created fresh each frame.
pub struct TreeWidget<'a> {
    tree: &'a JsonTree,
    animation: Option<&'a GroupAnimation>,
    block: Option<Block<'a>>,
}

impl<'a> TreeWidget<'a> {
    pub fn new(tree: &'a JsonTree) -> Self {
        Self {
            tree,
            animation: None,
            block: None,
        }
    }

    pub fn animation(mut self, animation: Option<&'a GroupAnimation>) -> Self {
        self.animation = animation;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    fn row_line(row: &TreeRow, is_selected: bool) -> Line<'static> {
        let indent = "  ".repeat(row.depth.saturating_sub(1));
        let disclosure = match (row.child_count > 0, row.is_group, row.expanded) {
            (false, _, _) => "  ",
            (true, true, true) => "− ",
            (true, true, false) => "+ ",
            (true, false, true) => "▼ ",
            (true, false, false) => "▶ ",
        };
        let label_style = if is_selected {
            Theme::selected_style()
        } else if row.is_group {
            Theme::group_style()
        } else {
            Theme::label_style(row.icon, row.font_size)
        };
        let label = if row.is_group {
            let noun = if row.child_count == 1 { "key" } else { "keys" };
            format!(" ({} {noun})", row.child_count)
        } else {
            format!(" {}", row.label)
        };

        Line::from(vec![
            Span::raw(indent),
            Span::raw(disclosure),
            Span::styled(Theme::icon(row.icon), Theme::icon_style(row.icon)),
            Span::styled(label, label_style),
        ])
    }
}

impl<'a> StatefulWidget for TreeWidget<'a> {
    type State = TreeWidgetState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        // Resolve the inner area (inside the optional block border).
        let inner = if let Some(ref block) = self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let rows = build_rows(self.tree, self.animation);
        state.clamp_selection(rows.len());
        state.clamp_scroll(inner.height as usize);

        let visible_rows = rows
            .iter()
            .enumerate()
            .skip(state.offset)
            .take(inner.height as usize);

        for (i, (row_idx, row)) in visible_rows.enumerate() {
            let y = inner.y + i as u16;
            let is_selected = row_idx == state.selected;

            if row_idx % 2 == 1 {
                buf.set_style(Rect::new(inner.x, y, inner.width, 1), Theme::alternate_row_style());
            }
            let line = Self::row_line(row, is_selected);
            buf.set_line(inner.x, y, &line, inner.width);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;
    use crate::core::builder::build_tree;
    use crate::core::document::Document;
    use crate::ui::animation::{ToggleDirection, DEFAULT_DURATION_MS};

    fn tree(json: &str) -> JsonTree {
        build_tree(&Document::from(
            serde_json::from_str::<serde_json::Value>(json).unwrap(),
        ))
    }

    #[test]
    fn rows_follow_document_order() {
        let t = tree(r#"{"name": "John", "age": 30}"#);
        let labels: Vec<String> = build_rows(&t, None).into_iter().map(|r| r.label).collect();
        assert_eq!(labels, ["name", "John", "age", "30"]);
    }

    #[test]
    fn animation_limits_revealed_rows() {
        let t = tree(r#"[{"a": 1, "b": 2}, {"c": 3}]"#);
        let group = t.get(t.root).children[0];
        assert_eq!(build_rows(&t, None).len(), 8);

        let t0 = Instant::now();
        let mut anim = GroupAnimation::new(
            group,
            ToggleDirection::Expand,
            Rect::default(),
            Rect::new(0, 0, 10, 5),
            t0,
            Duration::from_millis(DEFAULT_DURATION_MS),
        );
        // First frame: the animated group shows only its header row.
        assert_eq!(build_rows(&t, Some(&anim)).len(), 1 + 3);
        anim.advance(t0 + Duration::from_millis(200));
        assert_eq!(build_rows(&t, Some(&anim)).len(), 8);
    }

    #[test]
    fn render_marks_groups_and_icons() {
        let t = tree(r#"{"cars": [{"name": "Ford"}]}"#);
        let mut state = TreeWidgetState::default();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        TreeWidget::new(&t).render(area, &mut buf, &mut state);

        let line = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect::<String>()
        };
        assert!(line(0).starts_with("▼ [] cars"));
        assert!(line(1).starts_with("  − {} (1 key)"));
        assert!(line(2).starts_with("    ▼ ≡  name"));
    }

    #[test]
    fn clamp_scroll_follows_selection() {
        let mut s = TreeWidgetState { selected: 12, offset: 0 };
        s.clamp_scroll(5);
        assert_eq!(s.offset, 8);
        s.selected = 2;
        s.clamp_scroll(5);
        assert_eq!(s.offset, 2);
    }
}
