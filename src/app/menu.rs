//! Context menu model (data only).
//!
//! Kept outside the input handler so both the handler and the popup renderer
//! read the same item list.

use crate::core::tree::{JsonTree, NodeId};

/// A single entry of the right-click menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Delete,
    Collapse,
    Expand,
}

impl MenuItem {
    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Delete => "Delete",
            MenuItem::Collapse => "Collapse",
            MenuItem::Expand => "Expand",
        }
    }
}

/// An open context menu for one row.
#[derive(Debug, Clone)]
pub struct ContextMenu {
    pub target: NodeId,
    pub items: Vec<MenuItem>,
    pub selected: usize,
    /// Terminal cell the menu was opened at.
    pub anchor: (u16, u16),
}

impl ContextMenu {
    /// Build the menu for `target`, or `None` when no item applies.
    pub fn for_node(tree: &JsonTree, target: NodeId, anchor: (u16, u16)) -> Option<Self> {
        let mut items = Vec::new();
        if tree.is_deletable(target) {
            items.push(MenuItem::Delete);
        }
        let node = tree.get(target);
        if node.is_group && !node.children.is_empty() {
            items.push(if node.expanded {
                MenuItem::Collapse
            } else {
                MenuItem::Expand
            });
        }
        if items.is_empty() {
            return None;
        }
        Some(Self {
            target,
            items,
            selected: 0,
            anchor,
        })
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn current(&self) -> Option<MenuItem> {
        self.items.get(self.selected).copied()
    }
}
