//! Layout helpers: split the terminal area into regions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout with tree pane and a bottom status bar.
pub struct AppLayout {
    pub tree_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),    // tree pane (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            tree_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// Rows of tree content (inside the border) for the current area.
    pub fn tree_content(&self) -> Rect {
        Rect::new(
            self.tree_area.x.saturating_add(1),
            self.tree_area.y.saturating_add(1),
            self.tree_area.width.saturating_sub(2),
            self.tree_area.height.saturating_sub(2),
        )
    }

    /// Map a terminal row to a row index in the flattened tree.
    pub fn row_at(&self, column: u16, row: u16, offset: usize) -> Option<usize> {
        let content = self.tree_content();
        if column < content.x
            || column >= content.x.saturating_add(content.width)
            || row < content.y
            || row >= content.y.saturating_add(content.height)
        {
            return None;
        }
        Some(usize::from(row - content.y) + offset)
    }
}
