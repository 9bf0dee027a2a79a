//! In-memory display tree built from a [`Document`](super::document::Document).
//!
//! Nodes live in a flat arena (the [`JsonTree`] struct) and link to each other
//! by index.  The arena root is the invisible model root: its children are the
//! first displayed level.

/// Index into [`JsonTree::nodes`].
pub type NodeId = usize;

/// Font size of the first displayed level.
pub const BASE_FONT_SIZE: u16 = 20;
/// Floor for deeply nested rows.
pub const MIN_FONT_SIZE: u16 = 1;

/// Font size for a row at builder depth `depth` with an extra `offset`.
pub fn font_size_for(depth: usize, offset: usize) -> u16 {
    let shrink = u16::try_from(depth.saturating_add(offset)).unwrap_or(u16::MAX);
    BASE_FONT_SIZE.saturating_sub(shrink).max(MIN_FONT_SIZE)
}

// ───────────────────────────────────────── node ──────────────

/// Icon tag shown in front of a row's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeIcon {
    Object,
    Array,
    Key,
    Leaf,
}

/// A single row of the tree.
#[derive(Debug, Clone)]
pub struct TreeNode {
    pub label: String,
    pub icon: NodeIcon,
    /// Display size hint; shrinks with nesting.
    pub font_size: u16,
    /// An object element of an array, toggled through the animated path.
    pub is_group: bool,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub expanded: bool,
    /// Depth from the model root (0 = root, 1 = first displayed level).
    pub depth: usize,
}

// ───────────────────────────────────────── arena tree ────────

/// Arena-backed display tree.
#[derive(Debug, Clone)]
pub struct JsonTree {
    pub nodes: Vec<TreeNode>,
    pub root: NodeId,
}

impl Default for JsonTree {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonTree {
    /// Create a tree holding only the invisible root.
    pub fn new() -> Self {
        let root = TreeNode {
            label: String::new(),
            icon: NodeIcon::Object,
            font_size: BASE_FONT_SIZE,
            is_group: false,
            parent: None,
            children: Vec::new(),
            expanded: true,
            depth: 0,
        };
        Self {
            nodes: vec![root],
            root: 0,
        }
    }

    /// Append a child under `parent_id` and return its [`NodeId`].
    pub fn add_child(
        &mut self,
        parent_id: NodeId,
        label: String,
        icon: NodeIcon,
        font_size: u16,
    ) -> NodeId {
        let depth = self.nodes[parent_id].depth + 1;
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            label,
            icon,
            font_size,
            is_group: false,
            parent: Some(parent_id),
            children: Vec::new(),
            expanded: false,
            depth,
        });
        self.nodes[parent_id].children.push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id]
    }

    pub fn has_children(&self, id: NodeId) -> bool {
        !self.nodes[id].children.is_empty()
    }

    /// Number of rows currently shown below `id` (its expanded descendants).
    pub fn visible_descendant_count(&self, id: NodeId) -> usize {
        let node = &self.nodes[id];
        if !node.expanded {
            return 0;
        }
        node.children
            .iter()
            .map(|&c| 1 + self.visible_descendant_count(c))
            .sum()
    }

    /// Ids of the nodes reachable from the root (root excluded).
    pub fn attached_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[self.root].children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.nodes[id].children.iter().rev().copied());
        }
        out
    }

    /// Expand every node that has children.
    pub fn expand_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = !node.children.is_empty() || node.parent.is_none();
        }
    }

    /// Toggle the expanded state of a node (only if it has children).
    pub fn toggle_expand(&mut self, id: NodeId) {
        if self.has_children(id) {
            self.nodes[id].expanded = !self.nodes[id].expanded;
        }
    }

    /// A row may be deleted when it sits on the first or second displayed
    /// level.
    pub fn is_deletable(&self, id: NodeId) -> bool {
        id != self.root && self.is_attached(id) && matches!(self.nodes[id].depth, 1 | 2)
    }

    /// Whether `id` is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            if !self.nodes[parent].children.contains(&current) {
                return false;
            }
            current = parent;
        }
        current == self.root
    }

    /// Whether `id` is `ancestor` or lies somewhere below it.
    pub fn is_in_subtree(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.nodes[c].parent;
        }
        false
    }

    /// Detach `id` (and with it its subtree) from its parent.
    ///
    /// Returns the number of rows removed, or `None` if `id` was not attached.
    /// The arena slots stay allocated until the tree is rebuilt.
    pub fn remove_subtree(&mut self, id: NodeId) -> Option<usize> {
        if id == self.root || !self.is_attached(id) {
            return None;
        }
        let parent = self.nodes[id].parent?;
        let siblings = &mut self.nodes[parent].children;
        let pos = siblings.iter().position(|&c| c == id)?;
        siblings.remove(pos);
        Some(self.subtree_size(id))
    }

    /// Number of nodes in the subtree rooted at `id` (including `id`).
    pub fn subtree_size(&self, id: NodeId) -> usize {
        1 + self.nodes[id]
            .children
            .iter()
            .map(|&c| self.subtree_size(c))
            .sum::<usize>()
    }
}
