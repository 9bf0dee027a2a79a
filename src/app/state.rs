//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::core::{
    builder,
    loader::{DocumentFormat, LoadedDocument, TextEncoding},
    tree::{JsonTree, NodeId},
};
use crate::ui::animation::GroupAnimation;
use crate::ui::tree_widget::TreeWidgetState;

use super::menu::ContextMenu;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Tree,
    ContextMenu,
    Help,
    OpenPrompt,
}

/// Top-level application state.
pub struct AppState {
    /// The display tree for the current document.
    pub tree: JsonTree,
    /// Widget-level state (selection, scroll).
    pub tree_state: TreeWidgetState,
    /// File the tree was loaded from (`None` for the built-in sample).
    pub source: Option<PathBuf>,
    pub format: DocumentFormat,
    pub encoding: TextEncoding,
    /// Parser forced on the command line, applied to every open.
    pub format_override: Option<DocumentFormat>,
    /// Controls the main event loop.
    pub should_quit: bool,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// Which view / overlay is currently shown.
    pub active_view: ActiveView,
    /// User-configurable keybindings and timings.
    pub config: AppConfig,
    /// The single in-flight group animation, if any.
    pub animation: Option<GroupAnimation>,
    /// Right-click menu, present while `active_view` is `ContextMenu`.
    pub context_menu: Option<ContextMenu>,
    /// Text typed into the open-file prompt.
    pub open_input: String,
    /// Last full terminal area seen by the renderer.
    pub terminal_area: Rect,
    /// Last left-clicked node and click time, for double-click.
    pub last_left_click: Option<(NodeId, Instant)>,
}

impl AppState {
    pub fn new(loaded: LoadedDocument, config: AppConfig) -> Self {
        let mut state = Self {
            tree: JsonTree::new(),
            tree_state: TreeWidgetState::default(),
            source: None,
            format: loaded.format,
            encoding: loaded.encoding,
            format_override: None,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            config,
            animation: None,
            context_menu: None,
            open_input: String::new(),
            terminal_area: Rect::default(),
            last_left_click: None,
        };
        state.replace_document(loaded);
        state
    }

    /// Swap in a freshly loaded document.  Everything tied to the previous
    /// tree (selection, scroll, menus, animation) is dropped with it.
    pub fn replace_document(&mut self, loaded: LoadedDocument) {
        self.tree = builder::build_tree(&loaded.document);
        self.tree_state = TreeWidgetState::default();
        self.source = loaded.source;
        self.format = loaded.format;
        self.encoding = loaded.encoding;
        self.animation = None;
        self.context_menu = None;
        self.last_left_click = None;
        self.active_view = ActiveView::Tree;
    }

    /// Whether a group animation is in flight.
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.config.animation_ms)
    }

    /// Title for the tree pane border.
    pub fn title(&self) -> String {
        let name = self
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "sample".to_string());
        format!(" {name} · {} · {} ", self.format.label(), self.encoding)
    }
}
