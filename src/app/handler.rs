//! Input handling: maps key, mouse and tick events to state mutations.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::config::Action;
use crate::core::loader;
use crate::core::tree::NodeId;
use crate::ui::animation::{AnimationStep, GroupAnimation, ToggleDirection};
use crate::ui::layout::AppLayout;
use crate::ui::popup::ContextMenuPopup;
use crate::ui::tree_widget::{self, TreeRow};

use super::menu::{ContextMenu, MenuItem};
use super::state::{ActiveView, AppState};

/// Rows moved per wheel notch.
const WHEEL_STEP: usize = 3;

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Tree => handle_tree_key(state, key),
        ActiveView::ContextMenu => handle_menu_key(state, key),
        ActiveView::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?')) {
                state.active_view = ActiveView::Tree;
            }
        }
        ActiveView::OpenPrompt => handle_prompt_key(state, key),
    }
}

// ── Tree view (configurable bindings) ───────────────────────────

fn handle_tree_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Home => {
            state.tree_state.selected = 0;
            state.tree_state.offset = 0;
            return;
        }
        KeyCode::End => {
            let rows = build_rows(state);
            if !rows.is_empty() {
                state.tree_state.selected = rows.len() - 1;
            }
            return;
        }
        _ => {}
    }

    let Some(action) = state.config.match_key(key) else {
        return;
    };
    let now = Instant::now();

    match action {
        Action::Quit => state.should_quit = true,
        Action::Help => state.active_view = ActiveView::Help,
        Action::OpenFile => {
            state.open_input = state
                .source
                .as_deref()
                .and_then(Path::parent)
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| format!("{}/", p.display()))
                .unwrap_or_default();
            state.active_view = ActiveView::OpenPrompt;
        }
        Action::MoveUp => state.tree_state.select_prev(),
        Action::MoveDown => {
            let visible_count = build_rows(state).len();
            state.tree_state.select_next(visible_count);
        }
        Action::Expand => {
            let Some(node_id) = selected_node_id(state) else {
                return;
            };
            let node = state.tree.get(node_id);
            if node.expanded || node.children.is_empty() {
                return;
            }
            if node.is_group {
                toggle_group(state, node_id, now);
            } else {
                state.tree.get_mut(node_id).expanded = true;
            }
        }
        Action::Collapse => handle_collapse(state, now),
        Action::Toggle => {
            if let Some(node_id) = selected_node_id(state) {
                toggle_node(state, node_id, now);
            }
        }
        Action::ContextMenu => {
            if let Some(node_id) = selected_node_id(state) {
                let anchor = selected_row_anchor(state);
                open_context_menu(state, node_id, anchor);
            }
        }
        Action::Delete => {
            if let Some(node_id) = selected_node_id(state) {
                delete_node(state, node_id);
            }
        }
    }
}

/// Collapse an expanded node, or move to the parent row for leaves and
/// collapsed nodes.
fn handle_collapse(state: &mut AppState, now: Instant) {
    let Some(node_id) = selected_node_id(state) else {
        return;
    };
    let node = state.tree.get(node_id);

    if node.expanded && !node.children.is_empty() {
        if node.is_group {
            toggle_group(state, node_id, now);
        } else {
            state.tree.get_mut(node_id).expanded = false;
        }
    } else if let Some(parent_id) = node.parent.filter(|&p| p != state.tree.root) {
        select_node(state, parent_id);
    }
}

/// Toggle any node: groups animate, everything else flips instantly.
fn toggle_node(state: &mut AppState, node_id: NodeId, now: Instant) {
    if state.tree.get(node_id).is_group {
        toggle_group(state, node_id, now);
    } else {
        state.tree.toggle_expand(node_id);
    }
}

// ── Group animation ─────────────────────────────────────────────

/// Start an animated expand/collapse of group `node_id`.
///
/// Returns `false` when nothing started: the node is not a group, or an
/// animation is already in flight.
pub fn toggle_group(state: &mut AppState, node_id: NodeId, now: Instant) -> bool {
    if state.is_animating() {
        tracing::debug!("toggle_group: node {node_id} ignored, animation in flight");
        return false;
    }
    let node = state.tree.get(node_id);
    if !node.is_group || node.children.is_empty() {
        return false;
    }
    let duration = state.animation_duration();

    let animation = if node.expanded {
        // Keep the selection on a row that survives the collapse.
        if selected_node_id(state).is_some_and(|s| s != node_id && state.tree.is_in_subtree(s, node_id)) {
            select_node(state, node_id);
        }
        let from = visual_rect(state, node_id);
        GroupAnimation::new(node_id, ToggleDirection::Collapse, from, Rect::default(), now, duration)
    } else {
        state.tree.get_mut(node_id).expanded = true;
        scroll_to(state, node_id);
        let to = visual_rect(state, node_id);
        GroupAnimation::new(node_id, ToggleDirection::Expand, Rect::default(), to, now, duration)
    };
    tracing::debug!("toggle_group: node {node_id} {:?}", animation.direction);
    state.animation = Some(animation);
    true
}

/// Advance the in-flight animation to `now`.  A finished collapse hides the
/// group only at this point.
pub fn handle_tick(state: &mut AppState, now: Instant) {
    if state.animation.is_none() {
        return;
    }
    let keep = selected_node_id(state);
    let Some(animation) = state.animation.as_mut() else {
        return;
    };

    if let AnimationStep::Finished { node, direction } = animation.advance(now) {
        if direction == ToggleDirection::Collapse {
            state.tree.get_mut(node).expanded = false;
        }
        state.animation = None;
    }

    if let Some(id) = keep {
        select_node(state, id);
    }
}

/// Row-space rect of `node_id`: its header row plus visible descendants.
fn visual_rect(state: &AppState, node_id: NodeId) -> Rect {
    let rows = tree_widget::build_rows(&state.tree, None);
    let Some(index) = tree_widget::row_index_of(&rows, node_id) else {
        return Rect::default();
    };
    let node = state.tree.get(node_id);
    let content = AppLayout::from_area(state.terminal_area).tree_content();
    let to_u16 = |v: usize| u16::try_from(v).unwrap_or(u16::MAX);
    Rect::new(
        to_u16(node.depth.saturating_sub(1) * 2),
        to_u16(index),
        content.width,
        to_u16(1 + state.tree.visible_descendant_count(node_id)),
    )
}

/// Adjust the scroll offset so `node_id`'s row is on screen.
fn scroll_to(state: &mut AppState, node_id: NodeId) {
    let rows = build_rows(state);
    let Some(index) = tree_widget::row_index_of(&rows, node_id) else {
        return;
    };
    let height = usize::from(AppLayout::from_area(state.terminal_area).tree_content().height);
    let offset = &mut state.tree_state.offset;
    if index < *offset {
        *offset = index;
    } else if height > 0 && index >= *offset + height {
        *offset = index + 1 - height;
    }
}

// ── Editing ─────────────────────────────────────────────────────

/// Remove a deletable row and its subtree from the display model.
pub fn delete_node(state: &mut AppState, node_id: NodeId) -> bool {
    if !state.tree.is_deletable(node_id) {
        state.status_message = Some("Only top-level rows can be deleted".to_string());
        return false;
    }
    if state
        .animation
        .as_ref()
        .is_some_and(|a| state.tree.is_in_subtree(a.node, node_id))
    {
        state.animation = None;
    }

    let label = state.tree.get(node_id).label.clone();
    let Some(removed) = state.tree.remove_subtree(node_id) else {
        return false;
    };
    tracing::debug!("delete_node: {node_id} ({removed} rows)");

    let len = build_rows(state).len();
    state.tree_state.clamp_selection(len);
    state.status_message = Some(if label.is_empty() {
        format!("Deleted group ({removed} rows)")
    } else {
        format!("Deleted \"{label}\" ({removed} rows)")
    });
    true
}

// ── Context menu ────────────────────────────────────────────────

fn open_context_menu(state: &mut AppState, node_id: NodeId, anchor: (u16, u16)) {
    match ContextMenu::for_node(&state.tree, node_id, anchor) {
        Some(menu) => {
            state.context_menu = Some(menu);
            state.active_view = ActiveView::ContextMenu;
        }
        None => {
            state.status_message = Some("No actions for this row".to_string());
        }
    }
}

fn close_context_menu(state: &mut AppState) {
    state.context_menu = None;
    state.active_view = ActiveView::Tree;
}

fn activate_menu_item(state: &mut AppState, now: Instant) {
    let Some(menu) = state.context_menu.take() else {
        state.active_view = ActiveView::Tree;
        return;
    };
    state.active_view = ActiveView::Tree;
    match menu.current() {
        Some(MenuItem::Delete) => {
            delete_node(state, menu.target);
        }
        Some(MenuItem::Collapse | MenuItem::Expand) => {
            toggle_group(state, menu.target, now);
        }
        None => {}
    }
}

fn handle_menu_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => close_context_menu(state),
        KeyCode::Up | KeyCode::Char('k') => {
            if let Some(menu) = state.context_menu.as_mut() {
                menu.select_prev();
            }
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if let Some(menu) = state.context_menu.as_mut() {
                menu.select_next();
            }
        }
        KeyCode::Enter | KeyCode::Char(' ') => activate_menu_item(state, Instant::now()),
        _ => {}
    }
}

/// Terminal cell just right of the selected row's label start.
fn selected_row_anchor(state: &AppState) -> (u16, u16) {
    let content = AppLayout::from_area(state.terminal_area).tree_content();
    let row = state.tree_state.selected.saturating_sub(state.tree_state.offset);
    let y = content.y.saturating_add(u16::try_from(row).unwrap_or(u16::MAX));
    (content.x.saturating_add(4), y.saturating_add(1))
}

// ── Open prompt ─────────────────────────────────────────────────

fn handle_prompt_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => state.active_view = ActiveView::Tree,
        KeyCode::Enter => {
            state.active_view = ActiveView::Tree;
            let path = expand_home(state.open_input.trim());
            open_path(state, &path);
        }
        KeyCode::Backspace => {
            state.open_input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            state.open_input.push(ch);
        }
        _ => {}
    }
}

/// `~/x` → `$HOME/x`.
fn expand_home(input: &str) -> PathBuf {
    match (input.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(input),
    }
}

/// Load `path` and replace the current tree.  On failure the current tree
/// stays and the error goes to the status bar.
pub fn open_path(state: &mut AppState, path: &Path) -> bool {
    match loader::load_path(path, state.format_override) {
        Ok(loaded) => {
            state.replace_document(loaded);
            state.status_message = Some(format!("Opened {}", path.display()));
            true
        }
        Err(err) => {
            tracing::warn!("open {} failed: {err}", path.display());
            state.status_message = Some(format!("Open failed: {err}"));
            false
        }
    }
}

// ── Window events ───────────────────────────────────────────────

/// Record a new terminal size.  Ignored while a group animation runs.
pub fn handle_resize(state: &mut AppState, width: u16, height: u16) -> bool {
    if state.is_animating() {
        return false;
    }
    state.terminal_area = Rect::new(0, 0, width, height);
    true
}

/// The terminal was shown again; re-validate the selection.  Ignored while a
/// group animation runs.
pub fn handle_focus(state: &mut AppState) -> bool {
    if state.is_animating() {
        return false;
    }
    let len = build_rows(state).len();
    state.tree_state.clamp_selection(len);
    true
}

// ── Mouse ───────────────────────────────────────────────────────

/// Mouse events that would disturb an in-flight animation.
fn suppressed_while_animating(kind: MouseEventKind) -> bool {
    matches!(
        kind,
        MouseEventKind::ScrollUp
            | MouseEventKind::ScrollDown
            | MouseEventKind::ScrollLeft
            | MouseEventKind::ScrollRight
            | MouseEventKind::Moved
            | MouseEventKind::Drag(_)
            | MouseEventKind::Up(_)
    )
}

/// Process a mouse event.
pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    handle_mouse_at(state, mouse, Instant::now());
}

/// [`handle_mouse`] with an explicit clock, for double-click timing.
pub fn handle_mouse_at(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    if state.is_animating() && suppressed_while_animating(mouse.kind) {
        return;
    }

    match state.active_view {
        ActiveView::Tree => handle_tree_mouse(state, mouse, now),
        ActiveView::ContextMenu => handle_menu_mouse(state, mouse, now),
        ActiveView::Help | ActiveView::OpenPrompt => {}
    }
}

fn handle_tree_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let layout = AppLayout::from_area(state.terminal_area);

    match mouse.kind {
        MouseEventKind::ScrollUp => {
            for _ in 0..WHEEL_STEP {
                state.tree_state.select_prev();
            }
        }
        MouseEventKind::ScrollDown => {
            let len = build_rows(state).len();
            for _ in 0..WHEEL_STEP {
                state.tree_state.select_next(len);
            }
        }
        MouseEventKind::Down(button @ (MouseButton::Left | MouseButton::Right)) => {
            let Some(index) = layout.row_at(mouse.column, mouse.row, state.tree_state.offset) else {
                return;
            };
            let rows = build_rows(state);
            let Some(row) = rows.get(index) else {
                return;
            };
            state.tree_state.selected = index;

            if button == MouseButton::Right {
                let node_id = row.node_id;
                open_context_menu(state, node_id, (mouse.column, mouse.row));
                return;
            }
            handle_left_click(state, row, layout.tree_content().x, mouse.column, now);
        }
        _ => {}
    }
}

fn handle_left_click(state: &mut AppState, row: &TreeRow, content_x: u16, column: u16, now: Instant) {
    let node_id = row.node_id;
    let window = Duration::from_millis(state.config.double_click_ms);
    let is_double = state
        .last_left_click
        .is_some_and(|(prev, at)| prev == node_id && now.saturating_duration_since(at) <= window);

    if is_double {
        state.last_left_click = None;
        if !state.is_animating() {
            toggle_node(state, node_id, now);
        }
        return;
    }
    state.last_left_click = Some((node_id, now));

    // Single click on the disclosure glyph toggles too.
    let glyph_x = content_x.saturating_add(u16::try_from(row.depth.saturating_sub(1) * 2).unwrap_or(u16::MAX));
    if row.child_count > 0 && (glyph_x..glyph_x.saturating_add(2)).contains(&column) {
        toggle_node(state, node_id, now);
    }
}

fn handle_menu_mouse(state: &mut AppState, mouse: MouseEvent, now: Instant) {
    let MouseEventKind::Down(button) = mouse.kind else {
        return;
    };
    let Some(menu) = state.context_menu.as_mut() else {
        state.active_view = ActiveView::Tree;
        return;
    };
    let rect = ContextMenuPopup::rect(menu, state.terminal_area);
    // Item cells only; the border does not count.
    let inside = mouse.column > rect.x
        && mouse.column < (rect.x + rect.width).saturating_sub(1)
        && mouse.row > rect.y
        && mouse.row < (rect.y + rect.height).saturating_sub(1);

    if inside && button == MouseButton::Left {
        menu.selected = usize::from(mouse.row - rect.y - 1);
        activate_menu_item(state, now);
        return;
    }

    close_context_menu(state);
    if button == MouseButton::Right {
        handle_tree_mouse(state, mouse, now);
    }
}

// ── helpers ─────────────────────────────────────────────────────

fn build_rows(state: &AppState) -> Vec<TreeRow> {
    tree_widget::build_rows(&state.tree, state.animation.as_ref())
}

fn selected_node_id(state: &AppState) -> Option<NodeId> {
    build_rows(state)
        .get(state.tree_state.selected)
        .map(|r| r.node_id)
}

fn select_node(state: &mut AppState, node_id: NodeId) {
    if let Some(index) = tree_widget::row_index_of(&build_rows(state), node_id) {
        state.tree_state.selected = index;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use crossterm::event::KeyEventState;

    use super::*;
    use crate::config::AppConfig;
    use crate::core::loader::sample_document;

    fn state() -> AppState {
        let mut s = AppState::new(sample_document(), AppConfig::default());
        s.terminal_area = Rect::new(0, 0, 80, 40);
        s
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn labels(s: &AppState) -> Vec<String> {
        build_rows(s).into_iter().map(|r| r.label).collect()
    }

    fn first_group(s: &AppState) -> NodeId {
        build_rows(s).iter().find(|r| r.is_group).map(|r| r.node_id).unwrap()
    }

    fn finish(s: &mut AppState) {
        handle_tick(s, Instant::now() + Duration::from_secs(5));
    }

    #[test]
    fn sample_starts_fully_expanded() {
        let s = state();
        assert_eq!(build_rows(&s).len(), 25);
        assert_eq!(&labels(&s)[..5], ["name", "John", "age", "30", "cars"]);
    }

    #[test]
    fn collapse_hides_group_only_after_animation() {
        let mut s = state();
        let group = first_group(&s);
        let t0 = Instant::now();
        assert!(toggle_group(&mut s, group, t0));
        assert!(s.tree.get(group).expanded);

        handle_tick(&mut s, t0 + Duration::from_millis(100));
        assert!(s.is_animating());
        assert!(s.tree.get(group).expanded);
        assert!(build_rows(&s).len() < 25);

        handle_tick(&mut s, t0 + Duration::from_millis(200));
        assert!(!s.is_animating());
        assert!(!s.tree.get(group).expanded);
        assert_eq!(build_rows(&s).len(), 25 - 6);
    }

    #[test]
    fn toggling_twice_restores_rows() {
        let mut s = state();
        let before = build_rows(&s);
        let group = first_group(&s);

        assert!(toggle_group(&mut s, group, Instant::now()));
        finish(&mut s);
        assert!(toggle_group(&mut s, group, Instant::now()));
        // Expansion is applied immediately; only the reveal is animated.
        assert!(s.tree.get(group).expanded);
        finish(&mut s);

        assert_eq!(build_rows(&s), before);
    }

    #[test]
    fn second_toggle_ignored_while_animating() {
        let mut s = state();
        let group = first_group(&s);
        let other = build_rows(&s).iter().filter(|r| r.is_group).nth(1).unwrap().node_id;
        let t0 = Instant::now();
        assert!(toggle_group(&mut s, group, t0));
        assert!(!toggle_group(&mut s, other, t0));
        assert!(!toggle_group(&mut s, group, t0));
        assert_eq!(s.animation.as_ref().map(|a| a.node), Some(group));
    }

    #[test]
    fn toggle_rejects_non_groups() {
        let mut s = state();
        let name = build_rows(&s)[0].node_id;
        assert!(!toggle_group(&mut s, name, Instant::now()));
        assert!(!s.is_animating());
    }

    #[test]
    fn window_events_suppressed_while_animating() {
        let mut s = state();
        let group = first_group(&s);
        toggle_group(&mut s, group, Instant::now());

        assert!(!handle_resize(&mut s, 100, 50));
        assert_eq!(s.terminal_area, Rect::new(0, 0, 80, 40));
        assert!(!handle_focus(&mut s));

        s.tree_state.selected = 0;
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 5, 5));
        assert_eq!(s.tree_state.selected, 0);

        finish(&mut s);
        assert!(handle_resize(&mut s, 100, 50));
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 5, 5));
        assert_eq!(s.tree_state.selected, WHEEL_STEP);
    }

    #[test]
    fn double_click_toggles_group_unless_animating() {
        let mut s = state();
        let group = first_group(&s);
        // Group row index 5 → terminal row 6 (content starts at y = 1).
        let click = mouse(MouseEventKind::Down(MouseButton::Left), 20, 6);
        let t0 = Instant::now();
        handle_mouse_at(&mut s, click, t0);
        assert_eq!(s.tree_state.selected, 5);
        handle_mouse_at(&mut s, click, t0 + Duration::from_millis(50));
        assert_eq!(s.animation.as_ref().map(|a| a.node), Some(group));

        // While that runs, another double-click on a different group is ignored.
        let rows = build_rows(&s);
        let second = rows.iter().filter(|r| r.is_group).nth(1).unwrap().node_id;
        let y = 1 + u16::try_from(tree_widget::row_index_of(&rows, second).unwrap()).unwrap();
        let click2 = mouse(MouseEventKind::Down(MouseButton::Left), 20, y);
        handle_mouse_at(&mut s, click2, t0 + Duration::from_millis(60));
        handle_mouse_at(&mut s, click2, t0 + Duration::from_millis(70));
        assert_eq!(s.animation.as_ref().map(|a| a.node), Some(group));
    }

    #[test]
    fn right_click_then_delete_removes_only_that_row() {
        let mut s = state();
        // "age" is row 2 → terminal row 3.
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Right), 10, 3));
        assert_eq!(s.active_view, ActiveView::ContextMenu);
        assert_eq!(s.context_menu.as_ref().map(|m| m.items.clone()), Some(vec![MenuItem::Delete]));

        handle_key(&mut s, key(KeyCode::Enter));
        assert_eq!(s.active_view, ActiveView::Tree);
        let rows = labels(&s);
        assert_eq!(rows.len(), 23);
        assert_eq!(&rows[..3], ["name", "John", "cars"]);
        assert!(!rows.contains(&"age".to_string()));
    }

    #[test]
    fn delete_group_via_menu_mouse_click() {
        let mut s = state();
        let group = first_group(&s);
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Right), 10, 6));
        let menu = s.context_menu.clone().unwrap();
        assert_eq!(menu.target, group);
        let rect = ContextMenuPopup::rect(&menu, s.terminal_area);
        // First item row sits just inside the border.
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), rect.x + 2, rect.y + 1));
        assert!(!s.tree.is_attached(group));
        assert_eq!(build_rows(&s).len(), 25 - 7);
    }

    #[test]
    fn click_outside_menu_closes_it() {
        let mut s = state();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Right), 10, 3));
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 70, 30));
        assert_eq!(s.active_view, ActiveView::Tree);
        assert!(s.context_menu.is_none());
        assert_eq!(build_rows(&s).len(), 25);
    }

    #[test]
    fn menu_collapse_item_starts_animation() {
        let mut s = state();
        let group = first_group(&s);
        s.tree_state.selected = 5;
        handle_key(&mut s, key(KeyCode::Char('m')));
        handle_key(&mut s, key(KeyCode::Down));
        handle_key(&mut s, key(KeyCode::Enter));
        assert_eq!(s.animation.as_ref().map(|a| (a.node, a.direction)), Some((group, ToggleDirection::Collapse)));
    }

    #[test]
    fn deep_rows_cannot_be_deleted() {
        let mut s = state();
        // "Fiesta" sits under cars → group → models.
        s.tree_state.selected = 9;
        handle_key(&mut s, key(KeyCode::Delete));
        assert_eq!(build_rows(&s).len(), 25);
        assert!(s.status_message.is_some());

        handle_key(&mut s, key(KeyCode::Char('m')));
        assert_eq!(s.active_view, ActiveView::Tree);
    }

    #[test]
    fn collapse_key_on_leaf_moves_to_parent() {
        let mut s = state();
        s.tree_state.selected = 1; // "John"
        handle_key(&mut s, key(KeyCode::Left));
        assert_eq!(s.tree_state.selected, 0);
        handle_key(&mut s, key(KeyCode::Left));
        assert!(!s.tree.get(build_rows(&s)[0].node_id).expanded);
        handle_key(&mut s, key(KeyCode::Right));
        assert!(s.tree.get(build_rows(&s)[0].node_id).expanded);
    }

    #[test]
    fn collapsing_group_pulls_selection_to_header() {
        let mut s = state();
        s.tree_state.selected = 7; // "Ford", inside the first group
        let group = first_group(&s);
        assert!(toggle_group(&mut s, group, Instant::now()));
        assert_eq!(s.tree_state.selected, 5);
        finish(&mut s);
        assert_eq!(s.tree_state.selected, 5);
    }

    #[test]
    fn opening_a_file_replaces_the_tree() {
        let mut s = state();
        let group = first_group(&s);
        toggle_group(&mut s, group, Instant::now());
        s.tree_state.selected = 10;

        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "only: [1, 2]").unwrap();
        assert!(open_path(&mut s, file.path()));

        assert_eq!(labels(&s), ["only", "1", "2"]);
        assert_eq!(s.tree_state.selected, 0);
        assert!(!s.is_animating());
        assert_eq!(s.source.as_deref(), Some(file.path()));
    }

    #[test]
    fn failed_open_keeps_current_tree() {
        let mut s = state();
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(!open_path(&mut s, &bad));
        assert_eq!(build_rows(&s).len(), 25);
        assert!(s.status_message.as_deref().is_some_and(|m| m.starts_with("Open failed")));
    }

    #[test]
    fn prompt_collects_input_and_opens() {
        let mut s = state();
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"x": true}}"#).unwrap();

        handle_key(&mut s, key(KeyCode::Char('o')));
        assert_eq!(s.active_view, ActiveView::OpenPrompt);
        s.open_input.clear();
        for ch in file.path().display().to_string().chars() {
            handle_key(&mut s, key(KeyCode::Char(ch)));
        }
        handle_key(&mut s, key(KeyCode::Char('!')));
        handle_key(&mut s, key(KeyCode::Backspace));
        handle_key(&mut s, key(KeyCode::Enter));

        assert_eq!(s.active_view, ActiveView::Tree);
        assert_eq!(labels(&s), ["x", "true"]);
    }

    #[test]
    fn help_opens_and_closes() {
        let mut s = state();
        handle_key(&mut s, key(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::Help);
        handle_key(&mut s, key(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Tree);
    }
}
