//! A terminal JSON/YAML tree viewer.
//!
//! Run the binary with a file to browse it as an expandable tree.
//! Run with `--dump` to print the tree as plain text and exit.

mod app;
mod config;
mod core;
mod ui;

use std::io::{self, stderr};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::core::loader::{self, DocumentFormat};
use crate::ui::{
    layout::AppLayout,
    popup::{ContextMenuPopup, HelpPopup, OpenPrompt},
    theme::Theme,
    tree_widget::TreeWidget,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "JSON/YAML tree viewer")]
struct Cli {
    /// File to open (`.json`, `.yaml`, `.yml`, or anything parseable).
    /// Without it a small sample document is shown.
    path: Option<PathBuf>,

    /// Force the parser instead of guessing from the extension.
    #[arg(long, value_enum)]
    format: Option<DocumentFormat>,

    /// Group expand/collapse animation length in milliseconds (50 to 2000).
    #[arg(long)]
    animation_ms: Option<u64>,

    /// Print the tree as indented text and exit.
    #[arg(long)]
    dump: bool,
}

/// Frame interval while idle; also the animation step.
const TICK_RATE: Duration = Duration::from_millis(16);

// ───────────────────────────────────────── main ─────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing (only in debug builds / when RUST_LOG is set).
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr) // never pollute stdout
        .init();

    let cli = Cli::parse();

    // ── load the document before touching the terminal ────────
    let loaded = match &cli.path {
        Some(path) => loader::load_path(path, cli.format)
            .with_context(|| format!("failed to open {}", path.display()))?,
        None => loader::sample_document(),
    };

    if cli.dump {
        let tree = core::builder::build_tree(&loaded.document);
        print!("{}", core::builder::dump(&tree));
        return Ok(());
    }

    let mut config = config::AppConfig::load();
    if let Some(ms) = cli.animation_ms {
        config.set_animation_ms(ms);
    }
    let mut state = AppState::new(loaded, config);
    state.format_override = cli.format;

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(
        stderr_handle,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    state.terminal_area = Rect::new(0, 0, size.width, size.height);

    let result = run(&mut terminal, &mut state).await;

    // ── teardown ──────────────────────────────────────────────
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

/// Draw / dispatch loop.  Returns when the user quits.
async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stderr>>,
    state: &mut AppState,
) -> Result<()> {
    let mut events = spawn_event_reader(TICK_RATE);

    loop {
        terminal.draw(|frame| draw(frame, state))?;

        let Some(event) = events.recv().await else {
            break;
        };
        match event {
            AppEvent::Key(k) => handler::handle_key(state, k),
            AppEvent::Mouse(m) => handler::handle_mouse(state, m),
            AppEvent::Resize(w, h) => {
                if !handler::handle_resize(state, w, h) {
                    tracing::trace!("resize ignored during animation");
                }
            }
            AppEvent::Focus => {
                handler::handle_focus(state);
            }
            AppEvent::Tick => {}
        }
        handler::handle_tick(state, Instant::now());

        if state.should_quit {
            break;
        }
    }
    Ok(())
}

fn draw(frame: &mut ratatui::Frame, state: &mut AppState) {
    // Geometry is frozen while a group animates.
    if !state.is_animating() {
        state.terminal_area = frame.area();
    }
    let layout = AppLayout::from_area(frame.area());

    let tree_block = Block::default()
        .title(state.title())
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());

    let tree_widget = TreeWidget::new(&state.tree)
        .animation(state.animation.as_ref())
        .block(tree_block);
    frame.render_stateful_widget(tree_widget, layout.tree_area, &mut state.tree_state);

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Tree => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::ContextMenu => "↑/↓: choose | Enter: apply | Esc: close",
        ActiveView::Help | ActiveView::OpenPrompt => "",
    };
    let status = Paragraph::new(status_text).style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);

    match state.active_view {
        ActiveView::ContextMenu => {
            if let Some(menu) = &state.context_menu {
                frame.render_widget(ContextMenuPopup { menu }, frame.area());
            }
        }
        ActiveView::Help => {
            frame.render_widget(HelpPopup { config: &state.config }, frame.area());
        }
        ActiveView::OpenPrompt => {
            frame.render_widget(OpenPrompt { input: &state.open_input }, frame.area());
        }
        ActiveView::Tree => {}
    }
}
