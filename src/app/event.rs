//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  Ticks
//! drive the group animation.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// The terminal regained focus (the window was shown again).
    Focus,
    Tick,
}

/// Spawns a background task that polls the terminal for events and sends them
/// through the returned channel.
pub fn spawn_event_reader(tick_rate: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            // Use crossterm's poll with the tick rate so we can send Tick
            // events even when nothing is happening.
            let has_event = event::poll(tick_rate).unwrap_or(false);
            let app_event = if has_event {
                match event::read() {
                    Ok(CtEvent::Key(k)) => AppEvent::Key(k),
                    Ok(CtEvent::Mouse(m)) => AppEvent::Mouse(m),
                    Ok(CtEvent::Resize(w, h)) => AppEvent::Resize(w, h),
                    Ok(CtEvent::FocusGained) => AppEvent::Focus,
                    _ => continue,
                }
            } else {
                AppEvent::Tick
            };
            if tx.send(app_event).is_err() {
                break; // receiver dropped
            }
        }
    });

    rx
}
