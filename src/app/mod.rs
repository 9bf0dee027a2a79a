//! Application orchestration: state, events and input handling.

pub mod event;
pub mod handler;
pub mod menu;
pub mod state;
