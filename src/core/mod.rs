//! Core algorithms – document model, file loading, and tree construction.
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod builder;
pub mod document;
pub mod loader;
pub mod tree;
