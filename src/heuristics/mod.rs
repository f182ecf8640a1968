//! Heuristic analysis of raw bytes.
//!
//! This module decides whether a byte window is probably text, so that
//! stream previews can be shown in readable form next to their hex dump.

pub mod text;

pub use text::*;
