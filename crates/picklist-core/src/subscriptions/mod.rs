//! Built-in subscription sources.
//!
//! - **Terminal events** ([`terminal_events`], [`terminal_events_with_id`])
//!   -- keyboard, mouse, resize, focus, and paste events from the terminal,
//!   fanned out from a single reader to any number of listeners.

mod terminal;

pub use terminal::*;
