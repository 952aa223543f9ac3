//! Core runtime for **picklist**.
//!
//! `picklist-core` is the small Elm-style loop the select widget runs in:
//! state lives in a [`Model`], input arrives as messages through
//! [`Subscription`]s, `update` reacts and returns a [`Command`], and `view`
//! draws the result with [`ratatui`].
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Host application trait (init / update / view) |
//! | [`Component`] | Embeddable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Follow-up messages and program exit |
//! | [`Subscription`] | Long-lived event source, diffed by [`SubscriptionId`] after every update |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for unit-testing a [`Model`] |
//!
//! # Controlled components
//!
//! Widgets built on this crate do not own the values they display. A widget
//! reports a user's choice by returning `Command::message(Changed(..))`; the
//! host stores the new value and passes it back before the next render.

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{OutputTarget, Program, ProgramError, ProgramOptions};
pub use subscription::{Subscription, SubscriptionId};
pub use subscriptions::{terminal_events, terminal_events_with_id, TerminalEvents};

/// Run a picklist application with default options.
pub async fn run<M: Model>(flags: M::Flags) -> Result<M, ProgramError> {
    Program::<M>::new(flags)?.run().await
}

/// Run with custom options.
pub async fn run_with<M: Model>(
    flags: M::Flags,
    options: ProgramOptions,
) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
