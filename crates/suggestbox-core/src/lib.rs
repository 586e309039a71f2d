//! Core runtime for **suggestbox**.
//!
//! `suggestbox-core` provides the small [Elm Architecture] kernel the suggest
//! box widget is written against: state changes happen in `update`, side
//! effects (async lookups, timers, notifications to a parent) are returned as
//! [`Command`]s, and rendering is a pure `view` over state.
//!
//! # Key types
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view / on_event) |
//! | [`Component`] | Reusable sub-model that renders into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Describes a side effect to be executed by the runtime |
//! | [`Program`] | Wires a [`Model`] to a real terminal and drives the event loop |
//! | [`TestProgram`](testing::TestProgram) | Headless harness with controllable async completion |
//!
//! The runtime is single-threaded in the sense that matters: `update` is only
//! ever called from the loop task, one message at a time.  Async commands run
//! on tokio and re-enter as messages, so the only concurrency a component has
//! to reason about is the *interleaving* of those completions with input.
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};

/// Run an application with default options.
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
