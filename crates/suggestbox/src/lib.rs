//! **suggestbox** -- a searchable multi-select combobox for [`ratatui`].
//!
//! This is the umbrella crate that re-exports everything needed to embed a
//! suggest box from a single dependency:
//!
//! ```toml
//! [dependencies]
//! suggestbox = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`suggestbox_core`] are available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Program`], [`run`],
//!   [`run_with`], etc.).
//! * The [`widgets`] module re-exports everything from [`suggestbox_widgets`].
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use suggestbox::widgets::suggest_box::{Message, SuggestBox};
//! use suggestbox::{Command, Component};
//!
//! let mut fruit = SuggestBox::new()
//!     .with_items(vec!["Apple", "Apricot", "Banana"])
//!     .with_placeholder("Search fruits...");
//! let _ = fruit.update(Message::Focus);
//! assert_eq!(fruit.results().len(), 3);
//! ```
//!
//! See `demos/suggest.rs` (`cargo run --example suggest`) for a full
//! application.

pub use suggestbox_core::*;
pub mod widgets {
    pub use suggestbox_widgets::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use ratatui;
pub use tokio;
