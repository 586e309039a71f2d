//! Searchable multi-select suggest box for **suggestbox**.
//!
//! [`SuggestBox`](suggest_box::SuggestBox) implements
//! [`suggestbox_core::Component`], so it can be embedded inside any
//! [`suggestbox_core::Model`] and placed anywhere in a [`ratatui`] layout.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`suggest_box`] | The combobox component, its messages, options and style |
//! | [`provider`] | Suggestion sources and the lookup state behind the dropdown |
//! | [`request`] | Last-issued-wins request tokens |
//! | [`cursor`] | Highlight position and scroll window |
//! | [`selection`] | Ordered list of chosen items |
//! | [`view_state`] | Pure projection of state into displayed regions |
//! | [`filter`] | Default case-insensitive substring filter |
//! | [`item`] | The [`Item`](item::Item) trait for anything with a label |
//! | [`text_edit`] | Single-line query buffer with a caret |

pub mod cursor;
pub mod filter;
pub mod item;
pub mod provider;
pub mod request;
pub mod selection;
pub mod suggest_box;
pub mod text_edit;
pub mod view_state;

pub use item::{Item, Named};
pub use suggest_box::{SuggestBox, SuggestBoxOptions, SuggestBoxStyle};
