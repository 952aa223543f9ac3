//! Dropdown select widgets for the **picklist** TUI framework.
//!
//! [`Select`](select::Select) implements [`picklist_core::Component`], so it
//! can be embedded in any [`picklist_core::Model`] and placed in a
//! [`ratatui`] layout like any other child.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`select`] | Single or multiple selection with keyboard and pointer input |
//! | [`option`] | [`SelectOption`](option::SelectOption) and the [`Selection`](option::Selection) value |
//! | [`dropdown`] | Candidate list overlay drawn next to the select |
//! | [`highlight`] | Bounded highlight cursor with a scrolling window |
//! | [`key`] | Key bindings and help-line rendering |
//! | [`chrome`] | Border helpers |
//! | [`text`] | Unicode-aware width and truncation |

pub mod chrome;
pub mod dropdown;
pub mod highlight;
pub mod key;
pub mod option;
pub mod select;
pub mod text;

pub use option::{OptionId, OptionValue, SelectOption, Selection};
pub use select::Select;
