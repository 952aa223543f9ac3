//! **picklist** -- dropdown select components for [`ratatui`] applications.
//!
//! This umbrella crate re-exports the runtime and the widgets from a single
//! dependency:
//!
//! ```toml
//! [dependencies]
//! picklist = "0.1"
//! ```
//!
//! * All public items from [`picklist_core`] are available at the crate root
//!   ([`Model`], [`Component`], [`Command`], [`Subscription`], [`Program`],
//!   [`run`], [`run_with`], etc.).
//! * The [`widgets`] module re-exports [`picklist_widgets`].
//! * [`ratatui`], [`crossterm`], and [`tokio`] are re-exported so downstream
//!   crates do not need to depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use picklist::widgets::select::{self, Select};
//! use picklist::widgets::SelectOption;
//! use picklist::{Command, Component, Model, Subscription};
//! use ratatui::Frame;
//!
//! struct Form {
//!     fruit: Select,
//! }
//!
//! enum Msg {
//!     Fruit(select::Message),
//! }
//!
//! impl Model for Form {
//!     type Message = Msg;
//!     type Flags = ();
//!
//!     fn init(_: ()) -> (Self, Command<Msg>) {
//!         let mut fruit = Select::single(vec![
//!             SelectOption::new("Apple", "apple"),
//!             SelectOption::new("Pear", "pear"),
//!         ]);
//!         fruit.focus();
//!         (Form { fruit }, Command::none())
//!     }
//!
//!     fn update(&mut self, msg: Msg) -> Command<Msg> {
//!         match msg {
//!             Msg::Fruit(select::Message::Changed(value)) => {
//!                 self.fruit.set_value(value);
//!                 Command::none()
//!             }
//!             Msg::Fruit(m) => self.fruit.update(m).map(Msg::Fruit),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         let area = frame.area();
//!         self.fruit.view(frame, area);
//!     }
//!
//!     fn subscriptions(&self) -> Vec<Subscription<Msg>> {
//!         self.fruit
//!             .subscriptions()
//!             .into_iter()
//!             .map(|s| s.map(Msg::Fruit))
//!             .collect()
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     picklist::run::<Form>(()).await.unwrap();
//! }
//! ```

pub use picklist_core::*;
pub mod widgets {
    pub use picklist_widgets::*;
}

pub use crossterm;
pub use ratatui;
pub use tokio;
