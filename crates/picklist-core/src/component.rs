use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a given [`Rect`] area.
///
/// `Component` mirrors [`Model`](crate::Model), except that
/// [`view`](Component::view) receives the area to draw into, so a parent
/// decides where each child goes.
///
/// # Composition pattern
///
/// Wrap the child's message type in a parent variant and lift returned
/// commands with [`Command::map`]. A controlled child reports changes as a
/// message; the parent intercepts it, stores the new value, and hands it back:
///
/// ```rust,ignore
/// use picklist_core::{Model, Component, Command};
/// use picklist_widgets::select::{self, Select};
///
/// struct App { fruit: Select }
///
/// enum Msg { Fruit(select::Message) }
///
/// impl Model for App {
///     // ...
///     fn update(&mut self, msg: Msg) -> Command<Msg> {
///         match msg {
///             Msg::Fruit(select::Message::Changed(value)) => {
///                 self.fruit.set_value(value);
///                 Command::none()
///             }
///             Msg::Fruit(m) => self.fruit.update(m).map(Msg::Fruit),
///         }
///     }
/// }
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Process a message, mutate transient state, and return a [`Command`]
    /// for anything the parent has to know about.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`. Implementations confine drawing to that rectangle,
    /// overlays excepted.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Event sources this component needs right now.
    ///
    /// The parent collects these into its own
    /// [`Model::subscriptions`](crate::Model::subscriptions), mapping
    /// messages as it does for commands. Returning a different set on a later
    /// cycle starts or stops sources accordingly.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }

    /// Whether this component currently has focus.
    fn focused(&self) -> bool {
        false
    }
}
