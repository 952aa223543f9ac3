use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait.
///
/// A host application implements `Model`. The runtime drives the cycle:
///
/// 1. [`init`](Model::init) builds the initial state.
/// 2. [`view`](Model::view) draws it.
/// 3. Events arrive as messages through [`Subscription`]s.
/// 4. [`update`](Model::update) handles each message and may return a
///    [`Command`].
/// 5. [`subscriptions`](Model::subscriptions) is consulted again and the
///    active set is reconciled, then back to step 2.
///
/// The host is the single source of truth for the values its widgets show:
/// widgets report changes as messages, and the host decides what to store.
pub trait Model: Sized + Send + 'static {
    /// The application's message type.
    type Message: Send + 'static;

    /// Initialization data passed to [`Model::init`].
    type Flags: Send + 'static;

    /// Create the initial model state and an optional startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Process a message, mutate state, and return a command for follow-up
    /// messages.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Must not mutate the model.
    fn view(&self, frame: &mut Frame);

    /// Declare active subscriptions. Called after every update; the runtime
    /// starts sources that are new and aborts those that disappeared.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
