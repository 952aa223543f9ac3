use crate::command::{Command, CommandInner};
use crate::model::Model;
use crate::subscription::SubscriptionId;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::Terminal;

/// A headless harness that drives a [`Model`] without a real terminal.
///
/// Messages returned through [`Command::message`] are queued and can be
/// flushed with [`drain_messages`](TestProgram::drain_messages), which is how
/// a widget's change notification travels back into its host in tests.
///
/// ```rust,ignore
/// let mut prog = TestProgram::<FormApp>::new(());
/// prog.send(Msg::Fruit(select::Message::Choose(1)));
/// prog.drain_messages();
/// assert_eq!(prog.model().fruit.value().options().len(), 1);
/// ```
pub struct TestProgram<M: Model> {
    model: M,
    pending_messages: Vec<M::Message>,
    quit: bool,
}

impl<M: Model> TestProgram<M> {
    /// Create a test program by calling [`Model::init`] with the given flags.
    pub fn new(flags: M::Flags) -> Self {
        let (model, init_cmd) = M::init(flags);
        let mut program = Self {
            model,
            pending_messages: Vec::new(),
            quit: false,
        };
        program.collect(init_cmd);
        program
    }

    /// Send a message, triggering a single update cycle. Follow-up messages
    /// are queued, not processed.
    pub fn send(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.collect(cmd);
    }

    /// Process queued messages until no new ones are produced.
    pub fn drain_messages(&mut self) {
        while !self.pending_messages.is_empty() {
            let messages: Vec<_> = self.pending_messages.drain(..).collect();
            for msg in messages {
                let cmd = self.model.update(msg);
                self.collect(cmd);
            }
        }
    }

    /// Number of queued, unprocessed messages.
    pub fn pending(&self) -> usize {
        self.pending_messages.len()
    }

    /// Whether any update so far returned [`Command::quit`].
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Get a shared reference to the model for assertions.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Get a mutable reference to the model for direct test setup.
    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    /// Ids of the subscriptions the model currently declares.
    pub fn subscription_ids(&self) -> Vec<SubscriptionId> {
        self.model
            .subscriptions()
            .iter()
            .map(|sub| sub.id().clone())
            .collect()
    }

    /// Render the model to a ratatui [`Buffer`] of the given dimensions.
    pub fn render(&self, width: u16, height: u16) -> Buffer {
        let backend = ratatui::backend::TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("test backend never fails");
        terminal
            .draw(|frame| {
                self.model.view(frame);
            })
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Render the model and return the visible content, one line per row.
    pub fn render_string(&self, width: u16, height: u16) -> String {
        buffer_to_string(&self.render(width, height))
    }

    fn collect(&mut self, cmd: Command<M::Message>) {
        match cmd.inner {
            CommandInner::None => {}
            CommandInner::Message(msg) => self.pending_messages.push(msg),
            CommandInner::Quit => self.quit = true,
            CommandInner::Batch(cmds) => {
                for cmd in cmds {
                    self.collect(cmd);
                }
            }
        }
    }
}

/// Flatten a buffer into text, rows separated by newlines.
pub fn buffer_to_string(buf: &Buffer) -> String {
    let area: Rect = buf.area;
    let mut output = String::new();
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            output.push_str(buf[(x, y)].symbol());
        }
        if y + 1 < area.bottom() {
            output.push('\n');
        }
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::widgets::Paragraph;

    // Host that owns a list of chosen labels and toggles them through a
    // change notification, the way a controlled widget reports to its parent.
    struct Tags {
        chosen: Vec<&'static str>,
    }

    #[derive(Debug)]
    enum TagsMsg {
        Pick(&'static str),
        Changed(Vec<&'static str>),
        Done,
    }

    impl Model for Tags {
        type Message = TagsMsg;
        type Flags = Vec<&'static str>;

        fn init(chosen: Vec<&'static str>) -> (Self, Command<TagsMsg>) {
            (Tags { chosen }, Command::none())
        }

        fn update(&mut self, msg: TagsMsg) -> Command<TagsMsg> {
            match msg {
                TagsMsg::Pick(tag) => {
                    let mut next = self.chosen.clone();
                    match next.iter().position(|t| *t == tag) {
                        Some(i) => {
                            next.remove(i);
                        }
                        None => next.push(tag),
                    }
                    Command::message(TagsMsg::Changed(next))
                }
                TagsMsg::Changed(next) => {
                    self.chosen = next;
                    Command::none()
                }
                TagsMsg::Done => Command::quit(),
            }
        }

        fn view(&self, frame: &mut ratatui::Frame) {
            let text = format!("[{}]", self.chosen.join(", "));
            frame.render_widget(Paragraph::new(text), frame.area());
        }
    }

    #[test]
    fn init_with_flags() {
        let prog = TestProgram::<Tags>::new(vec!["a"]);
        assert_eq!(prog.model().chosen, vec!["a"]);
    }

    #[test]
    fn send_queues_follow_up_without_applying_it() {
        let mut prog = TestProgram::<Tags>::new(vec![]);
        prog.send(TagsMsg::Pick("a"));
        assert_eq!(prog.pending(), 1);
        assert!(prog.model().chosen.is_empty());
    }

    #[test]
    fn drain_applies_follow_up() {
        let mut prog = TestProgram::<Tags>::new(vec![]);
        prog.send(TagsMsg::Pick("a"));
        prog.send(TagsMsg::Pick("b"));
        prog.drain_messages();
        assert_eq!(prog.model().chosen, vec!["a", "b"]);
        assert_eq!(prog.pending(), 0);
    }

    #[test]
    fn quit_is_recorded() {
        let mut prog = TestProgram::<Tags>::new(vec![]);
        assert!(!prog.quit_requested());
        prog.send(TagsMsg::Done);
        assert!(prog.quit_requested());
    }

    #[test]
    fn no_subscriptions_by_default() {
        let prog = TestProgram::<Tags>::new(vec![]);
        assert!(prog.subscription_ids().is_empty());
    }

    #[test]
    fn render_after_update() {
        let mut prog = TestProgram::<Tags>::new(vec!["x"]);
        prog.send(TagsMsg::Pick("y"));
        prog.drain_messages();
        let content = prog.render_string(20, 1);
        assert!(content.starts_with("[x, y]"));
    }
}
