//! A host model owning two selects, driven through `TestProgram`.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use picklist_core::testing::TestProgram;
use picklist_core::{Command, Component, Model, Subscription};
use picklist_widgets::select::{self, Select};
use picklist_widgets::{OptionId, SelectOption, Selection};
use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;

struct Form {
    size: Select,
    toppings: Select,
    changes: usize,
}

#[derive(Debug)]
enum Msg {
    Size(select::Message),
    Toppings(select::Message),
    Swap,
}

fn sizes() -> Vec<SelectOption> {
    vec![
        SelectOption::with_id(OptionId::from_raw(1), "Small", "s"),
        SelectOption::with_id(OptionId::from_raw(2), "Large", "l"),
    ]
}

fn toppings() -> Vec<SelectOption> {
    vec![
        SelectOption::with_id(OptionId::from_raw(10), "Basil", "basil"),
        SelectOption::with_id(OptionId::from_raw(11), "Olives", "olives"),
        SelectOption::with_id(OptionId::from_raw(12), "Chili", "chili"),
    ]
}

impl Model for Form {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let mut size = Select::single(sizes()).with_placeholder("Size");
        size.focus();
        let toppings = Select::multiple(toppings()).with_placeholder("Toppings");
        (
            Form {
                size,
                toppings,
                changes: 0,
            },
            Command::none(),
        )
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Size(select::Message::Changed(value)) => {
                self.changes += 1;
                self.size.set_value(value);
                Command::none()
            }
            Msg::Toppings(select::Message::Changed(value)) => {
                self.changes += 1;
                self.toppings.set_value(value);
                Command::none()
            }
            Msg::Size(m) => self.size.update(m).map(Msg::Size),
            Msg::Toppings(m) => self.toppings.update(m).map(Msg::Toppings),
            Msg::Swap => {
                if self.size.focused() {
                    self.size.blur();
                    self.toppings.focus();
                } else {
                    self.toppings.blur();
                    self.size.focus();
                }
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame) {
        let [top, bottom] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(frame.area());
        self.size.view(frame, top);
        self.toppings.view(frame, bottom);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs: Vec<Subscription<Msg>> = self
            .size
            .subscriptions()
            .into_iter()
            .map(|s| s.map(Msg::Size))
            .collect();
        subs.extend(self.toppings.subscriptions().into_iter().map(|s| s.map(Msg::Toppings)));
        subs
    }
}

fn key(code: KeyCode) -> select::Message {
    select::Message::KeyPress(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    })
}

#[test]
fn keyboard_choice_is_adopted_by_host() {
    let mut program = TestProgram::<Form>::new(());
    program.send(Msg::Size(key(KeyCode::Enter)));
    program.send(Msg::Size(key(KeyCode::Down)));
    program.send(Msg::Size(key(KeyCode::Enter)));

    // The change is reported, not yet applied.
    assert_eq!(program.pending(), 1);
    assert!(program.model().size.value().is_empty());

    program.drain_messages();
    assert_eq!(program.model().changes, 1);
    assert_eq!(
        program.model().size.value(),
        &Selection::Single(Some(sizes()[1].clone()))
    );
    assert!(!program.model().size.is_open());
}

#[test]
fn host_can_veto_by_not_adopting() {
    let mut program = TestProgram::<Form>::new(());
    program.send(Msg::Toppings(select::Message::Choose(0)));
    assert_eq!(program.pending(), 1);
    // Dropping the pending report instead of draining leaves the value alone.
    assert!(program.model().toppings.value().is_empty());
}

#[test]
fn stable_ids_survive_option_rebuild() {
    let mut program = TestProgram::<Form>::new(());
    program.send(Msg::Toppings(select::Message::Choose(1)));
    program.drain_messages();

    // Rebuilding the options with the same ids keeps the selection marked.
    program.model_mut().toppings.set_options(toppings());
    let olives = &toppings()[1];
    assert!(program.model().toppings.is_selected(olives));

    program.send(Msg::Toppings(select::Message::Remove(olives.id())));
    program.drain_messages();
    assert!(program.model().toppings.value().is_empty());
    assert_eq!(program.model().changes, 2);
}

#[test]
fn only_the_focused_select_listens() {
    let mut program = TestProgram::<Form>::new(());
    let before = program.subscription_ids();
    assert_eq!(before.len(), 1);

    program.send(Msg::Swap);
    let after = program.subscription_ids();
    assert_eq!(after.len(), 1);
    assert_ne!(before, after);

    // The unfocused select ignores keys routed to it.
    program.send(Msg::Size(key(KeyCode::Enter)));
    assert!(!program.model().size.is_open());
}

#[test]
fn render_shows_both_values() {
    let mut program = TestProgram::<Form>::new(());
    // Each report is computed from the adopted value, so drain in between.
    for msg in [
        Msg::Size(select::Message::Choose(0)),
        Msg::Toppings(select::Message::Choose(2)),
        Msg::Toppings(select::Message::Choose(0)),
    ] {
        program.send(msg);
        program.drain_messages();
    }

    let screen = program.render_string(30, 2);
    let lines: Vec<&str> = screen.lines().collect();
    assert!(lines[0].starts_with("Small"));
    assert!(lines[1].starts_with("Chili × Basil ×"));
}
