//! # Select Form Example
//!
//! Two controlled selects in one form:
//! - a single-choice fruit picker and a multiple-choice tag picker
//! - the form owns both values and adopts each `Changed` report
//! - Tab moves keyboard focus; clicking a select focuses it
//! - pointer events are routed to the open list first so overlapping
//!   widgets do not both react
//!
//! Logs go to `select_form.log` in the system temp dir; set `RUST_LOG` to
//! change the level.
//!
//! Run with: `cargo run --example select_form`

use picklist::crossterm::event::{KeyCode, KeyModifiers, MouseEvent};
use picklist::ratatui::layout::{Alignment, Constraint, Layout};
use picklist::ratatui::style::{Color, Modifier, Style};
use picklist::ratatui::text::{Line, Span};
use picklist::ratatui::widgets::{Block, Borders, Paragraph};
use picklist::ratatui::Frame;
use picklist::widgets::chrome::list_block;
use picklist::widgets::key::{help_line, KeyMap};
use picklist::widgets::select::{self, Select};
use picklist::widgets::{SelectOption, Selection};
use picklist::{terminal_events, Command, Component, Model, Subscription, TerminalEvent};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

struct FormApp {
    fruit: Select,
    tags: Select,
}

#[derive(Debug)]
enum Msg {
    Fruit(select::Message),
    Tags(select::Message),
    Pointer(MouseEvent),
    FocusNext,
    Quit,
}

fn describe(value: &Selection) -> String {
    if value.is_empty() {
        return "(none)".to_string();
    }
    value
        .options()
        .iter()
        .map(|o| format!("{}={}", o.label(), o.value()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Deliver a pointer event to `first`, and to `second` only when `first`
/// let go of focus. An open list may overlap the other select, so a press
/// on one of its entries must not reach the widget underneath.
fn route_pointer(
    first: &mut Select,
    second: &mut Select,
    event: MouseEvent,
) -> (Command<select::Message>, Command<select::Message>) {
    let cmd = first.update(select::Message::Mouse(event));
    if first.focused() {
        return (cmd, Command::none());
    }
    (cmd, second.update(select::Message::Mouse(event)))
}

impl FormApp {
    fn sync_focus(&mut self, fruit_focused: bool) {
        if fruit_focused {
            self.fruit.focus();
            self.tags.blur();
        } else {
            self.tags.focus();
            self.fruit.blur();
        }
    }
}

impl Model for FormApp {
    type Message = Msg;
    type Flags = ();

    fn init(_: ()) -> (Self, Command<Msg>) {
        let fruit = Select::single(vec![
            SelectOption::new("Apple", "apple"),
            SelectOption::new("Banana", "banana"),
            SelectOption::new("Cherry", "cherry"),
            SelectOption::new("Dragon fruit", "dragon-fruit"),
            SelectOption::new("Elderberry", "elderberry"),
        ])
        .with_title(" Fruit ")
        .with_placeholder("Pick a fruit...");

        let tags = Select::multiple(vec![
            SelectOption::new("Rust", "rust"),
            SelectOption::new("Go", "go"),
            SelectOption::new("Zig", "zig"),
            SelectOption::new("OCaml", "ocaml"),
            SelectOption::new("Haskell", "haskell"),
            SelectOption::new("Elixir", "elixir"),
            SelectOption::new("Answer", 42),
        ])
        .with_title(" Languages ")
        .with_placeholder("Tag some languages...")
        .with_max_visible(5)
        .with_list_block(list_block());

        let mut app = FormApp { fruit, tags };
        app.sync_focus(true);
        (app, Command::none())
    }

    fn update(&mut self, msg: Msg) -> Command<Msg> {
        match msg {
            Msg::Fruit(select::Message::Changed(value)) => {
                tracing::info!(value = %describe(&value), "fruit changed");
                self.fruit.set_value(value);
                Command::none()
            }
            Msg::Tags(select::Message::Changed(value)) => {
                tracing::info!(value = %describe(&value), "languages changed");
                self.tags.set_value(value);
                Command::none()
            }
            Msg::Fruit(m) => self.fruit.update(m).map(Msg::Fruit),
            Msg::Tags(m) => self.tags.update(m).map(Msg::Tags),
            Msg::Pointer(event) => {
                if self.tags.is_open() {
                    let (tags, fruit) = route_pointer(&mut self.tags, &mut self.fruit, event);
                    return Command::batch([tags.map(Msg::Tags), fruit.map(Msg::Fruit)]);
                }
                let (fruit, tags) = route_pointer(&mut self.fruit, &mut self.tags, event);
                Command::batch([fruit.map(Msg::Fruit), tags.map(Msg::Tags)])
            }
            Msg::FocusNext => {
                let fruit_next = !self.fruit.focused();
                self.sync_focus(fruit_next);
                Command::none()
            }
            Msg::Quit => Command::quit(),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        let [title_area, fruit_area, tags_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .areas(area);

        let title = Paragraph::new("Preferences")
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(title, title_area);

        let status = Paragraph::new(vec![
            Line::from(vec![
                Span::styled("fruit: ", Style::default().fg(Color::DarkGray)),
                Span::raw(describe(self.fruit.value())),
            ]),
            Line::from(vec![
                Span::styled("languages: ", Style::default().fg(Color::DarkGray)),
                Span::raw(describe(self.tags.value())),
            ]),
        ])
        .block(Block::default().borders(Borders::TOP));
        frame.render_widget(status, status_area);

        // Whichever list is open is drawn last so it stays on top.
        if self.fruit.is_open() {
            self.tags.view(frame, tags_area);
            self.fruit.view(frame, fruit_area);
        } else {
            self.fruit.view(frame, fruit_area);
            self.tags.view(frame, tags_area);
        }

        let keys = help_line(&self.fruit.keymap().short_help());
        let help = Paragraph::new(format!("tab focus • {keys} • q quit"))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        frame.render_widget(help, help_area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Msg>> {
        let mut subs = vec![terminal_events(|ev| match ev {
            TerminalEvent::Key(key) => match (key.code, key.modifiers) {
                (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => Some(Msg::Quit),
                (KeyCode::Char('q'), KeyModifiers::NONE) => Some(Msg::Quit),
                (KeyCode::Tab, _) | (KeyCode::BackTab, _) => Some(Msg::FocusNext),
                _ => None,
            },
            TerminalEvent::Mouse(event) => Some(Msg::Pointer(event)),
            _ => None,
        })];
        subs.extend(self.fruit.subscriptions().into_iter().map(|s| s.map(Msg::Fruit)));
        subs.extend(self.tags.subscriptions().into_iter().map(|s| s.map(Msg::Tags)));
        subs
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let file_appender = tracing_appender::rolling::never(std::env::temp_dir(), "select_form.log");
    let (file_writer, _guard) = tracing_appender::non_blocking(file_appender);

    // Stdout belongs to the terminal UI; logs go to the file only.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("picklist_widgets=debug,picklist_core=info,select_form=info")
        }))
        .with(fmt::layer().with_writer(file_writer).with_ansi(false))
        .init();

    tracing::info!("select form starting");
    let app = picklist::run::<FormApp>(()).await?;
    tracing::info!(
        fruit = %describe(app.fruit.value()),
        languages = %describe(app.tags.value()),
        "select form finished"
    );
    Ok(())
}
