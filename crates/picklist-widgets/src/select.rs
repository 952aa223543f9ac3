//! Dropdown select with single and multiple selection.
//!
//! `Select` is a controlled component: the host hands it the candidate
//! options and the current [`Selection`], and the widget never changes that
//! value itself. When the user chooses, removes or clears, `update` returns
//! [`Message::Changed`] carrying the proposed new value; the host stores it
//! and passes it back with [`Select::set_value`].
//!
//! The widget owns only transient state: whether the list is open, which
//! candidate is highlighted, and whether it has keyboard focus.
//!
//! # Example
//!
//! ```ignore
//! use picklist_widgets::option::SelectOption;
//! use picklist_widgets::select::{self, Select};
//!
//! let mut tags = Select::multiple(vec![
//!     SelectOption::new("Rust", "rust"),
//!     SelectOption::new("Go", "go"),
//! ])
//! .with_title(" Tags ");
//!
//! // in the host's update:
//! match msg {
//!     Msg::Tags(select::Message::Changed(value)) => tags.set_value(value),
//!     Msg::Tags(m) => return tags.update(m).map(Msg::Tags),
//! }
//! ```

use crate::chrome;
use crate::dropdown::{Dropdown, DropdownStyle, Position};
use crate::key::{Binding, KeyCombination, KeyMap};
use crate::option::{OptionId, SelectOption, Selection};
use crate::text;
use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use picklist_core::command::Command;
use picklist_core::component::Component;
use picklist_core::subscription::{Subscription, SubscriptionId};
use picklist_core::subscriptions::terminal_events_with_id;
use ratatui::layout::{Constraint, Layout, Position as Point, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;
use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_INSTANCE: AtomicU64 = AtomicU64::new(1);

const CLEAR_MARK: &str = "×";
const DIVIDER: &str = "│";
const CARET_OPEN: &str = "▾";
const CARET_CLOSED: &str = "▸";
/// `× │ ▾`
const CONTROLS_WIDTH: u16 = 5;

/// Messages for the select component.
#[derive(Debug, Clone)]
pub enum Message {
    /// Key press, handled only while focused with keyboard support on.
    KeyPress(KeyEvent),
    /// Raw pointer event, hit-tested against the last render.
    Mouse(MouseEvent),
    /// The container was clicked.
    ToggleOpen,
    /// Open the list programmatically.
    Open,
    /// Close the list programmatically.
    Close,
    /// Give the widget keyboard focus.
    Focus,
    /// The widget lost focus; the list closes.
    Blur,
    /// The candidate at this position was clicked: select it and close.
    Choose(usize),
    /// The remove badge of this selected option was clicked.
    Remove(OptionId),
    /// The clear button was clicked.
    Clear,
    /// The pointer entered the candidate at this position.
    Hover(usize),
    /// Output only: the value the host should adopt.
    Changed(Selection),
}

/// Visual style for the [`Select`] trigger; the list has its own
/// [`DropdownStyle`].
#[derive(Debug, Clone)]
pub struct SelectStyle {
    /// Selected label in single mode.
    pub text: Style,
    /// Placeholder shown when nothing is selected.
    pub placeholder: Style,
    /// Option badges in multiple mode.
    pub badge: Style,
    /// Clear button, divider and caret.
    pub controls: Style,
    /// Candidate list.
    pub list: DropdownStyle,
}

impl Default for SelectStyle {
    fn default() -> Self {
        Self {
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            badge: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            controls: Style::default().fg(Color::DarkGray),
            list: DropdownStyle::default(),
        }
    }
}

/// Key bindings of the select component.
#[derive(Debug, Clone)]
pub struct SelectKeyMap {
    /// Open the list, or commit the highlighted option and close it.
    pub toggle: Binding,
    /// Open the list, or move the highlight up.
    pub up: Binding,
    /// Open the list, or move the highlight down.
    pub down: Binding,
    /// Close the list.
    pub close: Binding,
}

impl Default for SelectKeyMap {
    fn default() -> Self {
        Self {
            toggle: Binding::new(
                vec![
                    KeyCombination::new(KeyCode::Enter),
                    KeyCombination::new(KeyCode::Char(' ')),
                ],
                "choose",
            ),
            up: Binding::new(vec![KeyCombination::new(KeyCode::Up)], "up"),
            down: Binding::new(vec![KeyCombination::new(KeyCode::Down)], "down"),
            close: Binding::new(vec![KeyCombination::new(KeyCode::Esc)], "close"),
        }
    }
}

impl KeyMap for SelectKeyMap {
    fn short_help(&self) -> Vec<&Binding> {
        vec![&self.toggle, &self.up, &self.down, &self.close]
    }

    fn full_help(&self) -> Vec<Vec<&Binding>> {
        vec![vec![&self.up, &self.down], vec![&self.toggle, &self.close]]
    }
}

/// Where the last render put the clickable parts of the trigger.
#[derive(Debug, Default)]
struct HitRegions {
    container: Rect,
    clear: Rect,
    badges: Vec<(Rect, OptionId)>,
}

/// A dropdown select over a list of [`SelectOption`]s.
pub struct Select {
    instance: u64,
    options: Vec<SelectOption>,
    value: Selection,
    open: bool,
    focus: bool,
    keyboard: bool,
    title: Option<String>,
    placeholder: String,
    style: SelectStyle,
    keymap: SelectKeyMap,
    block: Option<Block<'static>>,
    dropdown: Dropdown,
    regions: RefCell<HitRegions>,
}

impl Select {
    /// Create a select over `options` showing `value`. The mode follows the
    /// shape of `value`.
    pub fn new(options: Vec<SelectOption>, value: Selection) -> Self {
        let mut dropdown = Dropdown::new(8);
        dropdown.highlight_mut().set_count(options.len());
        Self {
            instance: NEXT_INSTANCE.fetch_add(1, Ordering::Relaxed),
            options,
            value,
            open: false,
            focus: false,
            keyboard: true,
            title: None,
            placeholder: "Select...".to_string(),
            style: SelectStyle::default(),
            keymap: SelectKeyMap::default(),
            block: None,
            dropdown,
            regions: RefCell::new(HitRegions::default()),
        }
    }

    /// Single-selection select with nothing selected.
    pub fn single(options: Vec<SelectOption>) -> Self {
        Self::new(options, Selection::single())
    }

    /// Multiple-selection select with nothing selected.
    pub fn multiple(options: Vec<SelectOption>) -> Self {
        Self::new(options, Selection::multiple())
    }

    pub fn with_value(mut self, value: Selection) -> Self {
        self.value = value;
        self
    }

    /// Draw a focus-aware rounded border with this title around the trigger.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_style(mut self, style: SelectStyle) -> Self {
        self.dropdown = self.dropdown.with_style(style.list.clone());
        self.style = style;
        self
    }

    pub fn with_keymap(mut self, keymap: SelectKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Turn keyboard handling on (default) or off. Without it the widget
    /// reacts to the pointer only and never registers a key listener.
    pub fn with_keyboard(mut self, enabled: bool) -> Self {
        self.keyboard = enabled;
        self
    }

    /// Maximum number of list rows before the list scrolls.
    pub fn with_max_visible(mut self, rows: usize) -> Self {
        self.dropdown.highlight_mut().set_visible(rows);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.dropdown = self.dropdown.with_position(position);
        self
    }

    /// Fixed block around the trigger; takes precedence over
    /// [`with_title`](Select::with_title).
    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    /// Block around the candidate list.
    pub fn with_list_block(mut self, block: Block<'static>) -> Self {
        self.dropdown = self.dropdown.with_block(block);
        self
    }

    /// Replace the candidate list. The highlight stays where it was when
    /// that position still exists.
    pub fn set_options(&mut self, options: Vec<SelectOption>) {
        self.dropdown.highlight_mut().set_count(options.len());
        self.options = options;
    }

    /// Adopt the value the host decided on.
    pub fn set_value(&mut self, value: Selection) {
        self.value = value;
    }

    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn value(&self) -> &Selection {
        &self.value
    }

    pub fn is_multiple(&self) -> bool {
        self.value.is_multiple()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Position of the highlighted candidate.
    pub fn highlighted(&self) -> usize {
        self.dropdown.highlight().index()
    }

    pub fn highlighted_option(&self) -> Option<&SelectOption> {
        self.options.get(self.highlighted())
    }

    pub fn is_selected(&self, option: &SelectOption) -> bool {
        self.value.contains(option)
    }

    pub fn keymap(&self) -> &SelectKeyMap {
        &self.keymap
    }

    pub fn focus(&mut self) {
        self.focus = true;
    }

    /// Remove keyboard focus; an open list closes.
    pub fn blur(&mut self) {
        self.focus = false;
        self.set_open(false);
    }

    /// Ask the host to empty the value.
    pub fn clear(&self) -> Command<Message> {
        self.emit(self.value.cleared())
    }

    /// Ask the host to toggle `option` (multiple) or switch to it (single).
    /// Reselecting the current single value asks nothing.
    pub fn toggle_or_set(&self, option: &SelectOption) -> Command<Message> {
        match self.value.toggled(option) {
            Some(next) => self.emit(next),
            None => Command::none(),
        }
    }

    fn emit(&self, next: Selection) -> Command<Message> {
        tracing::debug!(
            select = self.instance,
            selected = next.options().len(),
            "selection changed"
        );
        Command::message(Message::Changed(next))
    }

    fn set_open(&mut self, open: bool) {
        if open == self.open {
            return;
        }
        if open {
            self.dropdown.highlight_mut().reset();
        }
        self.open = open;
        tracing::trace!(select = self.instance, open, "list toggled");
    }

    fn handle_key(&mut self, key: KeyEvent) -> Command<Message> {
        if self.keymap.toggle.matches(&key) {
            let was_open = self.open;
            let committed = self.highlighted_option().cloned();
            self.set_open(!was_open);
            match committed {
                Some(option) if was_open => self.toggle_or_set(&option),
                _ => Command::none(),
            }
        } else if self.keymap.up.matches(&key) || self.keymap.down.matches(&key) {
            if self.open {
                let delta = if self.keymap.down.matches(&key) { 1 } else { -1 };
                self.dropdown.highlight_mut().step(delta);
            } else {
                self.set_open(true);
            }
            Command::none()
        } else if self.keymap.close.matches(&key) {
            self.set_open(false);
            Command::none()
        } else {
            Command::none()
        }
    }

    /// Translate a pointer event into the message it stands for.
    fn hit_test(&self, event: MouseEvent) -> Option<Message> {
        let point = Point::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let regions = self.regions.borrow();
                if regions.clear.contains(point) {
                    return Some(Message::Clear);
                }
                if let Some((_, id)) = regions.badges.iter().find(|(r, _)| r.contains(point)) {
                    return Some(Message::Remove(*id));
                }
                if self.open {
                    if let Some(index) = self.dropdown.row_at(event.column, event.row) {
                        return Some(Message::Choose(index));
                    }
                }
                if regions.container.contains(point) {
                    return Some(Message::ToggleOpen);
                }
                self.focus.then_some(Message::Blur)
            }
            MouseEventKind::Moved if self.open => self
                .dropdown
                .row_at(event.column, event.row)
                .map(Message::Hover),
            _ => None,
        }
    }

    fn container_block(&self) -> Option<Block<'_>> {
        match (&self.block, &self.title) {
            (Some(block), _) => Some(block.clone()),
            (None, Some(title)) => Some(chrome::focus_block(title, self.focus)),
            (None, None) => None,
        }
    }

    /// Badges for multiple mode, laid out left to right in `area`. A badge
    /// too wide for the remaining room is shortened; once even a short one
    /// does not fit, the rest collapse into a `+N` counter, itself dropped
    /// when there is no room for it.
    fn badge_spans(&self, area: Rect, badges: &mut Vec<(Rect, OptionId)>) -> Vec<Span<'static>> {
        const MIN_LABEL: usize = 3;
        let mark = format!(" {CLEAR_MARK}");
        let mark_width = text::width(&mark);

        let selected = self.value.options();
        let right = usize::from(area.right());
        let mut x = usize::from(area.x);
        let mut spans = Vec::new();
        for (i, option) in selected.iter().enumerate() {
            let rest = selected.len() - i - 1;
            // Keep room for a trailing " +N" unless this is the last badge.
            let reserve = if rest > 0 { rest.to_string().len() + 2 } else { 0 };
            let room = right.saturating_sub(x).saturating_sub(reserve);

            let label_room = room.saturating_sub(mark_width);
            let label = if text::width(option.label()) <= label_room {
                option.label().to_string()
            } else if label_room >= MIN_LABEL {
                text::truncate(option.label(), label_room, "…")
            } else {
                let counter = format!("+{}", selected.len() - i);
                if x.saturating_add(text::width(&counter)) <= right {
                    spans.push(Span::styled(counter, self.style.controls));
                }
                break;
            };

            let badge = format!("{label}{mark}");
            let w = text::width(&badge);
            badges.push((
                Rect::new(
                    u16::try_from(x).unwrap_or(u16::MAX),
                    area.y,
                    u16::try_from(w).unwrap_or(u16::MAX),
                    1,
                ),
                option.id(),
            ));
            spans.push(Span::styled(badge, self.style.badge));
            spans.push(Span::raw(" "));
            x = x.saturating_add(w).saturating_add(1);
        }
        spans
    }
}

impl Component for Select {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) if self.focus && self.keyboard => self.handle_key(key),
            Message::KeyPress(_) => Command::none(),
            Message::Mouse(event) => {
                let Some(msg) = self.hit_test(event) else {
                    return Command::none();
                };
                if !matches!(msg, Message::Blur | Message::Hover(_)) {
                    self.focus = true;
                }
                self.update(msg)
            }
            Message::ToggleOpen => {
                self.set_open(!self.open);
                Command::none()
            }
            Message::Open => {
                self.set_open(true);
                Command::none()
            }
            Message::Close => {
                self.set_open(false);
                Command::none()
            }
            Message::Focus => {
                self.focus();
                Command::none()
            }
            Message::Blur => {
                self.blur();
                Command::none()
            }
            Message::Choose(index) => {
                let Some(option) = self.options.get(index).cloned() else {
                    return Command::none();
                };
                let cmd = self.toggle_or_set(&option);
                self.set_open(false);
                cmd
            }
            Message::Remove(id) => {
                match self.value.options().iter().find(|o| o.id() == id).cloned() {
                    Some(option) => self.toggle_or_set(&option),
                    None => Command::none(),
                }
            }
            Message::Clear => self.clear(),
            Message::Hover(index) => {
                if self.open {
                    self.dropdown.highlight_mut().hover(index);
                }
                Command::none()
            }
            Message::Changed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let inner = match self.container_block() {
            Some(block) => {
                let inner = block.inner(area);
                frame.render_widget(block, area);
                inner
            }
            None => area,
        };

        let mut regions = self.regions.borrow_mut();
        regions.container = area;
        regions.badges.clear();
        regions.clear = Rect::default();

        if inner.width > CONTROLS_WIDTH && inner.height > 0 {
            let line_area = Rect { height: 1, ..inner };
            let [value_area, _, controls_area] = Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(CONTROLS_WIDTH),
            ])
            .areas(line_area);

            let spans = if self.value.is_empty() {
                vec![Span::styled(
                    text::truncate(&self.placeholder, value_area.width as usize, "…"),
                    self.style.placeholder,
                )]
            } else if self.is_multiple() {
                self.badge_spans(value_area, &mut regions.badges)
            } else {
                let label = self.value.options()[0].label();
                vec![Span::styled(
                    text::truncate(label, value_area.width as usize, "…"),
                    self.style.text,
                )]
            };
            frame.render_widget(Paragraph::new(Line::from(spans)), value_area);

            let caret = if self.open { CARET_OPEN } else { CARET_CLOSED };
            let controls = Line::from(vec![
                Span::styled(CLEAR_MARK, self.style.controls),
                Span::raw(" "),
                Span::styled(DIVIDER, self.style.controls),
                Span::raw(" "),
                Span::styled(caret, self.style.controls),
            ]);
            frame.render_widget(Paragraph::new(controls), controls_area);
            regions.clear = Rect {
                width: 1,
                ..controls_area
            };
        }
        drop(regions);

        if self.open {
            self.dropdown.render(frame, area, &self.options, &self.value);
        } else {
            self.dropdown.forget();
        }
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if !(self.focus && self.keyboard) {
            return vec![];
        }
        vec![terminal_events_with_id(
            SubscriptionId::new::<Select>(self.instance),
            |event| event.key_press().map(Message::KeyPress),
        )]
    }

    fn focused(&self) -> bool {
        self.focus
    }
}
