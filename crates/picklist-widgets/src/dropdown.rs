//! Candidate list overlay for the select widget.
//!
//! The dropdown draws a window of options anchored above or below the
//! select's container, marks selected and highlighted entries
//! independently, and remembers where its rows landed so pointer events can
//! be mapped back to option positions.

use crate::highlight::Highlight;
use crate::option::{SelectOption, Selection};
use crate::text;
use ratatui::layout::{Position as Point, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph};
use ratatui::Frame;
use std::cell::Cell;

/// Position of the dropdown relative to its anchor area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Position {
    /// Render above the anchor area.
    Above,
    /// Render below the anchor area (default).
    #[default]
    Below,
}

/// Style configuration for the option list.
#[derive(Debug, Clone)]
pub struct DropdownStyle {
    /// Any entry.
    pub item: Style,
    /// Patched over entries that are part of the current selection.
    pub selected: Style,
    /// Patched over the highlighted entry.
    pub highlighted: Style,
    /// Prefix of the highlighted entry; other entries get matching padding.
    pub highlight_symbol: String,
    /// Suffix of selected entries.
    pub selected_symbol: String,
}

impl Default for DropdownStyle {
    fn default() -> Self {
        Self {
            item: Style::default(),
            selected: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            highlighted: Style::default().bg(Color::DarkGray),
            highlight_symbol: "▸ ".to_string(),
            selected_symbol: " ✓".to_string(),
        }
    }
}

pub struct Dropdown {
    highlight: Highlight,
    style: DropdownStyle,
    position: Position,
    block: Option<Block<'static>>,
    rows: Cell<Rect>,
}

impl Dropdown {
    pub fn new(max_visible: usize) -> Self {
        Self {
            highlight: Highlight::new(0, max_visible),
            style: DropdownStyle::default(),
            position: Position::default(),
            block: None,
            rows: Cell::new(Rect::default()),
        }
    }

    pub fn with_style(mut self, style: DropdownStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_block(mut self, block: Block<'static>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn highlight(&self) -> &Highlight {
        &self.highlight
    }

    pub fn highlight_mut(&mut self) -> &mut Highlight {
        &mut self.highlight
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// The option position drawn at terminal cell (`column`, `row`) by the
    /// last render, if any.
    pub fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let rows = self.rows.get();
        if !rows.contains(Point::new(column, row)) {
            return None;
        }
        let index = self.highlight.offset() + usize::from(row - rows.y);
        (index < self.highlight.count()).then_some(index)
    }

    /// Drop the remembered row geometry (the list is not on screen).
    pub fn forget(&self) {
        self.rows.set(Rect::default());
    }

    /// Draw the window of `options` next to `anchor`.
    pub fn render(
        &self,
        frame: &mut Frame,
        anchor: Rect,
        options: &[SelectOption],
        value: &Selection,
    ) {
        let window = self.highlight.window();
        let border = if self.block.is_some() { 2 } else { 0 };
        let wanted = window.len() as u16 + border;

        let screen = frame.area();
        let area = match self.position {
            Position::Above => {
                let height = wanted.min(anchor.y.saturating_sub(screen.y));
                Rect::new(anchor.x, anchor.y - height, anchor.width, height)
            }
            Position::Below => {
                let y = anchor.bottom();
                let height = wanted.min(screen.bottom().saturating_sub(y));
                Rect::new(anchor.x, y, anchor.width, height)
            }
        };
        if area.height == 0 || area.width < 4 {
            self.forget();
            return;
        }

        frame.render_widget(Clear, area);
        let inner = match self.block {
            Some(ref block) => {
                frame.render_widget(block.clone(), area);
                block.inner(area)
            }
            None => area,
        };

        let rows = Rect {
            height: inner.height.min(window.len() as u16),
            ..inner
        };
        self.rows.set(rows);

        let symbol_width = text::width(&self.style.highlight_symbol);
        let padding = " ".repeat(symbol_width);
        for (line_no, index) in window.take(rows.height as usize).enumerate() {
            let option = &options[index];
            let selected = value.contains(option);
            let highlighted = index == self.highlight.index();

            let mut style = self.style.item;
            if selected {
                style = style.patch(self.style.selected);
            }
            if highlighted {
                style = style.patch(self.style.highlighted);
            }

            let prefix = if highlighted {
                self.style.highlight_symbol.as_str()
            } else {
                padding.as_str()
            };
            let suffix = if selected {
                self.style.selected_symbol.as_str()
            } else {
                ""
            };
            let room = (rows.width as usize).saturating_sub(symbol_width + text::width(suffix));
            let label = text::truncate(option.label(), room, "…");

            let row_area = Rect {
                y: rows.y + line_no as u16,
                height: 1,
                ..rows
            };
            let line = Line::from(vec![
                Span::raw(prefix.to_string()),
                Span::raw(label),
                Span::raw(suffix.to_string()),
            ])
            .style(style);
            frame.render_widget(Paragraph::new(line).style(style), row_area);
        }
    }
}
