//! Border helpers shared by the select container and its list.

use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Borders};

/// Bordered container whose border color reflects keyboard focus: cyan
/// when focused, dark gray otherwise.
pub fn focus_block(title: &str, focused: bool) -> Block<'_> {
    let color = if focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };
    Block::new()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title)
        .border_style(Style::default().fg(color))
}

/// Plain bordered block for an option list overlay.
pub fn list_block() -> Block<'static> {
    Block::new()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::layout::Rect;

    #[test]
    fn blocks_reserve_a_border() {
        let area = Rect::new(0, 0, 10, 3);
        assert_eq!(focus_block("t", true).inner(area), Rect::new(1, 1, 8, 1));
        assert_eq!(list_block().inner(area), Rect::new(1, 1, 8, 1));
    }
}
