//! Key bindings and the key map trait used to render help lines.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::fmt;

/// A key binding: one or more key combinations mapped to a described action.
#[derive(Debug, Clone)]
pub struct Binding {
    /// The key combinations that trigger this binding.
    pub keys: Vec<KeyCombination>,
    /// Human-readable description of the action.
    pub description: String,
    /// Disabled bindings never match and are left out of help.
    pub enabled: bool,
}

/// A single key press with optional modifier keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombination {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl Binding {
    /// A binding for several key combinations.
    pub fn new(keys: Vec<KeyCombination>, description: impl Into<String>) -> Self {
        Self {
            keys,
            description: description.into(),
            enabled: true,
        }
    }

    /// Whether `event` triggers this binding. Modifiers must match exactly,
    /// except Shift, which terminals fold into the key itself for
    /// characters and back-tab.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let held = event.modifiers - KeyModifiers::SHIFT;
        self.enabled
            && self
                .keys
                .iter()
                .any(|k| k.code == event.code && k.modifiers - KeyModifiers::SHIFT == held)
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// The keys joined for display, e.g. `enter/space`.
    pub fn key_label(&self) -> String {
        self.keys
            .iter()
            .map(|k| k.to_string())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl KeyCombination {
    /// A key with no modifiers.
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// A key with the Ctrl modifier.
    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }
}

impl fmt::Display for KeyCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            f.write_str("ctrl+")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            f.write_str("alt+")?;
        }
        match self.code {
            KeyCode::Char(' ') => f.write_str("space"),
            KeyCode::Char(c) => write!(f, "{c}"),
            KeyCode::Enter => f.write_str("enter"),
            KeyCode::Esc => f.write_str("esc"),
            KeyCode::Tab => f.write_str("tab"),
            KeyCode::BackTab => f.write_str("shift+tab"),
            KeyCode::Up => f.write_str("↑"),
            KeyCode::Down => f.write_str("↓"),
            KeyCode::Left => f.write_str("←"),
            KeyCode::Right => f.write_str("→"),
            KeyCode::Backspace => f.write_str("backspace"),
            KeyCode::Delete => f.write_str("del"),
            other => write!(f, "{other:?}"),
        }
    }
}

/// Types that expose their key bindings for help display.
pub trait KeyMap {
    /// The most important bindings, for a one-line hint.
    fn short_help(&self) -> Vec<&Binding>;
    /// All bindings, grouped.
    fn full_help(&self) -> Vec<Vec<&Binding>>;
}

/// Render bindings as `key description` pairs separated by ` • `,
/// skipping disabled ones.
pub fn help_line(bindings: &[&Binding]) -> String {
    bindings
        .iter()
        .filter(|b| b.enabled)
        .map(|b| format!("{} {}", b.key_label(), b.description))
        .collect::<Vec<_>>()
        .join(" • ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn matches_any_listed_key() {
        let b = Binding::new(
            vec![
                KeyCombination::new(KeyCode::Enter),
                KeyCombination::new(KeyCode::Char(' ')),
            ],
            "toggle",
        );
        assert!(b.matches(&press(KeyCode::Enter, KeyModifiers::NONE)));
        assert!(b.matches(&press(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert!(!b.matches(&press(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[test]
    fn shift_is_ignored() {
        let b = Binding::new(vec![KeyCombination::new(KeyCode::Down)], "down");
        assert!(b.matches(&press(KeyCode::Down, KeyModifiers::SHIFT)));
    }

    #[test]
    fn other_modifiers_must_match_exactly() {
        let enter = Binding::new(vec![KeyCombination::new(KeyCode::Enter)], "choose");
        assert!(!enter.matches(&press(KeyCode::Enter, KeyModifiers::CONTROL)));
        assert!(!enter.matches(&press(KeyCode::Enter, KeyModifiers::ALT)));

        let quit = Binding::new(vec![KeyCombination::ctrl(KeyCode::Char('c'))], "quit");
        assert!(!quit.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL | KeyModifiers::ALT)));
    }

    #[test]
    fn required_modifier_must_be_held() {
        let b = Binding::new(vec![KeyCombination::ctrl(KeyCode::Char('c'))], "quit");
        assert!(!b.matches(&press(KeyCode::Char('c'), KeyModifiers::NONE)));
        assert!(b.matches(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
    }

    #[test]
    fn disabled_never_matches() {
        let b = Binding::new(vec![KeyCombination::new(KeyCode::Esc)], "close").enabled(false);
        assert!(!b.matches(&press(KeyCode::Esc, KeyModifiers::NONE)));
    }

    #[test]
    fn labels() {
        let b = Binding::new(
            vec![
                KeyCombination::new(KeyCode::Enter),
                KeyCombination::new(KeyCode::Char(' ')),
            ],
            "choose",
        );
        assert_eq!(b.key_label(), "enter/space");
        assert_eq!(KeyCombination::ctrl(KeyCode::Char('c')).to_string(), "ctrl+c");
    }

    #[test]
    fn help_line_skips_disabled() {
        let up = Binding::new(vec![KeyCombination::new(KeyCode::Up)], "up");
        let esc = Binding::new(vec![KeyCombination::new(KeyCode::Esc)], "close").enabled(false);
        let down = Binding::new(vec![KeyCombination::new(KeyCode::Down)], "down");
        assert_eq!(help_line(&[&up, &esc, &down]), "↑ up • ↓ down");
    }
}
