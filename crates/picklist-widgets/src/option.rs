//! Candidate options and the selection value built from them.
//!
//! Membership is decided by [`OptionId`], never by label or value: two
//! options constructed separately are distinct even when they look the
//! same, while clones of one option are the same option.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of a [`SelectOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(u64);

impl OptionId {
    /// Draw a fresh, process-unique id.
    pub fn fresh() -> Self {
        OptionId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Use a host-chosen id. Hosts that rebuild their candidate list on
    /// every render use this to keep identities stable across rebuilds.
    pub const fn from_raw(raw: u64) -> Self {
        OptionId(raw)
    }

    /// The raw numeric id.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// The underlying value carried by an option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    /// A textual value.
    Text(String),
    /// A numeric value.
    Number(f64),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Text(s) => f.write_str(s),
            OptionValue::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

impl From<i32> for OptionValue {
    fn from(n: i32) -> Self {
        OptionValue::Number(f64::from(n))
    }
}

/// One selectable entry: a display label and an underlying value.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOption {
    id: OptionId,
    label: String,
    value: OptionValue,
}

impl SelectOption {
    /// Create an option with a fresh identity.
    pub fn new(label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self::with_id(OptionId::fresh(), label, value)
    }

    /// Create an option with an explicit identity.
    pub fn with_id(id: OptionId, label: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        Self {
            id,
            label: label.into(),
            value: value.into(),
        }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> &OptionValue {
        &self.value
    }

    /// Whether `other` is the same option (same identity).
    pub fn is(&self, other: &SelectOption) -> bool {
        self.id == other.id
    }
}

/// The current value of a select: its shape is the selection mode.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Single mode: at most one option.
    Single(Option<SelectOption>),
    /// Multiple mode: options in the order they were selected.
    Multiple(Vec<SelectOption>),
}

impl Selection {
    /// An empty single-mode value.
    pub fn single() -> Self {
        Selection::Single(None)
    }

    /// An empty multiple-mode value.
    pub fn multiple() -> Self {
        Selection::Multiple(Vec::new())
    }

    pub fn is_multiple(&self) -> bool {
        matches!(self, Selection::Multiple(_))
    }

    /// The selected options, in selection order.
    pub fn options(&self) -> &[SelectOption] {
        match self {
            Selection::Single(option) => option.as_slice(),
            Selection::Multiple(options) => options,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.options().is_empty()
    }

    /// Membership by identity.
    pub fn contains(&self, option: &SelectOption) -> bool {
        self.options().iter().any(|o| o.is(option))
    }

    /// The empty value of the same mode.
    pub fn cleared(&self) -> Selection {
        match self {
            Selection::Single(_) => Selection::Single(None),
            Selection::Multiple(_) => Selection::Multiple(Vec::new()),
        }
    }

    /// The value after the user picks `option`, or `None` when picking it
    /// changes nothing.
    ///
    /// Multiple mode removes every entry sharing the option's identity if
    /// one is present and appends the option otherwise. Single mode
    /// replaces the current option unless it already is `option`.
    pub fn toggled(&self, option: &SelectOption) -> Option<Selection> {
        match self {
            Selection::Multiple(options) => {
                let next = if self.contains(option) {
                    options.iter().filter(|o| !o.is(option)).cloned().collect()
                } else {
                    let mut next = options.clone();
                    next.push(option.clone());
                    next
                };
                Some(Selection::Multiple(next))
            }
            Selection::Single(Some(current)) if current.is(option) => None,
            Selection::Single(_) => Some(Selection::Single(Some(option.clone()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> (SelectOption, SelectOption, SelectOption) {
        (
            SelectOption::new("A", "a"),
            SelectOption::new("B", "b"),
            SelectOption::new("C", 3),
        )
    }

    #[test]
    fn fresh_ids_are_distinct() {
        let x = SelectOption::new("same", "same");
        let y = SelectOption::new("same", "same");
        assert!(!x.is(&y));
        assert!(x.is(&x.clone()));
    }

    #[test]
    fn explicit_ids_survive_rebuilds() {
        let x = SelectOption::with_id(OptionId::from_raw(7), "Seven", 7);
        let rebuilt = SelectOption::with_id(OptionId::from_raw(7), "Seven", 7);
        assert!(x.is(&rebuilt));
        assert_eq!(x.id().raw(), 7);
    }

    #[test]
    fn value_display() {
        assert_eq!(OptionValue::from("x").to_string(), "x");
        assert_eq!(OptionValue::from(3).to_string(), "3");
        assert_eq!(OptionValue::from(2.5).to_string(), "2.5");
    }

    #[test]
    fn single_set_and_reselect() {
        let (a, b, _) = abc();
        let empty = Selection::single();

        let with_a = empty.toggled(&a).expect("selecting into empty changes");
        assert_eq!(with_a.options(), &[a.clone()]);

        assert_eq!(with_a.toggled(&a), None);

        let with_b = with_a.toggled(&b).expect("different option replaces");
        assert_eq!(with_b.options(), &[b]);
    }

    #[test]
    fn single_lookalike_is_not_the_same() {
        let a = SelectOption::new("A", "a");
        let lookalike = SelectOption::new("A", "a");
        let value = Selection::Single(Some(a));
        assert!(value.toggled(&lookalike).is_some());
        assert!(!value.contains(&lookalike));
    }

    #[test]
    fn multiple_a_b_a_leaves_b() {
        let (a, b, _) = abc();
        let value = Selection::multiple();
        let value = value.toggled(&a).unwrap();
        let value = value.toggled(&b).unwrap();
        let value = value.toggled(&a).unwrap();
        assert_eq!(value, Selection::Multiple(vec![b]));
    }

    #[test]
    fn multiple_keeps_selection_order() {
        let (a, b, c) = abc();
        let value = Selection::Multiple(vec![c.clone()]);
        let value = value.toggled(&a).unwrap().toggled(&b).unwrap();
        let labels: Vec<_> = value.options().iter().map(|o| o.label()).collect();
        assert_eq!(labels, vec!["C", "A", "B"]);
    }

    #[test]
    fn multiple_removal_drops_every_copy() {
        let (a, b, _) = abc();
        let value = Selection::Multiple(vec![a.clone(), b.clone(), a.clone()]);
        assert_eq!(value.toggled(&a), Some(Selection::Multiple(vec![b])));
    }

    #[test]
    fn cleared_keeps_mode() {
        let (a, b, _) = abc();
        assert_eq!(
            Selection::Multiple(vec![a.clone(), b]).cleared(),
            Selection::Multiple(vec![])
        );
        assert_eq!(Selection::Single(Some(a)).cleared(), Selection::Single(None));
        assert_eq!(Selection::single().cleared(), Selection::Single(None));
    }

    #[test]
    fn contains_by_identity() {
        let (a, b, _) = abc();
        let value = Selection::Multiple(vec![a.clone()]);
        assert!(value.contains(&a));
        assert!(!value.contains(&b));
        assert!(!Selection::single().contains(&a));
    }
}
