//! Highlighted-candidate tracking for an open option list.
//!
//! `Highlight` is distinct from the selection: it is the position the
//! keyboard or pointer is on, plus the scroll offset that keeps it inside a
//! window of `visible` rows.

#[derive(Debug, Clone)]
pub struct Highlight {
    index: usize,
    offset: usize,
    count: usize,
    visible: usize,
}

impl Highlight {
    pub fn new(count: usize, visible: usize) -> Self {
        Self {
            index: 0,
            offset: 0,
            count,
            visible: visible.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
    pub fn offset(&self) -> usize {
        self.offset
    }
    pub fn count(&self) -> usize {
        self.count
    }
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Back to the first candidate, scrolled to the top.
    pub fn reset(&mut self) {
        self.index = 0;
        self.offset = 0;
    }

    /// Update the number of candidates. An index that no longer exists is
    /// pulled back to the last candidate.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        if self.count == 0 {
            self.reset();
        } else if self.index >= self.count {
            self.index = self.count - 1;
        }
        self.scroll_to_index();
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible.max(1);
        self.scroll_to_index();
    }

    /// Move by `delta` positions. A move that would leave `[0, count)` is
    /// ignored entirely; returns whether the index changed.
    pub fn step(&mut self, delta: isize) -> bool {
        let Some(target) = self.index.checked_add_signed(delta) else {
            return false;
        };
        if target >= self.count || target == self.index {
            return false;
        }
        self.index = target;
        self.scroll_to_index();
        true
    }

    /// Jump to `index` (pointer hover). Out-of-range positions are ignored.
    pub fn hover(&mut self, index: usize) -> bool {
        if index >= self.count {
            return false;
        }
        self.index = index;
        self.scroll_to_index();
        true
    }

    /// Candidate positions currently inside the visible window.
    pub fn window(&self) -> std::ops::Range<usize> {
        self.offset..(self.offset + self.visible).min(self.count)
    }

    fn scroll_to_index(&mut self) {
        if self.count == 0 {
            return;
        }
        if self.index < self.offset {
            self.offset = self.index;
        } else if self.index >= self.offset + self.visible {
            self.offset = self.index + 1 - self.visible;
        }
        // Never leave blank rows at the bottom once the list shrinks.
        let max_offset = self.count.saturating_sub(self.visible);
        self.offset = self.offset.min(max_offset);
    }
}
