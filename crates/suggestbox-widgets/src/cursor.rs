//! Highlight position within the current result set.
//!
//! `Cursor` is either "no highlight" or an index into the results, plus the
//! scroll offset of the visible window.  Moves clamp at both ends instead of
//! wrapping, and the index is re-clamped whenever the result count changes, so
//! it can never point past the end.

/// Highlighted index and scroll window over a result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor {
    index: Option<usize>,
    offset: usize,
    count: usize,
    visible: usize,
}

impl Cursor {
    pub fn new(visible: usize) -> Self {
        Self {
            index: None,
            offset: 0,
            count: 0,
            visible: visible.max(1),
        }
    }

    /// The highlighted index, or `None` for no highlight.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
    /// First row of the visible window.
    pub fn offset(&self) -> usize {
        self.offset
    }
    pub fn count(&self) -> usize {
        self.count
    }
    pub fn visible(&self) -> usize {
        self.visible
    }

    /// Index as a signed position where `-1` means no highlight.
    pub fn position(&self) -> isize {
        self.index.map_or(-1, |i| i as isize)
    }

    /// Record a new result count, clamping the highlight numerically.
    ///
    /// The highlight does not follow the previously highlighted item; it keeps
    /// its index if still in range, else moves to the last row, else clears.
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
        self.index = match self.index {
            _ if count == 0 => None,
            Some(i) => Some(i.min(count - 1)),
            None => None,
        };
        if count == 0 {
            self.offset = 0;
        }
        self.ensure_visible();
    }

    pub fn set_visible(&mut self, visible: usize) {
        self.visible = visible.max(1);
        self.ensure_visible();
    }

    /// Highlight the first row if nothing is highlighted, else the next row,
    /// stopping at the last one.
    pub fn move_down(&mut self) {
        if self.count == 0 {
            return;
        }
        self.index = Some(match self.index {
            None => 0,
            Some(i) => (i + 1).min(self.count - 1),
        });
        self.ensure_visible();
    }

    /// Highlight the previous row, stopping at the first one.  Without a
    /// highlight this does nothing.
    pub fn move_up(&mut self) {
        if let Some(i) = self.index {
            self.index = Some(i.saturating_sub(1));
            self.ensure_visible();
        }
    }

    /// Clear the highlight and scroll back to the top.
    pub fn reset(&mut self) {
        self.index = None;
        self.offset = 0;
    }

    fn ensure_visible(&mut self) {
        let Some(cursor) = self.index else {
            self.offset = self.offset.min(self.count.saturating_sub(self.visible));
            return;
        };
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + self.visible {
            self.offset = cursor + 1 - self.visible;
        }
    }
}
