//! Row selection and focus tracking.

/// Selected and focused rows of a table.
///
/// Both are positional indices into the current sorted view. The selected
/// row is sticky (set by click or explicit select); the focused row follows
/// keyboard and pointer focus and is cleared on blur. The two are
/// independent of each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    /// Row chosen by click or select.
    pub selected_row: Option<usize>,
    /// Row under keyboard or pointer focus.
    pub focused_row: Option<usize>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a row. Returns the previous selection.
    pub fn select(&mut self, index: usize) -> Option<usize> {
        self.selected_row.replace(index)
    }

    /// Focus a row. Returns the previous focus.
    pub fn focus(&mut self, index: usize) -> Option<usize> {
        self.focused_row.replace(index)
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.focused_row = None;
    }

    /// Drop any index that is out of range for `len` rows.
    pub fn clamp(&mut self, len: usize) {
        if self.selected_row.is_some_and(|i| i >= len) {
            self.selected_row = None;
        }
        if self.focused_row.is_some_and(|i| i >= len) {
            self.focused_row = None;
        }
    }

    /// Row that keyboard activation applies to: focus first, then selection.
    pub fn active_row(&self) -> Option<usize> {
        self.focused_row.or(self.selected_row)
    }
}
