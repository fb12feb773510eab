//! Keyboard handling for the DataTable.

use log::trace;

use crate::events::EventResult;
use crate::keybinds::Key;

use super::state::DataTable;
use super::value::Record;

impl<T: Record> DataTable<T> {
    /// Handle a key press on the table body.
    ///
    /// | Key | Effect |
    /// |---|---|
    /// | Enter / Space | click the focused row (or the selected row without focus) |
    /// | Down | focus the next row, clamped at the last row |
    /// | Up | focus the previous row, clamped at the first row |
    /// | Home / End | focus the first / last row |
    ///
    /// Navigation never wraps. Without a focused row, Up and Down focus the
    /// first row. Every handled key is consumed so the host can suppress its
    /// default scrolling, even on an empty table.
    pub fn handle_key(&mut self, key: Key) -> EventResult {
        let len = self.len();
        let current = self.selection.focused_row;
        trace!("table key {:?} (focused {:?}, {} rows)", key, current, len);

        match key {
            Key::Enter | Key::Space => {
                if let Some(index) = self.selection.active_row() {
                    self.click_row(index);
                }
                EventResult::Consumed
            }
            Key::Down => {
                if len > 0 {
                    let next = current.map_or(0, |c| (c + 1).min(len - 1));
                    self.selection.focus(next);
                }
                EventResult::Consumed
            }
            Key::Up => {
                if len > 0 {
                    let previous = current.map_or(0, |c| c.saturating_sub(1).min(len - 1));
                    self.selection.focus(previous);
                }
                EventResult::Consumed
            }
            Key::Home => {
                if len > 0 {
                    self.selection.focus(0);
                }
                EventResult::Consumed
            }
            Key::End => {
                if len > 0 {
                    self.selection.focus(len - 1);
                }
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }
}
