//! Headless table engine for the Signals dashboard.
//!
//! Renders caller-supplied records as a sortable, selectable,
//! keyboard-navigable table. The engine performs no I/O; it derives a
//! [`table::TableView`] from data, columns, sort state and selection state,
//! and reports interactions back through callbacks.

pub mod events;
pub mod keybinds;
pub mod table;

pub use events::EventResult;
pub use keybinds::Key;

pub mod prelude {
    pub use crate::events::EventResult;
    pub use crate::keybinds::Key;
    pub use crate::table::{
        Alignment, AriaSort, CellValue, Column, DataTable, GridView, HeaderView, Record, RowView,
        SelectionState, SortDirection, SortState, TableOptions, TableView, render_text,
    };
}
