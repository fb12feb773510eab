//! DataTable - a sortable, selectable, keyboard-navigable table.
//!
//! The table provides:
//! - Ordered column descriptors with custom accessors and renderers
//! - Stable sorting by any sortable column, toggled by header clicks
//! - Row selection (click or select control) independent of focus
//! - Keyboard focus navigation (Up, Down, Home, End, Enter, Space)
//! - A headless [`TableView`] plus a plain-text renderer
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use signals_ui::table::{CellValue, Column, DataTable, TableView};
//!
//! type Row = BTreeMap<String, CellValue>;
//!
//! let table: DataTable<Row> = DataTable::new(vec![Column::new("name", "Brand")], "id");
//! assert!(matches!(table.render(), TableView::Empty { .. }));
//! ```

mod column;
mod events;
mod render;
mod selection;
mod sort;
mod state;
mod text;
mod value;

pub use column::{Alignment, Column};
pub use render::{AriaSort, GridView, HeaderView, RowView, TableView};
pub use selection::SelectionState;
pub use sort::{SortDirection, SortState, compare_values, sorted_indices};
pub use state::{DataTable, TableOptions};
pub use text::render_text;
pub use value::{CellValue, Record};
