//! DataTable state.

use std::fmt;

use log::debug;

use crate::events::EventResult;

use super::column::Column;
use super::selection::SelectionState;
use super::sort::{SortDirection, SortState, sorted_indices};
use super::value::Record;

type RowCallback<T> = Box<dyn FnMut(&T, usize) + Send>;
type SortCallback = Box<dyn FnMut(&str, SortDirection) + Send>;

/// Behavior flags for a table.
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Whether header clicks sort the table.
    pub sortable: bool,
    /// Whether rows carry a select control.
    pub selectable: bool,
    /// Show a loading indicator instead of rows.
    pub loading: bool,
    /// Text shown when there are no rows.
    pub empty_message: String,
    /// Text shown while loading.
    pub loading_message: String,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            sortable: true,
            selectable: false,
            loading: false,
            empty_message: "No data available".to_string(),
            loading_message: "Loading...".to_string(),
        }
    }
}

impl TableOptions {
    /// Enable or disable sorting.
    pub fn sortable(mut self, enabled: bool) -> Self {
        self.sortable = enabled;
        self
    }

    /// Enable or disable row selection controls.
    pub fn selectable(mut self, enabled: bool) -> Self {
        self.selectable = enabled;
        self
    }

    /// Set the loading flag.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    /// Set the empty-state message.
    pub fn empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Set the loading message.
    pub fn loading_message(mut self, message: impl Into<String>) -> Self {
        self.loading_message = message.into();
        self
    }
}

/// Cached sort order, keyed by data revision and sort state.
#[derive(Debug, Default)]
struct SortCache {
    revision: u64,
    sort: SortState,
    order: Vec<usize>,
}

/// A sortable, selectable, keyboard-navigable table over caller records.
///
/// `DataTable<T>` owns:
/// - The records and the ordered column descriptors
/// - Sort state (column + direction), reapplied whenever data changes
/// - Selection and focus, as indices into the sorted view
/// - Callbacks for row click, row select and sort
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use signals_ui::table::{CellValue, Column, DataTable};
///
/// type Row = BTreeMap<String, CellValue>;
///
/// let mut a = Row::new();
/// a.insert("id".into(), 1.into());
/// a.insert("name".into(), "B".into());
/// let mut b = Row::new();
/// b.insert("id".into(), 2.into());
/// b.insert("name".into(), "A".into());
///
/// let mut table = DataTable::new(vec![Column::new("name", "Name")], "id").with_data(vec![a, b]);
/// table.handle_sort("name");
/// assert_eq!(table.row_key(0).as_deref(), Some("2"));
/// ```
pub struct DataTable<T: Record> {
    pub(super) columns: Vec<Column<T>>,
    pub(super) key_field: String,
    pub(super) data: Vec<T>,
    pub(super) options: TableOptions,
    pub(super) sort: SortState,
    pub(super) selection: SelectionState,
    revision: u64,
    cache: SortCache,
    on_row_click: Option<RowCallback<T>>,
    on_row_select: Option<RowCallback<T>>,
    on_sort: Option<SortCallback>,
}

impl<T: Record> DataTable<T> {
    /// Create an empty table with column definitions and the key field name.
    pub fn new(columns: Vec<Column<T>>, key_field: impl Into<String>) -> Self {
        Self {
            columns,
            key_field: key_field.into(),
            data: Vec::new(),
            options: TableOptions::default(),
            sort: SortState::default(),
            selection: SelectionState::default(),
            revision: 0,
            cache: SortCache::default(),
            on_row_click: None,
            on_row_select: None,
            on_sort: None,
        }
    }

    /// Set initial data.
    pub fn with_data(mut self, data: Vec<T>) -> Self {
        self.set_data(data);
        self
    }

    /// Set behavior flags.
    pub fn with_options(mut self, options: TableOptions) -> Self {
        self.options = options;
        self
    }

    /// Register the row click callback.
    pub fn on_row_click(mut self, callback: impl FnMut(&T, usize) + Send + 'static) -> Self {
        self.on_row_click = Some(Box::new(callback));
        self
    }

    /// Register the row select callback.
    pub fn on_row_select(mut self, callback: impl FnMut(&T, usize) + Send + 'static) -> Self {
        self.on_row_select = Some(Box::new(callback));
        self
    }

    /// Register the sort callback.
    pub fn on_sort(mut self, callback: impl FnMut(&str, SortDirection) + Send + 'static) -> Self {
        self.on_sort = Some(Box::new(callback));
        self
    }

    // -------------------------------------------------------------------------
    // Data and columns
    // -------------------------------------------------------------------------

    /// Replace all rows.
    ///
    /// Sort state is kept and reapplied. Selection and focus indices that no
    /// longer fit the new data are cleared.
    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
        self.revision += 1;
        self.selection.clamp(self.data.len());
        self.refresh_order();
    }

    /// Get the rows in their original order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Get all column definitions.
    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    /// Columns that are rendered.
    pub fn visible_columns(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Get the behavior flags.
    pub fn options(&self) -> &TableOptions {
        &self.options
    }

    /// Set the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.options.loading = loading;
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Get the current sort state.
    pub fn sort_state(&self) -> &SortState {
        &self.sort
    }

    /// Handle a click on the header of `column`.
    ///
    /// Ignored when sorting is disabled, or the column is unknown, hidden or
    /// not sortable.
    pub fn handle_sort(&mut self, column: &str) -> EventResult {
        if !self.options.sortable {
            return EventResult::Ignored;
        }
        let sortable = self
            .columns
            .iter()
            .any(|c| c.key == column && c.visible && c.sortable);
        if !sortable {
            return EventResult::Ignored;
        }

        self.sort.toggle(column);
        self.refresh_order();
        let direction = self.sort.direction;
        debug!("table sorted by {} {:?}", column, direction);
        if let Some(on_sort) = self.on_sort.as_mut() {
            on_sort(column, direction);
        }
        EventResult::Consumed
    }

    /// Recompute the sorted order if data or sort state changed.
    fn refresh_order(&mut self) {
        if self.cache.revision == self.revision
            && self.cache.sort == self.sort
            && self.cache.order.len() == self.data.len()
        {
            return;
        }
        self.cache = SortCache {
            revision: self.revision,
            sort: self.sort.clone(),
            order: sorted_indices(&self.data, &self.columns, &self.sort),
        };
    }

    /// Rows in sorted order, paired with their position in the sorted view.
    pub fn processed_rows(&self) -> Vec<(usize, &T)> {
        self.cache
            .order
            .iter()
            .enumerate()
            .map(|(index, &original)| (index, &self.data[original]))
            .collect()
    }

    /// Get the row at a position in the sorted view.
    pub fn row(&self, index: usize) -> Option<&T> {
        self.cache.order.get(index).map(|&original| &self.data[original])
    }

    /// Key of the row at a position in the sorted view.
    pub fn row_key(&self, index: usize) -> Option<String> {
        self.row(index)
            .map(|record| record.field(&self.key_field).to_string())
    }

    // -------------------------------------------------------------------------
    // Selection and focus
    // -------------------------------------------------------------------------

    /// Get the selection state.
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Position of the selected row.
    pub fn selected_row(&self) -> Option<usize> {
        self.selection.selected_row
    }

    /// Position of the focused row.
    pub fn focused_row(&self) -> Option<usize> {
        self.selection.focused_row
    }

    /// The selected record.
    pub fn selected_record(&self) -> Option<&T> {
        self.selection.selected_row.and_then(|i| self.row(i))
    }

    /// Key of the selected record.
    ///
    /// Selection is positional, so after a re-sort this may name a different
    /// record. Capture the key before sorting and use [`select_key`](Self::select_key)
    /// to keep the same record selected.
    pub fn selected_key(&self) -> Option<String> {
        self.selection.selected_row.and_then(|i| self.row_key(i))
    }

    /// Select the row whose key field equals `key`. Returns its position.
    pub fn select_key(&mut self, key: &str) -> Option<usize> {
        let index = (0..self.len()).find(|&i| self.row_key(i).as_deref() == Some(key))?;
        self.selection.select(index);
        Some(index)
    }

    /// Handle a click on the row at `index`.
    ///
    /// Selects the row and invokes the row click callback.
    pub fn click_row(&mut self, index: usize) -> EventResult {
        let Some(&original) = self.cache.order.get(index) else {
            return EventResult::Ignored;
        };
        self.selection.select(index);
        if let Some(on_row_click) = self.on_row_click.as_mut() {
            on_row_click(&self.data[original], index);
        }
        EventResult::Consumed
    }

    /// Handle the select control of the row at `index`.
    ///
    /// Selects the row and invokes only the row select callback; the row
    /// click callback is never triggered from here.
    pub fn select_row(&mut self, index: usize) -> EventResult {
        if !self.options.selectable {
            return EventResult::Ignored;
        }
        let Some(&original) = self.cache.order.get(index) else {
            return EventResult::Ignored;
        };
        self.selection.select(index);
        if let Some(on_row_select) = self.on_row_select.as_mut() {
            on_row_select(&self.data[original], index);
        }
        EventResult::Consumed
    }

    /// Focus the row at `index` (keyboard or pointer).
    pub fn focus_row(&mut self, index: usize) -> EventResult {
        if index >= self.len() {
            return EventResult::Ignored;
        }
        self.selection.focus(index);
        EventResult::Consumed
    }

    /// Clear focus.
    pub fn blur(&mut self) {
        self.selection.blur();
    }
}

impl<T: Record> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("key_field", &self.key_field)
            .field("rows", &self.data.len())
            .field("options", &self.options)
            .field("sort", &self.sort)
            .field("selection", &self.selection)
            .finish()
    }
}
