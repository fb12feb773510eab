//! Headless rendering of a DataTable.

use super::column::Alignment;
use super::sort::SortDirection;
use super::state::DataTable;
use super::value::Record;

/// ARIA sort state of a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AriaSort {
    None,
    Ascending,
    Descending,
}

impl AriaSort {
    /// The `aria-sort` attribute value.
    pub fn as_str(&self) -> &'static str {
        match self {
            AriaSort::None => "none",
            AriaSort::Ascending => "ascending",
            AriaSort::Descending => "descending",
        }
    }
}

impl From<SortDirection> for AriaSort {
    fn from(direction: SortDirection) -> Self {
        match direction {
            SortDirection::Ascending => AriaSort::Ascending,
            SortDirection::Descending => AriaSort::Descending,
        }
    }
}

/// A rendered header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderView {
    pub key: String,
    pub label: String,
    /// Whether clicking this header sorts.
    pub sortable: bool,
    /// Only set for sortable headers.
    pub aria_sort: Option<AriaSort>,
    pub align: Alignment,
    pub width: Option<u16>,
}

/// A rendered body row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Value of the key field.
    pub key: String,
    /// Position in the sorted view.
    pub index: usize,
    /// One entry per visible column.
    pub cells: Vec<String>,
    pub selected: bool,
    pub focused: bool,
}

/// A rendered table with rows.
#[derive(Debug, Clone, PartialEq)]
pub struct GridView {
    pub headers: Vec<HeaderView>,
    pub rows: Vec<RowView>,
    /// Whether rows carry a select control.
    pub selectable: bool,
    /// `aria-colcount`: visible columns plus the select column.
    pub column_count: usize,
    /// `aria-rowcount`: body rows plus the header row.
    pub row_count: usize,
}

/// Result of rendering a table.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    /// Loading indicator; nothing else is rendered.
    Loading { message: String },
    /// Explicit empty state instead of an empty grid.
    Empty { message: String },
    /// Header and rows.
    Grid(GridView),
}

impl TableView {
    /// The grid, if rows were rendered.
    pub fn grid(&self) -> Option<&GridView> {
        match self {
            TableView::Grid(grid) => Some(grid),
            _ => None,
        }
    }
}

impl<T: Record> DataTable<T> {
    /// Render the table.
    ///
    /// Pure over data, columns, sort state, selection state and options.
    /// Hidden columns are dropped from headers, cells and the column count alike.
    pub fn render(&self) -> TableView {
        if self.options.loading {
            return TableView::Loading {
                message: self.options.loading_message.clone(),
            };
        }
        if self.data.is_empty() {
            return TableView::Empty {
                message: self.options.empty_message.clone(),
            };
        }

        let headers: Vec<HeaderView> = self
            .visible_columns()
            .map(|column| {
                let sortable = self.options.sortable && column.sortable;
                let aria_sort = sortable.then(|| {
                    self.sort
                        .direction_of(&column.key)
                        .map_or(AriaSort::None, AriaSort::from)
                });
                HeaderView {
                    key: column.key.clone(),
                    label: column.label.clone(),
                    sortable,
                    aria_sort,
                    align: column.align,
                    width: column.width,
                }
            })
            .collect();

        let rows: Vec<RowView> = self
            .processed_rows()
            .into_iter()
            .map(|(index, record)| RowView {
                key: record.field(&self.key_field).to_string(),
                index,
                cells: self
                    .visible_columns()
                    .map(|column| column.cell(record, index))
                    .collect(),
                selected: self.selection.selected_row == Some(index),
                focused: self.selection.focused_row == Some(index),
            })
            .collect();

        let selectable = self.options.selectable;
        TableView::Grid(GridView {
            column_count: headers.len() + usize::from(selectable),
            row_count: rows.len() + 1,
            headers,
            rows,
            selectable,
        })
    }
}
