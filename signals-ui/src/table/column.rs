//! Column descriptors.

use std::fmt;
use std::sync::Arc;

use super::value::{CellValue, Record};

/// Horizontal alignment for column content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;
type Renderer<T> = Arc<dyn Fn(&T, &CellValue, usize) -> String + Send + Sync>;

/// Column configuration.
///
/// Columns are rendered in the order they are given to the table. Each
/// column reads its value through an accessor, which defaults to
/// [`Record::field`] with the column key.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeMap;
/// use signals_ui::table::{Alignment, CellValue, Column};
///
/// type Row = BTreeMap<String, CellValue>;
///
/// let columns: Vec<Column<Row>> = vec![
///     Column::new("name", "Brand"),
///     Column::new("mentions", "Mentions").align(Alignment::Right),
///     Column::new("id", "ID").hidden(),
/// ];
/// assert_eq!(columns.iter().filter(|c| c.visible).count(), 2);
/// ```
pub struct Column<T> {
    /// Field reference used for sorting and default access.
    pub key: String,
    /// Header text.
    pub label: String,
    /// Whether clicking the header sorts by this column.
    pub sortable: bool,
    /// Whether the column is rendered at all.
    pub visible: bool,
    /// Horizontal alignment.
    pub align: Alignment,
    /// Fixed width in terminal columns, if any.
    pub width: Option<u16>,
    accessor: Option<Accessor<T>>,
    render: Option<Renderer<T>>,
}

impl<T> Column<T> {
    /// Create a column that reads the field named `key`.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            sortable: true,
            visible: true,
            align: Alignment::Left,
            width: None,
            accessor: None,
            render: None,
        }
    }

    /// Create a column with a derived accessor.
    pub fn derived<F>(key: impl Into<String>, label: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + Send + Sync + 'static,
    {
        let mut column = Self::new(key, label);
        column.accessor = Some(Arc::new(accessor));
        column
    }

    /// Set a custom cell renderer. Receives the record, its value and the row index.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&T, &CellValue, usize) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    /// Set the column alignment.
    pub fn align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Set a fixed width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = Some(width);
        self
    }

    /// Disable sorting on this column.
    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    /// Hide this column.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

impl<T: Record> Column<T> {
    /// Read this column's value from a record.
    pub fn value(&self, record: &T) -> CellValue {
        match &self.accessor {
            Some(accessor) => accessor(record),
            None => record.field(&self.key),
        }
    }

    /// Render the cell text for a record at the given row index.
    pub fn cell(&self, record: &T, index: usize) -> String {
        let value = self.value(record);
        match &self.render {
            Some(render) => render(record, &value, index),
            None => value.to_string(),
        }
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            sortable: self.sortable,
            visible: self.visible,
            align: self.align,
            width: self.width,
            accessor: self.accessor.clone(),
            render: self.render.clone(),
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("sortable", &self.sortable)
            .field("visible", &self.visible)
            .field("align", &self.align)
            .field("width", &self.width)
            .field("derived", &self.accessor.is_some())
            .finish()
    }
}
