//! Sorting policy for table rows.
//!
//! Sorting never reorders the caller's data. It produces a permutation of
//! row indices instead, computed with a stable sort so rows with equal keys
//! keep their original relative order.

use std::cmp::Ordering;

use super::column::Column;
use super::value::{CellValue, Record};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Current sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SortState {
    /// Key of the column being sorted on, if any.
    pub column: Option<String>,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortState {
    /// Apply a header click on `column`.
    ///
    /// Clicking the current column while ascending flips to descending.
    /// Any other click sorts ascending by the clicked column.
    pub fn toggle(&mut self, column: &str) {
        let same = self.column.as_deref() == Some(column);
        self.direction = if same && self.direction == SortDirection::Ascending {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        if !same {
            self.column = Some(column.to_string());
        }
    }

    /// Direction for the given column, if it is the sorted one.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        (self.column.as_deref() == Some(column)).then_some(self.direction)
    }
}

/// Compare two cell values for sorting.
///
/// Nulls always sort first regardless of direction; the direction only
/// reverses comparisons between non-null values. Text is compared
/// case-insensitively first, numbers numerically, and mixed kinds by their
/// display strings. NaN sorts after every other number.
pub fn compare_values(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a, b) {
        (CellValue::Null, CellValue::Null) => Ordering::Equal,
        (CellValue::Null, _) => Ordering::Less,
        (_, CellValue::Null) => Ordering::Greater,
        (CellValue::Text(x), CellValue::Text(y)) => direction.apply(compare_text(x, y)),
        _ => {
            let ordering = match (a.as_number(), b.as_number()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => compare_text(&a.to_string(), &b.to_string()),
            };
            direction.apply(ordering)
        }
    }
}

/// Non-null value kinds found in one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Number,
    Text,
    Mixed,
}

fn column_kind(values: &[CellValue]) -> ColumnKind {
    let mut kind = None;
    for value in values {
        let this = match value {
            CellValue::Null => continue,
            CellValue::Int(_) | CellValue::Float(_) => ColumnKind::Number,
            CellValue::Text(_) => ColumnKind::Text,
            CellValue::Bool(_) => ColumnKind::Mixed,
        };
        match kind {
            None => kind = Some(this),
            Some(k) if k == this => {}
            Some(_) => return ColumnKind::Mixed,
        }
    }
    kind.unwrap_or(ColumnKind::Text)
}

/// Locale-style text comparison: case-insensitive, ties broken by case.
fn compare_text(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    folded.then_with(|| b.cmp(a))
}

/// Compute the sorted order of `data` for the given sort state.
///
/// Returns indices into `data`. With no sort column (or an unknown one) the
/// original order is returned. A column mixing value kinds is compared by
/// display strings throughout.
pub fn sorted_indices<T: Record>(data: &[T], columns: &[Column<T>], sort: &SortState) -> Vec<usize> {
    let mut order: Vec<usize> = (0..data.len()).collect();
    let Some(key) = sort.column.as_deref() else {
        return order;
    };
    let Some(column) = columns.iter().find(|c| c.key == key) else {
        return order;
    };

    let mut values: Vec<CellValue> = data.iter().map(|record| column.value(record)).collect();
    // Pairwise rules over mixed kinds are not transitive; such a column is
    // ordered entirely by display strings.
    if column_kind(&values) == ColumnKind::Mixed {
        for value in values.iter_mut().filter(|v| !v.is_null()) {
            *value = CellValue::Text(value.to_string());
        }
    }
    order.sort_by(|&a, &b| compare_values(&values[a], &values[b], sort.direction));
    order
}
