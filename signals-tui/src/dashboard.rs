//! Brand table assembly and rendering.

use std::sync::{Arc, Mutex};

use log::info;
use signals_lib::boundary::{BoundaryView, ErrorBoundary, Fault};
use signals_ui::prelude::*;

use crate::brands::Brand;
use crate::error::AppError;

/// Last row interaction, shown under the table.
pub type Status = Arc<Mutex<Option<String>>>;

fn tier(mentions: u32) -> &'static str {
    match mentions {
        20_000.. => "high",
        5_000.. => "medium",
        _ => "low",
    }
}

/// Columns of the brand table.
pub fn columns() -> Vec<Column<Brand>> {
    vec![
        Column::new("id", "ID").align(Alignment::Right).width(3),
        Column::new("name", "Brand"),
        Column::new("industry", "Industry"),
        Column::new("mentions", "Mentions").align(Alignment::Right),
        Column::new("sentiment", "Sentiment")
            .align(Alignment::Right)
            .render(|_, value, _| match value.as_number() {
                Some(score) => format!("{:+.2}", score),
                None => "n/a".to_string(),
            }),
        Column::derived("tier", "Tier", |brand: &Brand| tier(brand.mentions).into()),
    ]
}

/// Build the brand table, reporting row interactions into `status`.
pub fn build_table(selectable: bool, status: &Status) -> DataTable<Brand> {
    let clicked = status.clone();
    let selected = status.clone();
    DataTable::new(columns(), "id")
        .with_options(
            TableOptions::default()
                .selectable(selectable)
                .loading(true)
                .loading_message("Loading brands...")
                .empty_message("No brands tracked yet"),
        )
        .on_row_click(move |brand, index| {
            info!("opened brand {} at row {}", brand.id, index);
            if let Ok(mut status) = clicked.lock() {
                *status = Some(format!("Opened {}", brand.name));
            }
        })
        .on_row_select(move |brand, _| {
            if let Ok(mut status) = selected.lock() {
                *status = Some(format!("Selected {}", brand.name));
            }
        })
}

/// Sort by `column`, twice for descending order.
pub fn apply_sort(
    table: &mut DataTable<Brand>,
    column: &str,
    descending: bool,
) -> Result<(), AppError> {
    if !table.handle_sort(column).is_handled() {
        return Err(AppError::UnknownColumn(column.to_string()));
    }
    if descending {
        table.handle_sort(column);
    }
    Ok(())
}

/// Key of the n-th visible column, counting from zero.
pub fn visible_column_key(table: &DataTable<Brand>, n: usize) -> Option<String> {
    table.visible_columns().nth(n).map(|c| c.key.clone())
}

/// Render the table as text inside `boundary`.
pub fn render(boundary: &ErrorBoundary, table: &DataTable<Brand>) -> String {
    match boundary.render(|| Ok::<_, Fault>(render_text(&table.render()))) {
        BoundaryView::Content(text) => text,
        BoundaryView::Fallback(fallback) => {
            let action = if fallback.retry_pending {
                "retrying...".to_string()
            } else {
                format!("press r for {}", fallback.retry_label())
            };
            format!("Something went wrong: {}\n({})\n", fallback.message, action)
        }
    }
}

#[cfg(test)]
mod tests {
    use signals_lib::boundary::BoundaryConfig;

    use super::*;
    use crate::brands::sample;

    fn table() -> (DataTable<Brand>, Status) {
        let status = Status::default();
        let mut table = build_table(true, &status);
        table.set_data(sample());
        table.set_loading(false);
        (table, status)
    }

    fn names(table: &DataTable<Brand>) -> Vec<String> {
        table
            .processed_rows()
            .into_iter()
            .map(|(_, b)| b.name.clone())
            .collect()
    }

    #[test]
    fn test_sort_by_name_is_case_insensitive() {
        let (mut table, _) = table();
        apply_sort(&mut table, "name", false).unwrap();
        assert_eq!(names(&table)[..3], ["acme", "Contoso", "Fabrikam"]);
    }

    #[test]
    fn test_descending_sentiment_keeps_missing_first() {
        let (mut table, _) = table();
        apply_sort(&mut table, "sentiment", true).unwrap();
        let names = names(&table);
        assert_eq!(names[..3], ["Fabrikam", "Wingtip", "Litware"]);
        assert_eq!(names.last().map(String::as_str), Some("Tailspin"));
    }

    #[test]
    fn test_unknown_sort_column() {
        let (mut table, _) = table();
        assert!(matches!(
            apply_sort(&mut table, "revenue", false),
            Err(AppError::UnknownColumn(c)) if c == "revenue"
        ));
    }

    #[test]
    fn test_sort_by_derived_column() {
        let (mut table, _) = table();
        apply_sort(&mut table, "tier", false).unwrap();
        assert_eq!(names(&table)[0], "Contoso");
    }

    #[test]
    fn test_row_interactions_update_status() {
        let (mut table, status) = table();
        table.handle_key(Key::Down);
        table.handle_key(Key::Enter);
        assert_eq!(status.lock().unwrap().as_deref(), Some("Opened Northwind"));

        table.select_row(2);
        assert_eq!(status.lock().unwrap().as_deref(), Some("Selected Contoso"));
    }

    #[test]
    fn test_render_inside_boundary() {
        let (table, _) = table();
        let boundary = ErrorBoundary::new(BoundaryConfig::named("brands"));
        let text = render(&boundary, &table);
        let header = text.lines().next().unwrap();
        assert!(header.contains("Brand"));
        assert!(header.contains("Sentiment"));
        assert!(text.contains("n/a"));
        assert!(text.contains("+0.42"));
    }

    #[test]
    fn test_loading_view_before_data() {
        let status = Status::default();
        let table = build_table(false, &status);
        let boundary = ErrorBoundary::new(BoundaryConfig::default());
        assert_eq!(render(&boundary, &table), "Loading brands...\n");
    }

    #[test]
    fn test_visible_column_key() {
        let (table, _) = table();
        assert_eq!(visible_column_key(&table, 0).as_deref(), Some("id"));
        assert_eq!(visible_column_key(&table, 5).as_deref(), Some("tier"));
        assert_eq!(visible_column_key(&table, 6), None);
    }
}
