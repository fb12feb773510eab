//! Plain-text rendering of a table view for terminals.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::column::Alignment;
use super::render::{AriaSort, GridView, TableView};

const COLUMN_GAP: &str = "  ";

/// Render a table view as lines of text.
///
/// Sorted headers get a `▲`/`▼` indicator, the focused row a `>` marker and,
/// for selectable tables, each row a `■`/`□` select marker. Columns with a
/// fixed width truncate with `…`; the others size to their widest cell.
pub fn render_text(view: &TableView) -> String {
    match view {
        TableView::Loading { message } | TableView::Empty { message } => format!("{}\n", message),
        TableView::Grid(grid) => render_grid(grid),
    }
}

fn render_grid(grid: &GridView) -> String {
    let labels: Vec<String> = grid
        .headers
        .iter()
        .map(|h| match h.aria_sort {
            Some(AriaSort::Ascending) => format!("{} ▲", h.label),
            Some(AriaSort::Descending) => format!("{} ▼", h.label),
            _ => h.label.clone(),
        })
        .collect();

    let widths: Vec<usize> = grid
        .headers
        .iter()
        .enumerate()
        .map(|(i, h)| match h.width {
            Some(w) => usize::from(w),
            None => grid
                .rows
                .iter()
                .filter_map(|r| r.cells.get(i))
                .map(|c| c.width())
                .chain(std::iter::once(labels[i].width()))
                .max()
                .unwrap_or(0),
        })
        .collect();

    let marker_width = if grid.selectable { 4 } else { 2 };
    let mut out = String::new();

    out.push_str(&" ".repeat(marker_width));
    let header_cells: Vec<String> = grid
        .headers
        .iter()
        .zip(&labels)
        .zip(&widths)
        .map(|((h, label), &w)| pad(label, w, h.align))
        .collect();
    out.push_str(header_cells.join(COLUMN_GAP).trim_end());
    out.push('\n');

    let total: usize = widths.iter().sum::<usize>()
        + COLUMN_GAP.len() * widths.len().saturating_sub(1)
        + marker_width;
    out.push_str(&"─".repeat(total));
    out.push('\n');

    for row in &grid.rows {
        out.push_str(if row.focused { "> " } else { "  " });
        if grid.selectable {
            out.push_str(if row.selected { "■ " } else { "□ " });
        }
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&grid.headers)
            .zip(&widths)
            .map(|((cell, h), &w)| pad(cell, w, h.align))
            .collect();
        out.push_str(cells.join(COLUMN_GAP).trim_end());
        out.push('\n');
    }
    out
}

/// Fit `text` into `width` display columns.
fn pad(text: &str, width: usize, align: Alignment) -> String {
    let text = truncate(text, width);
    let fill = width.saturating_sub(text.width());
    match align {
        Alignment::Left => format!("{}{}", text, " ".repeat(fill)),
        Alignment::Right => format!("{}{}", " ".repeat(fill), text),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad_alignments() {
        assert_eq!(pad("ab", 4, Alignment::Left), "ab  ");
        assert_eq!(pad("ab", 4, Alignment::Right), "  ab");
        assert_eq!(pad("ab", 5, Alignment::Center), " ab  ");
    }

    #[test]
    fn test_truncate_uses_display_width() {
        assert_eq!(truncate("Signals", 4), "Sig…");
        assert_eq!(truncate("日本語", 5), "日本…");
        assert_eq!(truncate("ok", 4), "ok");
    }

    #[test]
    fn test_empty_and_loading() {
        let empty = TableView::Empty {
            message: "No brands".into(),
        };
        assert_eq!(render_text(&empty), "No brands\n");
    }
}
