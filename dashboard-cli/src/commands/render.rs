//! Plain-text tables for list views.

use std::fmt::Write as _;

/// Lays `rows` out under `headers` with left-aligned, padded columns.
#[must_use]
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_uppercase()).collect();
    push_row(&mut out, &widths, &header_cells);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &widths, &rule);
    for row in rows {
        push_row(&mut out, &widths, row);
    }
    out
}

fn push_row(out: &mut String, widths: &[usize], cells: &[String]) {
    let line = widths
        .iter()
        .zip(cells)
        .map(|(width, cell)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// `Showing X of Y results` plus which directions are open.
#[must_use]
pub fn footer(summary: &str, can_previous: bool, can_next: bool) -> String {
    let mut nav = Vec::new();
    if can_previous {
        nav.push("Previous");
    }
    if can_next {
        nav.push("Next");
    }
    if nav.is_empty() {
        format!("Showing {summary} results")
    } else {
        format!("Showing {summary} results ({} available)", nav.join(", "))
    }
}
