//! Terminal rendering of query results.

use dns_master_core::ConfigRecord;

const HEADERS: [&str; 4] = [
    "Identifier",
    "Primary Address",
    "Secondary Address",
    "Description",
];
const NO_SECONDARY: &str = "-";
const NO_DESCRIPTION: &str = "No Description";

/// Renders records as a boxed text table.
///
/// A non-empty `filter` adds a title line naming it.
pub fn render_table(records: &[ConfigRecord], filter: Option<&str>) -> String {
    let rows: Vec<[&str; 4]> = records
        .iter()
        .map(|record| {
            [
                record.name.as_str(),
                record.primary_address.as_str(),
                record.secondary_address.as_deref().unwrap_or(NO_SECONDARY),
                record.description.as_deref().unwrap_or(NO_DESCRIPTION),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = separator_line(&widths);
    let mut table = String::new();

    if let Some(filter) = filter.filter(|value| !value.is_empty()) {
        table.push_str(&format!("DNS Configurations - Results for '{filter}'\n"));
    }

    table.push_str(&separator);
    table.push_str(&row_line(&HEADERS, &widths));
    table.push_str(&separator);
    for row in &rows {
        table.push_str(&row_line(row, &widths));
        table.push_str(&separator);
    }
    if rows.is_empty() {
        table.push_str("(no configurations)\n");
    }

    table
}

/// Renders records as a pretty-printed JSON array.
pub fn render_json(records: &[ConfigRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

fn separator_line(widths: &[usize; 4]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn row_line(cells: &[&str; 4], widths: &[usize; 4]) -> String {
    let mut line = String::from("|");
    for (cell, width) in cells.iter().zip(widths) {
        let padding = width - cell.chars().count();
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(padding + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

#[cfg(test)]
mod tests {
    use super::{render_json, render_table};
    use dns_master_core::ConfigRecord;

    #[test]
    fn table_marks_absent_fields_and_aligns_columns() {
        let records = vec![
            ConfigRecord::new("google", "8.8.8.8").with_secondary_address("8.8.4.4"),
            ConfigRecord::new("cf", "1.1.1.1").with_description("Cloudflare"),
        ];
        let table = render_table(&records, None);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 7);
        assert!(lines[1].starts_with("| Identifier |"));
        assert!(lines[3].contains("| 8.8.4.4 "));
        assert!(lines[3].contains("No Description"));
        assert!(lines[5].contains("| -  "));
        let width = lines[0].chars().count();
        assert!(lines.iter().all(|line| line.chars().count() == width));
    }

    #[test]
    fn table_shows_filter_title_and_empty_marker() {
        let table = render_table(&[], Some("corp"));
        assert!(table.starts_with("DNS Configurations - Results for 'corp'\n"));
        assert!(table.ends_with("(no configurations)\n"));

        let untitled = render_table(&[], Some(""));
        assert!(untitled.starts_with('+'));
    }

    #[test]
    fn json_uses_null_for_absent_fields() {
        let json = render_json(&[ConfigRecord::new("quad9", "9.9.9.9")]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["name"], "quad9");
        assert!(value[0]["secondary_address"].is_null());
        assert!(value[0]["description"].is_null());
    }
}
