use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub align: Align,
    /// Shrinks to fit the terminal; at most one per table
    pub flexible: bool,
}

impl Column {
    pub fn text(header: &'static str) -> Self {
        Self {
            header,
            align: Align::Left,
            flexible: false,
        }
    }

    pub fn number(header: &'static str) -> Self {
        Self {
            header,
            align: Align::Right,
            flexible: false,
        }
    }

    pub fn name(header: &'static str) -> Self {
        Self {
            header,
            align: Align::Left,
            flexible: true,
        }
    }
}

/// A rectangular table of pre-formatted cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Format a number with `decimals` places; absent values render as "-"
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => "-".to_string(),
    }
}

/// Truncate a name to fit available width, accounting for Unicode
pub fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad(cell: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", cell, width = width),
        Align::Right => format!("{:>width$}", cell, width = width),
    }
}

/// Render with a header row and a 1-based rank column.
/// `empty` is printed when there are no rows.
pub fn format_table(table: &Table, empty: &str, use_colors: bool) -> String {
    format_table_with_width(table, empty, use_colors, get_terminal_width())
}

fn format_table_with_width(
    table: &Table,
    empty: &str,
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if table.is_empty() {
        return empty.to_string();
    }

    let separator = "  ";
    let index_width = format!("{}.", table.rows.len()).len().max(3);

    let mut widths: Vec<usize> = table
        .columns
        .iter()
        .map(|c| c.header.chars().count())
        .collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    // Shrink the flexible column so the whole line fits the terminal
    if let (Some(width), Some(flex)) = (term_width, table.columns.iter().position(|c| c.flexible)) {
        let fixed: usize = index_width
            + widths
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != flex)
                .map(|(_, w)| w + separator.len())
                .sum::<usize>()
            + separator.len();
        let available = width.saturating_sub(fixed).max(12);
        widths[flex] = widths[flex].min(available);
    }

    let render_row = |cells: Vec<String>| -> String {
        cells
            .iter()
            .zip(&table.columns)
            .zip(&widths)
            .map(|((cell, column), &w)| {
                let cell = if column.flexible { truncate_name(cell, w) } else { cell.clone() };
                pad(&cell, w, column.align)
            })
            .collect::<Vec<_>>()
            .join(separator)
            .trim_end()
            .to_string()
    };

    let header = render_row(table.columns.iter().map(|c| c.header.to_string()).collect());
    let header = format!("{:>iw$}{}{}", "", separator, header, iw = index_width);

    let mut lines = Vec::with_capacity(table.rows.len() + 1);
    lines.push(if use_colors { header.bold().to_string() } else { header });

    for (idx, row) in table.rows.iter().enumerate() {
        let index_str = format!("{:>iw$}", format!("{}.", idx + 1), iw = index_width);
        let body = render_row(row.clone());
        if use_colors {
            lines.push(format!("{}{}{}", index_str.dimmed(), separator, body));
        } else {
            lines.push(format!("{}{}{}", index_str, separator, body));
        }
    }

    lines.join("\n")
}

/// Format rows as tab-separated values for scripting (no headers, no colors)
pub fn format_tsv(table: &Table) -> String {
    table
        .rows
        .iter()
        .map(|row| row.join("\t"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        let mut table = Table::new(vec![
            Column::name("Driver"),
            Column::text("Team"),
            Column::number("Points"),
        ]);
        table.push(vec!["Max Verstappen".into(), "Red Bull Racing".into(), "9.125".into()]);
        table.push(vec!["Lando Norris".into(), "McLaren".into(), "10.000".into()]);
        table
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Some(8.5243), 3), "8.524");
        assert_eq!(format_number(Some(2.0), 1), "2.0");
        assert_eq!(format_number(None, 3), "-");
    }

    #[test]
    fn test_truncate_name_short() {
        assert_eq!(truncate_name("Short name", 20), "Short name");
    }

    #[test]
    fn test_truncate_name_exact() {
        assert_eq!(truncate_name("Exact", 5), "Exact");
    }

    #[test]
    fn test_truncate_name_long() {
        assert_eq!(truncate_name("This is a very long name", 15), "This is a ve...");
    }

    #[test]
    fn test_truncate_name_unicode() {
        // By char, not by byte
        assert_eq!(truncate_name("Sergio Pérez", 12), "Sergio Pérez");
        assert_eq!(truncate_name("Nico Hülkenberg", 8), "Nico ...");
    }

    #[test]
    fn test_truncate_name_very_narrow() {
        assert_eq!(truncate_name("Hello world", 3), "Hel");
    }

    #[test]
    fn test_format_table_empty() {
        let table = Table::new(vec![Column::text("Driver")]);
        assert_eq!(format_table(&table, "No results.", false), "No results.");
    }

    #[test]
    fn test_format_table_layout() {
        let result = format_table_with_width(&sample_table(), "", false, None);
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Driver"));
        assert!(lines[0].ends_with("Points"));
        assert!(lines[1].starts_with(" 1."));
        assert!(lines[2].starts_with(" 2."));
        // Right-aligned number column
        assert!(lines[1].ends_with(" 9.125"));
        assert!(lines[2].ends_with("10.000"));
        assert_eq!(lines[1].chars().count(), lines[2].chars().count());
    }

    #[test]
    fn test_format_table_truncates_flexible_column() {
        let result = format_table_with_width(&sample_table(), "", false, Some(40));
        assert!(result.contains("..."));
        assert!(result.contains("Red Bull Racing"));
    }

    #[test]
    fn test_format_tsv() {
        let result = format_tsv(&sample_table());
        let lines: Vec<&str> = result.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Max Verstappen\tRed Bull Racing\t9.125");
        assert_eq!(lines[1].split('\t').count(), 3);
    }

    #[test]
    fn test_format_tsv_empty() {
        assert_eq!(format_tsv(&Table::new(vec![Column::text("Driver")])), "");
    }
}
