//! Output formatting for the plan-compare CLI.
//!
//! Comparison grids are rendered with `comfy-table` for terminals, or
//! emitted as JSON for scripting.

use anyhow::Result;
use comfy_table::{presets::NOTHING, presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use plan_compare::{Column, GridRenderer, GridRow};
use serde::Serialize;
use std::fmt::Display;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Bordered table
    Human,
    /// JSON output for scripting
    Json,
    /// Borderless table without colors
    Plain,
}

/// Print an error message
pub fn error(msg: impl Display) {
    eprintln!("error: {}", msg);
}

/// Grid renderer backed by a terminal table.
///
/// Each render replaces the previous table.
#[derive(Debug)]
pub struct TableGrid {
    format: OutputFormat,
    table: Option<Table>,
}

impl TableGrid {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            table: None,
        }
    }

    /// Table from the last render.
    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }
}

impl GridRenderer for TableGrid {
    fn render(&mut self, columns: &[Column], rows: &[GridRow]) {
        let mut table = Table::new();
        match self.format {
            OutputFormat::Plain => {
                table.load_preset(NOTHING);
                table.set_header(columns.iter().map(|c| Cell::new(c.name)));
            }
            _ => {
                table
                    .load_preset(UTF8_FULL)
                    .set_content_arrangement(ContentArrangement::Dynamic);
                table.set_header(columns.iter().map(|c| Cell::new(c.name).fg(Color::Cyan)));
            }
        }

        for row in rows {
            table.add_row(
                columns
                    .iter()
                    .map(|c| Cell::new(row.get(c.field).map(String::as_str).unwrap_or(""))),
            );
        }

        self.table = Some(table);
    }
}

/// Print `data` as pretty JSON.
pub fn json<T: Serialize>(data: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use plan_compare::comparison_columns;

    fn row(name: &str, value1: Option<&str>, value2: Option<&str>) -> GridRow {
        let mut row = GridRow::new();
        row.insert("name", name.to_string());
        row.insert("parent", "-1".to_string());
        if let Some(v) = value1 {
            row.insert("value1", v.to_string());
        }
        if let Some(v) = value2 {
            row.insert("value2", v.to_string());
        }
        row
    }

    #[test]
    fn test_table_grid_renders_columns_and_rows() {
        let mut grid = TableGrid::new(OutputFormat::Plain);
        grid.render(
            &comparison_columns(),
            &[row("Cost", Some("5"), Some("7")), row("Rows", None, Some("100"))],
        );

        let text = grid.table().unwrap().to_string();
        assert!(text.contains("Value (Top Plan)"));
        assert!(text.contains("Value (Bottom Plan)"));
        assert!(text.contains("Cost"));
        assert!(text.contains("100"));
        assert_eq!(grid.table().unwrap().row_count(), 2);
    }

    #[test]
    fn test_rerender_replaces_table() {
        let mut grid = TableGrid::new(OutputFormat::Human);
        grid.render(&comparison_columns(), &[row("a", Some("1"), None)]);
        grid.render(&comparison_columns(), &[]);
        assert_eq!(grid.table().unwrap().row_count(), 0);
    }
}
