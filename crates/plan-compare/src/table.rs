//! Grid rows and column descriptors for the comparison table.

use serde::Serialize;
use std::collections::BTreeMap;

/// Field-keyed row handed to the grid widget.
pub type GridRow = BTreeMap<&'static str, String>;

/// Grid value used for the parent of root rows.
pub const ROOT_PARENT: &str = "-1";

/// One flattened comparison row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    /// Property name prefixed with two spaces per nesting level.
    pub name: String,
    /// Index of the row that introduced this subtree; `None` at the root.
    pub parent: Option<usize>,
    /// Display value from the top plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value1: Option<String>,
    /// Display value from the bottom plan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    /// Display order hint carried from the source property.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl TableRow {
    /// Nesting depth derived from the name's indentation.
    pub fn depth(&self) -> usize {
        let indent = self.name.len() - self.name.trim_start_matches(' ').len();
        indent / crate::merge::INDENT.len()
    }

    /// Convert into the string map consumed by the grid.
    ///
    /// Absent values are omitted; root rows carry a parent of `-1`.
    pub fn to_grid_row(&self) -> GridRow {
        let mut row = GridRow::new();
        row.insert("name", self.name.clone());
        row.insert(
            "parent",
            self.parent
                .map(|p| p.to_string())
                .unwrap_or_else(|| ROOT_PARENT.to_string()),
        );
        if let Some(v) = &self.value1 {
            row.insert("value1", v.clone());
        }
        if let Some(v) = &self.value2 {
            row.insert("value2", v.clone());
        }
        if let Some(order) = self.display_order {
            row.insert("displayOrder", order.to_string());
        }
        row
    }
}

/// Cell editor used by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    /// Plain text editor.
    Text,
}

/// Cell formatter used by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    /// Escaped plain text.
    Text,
}

/// Column descriptor for the grid widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Column id.
    pub id: &'static str,
    /// Header text.
    pub name: &'static str,
    /// Row field the column displays.
    pub field: &'static str,
    /// Initial width in pixels.
    pub width: u32,
    /// Cell editor.
    pub editor: EditorKind,
    /// CSS class of the header cell.
    pub header_css_class: &'static str,
    /// Cell formatter.
    pub formatter: FormatterKind,
}

impl Column {
    const fn text(id: &'static str, name: &'static str, field: &'static str, width: u32) -> Self {
        Self {
            id,
            name,
            field,
            width,
            editor: EditorKind::Text,
            header_css_class: "prop-table-header",
            formatter: FormatterKind::Text,
        }
    }
}

/// The three fixed columns of the comparison table.
pub fn comparison_columns() -> [Column; 3] {
    [
        Column::text("name", "Name", "name", 200),
        Column::text("value1", "Value (Top Plan)", "value1", 150),
        Column::text("value2", "Value (Bottom Plan)", "value2", 150),
    ]
}
