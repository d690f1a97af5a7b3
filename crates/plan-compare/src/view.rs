//! Comparison properties view controller.
//!
//! Tracks the two selected plan elements, keeps the header labels in sync,
//! and re-renders the merged property table through a [`GridRenderer`] on
//! every change.

use crate::merge::flatten_properties;
use crate::property::PlanElement;
use crate::sort::SortPolicy;
use crate::table::{Column, GridRow, TableRow, comparison_columns};
use crate::text::remove_line_breaks;
use tracing::debug;

/// Label used for elements without a name.
pub const EDGE_LABEL: &str = "Edge";

/// Grid widget collaborator.
pub trait GridRenderer {
    /// Replace the grid contents with `rows` under `columns`.
    fn render(&mut self, columns: &[Column], rows: &[GridRow]);
}

impl<F> GridRenderer for F
where
    F: FnMut(&[Column], &[GridRow]),
{
    fn render(&mut self, columns: &[Column], rows: &[GridRow]) {
        self(columns, rows)
    }
}

/// Side-by-side properties view for two plan elements.
#[derive(Debug)]
pub struct ComparisonView<R> {
    top: Option<PlanElement>,
    bottom: Option<PlanElement>,
    top_header: String,
    bottom_header: String,
    policy: SortPolicy,
    rows: Vec<TableRow>,
    renderer: R,
}

impl<R: GridRenderer> ComparisonView<R> {
    /// Create an empty view rendering through `renderer`.
    pub fn new(renderer: R) -> Self {
        Self {
            top: None,
            bottom: None,
            top_header: String::new(),
            bottom_header: String::new(),
            policy: SortPolicy::default(),
            rows: Vec::new(),
            renderer,
        }
    }

    /// Select the top plan element and re-render.
    pub fn set_top_element(&mut self, element: PlanElement) {
        self.top_header = format!("Top operation: {}", operation_label(&element));
        self.top = Some(element);
        self.render();
    }

    /// Select the bottom plan element and re-render.
    pub fn set_bottom_element(&mut self, element: PlanElement) {
        self.bottom_header = format!("Bottom operation: {}", operation_label(&element));
        self.bottom = Some(element);
        self.render();
    }

    /// Change the sort policy and re-render.
    pub fn set_sort_policy(&mut self, policy: SortPolicy) {
        self.policy = policy;
        self.render();
    }

    /// Recompute all rows from the selected elements and push them to the grid.
    pub fn render(&mut self) {
        let top = self.top.as_ref().map(PlanElement::properties);
        let bottom = self.bottom.as_ref().map(PlanElement::properties);

        self.rows = flatten_properties(top, bottom, self.policy);
        let grid_rows: Vec<GridRow> = self.rows.iter().map(TableRow::to_grid_row).collect();

        debug!(rows = grid_rows.len(), policy = %self.policy, "rendering comparison properties");
        self.renderer.render(&comparison_columns(), &grid_rows);
    }

    /// Header text for the top element.
    pub fn top_header(&self) -> &str {
        &self.top_header
    }

    /// Header text for the bottom element.
    pub fn bottom_header(&self) -> &str {
        &self.bottom_header
    }

    /// Active sort policy.
    pub fn sort_policy(&self) -> SortPolicy {
        self.policy
    }

    /// Rows produced by the last render.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// The grid collaborator.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Consume the view, returning the grid collaborator.
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}

fn operation_label(element: &PlanElement) -> String {
    element
        .name()
        .map(|name| remove_line_breaks(name, ""))
        .unwrap_or_else(|| EDGE_LABEL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::GraphElementProperty;

    #[derive(Default)]
    struct RecordingGrid {
        renders: Vec<(Vec<Column>, Vec<GridRow>)>,
    }

    impl GridRenderer for RecordingGrid {
        fn render(&mut self, columns: &[Column], rows: &[GridRow]) {
            self.renders.push((columns.to_vec(), rows.to_vec()));
        }
    }

    fn node(name: &str, props: Vec<GraphElementProperty>) -> PlanElement {
        PlanElement::Node {
            name: name.to_string(),
            properties: props,
        }
    }

    #[test]
    fn test_headers_use_operation_name() {
        let mut view = ComparisonView::new(RecordingGrid::default());
        view.set_top_element(node("Clustered\nIndex Scan", vec![]));
        view.set_bottom_element(PlanElement::Edge { properties: vec![] });

        assert_eq!(view.top_header(), "Top operation: ClusteredIndex Scan");
        assert_eq!(view.bottom_header(), "Bottom operation: Edge");
    }

    #[test]
    fn test_each_setter_renders() {
        let mut view = ComparisonView::new(RecordingGrid::default());
        view.set_top_element(node("Sort", vec![GraphElementProperty::leaf("Cost", "5")]));
        assert_eq!(view.renderer().renders.len(), 1);
        assert_eq!(view.rows()[0].value2, None);

        view.set_bottom_element(node("Sort", vec![GraphElementProperty::leaf("Cost", "7")]));
        assert_eq!(view.renderer().renders.len(), 2);

        let (columns, rows) = &view.renderer().renders[1];
        assert_eq!(columns.len(), 3);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["value1"], "5");
        assert_eq!(rows[0]["value2"], "7");
    }

    #[test]
    fn test_sort_policy_change_rerenders() {
        let mut view = ComparisonView::new(RecordingGrid::default());
        view.set_top_element(node(
            "Filter",
            vec![
                GraphElementProperty::leaf("b", "1").with_display_order(1),
                GraphElementProperty::leaf("a", "2").with_display_order(2),
            ],
        ));
        assert_eq!(view.rows()[0].name, "b");

        view.set_sort_policy(SortPolicy::Alphabetical);
        assert_eq!(view.sort_policy(), SortPolicy::Alphabetical);
        assert_eq!(view.rows()[0].name, "a");
        assert_eq!(view.renderer().renders.len(), 2);
    }

    #[test]
    fn test_closure_renderer() {
        let mut seen = 0;
        {
            let mut view = ComparisonView::new(|_: &[Column], rows: &[GridRow]| seen = rows.len());
            view.set_top_element(node("Scan", vec![GraphElementProperty::leaf("Rows", "1")]));
        }
        assert_eq!(seen, 1);
    }
}
