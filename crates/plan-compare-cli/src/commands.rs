//! Command implementations.

use crate::output::{self, OutputFormat, TableGrid};
use anyhow::{Context, Result};
use plan_compare::{ComparisonView, PlanElement, SortPolicy, TableRow};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Result of comparing two plan elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub top_header: String,
    pub bottom_header: String,
    pub sort_policy: String,
    pub rows: Vec<TableRow>,
}

/// Read a plan element from a JSON file.
pub fn load_element(path: &Path) -> Result<PlanElement> {
    let element = PlanElement::from_path(path)
        .with_context(|| format!("Failed to read plan element from {}", path.display()))?;

    debug!(
        path = %path.display(),
        properties = element.properties().len(),
        "loaded plan element"
    );
    Ok(element)
}

/// Compare two elements through a comparison view rendering into `grid`.
pub fn compare(
    top: Option<PlanElement>,
    bottom: Option<PlanElement>,
    policy: SortPolicy,
    grid: TableGrid,
) -> (DiffReport, TableGrid) {
    let mut view = ComparisonView::new(grid);
    view.set_sort_policy(policy);
    if let Some(top) = top {
        view.set_top_element(top);
    }
    if let Some(bottom) = bottom {
        view.set_bottom_element(bottom);
    }

    let report = DiffReport {
        top_header: view.top_header().to_string(),
        bottom_header: view.bottom_header().to_string(),
        sort_policy: view.sort_policy().to_string(),
        rows: view.rows().to_vec(),
    };
    (report, view.into_renderer())
}

/// `diff` command: print the side-by-side comparison of two plan elements.
pub fn diff(top: Option<&Path>, bottom: Option<&Path>, policy: SortPolicy, format: OutputFormat) -> Result<()> {
    let top = top.map(load_element).transpose()?;
    let bottom = bottom.map(load_element).transpose()?;

    let (report, grid) = compare(top, bottom, policy, TableGrid::new(format));

    match format {
        OutputFormat::Json => output::json(&report)?,
        OutputFormat::Human | OutputFormat::Plain => {
            for header in [&report.top_header, &report.bottom_header] {
                if !header.is_empty() {
                    println!("{}", header);
                }
            }
            if let Some(table) = grid.table() {
                println!("{}", table);
            }
        }
    }

    Ok(())
}

/// `policies` command: list the available sort policies.
pub fn policies(format: OutputFormat) -> Result<()> {
    let names: Vec<&str> = SortPolicy::ALL.iter().map(SortPolicy::as_str).collect();
    match format {
        OutputFormat::Json => output::json(&names)?,
        OutputFormat::Human | OutputFormat::Plain => {
            for policy in SortPolicy::ALL {
                let marker = if policy == SortPolicy::default() { " (default)" } else { "" };
                println!("{}{}", policy, marker);
            }
        }
    }
    Ok(())
}
