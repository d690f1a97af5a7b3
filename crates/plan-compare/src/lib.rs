//! # Execution plan comparison properties
//!
//! Merges the properties of two execution plan elements (the "top" and the
//! "bottom" plan) by property name and flattens the merged tree into
//! parent-indexed, indented rows for a two-column diff grid.
//!
//! ## Quick Start
//!
//! ```rust
//! use plan_compare::{flatten_properties, GraphElementProperty, SortPolicy};
//!
//! let top = vec![GraphElementProperty::leaf("Cost", "5").with_display_order(1)];
//! let bottom = vec![
//!     GraphElementProperty::leaf("Cost", "7").with_display_order(1),
//!     GraphElementProperty::leaf("Rows", "100"),
//! ];
//!
//! let rows = flatten_properties(Some(&top[..]), Some(&bottom[..]), SortPolicy::DisplayOrder);
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[0].name, "Rows");
//! assert_eq!(rows[1].value1.as_deref(), Some("5"));
//! assert_eq!(rows[1].value2.as_deref(), Some("7"));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod merge;
pub mod property;
pub mod result;
pub mod sort;
pub mod table;
pub mod text;
pub mod view;

pub use error::Error;
pub use merge::{flatten_properties, merge_properties, MergedPropertyEntry};
pub use property::{GraphElementProperty, PlanElement, PropertyValue};
pub use result::Result;
pub use sort::SortPolicy;
pub use table::{Column, EditorKind, FormatterKind, GridRow, TableRow, comparison_columns};
pub use view::{ComparisonView, GridRenderer};
