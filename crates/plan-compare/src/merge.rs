//! Merging and flattening of top/bottom property trees.
//!
//! Properties of the two plans are aligned by name, sorted with a
//! [`SortPolicy`], and flattened depth-first into [`TableRow`]s. A row's
//! `parent` is the absolute index of the row that introduced its subtree, so
//! parents always precede their children in the output.

use crate::property::GraphElementProperty;
use crate::sort::SortPolicy;
use crate::table::TableRow;
use crate::text::remove_line_breaks;
use std::collections::HashMap;

/// Indentation added per nesting level.
pub const INDENT: &str = "  ";

/// Top and/or bottom property sharing one name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergedPropertyEntry<'a> {
    /// Shared property name.
    pub name: &'a str,
    /// Display order of the side that created the entry.
    pub display_order: Option<i32>,
    /// Position in which the name was first seen; final sort tie-break.
    pub insertion_index: usize,
    /// Property from the top plan.
    pub top: Option<&'a GraphElementProperty>,
    /// Property from the bottom plan.
    pub bottom: Option<&'a GraphElementProperty>,
}

/// Align two sibling lists by property name.
///
/// Top properties are inserted first, then bottom properties either join an
/// existing entry or append a new one. A duplicate name within one side
/// replaces the earlier property but keeps the entry's position.
pub fn merge_properties<'a>(
    top: Option<&'a [GraphElementProperty]>,
    bottom: Option<&'a [GraphElementProperty]>,
) -> Vec<MergedPropertyEntry<'a>> {
    let mut entries: Vec<MergedPropertyEntry<'a>> = Vec::new();
    let mut by_name: HashMap<&'a str, usize> = HashMap::new();

    for prop in top.unwrap_or_default() {
        match by_name.get(prop.name.as_str()) {
            Some(&idx) => {
                entries[idx].top = Some(prop);
                entries[idx].display_order = prop.display_order;
            }
            None => {
                by_name.insert(prop.name.as_str(), entries.len());
                entries.push(MergedPropertyEntry {
                    name: prop.name.as_str(),
                    display_order: prop.display_order,
                    insertion_index: entries.len(),
                    top: Some(prop),
                    bottom: None,
                });
            }
        }
    }

    for prop in bottom.unwrap_or_default() {
        match by_name.get(prop.name.as_str()) {
            Some(&idx) => entries[idx].bottom = Some(prop),
            None => {
                by_name.insert(prop.name.as_str(), entries.len());
                entries.push(MergedPropertyEntry {
                    name: prop.name.as_str(),
                    display_order: prop.display_order,
                    insertion_index: entries.len(),
                    top: None,
                    bottom: Some(prop),
                });
            }
        }
    }

    entries
}

/// Merge, sort and flatten two property lists into grid rows.
///
/// Root rows have no parent. Each call recomputes everything from its inputs.
pub fn flatten_properties(
    top: Option<&[GraphElementProperty]>,
    bottom: Option<&[GraphElementProperty]>,
    policy: SortPolicy,
) -> Vec<TableRow> {
    let rows = flatten_level(top, bottom, None, 0, 0, policy);
    tracing::trace!(rows = rows.len(), %policy, "flattened plan properties");
    rows
}

/// Rows for one sibling level and its descendants.
///
/// `offset` is the absolute index the first produced row will occupy once the
/// caller appends the result to its own rows.
fn flatten_level(
    top: Option<&[GraphElementProperty]>,
    bottom: Option<&[GraphElementProperty]>,
    parent: Option<usize>,
    depth: usize,
    offset: usize,
    policy: SortPolicy,
) -> Vec<TableRow> {
    let mut entries = merge_properties(top, bottom);
    policy.sort(&mut entries);

    let mut rows = Vec::with_capacity(entries.len());

    for entry in entries {
        let name = format!("{}{}", INDENT.repeat(depth), entry.name);

        let (row, top_children, bottom_children) = match (entry.top, entry.bottom) {
            (Some(t), Some(b)) => (
                TableRow {
                    name,
                    parent,
                    value1: Some(remove_line_breaks(&t.display_value, " ")),
                    value2: Some(remove_line_breaks(&b.display_value, " ")),
                    display_order: t.display_order,
                },
                t.value.nested(),
                b.value.nested(),
            ),
            (Some(t), None) => (
                TableRow {
                    name,
                    parent,
                    value1: Some(t.display_value.clone()),
                    value2: None,
                    display_order: t.display_order,
                },
                t.value.nested(),
                None,
            ),
            (None, Some(b)) => (
                TableRow {
                    name,
                    parent,
                    value1: None,
                    value2: Some(b.display_value.clone()),
                    display_order: b.display_order,
                },
                None,
                b.value.nested(),
            ),
            (None, None) => continue,
        };

        let index = offset + rows.len();
        rows.push(row);

        // Leaf/leaf pairs have nothing to expand.
        if top_children.is_some() || bottom_children.is_some() {
            let children = flatten_level(
                top_children,
                bottom_children,
                Some(index),
                depth + 1,
                offset + rows.len(),
                policy,
            );
            rows.extend(children);
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_top_then_bottom() {
        let top = vec![
            GraphElementProperty::leaf("Cost", "5"),
            GraphElementProperty::leaf("Width", "8"),
        ];
        let bottom = vec![
            GraphElementProperty::leaf("Rows", "100"),
            GraphElementProperty::leaf("Cost", "7"),
        ];

        let entries = merge_properties(Some(&top[..]), Some(&bottom[..]));
        let names: Vec<_> = entries.iter().map(|e| e.name).collect();
        assert_eq!(names, ["Cost", "Width", "Rows"]);
        assert!(entries[0].top.is_some() && entries[0].bottom.is_some());
        assert!(entries[1].bottom.is_none());
        assert!(entries[2].top.is_none());
        assert_eq!(entries[2].insertion_index, 2);
    }

    #[test]
    fn test_merge_duplicate_name_overwrites() {
        let top = vec![
            GraphElementProperty::leaf("Cost", "1"),
            GraphElementProperty::leaf("Cost", "2").with_display_order(4),
        ];

        let entries = merge_properties(Some(&top[..]), None);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].top.unwrap().display_value, "2");
        assert_eq!(entries[0].display_order, Some(4));
    }

    #[test]
    fn test_both_absent_is_empty() {
        assert!(flatten_properties(None, None, SortPolicy::DisplayOrder).is_empty());
    }

    #[test]
    fn test_line_breaks_removed_only_when_both_sides_present() {
        let top = vec![
            GraphElementProperty::leaf("Predicate", "a\nb"),
            GraphElementProperty::leaf("Only Top", "x\ny"),
        ];
        let bottom = vec![
            GraphElementProperty::leaf("Predicate", "c\r\nd"),
            GraphElementProperty::leaf("Only Bottom", "p\nq"),
        ];

        let rows = flatten_properties(Some(&top[..]), Some(&bottom[..]), SortPolicy::Alphabetical);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Only Bottom");
        assert_eq!(rows[0].value2.as_deref(), Some("p\nq"));
        assert_eq!(rows[1].name, "Only Top");
        assert_eq!(rows[1].value1.as_deref(), Some("x\ny"));
        assert_eq!(rows[2].value1.as_deref(), Some("a b"));
        assert_eq!(rows[2].value2.as_deref(), Some("c d"));
    }

    #[test]
    fn test_leaf_pair_does_not_recurse() {
        let top = vec![GraphElementProperty::leaf("Cost", "5")];
        let bottom = vec![GraphElementProperty::leaf("Cost", "7")];

        let rows = flatten_properties(Some(&top[..]), Some(&bottom[..]), SortPolicy::DisplayOrder);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_nested_on_both_sides_merges_children() {
        let top = vec![GraphElementProperty::nested(
            "Output List",
            "a, b",
            vec![
                GraphElementProperty::leaf("a", "1"),
                GraphElementProperty::leaf("b", "2"),
            ],
        )];
        let bottom = vec![GraphElementProperty::nested(
            "Output List",
            "b, c",
            vec![
                GraphElementProperty::leaf("b", "3"),
                GraphElementProperty::leaf("c", "4"),
            ],
        )];

        let rows = flatten_properties(Some(&top[..]), Some(&bottom[..]), SortPolicy::Alphabetical);
        let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Output List", "  a", "  b", "  c"]);
        assert!(rows[1..].iter().all(|r| r.parent == Some(0)));
        assert_eq!(rows[2].value1.as_deref(), Some("2"));
        assert_eq!(rows[2].value2.as_deref(), Some("3"));
    }

    #[test]
    fn test_nested_on_one_side_only() {
        let top = vec![GraphElementProperty::leaf("Object", "[dbo].[t]")];
        let bottom = vec![GraphElementProperty::nested(
            "Object",
            "[dbo].[t]",
            vec![GraphElementProperty::leaf("Table", "t")],
        )];

        let rows = flatten_properties(Some(&top[..]), Some(&bottom[..]), SortPolicy::DisplayOrder);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].name, "  Table");
        assert_eq!(rows[1].value1, None);
        assert_eq!(rows[1].value2.as_deref(), Some("t"));
        assert_eq!(rows[1].parent, Some(0));
    }

    #[test]
    fn test_parent_indices_are_absolute() {
        let top = vec![
            GraphElementProperty::nested(
                "A",
                "",
                vec![GraphElementProperty::nested(
                    "A1",
                    "",
                    vec![GraphElementProperty::leaf("A1x", "1")],
                )],
            )
            .with_display_order(1),
            GraphElementProperty::nested("B", "", vec![GraphElementProperty::leaf("B1", "2")])
                .with_display_order(2),
        ];

        let rows = flatten_properties(Some(&top[..]), None, SortPolicy::DisplayOrder);
        let shape: Vec<_> = rows.iter().map(|r| (r.name.as_str(), r.parent)).collect();
        assert_eq!(
            shape,
            [
                ("A", None),
                ("  A1", Some(0)),
                ("    A1x", Some(1)),
                ("B", None),
                ("  B1", Some(3)),
            ]
        );
    }

    #[test]
    fn test_scenario_absent_display_order_first() {
        let top = vec![GraphElementProperty::leaf("Cost", "5").with_display_order(1)];
        let bottom = vec![
            GraphElementProperty::leaf("Cost", "7").with_display_order(1),
            GraphElementProperty::leaf("Rows", "100"),
        ];

        let rows = flatten_properties(Some(&top[..]), Some(&bottom[..]), SortPolicy::DisplayOrder);
        assert_eq!(
            rows,
            vec![
                TableRow {
                    name: "Rows".into(),
                    parent: None,
                    value1: None,
                    value2: Some("100".into()),
                    display_order: None,
                },
                TableRow {
                    name: "Cost".into(),
                    parent: None,
                    value1: Some("5".into()),
                    value2: Some("7".into()),
                    display_order: Some(1),
                },
            ]
        );
    }
}
