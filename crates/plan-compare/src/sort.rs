//! Sort policies for merged property entries.
//!
//! Every policy is a total order: remaining ties are broken by the entry's
//! insertion index, so sorting is deterministic and idempotent.

use crate::merge::MergedPropertyEntry;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Ordering applied to sibling properties before flattening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortPolicy {
    /// Ascending display order; entries without one come first.
    #[default]
    DisplayOrder,
    /// Ascending name; unnamed entries come first.
    Alphabetical,
    /// Descending name; unnamed entries still come first.
    ReverseAlphabetical,
    /// Descending display order; entries without one come first.
    ReverseDisplayOrder,
}

impl SortPolicy {
    /// All policies, in menu order.
    pub const ALL: [SortPolicy; 4] = [
        Self::DisplayOrder,
        Self::Alphabetical,
        Self::ReverseAlphabetical,
        Self::ReverseDisplayOrder,
    ];

    /// Kebab-case policy name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DisplayOrder => "display-order",
            Self::Alphabetical => "alphabetical",
            Self::ReverseAlphabetical => "reverse-alphabetical",
            Self::ReverseDisplayOrder => "reverse-display-order",
        }
    }

    /// Compare two entries under this policy, including the insertion tie-break.
    pub fn compare(&self, a: &MergedPropertyEntry<'_>, b: &MergedPropertyEntry<'_>) -> Ordering {
        let primary = match self {
            Self::DisplayOrder => absent_first(a.display_order, b.display_order, |x, y| x.cmp(&y)),
            Self::ReverseDisplayOrder => {
                absent_first(a.display_order, b.display_order, |x, y| y.cmp(&x))
            }
            Self::Alphabetical => {
                absent_first(named(a.name), named(b.name), |x, y| locale_compare(x, y))
            }
            Self::ReverseAlphabetical => {
                absent_first(named(a.name), named(b.name), |x, y| locale_compare(y, x))
            }
        };

        primary.then_with(|| a.insertion_index.cmp(&b.insertion_index))
    }

    /// Sort entries in place.
    pub fn sort(&self, entries: &mut [MergedPropertyEntry<'_>]) {
        entries.sort_by(|a, b| self.compare(a, b));
    }
}

impl fmt::Display for SortPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "display-order" | "importance" => Ok(Self::DisplayOrder),
            "alphabetical" | "alpha" => Ok(Self::Alphabetical),
            "reverse-alphabetical" | "reverse-alpha" => Ok(Self::ReverseAlphabetical),
            "reverse-display-order" => Ok(Self::ReverseDisplayOrder),
            _ => Err(crate::Error::UnknownSortPolicy(s.to_string())),
        }
    }
}

fn named(name: &str) -> Option<&str> {
    (!name.is_empty()).then_some(name)
}

fn absent_first<T>(a: Option<T>, b: Option<T>, cmp: impl FnOnce(T, T) -> Ordering) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => cmp(x, y),
    }
}

/// Case-insensitive comparison with lowercase ordered before uppercase on ties.
///
/// ```rust
/// use plan_compare::sort::locale_compare;
/// use std::cmp::Ordering;
///
/// assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
/// assert_eq!(locale_compare("rows", "Rows"), Ordering::Less);
/// ```
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));

    folded
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, order: Option<i32>, index: usize) -> MergedPropertyEntry<'_> {
        MergedPropertyEntry {
            name,
            display_order: order,
            insertion_index: index,
            top: None,
            bottom: None,
        }
    }

    fn names(entries: &[MergedPropertyEntry<'_>]) -> Vec<String> {
        entries.iter().map(|e| e.name.to_string()).collect()
    }

    #[test]
    fn test_display_order_absent_first() {
        let mut entries = vec![
            entry("Cost", Some(2), 0),
            entry("Rows", None, 1),
            entry("Width", Some(1), 2),
        ];
        SortPolicy::DisplayOrder.sort(&mut entries);
        assert_eq!(names(&entries), ["Rows", "Width", "Cost"]);
    }

    #[test]
    fn test_display_order_ties_keep_insertion_order() {
        let mut entries = vec![
            entry("b", None, 0),
            entry("a", None, 1),
            entry("d", Some(3), 2),
            entry("c", Some(3), 3),
        ];
        SortPolicy::DisplayOrder.sort(&mut entries);
        assert_eq!(names(&entries), ["b", "a", "d", "c"]);
    }

    #[test]
    fn test_zero_display_order_is_present() {
        let mut entries = vec![entry("zero", Some(0), 0), entry("none", None, 1)];
        SortPolicy::DisplayOrder.sort(&mut entries);
        assert_eq!(names(&entries), ["none", "zero"]);
    }

    #[test]
    fn test_alphabetical_is_case_insensitive() {
        let mut entries = vec![
            entry("estimated rows", None, 0),
            entry("Actual Rows", None, 1),
            entry("Cost", None, 2),
        ];
        SortPolicy::Alphabetical.sort(&mut entries);
        assert_eq!(names(&entries), ["Actual Rows", "Cost", "estimated rows"]);
    }

    #[test]
    fn test_alphabetical_empty_name_first() {
        let mut entries = vec![entry("Cost", None, 0), entry("", None, 1)];
        SortPolicy::Alphabetical.sort(&mut entries);
        assert_eq!(names(&entries), ["", "Cost"]);
    }

    #[test]
    fn test_reverse_alphabetical_sorts_names_descending() {
        let mut entries = vec![
            entry("Cost", Some(3), 0),
            entry("Rows", Some(1), 1),
            entry("Actual", Some(2), 2),
            entry("", None, 3),
        ];
        SortPolicy::ReverseAlphabetical.sort(&mut entries);
        assert_eq!(names(&entries), ["", "Rows", "Cost", "Actual"]);
    }

    #[test]
    fn test_reverse_display_order_sorts_orders_descending() {
        let mut entries = vec![
            entry("Cost", Some(1), 0),
            entry("Rows", None, 1),
            entry("Width", Some(5), 2),
        ];
        SortPolicy::ReverseDisplayOrder.sort(&mut entries);
        assert_eq!(names(&entries), ["Rows", "Width", "Cost"]);
    }

    #[test]
    fn test_policy_parse_and_display() {
        for policy in SortPolicy::ALL {
            assert_eq!(policy.as_str().parse::<SortPolicy>().unwrap(), policy);
        }
        assert_eq!(
            "Reverse_Alphabetical".parse::<SortPolicy>().unwrap(),
            SortPolicy::ReverseAlphabetical
        );
        assert!("by-cost".parse::<SortPolicy>().is_err());
    }

    #[test]
    fn test_locale_compare_total() {
        assert_eq!(locale_compare("a", "a"), Ordering::Equal);
        assert_eq!(locale_compare("a", "B"), Ordering::Less);
        assert_eq!(locale_compare("B", "a"), Ordering::Greater);
        assert_eq!(locale_compare("Rows", "rows"), Ordering::Greater);
    }
}
