//! Breadth-first search over element snapshots.

use crate::core::Element;
use std::collections::VecDeque;

/// First element, in breadth-first order, matching `predicate`.
pub fn find_element<'a>(root: &'a Element, predicate: impl Fn(&Element) -> bool) -> Option<&'a Element> {
    let mut queue = VecDeque::from([root]);

    while let Some(element) = queue.pop_front() {
        if predicate(element) {
            return Some(element);
        }
        queue.extend(element.children.iter());
    }

    None
}

/// All elements, in breadth-first order, matching `predicate`.
pub fn find_elements<'a>(root: &'a Element, predicate: impl Fn(&Element) -> bool) -> Vec<&'a Element> {
    let mut found = Vec::new();
    let mut queue = VecDeque::from([root]);

    while let Some(element) = queue.pop_front() {
        if predicate(element) {
            found.push(element);
        }
        queue.extend(element.children.iter());
    }

    found
}
