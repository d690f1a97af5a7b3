//! Property tests for breadth-first element search.

use proptest::prelude::*;
use smoke_driver::{find_element, find_elements, Element};

fn arb_element() -> impl Strategy<Value = Element> {
    let leaf = ("[a-c]", 0u8..4).prop_map(|(class, depth)| Element {
        tag_name: "DIV".to_string(),
        class_name: class,
        text_content: depth.to_string(),
        ..Element::default()
    });

    leaf.prop_recursive(4, 32, 4, |inner| {
        ("[a-c]", prop::collection::vec(inner, 0..4)).prop_map(|(class, children)| Element {
            tag_name: "DIV".to_string(),
            class_name: class,
            children,
            ..Element::default()
        })
    })
}

fn count(element: &Element) -> usize {
    1 + element.children.iter().map(count).sum::<usize>()
}

fn depth_of(root: &Element, target: *const Element) -> Option<usize> {
    let mut level = vec![root];
    let mut depth = 0;
    while !level.is_empty() {
        if level.iter().any(|e| std::ptr::eq(*e, target)) {
            return Some(depth);
        }
        level = level.iter().flat_map(|e| e.children.iter()).collect();
        depth += 1;
    }
    None
}

proptest! {
    #[test]
    fn test_find_elements_visits_every_node(root in arb_element()) {
        prop_assert_eq!(find_elements(&root, |_| true).len(), count(&root));
    }

    #[test]
    fn test_find_element_is_first_of_find_elements(root in arb_element(), class in "[a-c]") {
        let all = find_elements(&root, |e| e.has_class(&class));
        let first = find_element(&root, |e| e.has_class(&class));
        prop_assert_eq!(first.map(|e| e as *const Element), all.first().map(|e| *e as *const Element));
    }

    #[test]
    fn test_results_are_in_breadth_first_order(root in arb_element(), class in "[a-c]") {
        let found = find_elements(&root, |e| e.has_class(&class));
        let depths: Vec<usize> = found
            .iter()
            .map(|e| depth_of(&root, *e as *const Element).unwrap())
            .collect();
        prop_assert!(depths.windows(2).all(|w| w[0] <= w[1]));
    }
}
