//! Read-aggregation helper: correlate child records with their parents.

use std::collections::HashMap;
use std::hash::Hash;

/// Groups child records by a foreign-key accessor.
///
/// Children keep their input order within each group, so a listing built
/// from a sorted child query stays sorted after the join. Parents with no
/// children simply have no entry in the map; the caller decides whether
/// that means "empty" (parent exists) or "not found" (parent absent).
pub fn group_by_parent<K, C, F>(children: Vec<C>, key: F) -> HashMap<K, Vec<C>>
where
    K: Eq + Hash,
    F: Fn(&C) -> K,
{
    let mut grouped: HashMap<K, Vec<C>> = HashMap::new();
    for child in children {
        grouped.entry(key(&child)).or_default().push(child);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_children_under_their_parent_key() {
        let children = vec![("a", 1), ("b", 2), ("a", 3)];
        let grouped = group_by_parent(children, |c| c.0);

        assert_eq!(grouped["a"], vec![("a", 1), ("a", 3)]);
        assert_eq!(grouped["b"], vec![("b", 2)]);
    }

    #[test]
    fn parent_without_children_has_no_entry() {
        let grouped = group_by_parent(Vec::<(&str, i32)>::new(), |c| c.0);
        assert!(grouped.is_empty());
    }

    #[test]
    fn preserves_child_order_within_group() {
        let children = vec![("p", "first"), ("p", "second"), ("p", "third")];
        let grouped = group_by_parent(children, |c| c.0);
        let values: Vec<_> = grouped["p"].iter().map(|c| c.1).collect();
        assert_eq!(values, vec!["first", "second", "third"]);
    }
}
