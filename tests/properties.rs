//! Property-based tests for BalancedMap.

use std::collections::BTreeMap;

use balanced_map::{BalancedMap, ElementNotFound};
use proptest::prelude::*;

fn max_height(len: usize) -> f64 {
    1.4405 * ((len + 2) as f64).log2() - 1.0
}

fn arbitrary_entries(max_size: usize) -> impl Strategy<Value = Vec<(i32, i32)>> {
    prop::collection::vec((any::<i32>(), any::<i32>()), 0..max_size)
}

proptest! {
    /// In-order traversal is sorted, free of duplicates and as long as the map.
    #[test]
    fn prop_in_order_is_sorted(entries in arbitrary_entries(500)) {
        let map: BalancedMap<i32, i32> = entries.iter().copied().collect();
        let keys = map.in_order();
        prop_assert_eq!(keys.len(), map.len());
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// The map agrees with BTreeMap on every key and value.
    #[test]
    fn prop_matches_btree_map(entries in arbitrary_entries(500), probe: i32) {
        let mut map = BalancedMap::new();
        let mut model = BTreeMap::new();
        for (key, value) in &entries {
            prop_assert_eq!(map.insert(*key, *value), model.insert(*key, *value));
        }
        prop_assert_eq!(map.len(), model.len());
        prop_assert!(map.iter().eq(model.iter()));
        prop_assert_eq!(map.contains(&probe), model.contains_key(&probe));
        prop_assert_eq!(map.find(&probe).ok(), model.get(&probe));
    }

    /// Height stays within the AVL bound for random insertion orders.
    #[test]
    fn prop_height_is_logarithmic(entries in arbitrary_entries(1000)) {
        let map: BalancedMap<i32, i32> = entries.into_iter().collect();
        if let Some(height) = map.height() {
            prop_assert!(height as f64 <= max_height(map.len()));
        } else {
            prop_assert!(map.is_empty());
        }
    }

    /// Height stays within the AVL bound for sorted insertion orders.
    #[test]
    fn prop_sorted_height_is_logarithmic(len in 1usize..1000, descending: bool) {
        let mut map = BalancedMap::new();
        for key in 0..len {
            let key = if descending { len - key } else { key };
            map.insert(key, ());
        }
        prop_assert_eq!(map.len(), len);
        prop_assert!(map.height().unwrap() as f64 <= max_height(len));
    }

    /// Replacing a value leaves size and shape untouched.
    #[test]
    fn prop_insert_replaces(entries in arbitrary_entries(100), key: i32, first: i32, second: i32) {
        let mut map: BalancedMap<i32, i32> = entries.into_iter().collect();
        map.insert(key, first);
        let len = map.len();
        let pre_order = map.pre_order();
        prop_assert_eq!(map.insert(key, second), Some(first));
        prop_assert_eq!(map.len(), len);
        prop_assert_eq!(map.pre_order(), pre_order);
        prop_assert_eq!(map.find(&key), Ok(&second));
    }

    /// Pre-order starts at the root and post-order ends there, both cover every key.
    #[test]
    fn prop_traversals_cover_all_keys(entries in arbitrary_entries(300)) {
        let map: BalancedMap<i32, i32> = entries.into_iter().collect();
        if map.is_empty() {
            prop_assert_eq!(map.pre_order(), Err(ElementNotFound));
            prop_assert_eq!(map.post_order(), Err(ElementNotFound));
            prop_assert!(map.in_order().is_empty());
        } else {
            let in_order = map.in_order();
            let mut pre_order = map.pre_order().unwrap();
            let mut post_order = map.post_order().unwrap();
            let mut level_order = map.level_order();
            prop_assert_eq!(pre_order.first(), post_order.last());
            prop_assert_eq!(pre_order.first(), level_order.first());
            pre_order.sort();
            post_order.sort();
            level_order.sort();
            prop_assert_eq!(&pre_order, &in_order);
            prop_assert_eq!(&post_order, &in_order);
            prop_assert_eq!(&level_order, &in_order);
        }
    }
}
