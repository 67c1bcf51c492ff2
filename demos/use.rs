use balanced_map::{BalancedMap, ElementNotFound};

fn main() {
    let mut map = BalancedMap::new();
    map.insert(0, "zero");
    map.insert(1, "one");
    map.insert(2, "two");
    map.insert(2, "two");
    map.insert(3, "three");
    map.insert(4, "four");
    map.insert(5, "five");
    assert_eq!(map.get(&1), Some(&"one"));
    assert_eq!(map.len(), 6);

    if let Ok(value) = map.find_mut(&1) {
        *value = "uno";
    }
    assert_eq!(map.find(&1), Ok(&"uno"));
    assert_eq!(map.find(&6), Err(ElementNotFound));

    for (k, v) in &map {
        println!("{k} => {v}");
    }

    println!("in-order:   {:?}", map.in_order());
    println!("pre-order:  {:?}", map.pre_order());
    println!("post-order: {:?}", map.post_order());
}
