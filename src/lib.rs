//! An ordered map implemented with an AVL tree.
//!
//! ```
//! use balanced_map::BalancedMap;
//! let mut map = BalancedMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//! assert_eq!(map.find(&2), Ok(&"two"));
//! assert_eq!(map.in_order(), vec![1, 2, 3]);
//! assert_eq!(map.pre_order(), Ok(vec![2, 1, 3]));
//! ```

mod error;
pub mod map;

pub use error::{ElementNotFound, Result};
pub use map::BalancedMap;
