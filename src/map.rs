//! An ordered map implemented with an AVL tree.

use std::borrow::Borrow;
use std::cmp::{self, Ordering};
use std::collections::VecDeque;
use std::fmt;
use std::iter::FromIterator;
use std::mem;

use log::{debug, trace};

use crate::error::{ElementNotFound, Result};

mod iter;

pub use iter::{Iter, Keys, Values};

/// An ordered map implemented with an AVL tree.
///
/// Inserting an existing key replaces its value. Keys cannot be removed.
///
/// ```
/// use balanced_map::BalancedMap;
/// let mut map = BalancedMap::new();
/// map.insert(0, "zero");
/// map.insert(1, "one");
/// map.insert(2, "two");
/// assert_eq!(map.get(&1), Some(&"one"));
/// *map.find_mut(&1).unwrap() = "uno";
/// assert_eq!(map.find(&1), Ok(&"uno"));
/// assert!(map.find(&3).is_err());
/// ```
pub struct BalancedMap<K, V> {
    root: Link<K, V>,
    num_nodes: usize,
}

struct Node<K, V> {
    key: K,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,
    height: usize,
}

type Link<K, V> = Option<Box<Node<K, V>>>;

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl<K, V> BalancedMap<K, V> {
    /// Creates an empty map.
    /// No memory is allocated until the first item is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the map contains no elements.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of elements in the map.
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the height of the tree, where a single leaf has height 0.
    /// Returns `None` for an empty map.
    pub fn height(&self) -> Option<usize> {
        self.root.as_ref().map(|root| root.height)
    }

    /// Clears the map, deallocating all memory.
    pub fn clear(&mut self) {
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
        if self.num_nodes > 0 {
            debug!("dropped {} nodes", self.num_nodes);
        }
        self.num_nodes = 0;
    }

    /// Gets an iterator over the entries of the map, sorted by key.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(self)
    }

    /// Gets an iterator over the keys of the map, in sorted order.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys::new(self.iter())
    }

    /// Gets an iterator over the values of the map, in order by key.
    pub fn values(&self) -> Values<'_, K, V> {
        Values::new(self.iter())
    }

    /// Calls `f` for every entry, level by level, starting at the root.
    pub fn traverse_level_order<F: FnMut(&K, &V)>(&self, mut f: F) {
        let mut queue: VecDeque<&Node<K, V>> = self.root.as_deref().into_iter().collect();
        while let Some(node) = queue.pop_front() {
            f(&node.key, &node.value);
            queue.extend(node.left.as_deref());
            queue.extend(node.right.as_deref());
        }
    }

    // Depth first walk with an explicit stack.
    // Each node is handed to `preorder` on the way down, to `inorder` once its
    // left subtree is done and to `postorder` once both subtrees are done.
    fn traverse<'a, Pre, In, Post>(&'a self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(&'a Node<K, V>),
        In: FnMut(&'a Node<K, V>),
        Post: FnMut(&'a Node<K, V>),
    {
        let mut stack: Vec<(&'a Node<K, V>, Direction)> = Vec::new();
        if let Some(root) = self.root.as_deref() {
            stack.push((root, Direction::FromParent));
        }
        while let Some((node, dir)) = stack.pop() {
            match dir {
                Direction::FromParent => {
                    preorder(node);
                    stack.push((node, Direction::FromLeft));
                    if let Some(left) = node.left.as_deref() {
                        stack.push((left, Direction::FromParent));
                    }
                }
                Direction::FromLeft => {
                    inorder(node);
                    stack.push((node, Direction::FromRight));
                    if let Some(right) = node.right.as_deref() {
                        stack.push((right, Direction::FromParent));
                    }
                }
                Direction::FromRight => postorder(node),
            }
        }
    }
}

impl<K: Ord, V> BalancedMap<K, V> {
    /// Returns true if the map contains a value for the specified key.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).is_some()
    }

    /// Returns a reference to the value corresponding to the key.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node_mut(key).map(|node| &mut node.value)
    }

    /// Returns references to the key-value pair corresponding to the key.
    pub fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.find_node(key).map(|node| (&node.key, &node.value))
    }

    /// Returns a reference to the value corresponding to the key.
    ///
    /// # Errors
    /// Returns [`ElementNotFound`] if the key is not in the map.
    pub fn find<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).ok_or(ElementNotFound)
    }

    /// Returns a mutable reference to the value corresponding to the key.
    ///
    /// # Errors
    /// Returns [`ElementNotFound`] if the key is not in the map.
    pub fn find_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_mut(key).ok_or(ElementNotFound)
    }

    /// Inserts a key-value pair into the map and rebalances the tree.
    ///
    /// If the map already had the key, its value is replaced and the old
    /// value is returned. The tree shape is left untouched in that case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let replaced = Self::insert_into(&mut self.root, key, value);
        if replaced.is_none() {
            self.num_nodes += 1;
        }
        replaced
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        let mut num_nodes = 0;
        let mut previous: Option<&K> = None;
        self.traverse(
            |node| {
                let left_height = node.left_height();
                let right_height = node.right_height();

                // Check height
                assert_eq!(node.height, cmp::max(left_height, right_height));

                // Check AVL condition (nearly balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            },
            |node| {
                // Check search order
                if let Some(previous) = previous {
                    assert!(*previous < node.key);
                }
                previous = Some(&node.key);
            },
            |_| {},
        );

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
        assert_eq!(self.root.is_none(), self.num_nodes == 0);
    }

    fn find_node<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match key.cmp(node.key.borrow()) {
                Ordering::Equal => break,
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
            };
        }
        current
    }

    fn find_node_mut<Q>(&mut self, key: &Q) -> Option<&mut Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            match key.cmp(node.key.borrow()) {
                Ordering::Equal => return Some(node),
                Ordering::Less => current = node.left.as_deref_mut(),
                Ordering::Greater => current = node.right.as_deref_mut(),
            }
        }
        None
    }

    // Descends to the insert position and rebalances every node on the way
    // back up. Returns the replaced value if the key was already present.
    fn insert_into(link: &mut Link<K, V>, key: K, value: V) -> Option<V> {
        let Some(node) = link.as_mut() else {
            *link = Some(Node::create(key, value));
            return None;
        };
        let replaced = match key.cmp(&node.key) {
            Ordering::Equal => {
                trace!("replacing value of existing key");
                return Some(mem::replace(&mut node.value, value));
            }
            Ordering::Less => Self::insert_into(&mut node.left, key, value),
            Ordering::Greater => Self::insert_into(&mut node.right, key, value),
        };
        if replaced.is_none() {
            if let Some(node) = link.take() {
                *link = Some(node.rebalance());
            }
        }
        replaced
    }
}

impl<K: Clone, V> BalancedMap<K, V> {
    /// Returns all keys in ascending order.
    pub fn in_order(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse(|_| {}, |node| keys.push(node.key.clone()), |_| {});
        keys
    }

    /// Returns all keys in pre-order (node, left subtree, right subtree).
    ///
    /// # Errors
    /// Returns [`ElementNotFound`] if the map is empty.
    pub fn pre_order(&self) -> Result<Vec<K>> {
        if self.is_empty() {
            return Err(ElementNotFound);
        }
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse(|node| keys.push(node.key.clone()), |_| {}, |_| {});
        Ok(keys)
    }

    /// Returns all keys in post-order (left subtree, right subtree, node).
    ///
    /// # Errors
    /// Returns [`ElementNotFound`] if the map is empty.
    pub fn post_order(&self) -> Result<Vec<K>> {
        if self.is_empty() {
            return Err(ElementNotFound);
        }
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse(|_| {}, |_| {}, |node| keys.push(node.key.clone()));
        Ok(keys)
    }

    /// Returns all keys level by level, starting at the root.
    pub fn level_order(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.traverse_level_order(|key, _| keys.push(key.clone()));
        keys
    }
}

impl<K, V> Drop for BalancedMap<K, V> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K, V> Default for BalancedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BalancedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for BalancedMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Ord, V> Extend<(K, V)> for BalancedMap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a BalancedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Node<K, V> {
    fn create(key: K, value: V) -> Box<Self> {
        Box::new(Node {
            key,
            value,
            left: None,
            right: None,
            height: 0,
        })
    }

    // Subtree heights shifted by one, so that an absent subtree counts as 0.
    fn left_height(&self) -> usize {
        self.left.as_ref().map_or(0, |left| left.height + 1)
    }

    fn right_height(&self) -> usize {
        self.right.as_ref().map_or(0, |right| right.height + 1)
    }

    fn balance_factor(&self) -> isize {
        self.left_height() as isize - self.right_height() as isize
    }

    fn adjust_height(&mut self) {
        self.height = cmp::max(self.left_height(), self.right_height());
    }

    /// Makes the right child the new subtree root and returns it.
    fn rotate_left(mut self: Box<Self>) -> Box<Self> {
        match self.right.take() {
            None => self,
            Some(mut right) => {
                trace!("rotate left");
                self.right = right.left.take();
                self.adjust_height();
                right.left = Some(self);
                right.adjust_height();
                right
            }
        }
    }

    /// Makes the left child the new subtree root and returns it.
    fn rotate_right(mut self: Box<Self>) -> Box<Self> {
        match self.left.take() {
            None => self,
            Some(mut left) => {
                trace!("rotate right");
                self.left = left.right.take();
                self.adjust_height();
                left.right = Some(self);
                left.adjust_height();
                left
            }
        }
    }

    /// Restores AVL condition (balance) at this node if necessary and adjusts height.
    /// Resulting balance will be +1, 0 or -1 height difference between left and right subtree.
    /// Initial balance must not exceed +2 or -2, which always holds after a single insert.
    /// Returns the root of the rebalanced subtree.
    fn rebalance(mut self: Box<Self>) -> Box<Self> {
        self.adjust_height();
        let balance = self.balance_factor();
        debug_assert!((-2..=2).contains(&balance));
        if balance > 1 {
            // Left-right case needs the left child turned first
            if let Some(left) = self.left.take() {
                self.left = Some(if left.balance_factor() < 0 {
                    left.rotate_left()
                } else {
                    left
                });
            }
            self.rotate_right()
        } else if balance < -1 {
            // Right-left case needs the right child turned first
            if let Some(right) = self.right.take() {
                self.right = Some(if right.balance_factor() > 0 {
                    right.rotate_right()
                } else {
                    right
                });
            }
            self.rotate_left()
        } else {
            self
        }
    }
}
