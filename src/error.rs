use derive_more::{Display, Error};

/// The error returned when a lookup or traversal finds nothing to yield.
///
/// Raised by [`find`] and [`find_mut`] for absent keys, and by [`pre_order`]
/// and [`post_order`] on an empty map.
///
/// [`find`]: crate::BalancedMap::find
/// [`find_mut`]: crate::BalancedMap::find_mut
/// [`pre_order`]: crate::BalancedMap::pre_order
/// [`post_order`]: crate::BalancedMap::post_order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("element not found")]
pub struct ElementNotFound;

pub type Result<T> = std::result::Result<T, ElementNotFound>;
