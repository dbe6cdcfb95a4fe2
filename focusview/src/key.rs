#[cfg(not(feature = "std"))]
use alloc::collections::BTreeMap;
#[cfg(feature = "std")]
use std::collections::HashMap;

use crate::FocusRecord;

#[cfg(feature = "std")]
pub(crate) type FocusMap<K> = HashMap<K, FocusRecord>;
#[cfg(not(feature = "std"))]
pub(crate) type FocusMap<K> = BTreeMap<K, FocusRecord>;

/// Bound for item identities used as focus-map keys.
///
/// With `std` this is `Hash + Eq`; without it, `Ord`.
#[cfg(feature = "std")]
pub trait ItemKey: core::hash::Hash + Eq + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Eq + Clone> ItemKey for K {}

#[cfg(not(feature = "std"))]
pub trait ItemKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> ItemKey for K {}
