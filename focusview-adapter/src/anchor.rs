use core::fmt;

use focusview::{Cursor, Item, ItemKey, Sequence};

/// A scroll anchor that survives changes to the underlying sequence.
///
/// Typical use cases:
/// - a feed that loads older items above the current one without content jumping
/// - any reorder/replace where the surface should stay on the same item identity
#[derive(Clone, PartialEq)]
pub struct ScrollAnchor<K> {
    pub key: K,
    /// Committed position relative to the anchor item's leading edge.
    pub offset: f64,
}

impl<K: fmt::Debug> fmt::Debug for ScrollAnchor<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScrollAnchor")
            .field("key", &self.key)
            .field("offset", &self.offset)
            .finish()
    }
}

/// Captures the identity of the item at `cursor` together with `position`.
///
/// Returns `None` if the cursor no longer resolves.
pub fn capture_anchor<Q>(
    seq: &Q,
    cursor: Cursor,
    position: f64,
) -> Option<ScrollAnchor<<Q::Item as Item>::Id>>
where
    Q: Sequence + ?Sized,
{
    let item = cursor.current(seq)?;
    Some(ScrollAnchor {
        key: item.id(),
        offset: position,
    })
}

/// Finds the cursor for a previously captured anchor in the *current* sequence.
///
/// The host provides the `key_to_index` mapping; the item found there must still carry the
/// anchor's key.
pub fn resolve_anchor<Q, K>(
    seq: &Q,
    anchor: &ScrollAnchor<K>,
    mut key_to_index: impl FnMut(&K) -> Option<usize>,
) -> Option<Cursor>
where
    Q: Sequence + ?Sized,
    Q::Item: Item<Id = K>,
    K: ItemKey,
{
    let index = key_to_index(&anchor.key)?;
    let cursor = Cursor::at(seq, index)?;
    let item = cursor.current(seq)?;
    (item.id() == anchor.key).then_some(cursor)
}
